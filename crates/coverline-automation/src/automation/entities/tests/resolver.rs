use std::sync::Arc;

use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::common::*;
use crate::automation::entities::catalog::{EntityType, VERSION_NUMBER_PARAMETER};
use crate::automation::entities::domain::DeploymentEnvironment;
use crate::automation::entities::error::{ResolutionError, ENTITY_NOT_FOUND_TITLE};
use crate::automation::entities::locator::{EntityLocator, LocatorKind};
use crate::automation::entities::repository::RepositoryError;
use crate::automation::entities::resolver::{EntityLocatorResolver, EntityRequest, ResolveEntity};
use crate::automation::entities::serialisation::SerialisedEntity;

#[tokio::test]
async fn claim_reference_in_development_loads_once_with_explicit_environment() {
    let repository = recording();
    let resolver = resolver(EntityType::Claim, repository.clone());
    let request = EntityRequest::from_parameters(
        EntityType::Claim,
        &parameters(json!({ "claimReference": "NKHSA", "environment": "Development" })),
    )
    .expect("parameters parse");

    let entity = resolver
        .resolve(&request, &context(DeploymentEnvironment::Production))
        .await
        .expect("claim resolves");

    let queries = repository.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].entity_type, EntityType::Claim);
    assert_eq!(queries[0].tenant_id, tenant_id());
    assert_eq!(
        queries[0].environment,
        Some(DeploymentEnvironment::Development)
    );
    assert_eq!(
        queries[0].locator,
        EntityLocator::ByReference("NKHSA".to_string())
    );

    match entity {
        SerialisedEntity::Claim(claim) => {
            assert_eq!(claim.id, development_claim_id().to_string());
            assert_eq!(claim.environment, DeploymentEnvironment::Development);
            assert_eq!(claim.claim_reference, "NKHSA");
        }
        other => panic!("expected claim, got {other:?}"),
    }
}

#[tokio::test]
async fn ambient_environment_applies_when_request_has_none() {
    let repository = recording();
    let resolver = resolver(EntityType::Claim, repository.clone());
    let request = EntityRequest::new(EntityLocator::ByReference("NKHSA".to_string()));

    let entity = resolver
        .resolve(&request, &context(DeploymentEnvironment::Production))
        .await
        .expect("production claim resolves");

    assert_eq!(entity.id(), production_claim_id().to_string());
    assert_eq!(
        repository.queries()[0].environment,
        Some(DeploymentEnvironment::Production)
    );
}

#[tokio::test]
async fn environment_agnostic_types_never_receive_an_environment() {
    let repository = recording();
    let resolver = resolver(EntityType::Product, repository.clone());
    let request = EntityRequest::new(EntityLocator::ById(product_id()))
        .in_environment(DeploymentEnvironment::Staging);

    let entity = resolver
        .resolve(&request, &context(DeploymentEnvironment::Development))
        .await
        .expect("product resolves");

    assert_eq!(entity.entity_type(), EntityType::Product);
    assert_eq!(repository.queries()[0].environment, None);
}

#[tokio::test]
async fn organisation_alias_is_translated_to_an_id_before_lookup() {
    let repository = recording();
    let resolver = resolver(EntityType::Organisation, repository.clone());
    let request = EntityRequest::from_parameters(
        EntityType::Organisation,
        &parameters(json!({ "organisationAlias": "Acme-Direct" })),
    )
    .expect("parameters parse");

    let entity = resolver
        .resolve(&request, &context(DeploymentEnvironment::Development))
        .await
        .expect("organisation resolves");

    assert_eq!(entity.id(), organisation_id().to_string());
    assert_eq!(
        repository.alias_lookups(),
        vec![(EntityType::Organisation, "Acme-Direct".to_string())]
    );
    assert_eq!(
        repository.queries()[0].locator,
        EntityLocator::ById(organisation_id())
    );
}

#[tokio::test]
async fn unknown_alias_is_not_found_without_repository_lookup() {
    let repository = recording();
    let resolver = resolver(EntityType::Tenant, repository.clone());
    let request = EntityRequest::new(EntityLocator::ByAlias("lighthouse".to_string()));

    match resolver
        .resolve(&request, &context(DeploymentEnvironment::Production))
        .await
    {
        Err(ResolutionError::EntityNotFound(data)) => {
            assert_eq!(
                data.additional_details,
                vec![
                    "Entity Type: Tenant".to_string(),
                    "Tenant Alias: lighthouse".to_string()
                ]
            );
        }
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(repository.queries().is_empty());
}

#[tokio::test]
async fn missing_claim_names_type_key_and_environment() {
    let repository = recording();
    let resolver = resolver(EntityType::Claim, repository.clone());
    let request = EntityRequest::new(EntityLocator::ByReference("ZZZZZ".to_string()))
        .in_environment(DeploymentEnvironment::Staging);

    match resolver
        .resolve(&request, &context(DeploymentEnvironment::Production))
        .await
    {
        Err(ResolutionError::EntityNotFound(data)) => {
            assert_eq!(data.title, ENTITY_NOT_FOUND_TITLE);
            assert_eq!(
                data.additional_details,
                vec![
                    "Entity Type: Claim".to_string(),
                    "Claim Reference: ZZZZZ".to_string(),
                    "Environment: Staging".to_string(),
                ]
            );
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn quote_version_resolves_by_parent_reference_and_number() {
    let repository = recording();
    let resolver = resolver(EntityType::QuoteVersion, repository.clone());
    let request = EntityRequest::from_parameters(
        EntityType::QuoteVersion,
        &parameters(json!({ "quoteReference": "QX1042", "versionNumber": "2" })),
    )
    .expect("parameters parse");

    let entity = resolver
        .resolve(&request, &context(DeploymentEnvironment::Development))
        .await
        .expect("quote version resolves");

    assert_eq!(entity.id(), quote_version_id(2).to_string());
}

#[tokio::test]
async fn missing_quote_version_reports_version_number() {
    let repository = recording();
    let resolver = resolver(EntityType::QuoteVersion, repository);
    let request = EntityRequest::from_parameters(
        EntityType::QuoteVersion,
        &parameters(json!({ "quoteReference": "QX1042", "versionNumber": 9 })),
    )
    .expect("parameters parse");

    match resolver
        .resolve(&request, &context(DeploymentEnvironment::Development))
        .await
    {
        Err(ResolutionError::EntityNotFound(data)) => {
            assert!(data
                .additional_details
                .contains(&"Quote Reference: QX1042".to_string()));
            assert!(data
                .additional_details
                .contains(&"Version Number: 9".to_string()));
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn conflicting_locators_are_ambiguous() {
    match EntityRequest::from_parameters(
        EntityType::Claim,
        &parameters(json!({ "claimReference": "NKHSA", "claimNumber": "C-77" })),
    ) {
        Err(ResolutionError::AmbiguousLocator {
            entity_type,
            supplied,
        }) => {
            assert_eq!(entity_type, EntityType::Claim);
            assert_eq!(supplied.len(), 2);
        }
        other => panic!("expected ambiguous locator, got {other:?}"),
    }
}

#[test]
fn version_id_and_parent_key_together_are_ambiguous() {
    let result = EntityRequest::from_parameters(
        EntityType::ClaimVersion,
        &parameters(json!({
            "claimVersionId": "00000000-0000-0000-0000-000000000041",
            "claimReference": "NKHSA",
            "versionNumber": 1
        })),
    );
    assert!(matches!(
        result,
        Err(ResolutionError::AmbiguousLocator { .. })
    ));
}

#[test]
fn missing_locator_lists_expected_parameters() {
    match EntityRequest::from_parameters(
        EntityType::Policy,
        &parameters(json!({ "environment": "Staging" })),
    ) {
        Err(ResolutionError::ParameterMissing { expected, .. }) => {
            assert_eq!(expected, vec!["policyId", "policyNumber"]);
        }
        other => panic!("expected missing parameter, got {other:?}"),
    }
}

#[test]
fn parent_key_without_version_number_is_missing_a_parameter() {
    match EntityRequest::from_parameters(
        EntityType::QuoteVersion,
        &parameters(json!({ "quoteReference": "QX1042" })),
    ) {
        Err(ResolutionError::ParameterMissing { expected, .. }) => {
            assert_eq!(expected, vec!["versionNumber"]);
        }
        other => panic!("expected missing parameter, got {other:?}"),
    }
}

#[test]
fn unrecognised_parameters_are_rejected() {
    match EntityRequest::from_parameters(
        EntityType::Claim,
        &parameters(json!({ "claimReference": "NKHSA", "colour": "red" })),
    ) {
        Err(ResolutionError::ParameterInvalid { parameter, .. }) => {
            assert_eq!(parameter, "colour");
        }
        other => panic!("expected invalid parameter, got {other:?}"),
    }
}

#[test]
fn malformed_ids_and_environments_are_invalid() {
    assert!(matches!(
        EntityRequest::from_parameters(
            EntityType::Quote,
            &parameters(json!({ "quoteId": "not-a-guid" })),
        ),
        Err(ResolutionError::ParameterInvalid { .. })
    ));
    assert!(matches!(
        EntityRequest::from_parameters(
            EntityType::Quote,
            &parameters(json!({ "quoteReference": "QX1042", "environment": "qa" })),
        ),
        Err(ResolutionError::ParameterInvalid { .. })
    ));
}

#[tokio::test]
async fn unsupported_locator_fails_before_lookup() {
    let repository = recording();
    let resolver = resolver(EntityType::Claim, repository.clone());
    let request = EntityRequest::new(EntityLocator::ByAlias("nkhsa".to_string()));

    match resolver
        .resolve(&request, &context(DeploymentEnvironment::Development))
        .await
    {
        Err(ResolutionError::UnsupportedLocator { entity_type, kind }) => {
            assert_eq!(entity_type, EntityType::Claim);
            assert_eq!(kind, Some(LocatorKind::Alias));
        }
        other => panic!("expected unsupported locator, got {other:?}"),
    }
    assert!(repository.queries().is_empty());
    assert!(repository.alias_lookups().is_empty());
}

#[tokio::test]
async fn repository_failures_propagate() {
    let repository = Arc::new(UnavailableRepository);
    let resolver =
        EntityLocatorResolver::new(EntityType::Quote, repository.clone(), repository, factory());
    let request = EntityRequest::new(EntityLocator::ById(quote_id()));

    match resolver
        .resolve(&request, &context(DeploymentEnvironment::Development))
        .await
    {
        Err(error @ ResolutionError::Repository(_)) => {
            assert!(!error.is_configuration_error());
        }
        other => panic!("expected repository error, got {other:?}"),
    }
}

#[tokio::test]
async fn alias_lookup_timeouts_propagate() {
    let repository = Arc::new(UnavailableRepository);
    let resolver = EntityLocatorResolver::new(
        EntityType::Organisation,
        repository.clone(),
        repository,
        factory(),
    );
    let request = EntityRequest::new(EntityLocator::ByAlias("acme-direct".to_string()));

    match resolver
        .resolve(&request, &context(DeploymentEnvironment::Development))
        .await
    {
        Err(error @ ResolutionError::Repository(RepositoryError::Timeout(_))) => {
            assert_eq!(error.to_string(), "repository call timed out after 250 ms");
            assert_eq!(
                error.error_data().code,
                "automation.providers.repository.unavailable"
            );
        }
        other => panic!("expected repository timeout, got {other:?}"),
    }
}

/// One locator parameter set for a type, with the record it finds in `store()`
/// and a variant that finds nothing.
struct LocatorCase {
    entity_type: EntityType,
    found: Value,
    expected_id: Uuid,
    missing: Value,
    missing_details: Vec<String>,
}

fn label_of(entity_type: EntityType, parameter: &str) -> &'static str {
    entity_type
        .locator_keys()
        .iter()
        .find(|key| key.parameter == parameter)
        .map(|key| key.label)
        .unwrap_or_else(|| panic!("{parameter} is not a {} key", entity_type.name()))
}

fn keyed(
    entity_type: EntityType,
    parameter: &str,
    value: impl ToString,
    expected_id: Uuid,
    missing: impl ToString,
) -> LocatorCase {
    let label = label_of(entity_type, parameter);
    let missing = missing.to_string();
    let mut found = Map::new();
    found.insert(parameter.to_string(), Value::String(value.to_string()));
    let mut absent = Map::new();
    absent.insert(parameter.to_string(), Value::String(missing.clone()));
    LocatorCase {
        entity_type,
        found: Value::Object(found),
        expected_id,
        missing: Value::Object(absent),
        missing_details: vec![format!("{label}: {missing}")],
    }
}

fn versioned(
    entity_type: EntityType,
    parent_parameter: &str,
    value: impl ToString,
    version_number: u32,
    expected_id: Uuid,
) -> LocatorCase {
    let parent = entity_type
        .versioned_parent()
        .expect("type has a versioned parent");
    let label = label_of(parent, parent_parameter);
    let value = value.to_string();
    let with_version = |number: u32| {
        let mut parameters = Map::new();
        parameters.insert(parent_parameter.to_string(), Value::String(value.clone()));
        parameters.insert(VERSION_NUMBER_PARAMETER.to_string(), json!(number));
        Value::Object(parameters)
    };
    LocatorCase {
        entity_type,
        found: with_version(version_number),
        expected_id,
        missing: with_version(9),
        missing_details: vec![format!("{label}: {value}"), "Version Number: 9".to_string()],
    }
}

fn locator_cases() -> Vec<LocatorCase> {
    use EntityType::*;
    let absent = id(999);
    vec![
        keyed(Tenant, "tenantId", tenant_id(), tenant_id(), absent),
        keyed(Tenant, "tenantAlias", "harbour", tenant_id(), "missing"),
        keyed(Organisation, "organisationId", organisation_id(), organisation_id(), absent),
        keyed(Organisation, "organisationAlias", "acme-direct", organisation_id(), "missing"),
        keyed(Product, "productId", product_id(), product_id(), absent),
        keyed(Product, "productAlias", "motor", product_id(), "missing"),
        keyed(Portal, "portalId", portal_id(), portal_id(), absent),
        keyed(Portal, "portalAlias", "broker-portal", portal_id(), "missing"),
        keyed(Customer, "customerId", customer_id(), customer_id(), absent),
        keyed(
            Customer,
            "customerAccountEmail",
            "ava.chen@example.com",
            customer_id(),
            "nobody@example.com",
        ),
        keyed(Person, "personId", person_id(), person_id(), absent),
        keyed(User, "userId", user_id(), user_id(), absent),
        keyed(
            User,
            "userAccountEmail",
            "broker@acme.example",
            user_id(),
            "nobody@example.com",
        ),
        keyed(Role, "roleId", role_id(), role_id(), absent),
        keyed(Quote, "quoteId", quote_id(), quote_id(), absent),
        keyed(Quote, "quoteReference", "QX1042", quote_id(), "QX0000"),
        keyed(
            QuoteVersion,
            "quoteVersionId",
            quote_version_id(1),
            quote_version_id(1),
            absent,
        ),
        versioned(QuoteVersion, "quoteId", quote_id(), 2, quote_version_id(2)),
        versioned(QuoteVersion, "quoteReference", "QX1042", 1, quote_version_id(1)),
        keyed(Policy, "policyId", policy_id(), policy_id(), absent),
        keyed(Policy, "policyNumber", "P-000381", policy_id(), "P-999999"),
        keyed(
            PolicyTransaction,
            "policyTransactionId",
            policy_transaction_id(),
            policy_transaction_id(),
            absent,
        ),
        keyed(Claim, "claimId", development_claim_id(), development_claim_id(), absent),
        keyed(Claim, "claimReference", "NKHSA", development_claim_id(), "ZZZZZ"),
        keyed(
            Claim,
            "claimNumber",
            DEVELOPMENT_CLAIM_NUMBER,
            development_claim_id(),
            "CL-00000",
        ),
        keyed(
            ClaimVersion,
            "claimVersionId",
            claim_version_id(),
            claim_version_id(),
            absent,
        ),
        versioned(ClaimVersion, "claimId", development_claim_id(), 1, claim_version_id()),
        versioned(ClaimVersion, "claimReference", "NKHSA", 1, claim_version_id()),
        versioned(
            ClaimVersion,
            "claimNumber",
            DEVELOPMENT_CLAIM_NUMBER,
            1,
            claim_version_id(),
        ),
        keyed(Document, "documentId", document_id(), document_id(), absent),
        keyed(EmailMessage, "emailId", email_id(), email_id(), absent),
        keyed(Report, "reportId", report_id(), report_id(), absent),
    ]
}

#[test]
fn locator_cases_cover_every_catalog_key() {
    let cases = locator_cases();
    for entity_type in EntityType::all() {
        let mut parameters: Vec<&str> = entity_type
            .locator_keys()
            .iter()
            .map(|key| key.parameter)
            .collect();
        if let Some(parent) = entity_type.versioned_parent() {
            parameters.extend(parent.locator_keys().iter().map(|key| key.parameter));
        }

        for parameter in parameters {
            assert!(
                cases.iter().any(|case| case.entity_type == entity_type
                    && case.found.get(parameter).is_some()),
                "no locator case for {} {parameter}",
                entity_type.name()
            );
        }
    }
}

#[tokio::test]
async fn every_locator_finds_its_record_and_reports_misses() {
    let context = context(DeploymentEnvironment::Development);

    for case in locator_cases() {
        let resolver = resolver(case.entity_type, recording());

        let request = EntityRequest::from_parameters(case.entity_type, &parameters(case.found.clone()))
            .unwrap_or_else(|error| panic!("{} parses: {error}", case.found));
        let entity = resolver
            .resolve(&request, &context)
            .await
            .unwrap_or_else(|error| panic!("{} resolves: {error}", case.found));
        assert_eq!(entity.id(), case.expected_id.to_string(), "{}", case.found);

        let request =
            EntityRequest::from_parameters(case.entity_type, &parameters(case.missing.clone()))
                .unwrap_or_else(|error| panic!("{} parses: {error}", case.missing));
        match resolver.resolve(&request, &context).await {
            Err(ResolutionError::EntityNotFound(data)) => {
                let details = &data.additional_details;
                assert!(
                    details.contains(&format!("Entity Type: {}", case.entity_type.name())),
                    "{details:?}"
                );
                for line in &case.missing_details {
                    assert!(details.contains(line), "{line} missing from {details:?}");
                }
                assert_eq!(
                    details.contains(&"Environment: Development".to_string()),
                    case.entity_type.is_environment_scoped(),
                    "{details:?}"
                );
            }
            other => panic!("expected not found for {}, got {other:?}", case.missing),
        }
    }
}
