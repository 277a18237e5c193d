//! End-to-end provider scenarios driven through the public API: provider JSON is
//! parsed, dispatched and resolved against a snapshot-backed store.

mod common {
    use std::sync::Arc;

    use coverline_automation::automation::entities::{
        AutomationContext, DeploymentEnvironment, DynamicEntityDispatcher, EntityProvider,
        EntitySnapshot, InMemoryEntityStore, LabelledFormDataPrettifier, SerialisationSettings,
        SerialisedEntityFactory,
    };
    use serde_json::json;
    use uuid::Uuid;

    pub(super) const TENANT: &str = "7d0e2a10-0000-4000-8000-000000000001";
    pub(super) const CLAIM: &str = "7d0e2a10-0000-4000-8000-000000000040";
    pub(super) const QUOTE: &str = "7d0e2a10-0000-4000-8000-000000000020";

    pub(super) fn context(environment: DeploymentEnvironment) -> AutomationContext {
        AutomationContext::new(Uuid::parse_str(TENANT).expect("valid id"), environment)
    }

    fn snapshot() -> EntitySnapshot {
        let document = json!({
            "tenants": [{
                "id": TENANT,
                "alias": "harbour",
                "name": "Harbour Insurance",
                "createdTimestamp": "2023-01-05T09:00:00Z",
                "lastModifiedTimestamp": "2023-01-05T09:00:00Z"
            }],
            "organisations": [{
                "id": "7d0e2a10-0000-4000-8000-000000000002",
                "tenantId": TENANT,
                "alias": "acme-direct",
                "name": "Acme Direct",
                "isDefault": true,
                "createdTimestamp": "2023-01-05T09:00:00Z",
                "lastModifiedTimestamp": "2023-01-05T09:00:00Z"
            }],
            "customers": [{
                "id": "7d0e2a10-0000-4000-8000-000000000010",
                "tenantId": TENANT,
                "organisationId": "7d0e2a10-0000-4000-8000-000000000002",
                "environment": "Development",
                "displayName": "Ava Chen",
                "createdTimestamp": "2024-03-01T09:00:00Z",
                "lastModifiedTimestamp": "2024-03-01T09:00:00Z"
            }],
            "quotes": [{
                "id": QUOTE,
                "tenantId": TENANT,
                "organisationId": "7d0e2a10-0000-4000-8000-000000000002",
                "productId": "7d0e2a10-0000-4000-8000-000000000003",
                "environment": "Development",
                "quoteReference": "QX1042",
                "quoteType": "newBusiness",
                "quoteState": "complete",
                "customerId": "7d0e2a10-0000-4000-8000-000000000010",
                "formData": { "vehicleMake": "Mazda" },
                "createdTimestamp": "2024-06-10T09:00:00Z",
                "lastModifiedTimestamp": "2024-06-10T09:00:00Z"
            }],
            "claims": [{
                "id": CLAIM,
                "tenantId": TENANT,
                "organisationId": "7d0e2a10-0000-4000-8000-000000000002",
                "productId": "7d0e2a10-0000-4000-8000-000000000003",
                "environment": "Development",
                "claimReference": "NKHSA",
                "claimState": "notified",
                "customerId": "7d0e2a10-0000-4000-8000-000000000010",
                "createdTimestamp": "2024-09-03T09:00:00Z",
                "lastModifiedTimestamp": "2024-09-03T09:00:00Z"
            }]
        });
        let bytes = serde_json::to_vec(&document).expect("snapshot encodes");
        EntitySnapshot::from_reader(bytes.as_slice()).expect("snapshot parses")
    }

    pub(super) fn provider() -> EntityProvider {
        let store = Arc::new(InMemoryEntityStore::from_snapshot(snapshot()));
        let factory = Arc::new(
            SerialisedEntityFactory::new(
                SerialisationSettings::new("https://api.coverline.test"),
                Arc::new(LabelledFormDataPrettifier),
            )
            .expect("factory builds"),
        );
        let dispatcher = DynamicEntityDispatcher::builder()
            .register_all(store.clone(), store, factory)
            .build();
        EntityProvider::new(Arc::new(dispatcher))
    }
}

use common::*;
use coverline_automation::automation::entities::{
    DeploymentEnvironment, EntityProviderConfig, ResolutionError, SerialisedEntity,
};
use serde_json::json;

#[tokio::test]
async fn claim_provider_resolves_by_reference_in_requested_environment() {
    let provider = provider();
    let config = EntityProviderConfig::from_json(&json!({
        "claimEntity": {
            "claimReference": "NKHSA",
            "environment": "Development",
            "includeOptionalProperties": ["/customer", "/organisation"]
        }
    }))
    .expect("config parses");

    let entity = provider
        .resolve(&config, &context(DeploymentEnvironment::Production))
        .await
        .expect("claim resolves");

    assert_eq!(entity.id(), CLAIM);
    let json = serde_json::to_value(&entity).expect("entity serialises");
    assert_eq!(json["customer"]["displayName"], "Ava Chen");
    assert_eq!(json["organisation"]["alias"], "acme-direct");
    assert!(json.get("tenant").is_none());
}

#[tokio::test]
async fn dynamic_provider_uses_ambient_environment() {
    let provider = provider();
    let config = EntityProviderConfig::from_json(&json!({
        "dynamicEntity": {
            "entityType": "quote",
            "entityId": QUOTE,
            "includeOptionalProperties": "/customer"
        }
    }))
    .expect("config parses");

    let entity = provider
        .resolve(&config, &context(DeploymentEnvironment::Development))
        .await
        .expect("quote resolves");

    match entity {
        SerialisedEntity::Quote(quote) => {
            assert_eq!(quote.quote_reference, "QX1042");
            assert!(quote.form_data.is_some());
            let customer = quote.customer.expect("customer included");
            assert_eq!(customer.display_name, "Ava Chen");
        }
        other => panic!("expected quote, got {other:?}"),
    }

    match provider
        .resolve(&config, &context(DeploymentEnvironment::Staging))
        .await
    {
        Err(ResolutionError::EntityNotFound(data)) => {
            assert!(data
                .additional_details
                .contains(&"Environment: Staging".to_string()));
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn unsupported_dynamic_type_is_a_configuration_error() {
    let provider = provider();
    let config = EntityProviderConfig::from_json(&json!({
        "dynamicEntity": { "entityType": "quoteXXX", "entityId": QUOTE }
    }))
    .expect("config parses");

    match provider
        .resolve(&config, &context(DeploymentEnvironment::Development))
        .await
    {
        Err(error @ ResolutionError::UnsupportedEntityType { .. }) => {
            assert!(error.is_configuration_error());
            assert_eq!(
                error.error_data().code,
                "automation.providers.entity.type.not.supported"
            );
        }
        other => panic!("expected unsupported type, got {other:?}"),
    }
}

#[test]
fn provider_blocks_are_validated_before_resolution() {
    match EntityProviderConfig::from_json(&json!({ "vesselEntity": { "vesselId": "x" } })) {
        Err(ResolutionError::UnsupportedEntityType { tag }) => assert_eq!(tag, "vessel"),
        other => panic!("expected unsupported type, got {other:?}"),
    }

    match EntityProviderConfig::from_json(&json!({
        "dynamicEntity": { "entityType": "claim" }
    })) {
        Err(ResolutionError::ParameterInvalid { parameter, .. }) => {
            assert_eq!(parameter, "entityId")
        }
        other => panic!("expected invalid parameter, got {other:?}"),
    }

    match EntityProviderConfig::from_json(&json!({
        "dynamicEntity": { "entityType": 42, "entityId": QUOTE }
    })) {
        Err(ResolutionError::ParameterInvalid { parameter, .. }) => {
            assert_eq!(parameter, "entityType")
        }
        other => panic!("expected invalid parameter, got {other:?}"),
    }

    match EntityProviderConfig::parse(r#"{ "policyEntity": { "policyNumber": "P-1", "policyId": "7d0e2a10-0000-4000-8000-000000000030" } }"#) {
        Err(ResolutionError::AmbiguousLocator { supplied, .. }) => {
            assert_eq!(supplied.len(), 2)
        }
        other => panic!("expected ambiguous locator, got {other:?}"),
    }
}
