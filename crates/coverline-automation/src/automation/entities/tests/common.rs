use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::automation::entities::catalog::EntityType;
use crate::automation::entities::domain::{
    AutomationContext, Claim, ClaimVersion, Customer, DeploymentEnvironment, Document,
    EmailMessage, Organisation, Person, Policy, PolicyTransaction, PolicyTransactionType, Portal,
    PortalUserType, Product, Quote, QuoteType, QuoteVersion, Report, Role, RoleType, Tenant, User,
    UserType,
};
use crate::automation::entities::locator::EntityLocator;
use crate::automation::entities::repository::{
    AliasResolver, EntityAggregate, EntityQuery, EntityRepository, RepositoryError,
};
use crate::automation::entities::serialisation::{
    LabelledFormDataPrettifier, SerialisationSettings, SerialisedEntityFactory,
};
use crate::automation::entities::{DynamicEntityDispatcher, EntityLocatorResolver, InMemoryEntityStore};

pub(super) const BASE_API_URL: &str = "https://api.coverline.test/";

pub(super) fn id(value: u128) -> Uuid {
    Uuid::from_u128(value)
}

pub(super) fn tenant_id() -> Uuid {
    id(1)
}
pub(super) fn organisation_id() -> Uuid {
    id(2)
}
pub(super) fn product_id() -> Uuid {
    id(3)
}
pub(super) fn portal_id() -> Uuid {
    id(4)
}
pub(super) fn customer_id() -> Uuid {
    id(10)
}
pub(super) fn person_id() -> Uuid {
    id(11)
}
pub(super) fn user_id() -> Uuid {
    id(12)
}
pub(super) fn role_id() -> Uuid {
    id(13)
}
pub(super) fn quote_id() -> Uuid {
    id(20)
}
pub(super) fn quote_version_id(number: u32) -> Uuid {
    id(20 + u128::from(number))
}
pub(super) fn policy_id() -> Uuid {
    id(30)
}
pub(super) fn policy_transaction_id() -> Uuid {
    id(31)
}
pub(super) fn development_claim_id() -> Uuid {
    id(40)
}
pub(super) fn claim_version_id() -> Uuid {
    id(41)
}
pub(super) fn production_claim_id() -> Uuid {
    id(42)
}
pub(super) fn document_id() -> Uuid {
    id(50)
}
pub(super) fn email_id() -> Uuid {
    id(60)
}
pub(super) fn report_id() -> Uuid {
    id(70)
}

pub(super) const DEVELOPMENT_CLAIM_NUMBER: &str = "CL-20931";

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn context(environment: DeploymentEnvironment) -> AutomationContext {
    AutomationContext::new(tenant_id(), environment)
}

pub(super) fn parameters(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub(super) fn quote_form_data() -> Value {
    json!({ "vehicleMake": "Mazda", "hasPriorClaims": false })
}

/// A small tenant with one customer, a quote with two versions, a policy and
/// two claims sharing the reference `NKHSA` in different environments. Every
/// locator in the catalog has a record it can find.
pub(super) fn store() -> InMemoryEntityStore {
    let dev = DeploymentEnvironment::Development;
    InMemoryEntityStore::new()
        .with(tenant())
        .with(organisation())
        .with(Product {
            id: product_id(),
            tenant_id: tenant_id(),
            alias: "motor".to_string(),
            name: "Motor Vehicle".to_string(),
            disabled: false,
            created_timestamp: at(2023, 1, 6),
            last_modified_timestamp: at(2023, 1, 6),
        })
        .with(Portal {
            id: portal_id(),
            tenant_id: tenant_id(),
            organisation_id: organisation_id(),
            alias: "broker-portal".to_string(),
            name: "Broker Portal".to_string(),
            user_type: PortalUserType::Agent,
            disabled: false,
            created_timestamp: at(2023, 1, 7),
            last_modified_timestamp: at(2023, 1, 7),
        })
        .with(Customer {
            id: customer_id(),
            tenant_id: tenant_id(),
            organisation_id: organisation_id(),
            environment: dev,
            display_name: "Ava Chen".to_string(),
            account_email: Some("ava.chen@example.com".to_string()),
            primary_person_id: Some(person_id()),
            owner_user_id: Some(user_id()),
            is_test_data: false,
            created_timestamp: at(2024, 3, 1),
            last_modified_timestamp: at(2024, 3, 1),
        })
        .with(Person {
            id: person_id(),
            tenant_id: tenant_id(),
            organisation_id: organisation_id(),
            customer_id: Some(customer_id()),
            user_id: None,
            full_name: "Ava Chen".to_string(),
            email: Some("ava.chen@example.com".to_string()),
            created_timestamp: at(2024, 3, 1),
            last_modified_timestamp: at(2024, 3, 1),
        })
        .with(User {
            id: user_id(),
            tenant_id: tenant_id(),
            organisation_id: organisation_id(),
            person_id: None,
            account_email: Some("broker@acme.example".to_string()),
            display_name: "Sam Broker".to_string(),
            user_type: UserType::Client,
            blocked: false,
            role_ids: vec![role_id()],
            created_timestamp: at(2023, 2, 1),
            last_modified_timestamp: at(2023, 2, 1),
        })
        .with(Role {
            id: role_id(),
            tenant_id: tenant_id(),
            organisation_id: Some(organisation_id()),
            name: "Broker".to_string(),
            description: "Places business on behalf of customers".to_string(),
            role_type: RoleType::Client,
            permissions: vec!["viewQuotes".to_string(), "exportLedger".to_string()],
            created_timestamp: at(2023, 2, 1),
            last_modified_timestamp: at(2023, 2, 1),
        })
        .with(quote())
        .with(quote_version(1))
        .with(quote_version(2))
        .with(Policy {
            id: policy_id(),
            tenant_id: tenant_id(),
            organisation_id: organisation_id(),
            product_id: product_id(),
            environment: dev,
            policy_number: "P-000381".to_string(),
            policy_state: "issued".to_string(),
            inception_date: date(2024, 7, 1),
            expiry_date: Some(date(2025, 7, 1)),
            customer_id: Some(customer_id()),
            owner_user_id: Some(user_id()),
            form_data: Some(quote_form_data()),
            is_test_data: false,
            created_timestamp: at(2024, 6, 20),
            last_modified_timestamp: at(2024, 6, 20),
        })
        .with(PolicyTransaction {
            id: policy_transaction_id(),
            tenant_id: tenant_id(),
            policy_id: policy_id(),
            environment: dev,
            transaction_type: PolicyTransactionType::NewBusiness,
            effective_date: date(2024, 7, 1),
            quote_id: Some(quote_id()),
            customer_id: Some(customer_id()),
            form_data: None,
            created_timestamp: at(2024, 6, 20),
        })
        .with(Claim {
            claim_number: Some(DEVELOPMENT_CLAIM_NUMBER.to_string()),
            ..claim(development_claim_id(), dev, Some(policy_id()))
        })
        .with(ClaimVersion {
            id: claim_version_id(),
            tenant_id: tenant_id(),
            claim_id: development_claim_id(),
            environment: dev,
            version_number: 1,
            claim_reference: "NKHSA".to_string(),
            customer_id: Some(customer_id()),
            owner_user_id: Some(user_id()),
            form_data: None,
            created_timestamp: at(2024, 9, 4),
            last_modified_timestamp: at(2024, 9, 4),
        })
        .with(claim(
            production_claim_id(),
            DeploymentEnvironment::Production,
            None,
        ))
        .with(Document {
            id: document_id(),
            tenant_id: tenant_id(),
            environment: dev,
            name: "schedule.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_in_bytes: 48_213,
            customer_id: Some(customer_id()),
            quote_id: Some(quote_id()),
            quote_version_id: None,
            policy_id: Some(policy_id()),
            policy_transaction_id: None,
            claim_id: None,
            claim_version_id: None,
            email_message_id: None,
            created_timestamp: at(2024, 6, 20),
        })
        .with(EmailMessage {
            id: email_id(),
            tenant_id: tenant_id(),
            environment: dev,
            subject: "Your motor quote QX1042".to_string(),
            from: "broker@acme.example".to_string(),
            to: vec!["ava.chen@example.com".to_string()],
            cc: Vec::new(),
            text_body: None,
            organisation_id: Some(organisation_id()),
            customer_id: None,
            quote_id: None,
            policy_id: None,
            claim_id: None,
            created_timestamp: at(2024, 6, 11),
        })
        .with(Report {
            id: report_id(),
            tenant_id: tenant_id(),
            organisation_id: organisation_id(),
            name: "Monthly bordereau".to_string(),
            description: String::new(),
            source_data: vec!["policies".to_string()],
            mime_type: "text/csv".to_string(),
            filename: "bordereau.csv".to_string(),
            is_deleted: false,
            created_timestamp: at(2024, 7, 1),
            last_modified_timestamp: at(2024, 7, 1),
        })
}

pub(super) fn tenant() -> Tenant {
    Tenant {
        id: tenant_id(),
        alias: "harbour".to_string(),
        name: "Harbour Insurance".to_string(),
        disabled: false,
        default_organisation_id: Some(organisation_id()),
        created_timestamp: at(2023, 1, 5),
        last_modified_timestamp: at(2023, 1, 5),
    }
}

pub(super) fn organisation() -> Organisation {
    Organisation {
        id: organisation_id(),
        tenant_id: tenant_id(),
        alias: "acme-direct".to_string(),
        name: "Acme Direct".to_string(),
        is_default: true,
        disabled: false,
        created_timestamp: at(2023, 1, 5),
        last_modified_timestamp: at(2023, 2, 1),
    }
}

pub(super) fn quote() -> Quote {
    Quote {
        id: quote_id(),
        tenant_id: tenant_id(),
        organisation_id: organisation_id(),
        product_id: product_id(),
        environment: DeploymentEnvironment::Development,
        quote_reference: "QX1042".to_string(),
        quote_type: QuoteType::NewBusiness,
        quote_state: "complete".to_string(),
        customer_id: Some(customer_id()),
        owner_user_id: Some(user_id()),
        policy_id: Some(policy_id()),
        form_data: Some(quote_form_data()),
        is_test_data: false,
        expiry_timestamp: None,
        created_timestamp: at(2024, 6, 10),
        last_modified_timestamp: at(2024, 6, 20),
    }
}

pub(super) fn quote_version(number: u32) -> QuoteVersion {
    QuoteVersion {
        id: quote_version_id(number),
        tenant_id: tenant_id(),
        quote_id: quote_id(),
        environment: DeploymentEnvironment::Development,
        version_number: number,
        state: "complete".to_string(),
        customer_id: Some(customer_id()),
        owner_user_id: Some(user_id()),
        form_data: Some(quote_form_data()),
        created_timestamp: at(2024, 6, 10 + number),
        last_modified_timestamp: at(2024, 6, 10 + number),
    }
}

pub(super) fn claim(id: Uuid, environment: DeploymentEnvironment, policy_id: Option<Uuid>) -> Claim {
    Claim {
        id,
        tenant_id: tenant_id(),
        organisation_id: organisation_id(),
        product_id: product_id(),
        environment,
        claim_reference: "NKHSA".to_string(),
        claim_number: None,
        claim_state: "notified".to_string(),
        description: Some("Rear-end collision".to_string()),
        incident_timestamp: Some(at(2024, 9, 2)),
        customer_id: Some(customer_id()),
        policy_id,
        owner_user_id: Some(user_id()),
        form_data: Some(json!({ "towingRequired": true })),
        is_test_data: false,
        created_timestamp: at(2024, 9, 3),
        last_modified_timestamp: at(2024, 9, 3),
    }
}

/// Query as seen by the repository, captured for assertions.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RecordedQuery {
    pub entity_type: EntityType,
    pub tenant_id: Uuid,
    pub environment: Option<DeploymentEnvironment>,
    pub locator: EntityLocator,
    pub related: Vec<&'static str>,
}

/// Delegates to the in-memory store while recording every repository call.
pub(super) struct RecordingRepository {
    inner: InMemoryEntityStore,
    queries: Mutex<Vec<RecordedQuery>>,
    alias_lookups: Mutex<Vec<(EntityType, String)>>,
}

impl RecordingRepository {
    pub(super) fn new(inner: InMemoryEntityStore) -> Self {
        Self {
            inner,
            queries: Mutex::new(Vec::new()),
            alias_lookups: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().expect("queries mutex poisoned").clone()
    }

    pub(super) fn alias_lookups(&self) -> Vec<(EntityType, String)> {
        self.alias_lookups
            .lock()
            .expect("alias mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl EntityRepository for RecordingRepository {
    async fn get_with_related_entities(
        &self,
        query: EntityQuery<'_>,
    ) -> Result<Option<EntityAggregate>, RepositoryError> {
        self.queries
            .lock()
            .expect("queries mutex poisoned")
            .push(RecordedQuery {
                entity_type: query.entity_type,
                tenant_id: query.tenant_id,
                environment: query.environment,
                locator: query.locator.clone(),
                related: query.related.property_names(),
            });
        self.inner.get_with_related_entities(query).await
    }
}

#[async_trait]
impl AliasResolver for RecordingRepository {
    async fn resolve_alias(
        &self,
        tenant_id: Uuid,
        entity_type: EntityType,
        alias: &str,
    ) -> Result<Option<Uuid>, RepositoryError> {
        self.alias_lookups
            .lock()
            .expect("alias mutex poisoned")
            .push((entity_type, alias.to_string()));
        self.inner.resolve_alias(tenant_id, entity_type, alias).await
    }
}

/// Repository that always fails: lookups are refused and alias lookups time out.
pub(super) struct UnavailableRepository;

#[async_trait]
impl EntityRepository for UnavailableRepository {
    async fn get_with_related_entities(
        &self,
        _query: EntityQuery<'_>,
    ) -> Result<Option<EntityAggregate>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl AliasResolver for UnavailableRepository {
    async fn resolve_alias(
        &self,
        _tenant_id: Uuid,
        _entity_type: EntityType,
        _alias: &str,
    ) -> Result<Option<Uuid>, RepositoryError> {
        Err(RepositoryError::Timeout(250))
    }
}

pub(super) fn factory() -> Arc<SerialisedEntityFactory> {
    Arc::new(
        SerialisedEntityFactory::new(
            SerialisationSettings::new(BASE_API_URL),
            Arc::new(LabelledFormDataPrettifier),
        )
        .expect("factory builds"),
    )
}

pub(super) fn recording() -> Arc<RecordingRepository> {
    Arc::new(RecordingRepository::new(store()))
}

pub(super) fn resolver(
    entity_type: EntityType,
    repository: Arc<RecordingRepository>,
) -> EntityLocatorResolver {
    EntityLocatorResolver::new(entity_type, repository.clone(), repository, factory())
}

pub(super) fn dispatcher(repository: Arc<RecordingRepository>) -> DynamicEntityDispatcher {
    DynamicEntityDispatcher::builder()
        .register_all(repository.clone(), repository, factory())
        .build()
}
