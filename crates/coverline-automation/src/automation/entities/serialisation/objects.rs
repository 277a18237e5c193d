use serde::Serialize;
use serde_json::Value;

use super::super::catalog::EntityType;
use super::super::domain::{
    DeploymentEnvironment, EntityRecord, PolicyTransactionType, PortalUserType, QuoteType,
    RoleType, UserType,
};
use super::super::repository::EntityAggregate;
use super::{timestamp, SerialisationError, SerialisedEntityFactory};

/// Output object that can be built from a loaded aggregate.
pub trait EntityObject: Sized {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        root: bool,
    ) -> Result<Self, SerialisationError>;
}

macro_rules! expect_record {
    ($aggregate:expr, $variant:ident) => {
        match &$aggregate.record {
            EntityRecord::$variant(record) => record,
            other => {
                return Err(SerialisationError::UnexpectedRecord {
                    expected: EntityType::$variant,
                    found: other.entity_type(),
                })
            }
        }
    };
}

/// Root object returned by a resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SerialisedEntity {
    Tenant(TenantObject),
    Organisation(OrganisationObject),
    Product(ProductObject),
    Portal(PortalObject),
    Customer(CustomerObject),
    Person(PersonObject),
    User(UserObject),
    Role(RoleObject),
    Quote(QuoteObject),
    QuoteVersion(QuoteVersionObject),
    Policy(PolicyObject),
    PolicyTransaction(PolicyTransactionObject),
    Claim(ClaimObject),
    ClaimVersion(ClaimVersionObject),
    Document(DocumentObject),
    EmailMessage(EmailMessageObject),
    Report(ReportObject),
}

impl SerialisedEntity {
    pub fn id(&self) -> &str {
        match self {
            Self::Tenant(object) => &object.id,
            Self::Organisation(object) => &object.id,
            Self::Product(object) => &object.id,
            Self::Portal(object) => &object.id,
            Self::Customer(object) => &object.id,
            Self::Person(object) => &object.id,
            Self::User(object) => &object.id,
            Self::Role(object) => &object.id,
            Self::Quote(object) => &object.id,
            Self::QuoteVersion(object) => &object.id,
            Self::Policy(object) => &object.id,
            Self::PolicyTransaction(object) => &object.id,
            Self::Claim(object) => &object.id,
            Self::ClaimVersion(object) => &object.id,
            Self::Document(object) => &object.id,
            Self::EmailMessage(object) => &object.id,
            Self::Report(object) => &object.id,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Tenant(_) => EntityType::Tenant,
            Self::Organisation(_) => EntityType::Organisation,
            Self::Product(_) => EntityType::Product,
            Self::Portal(_) => EntityType::Portal,
            Self::Customer(_) => EntityType::Customer,
            Self::Person(_) => EntityType::Person,
            Self::User(_) => EntityType::User,
            Self::Role(_) => EntityType::Role,
            Self::Quote(_) => EntityType::Quote,
            Self::QuoteVersion(_) => EntityType::QuoteVersion,
            Self::Policy(_) => EntityType::Policy,
            Self::PolicyTransaction(_) => EntityType::PolicyTransaction,
            Self::Claim(_) => EntityType::Claim,
            Self::ClaimVersion(_) => EntityType::ClaimVersion,
            Self::Document(_) => EntityType::Document,
            Self::EmailMessage(_) => EntityType::EmailMessage,
            Self::Report(_) => EntityType::Report,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantObject {
    pub id: String,
    pub alias: String,
    pub name: String,
    pub disabled: bool,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_organisation: Option<Box<OrganisationObject>>,
}

impl EntityObject for TenantObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let tenant = expect_record!(aggregate, Tenant);
        Ok(Self {
            id: tenant.id.to_string(),
            alias: tenant.alias.clone(),
            name: tenant.name.clone(),
            disabled: tenant.disabled,
            created_date_time: timestamp(&tenant.created_timestamp),
            last_modified_date_time: timestamp(&tenant.last_modified_timestamp),
            default_organisation: factory.one(aggregate, "defaultOrganisation")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationObject {
    pub id: String,
    pub tenant_id: String,
    pub alias: String,
    pub name: String,
    pub is_default: bool,
    pub disabled: bool,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
}

impl EntityObject for OrganisationObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let organisation = expect_record!(aggregate, Organisation);
        Ok(Self {
            id: organisation.id.to_string(),
            tenant_id: organisation.tenant_id.to_string(),
            alias: organisation.alias.clone(),
            name: organisation.name.clone(),
            is_default: organisation.is_default,
            disabled: organisation.disabled,
            created_date_time: timestamp(&organisation.created_timestamp),
            last_modified_date_time: timestamp(&organisation.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductObject {
    pub id: String,
    pub tenant_id: String,
    pub alias: String,
    pub name: String,
    pub disabled: bool,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
}

impl EntityObject for ProductObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let product = expect_record!(aggregate, Product);
        Ok(Self {
            id: product.id.to_string(),
            tenant_id: product.tenant_id.to_string(),
            alias: product.alias.clone(),
            name: product.name.clone(),
            disabled: product.disabled,
            created_date_time: timestamp(&product.created_timestamp),
            last_modified_date_time: timestamp(&product.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalObject {
    pub id: String,
    pub tenant_id: String,
    pub organisation_id: String,
    pub alias: String,
    pub name: String,
    pub user_type: PortalUserType,
    pub disabled: bool,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
}

impl EntityObject for PortalObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let portal = expect_record!(aggregate, Portal);
        Ok(Self {
            id: portal.id.to_string(),
            tenant_id: portal.tenant_id.to_string(),
            organisation_id: portal.organisation_id.to_string(),
            alias: portal.alias.clone(),
            name: portal.name.clone(),
            user_type: portal.user_type,
            disabled: portal.disabled,
            created_date_time: timestamp(&portal.created_timestamp),
            last_modified_date_time: timestamp(&portal.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerObject {
    pub id: String,
    pub tenant_id: String,
    pub organisation_id: String,
    pub environment: DeploymentEnvironment,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_person_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<String>,
    pub test_data: bool,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_person: Option<Box<PersonObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<UserObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes: Option<Vec<QuoteObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<PolicyObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Vec<ClaimObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<EmailMessageObject>>,
}

impl EntityObject for CustomerObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let customer = expect_record!(aggregate, Customer);
        Ok(Self {
            id: customer.id.to_string(),
            tenant_id: customer.tenant_id.to_string(),
            organisation_id: customer.organisation_id.to_string(),
            environment: customer.environment,
            display_name: customer.display_name.clone(),
            account_email: customer.account_email.clone(),
            primary_person_id: customer.primary_person_id.map(|id| id.to_string()),
            owner_user_id: customer.owner_user_id.map(|id| id.to_string()),
            test_data: customer.is_test_data,
            created_date_time: timestamp(&customer.created_timestamp),
            last_modified_date_time: timestamp(&customer.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
            primary_person: factory.one(aggregate, "primaryPerson")?,
            owner: factory.one(aggregate, "owner")?,
            quotes: factory.many(aggregate, "quotes")?,
            policies: factory.many(aggregate, "policies")?,
            claims: factory.many(aggregate, "claims")?,
            documents: factory.many(aggregate, "documents")?,
            emails: factory.many(aggregate, "emails")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonObject {
    pub id: String,
    pub tenant_id: String,
    pub organisation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<CustomerObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<UserObject>>,
}

impl EntityObject for PersonObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let person = expect_record!(aggregate, Person);
        Ok(Self {
            id: person.id.to_string(),
            tenant_id: person.tenant_id.to_string(),
            organisation_id: person.organisation_id.to_string(),
            customer_id: person.customer_id.map(|id| id.to_string()),
            user_id: person.user_id.map(|id| id.to_string()),
            full_name: person.full_name.clone(),
            email: person.email.clone(),
            created_date_time: timestamp(&person.created_timestamp),
            last_modified_date_time: timestamp(&person.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
            customer: factory.one(aggregate, "customer")?,
            user: factory.one(aggregate, "user")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserObject {
    pub id: String,
    pub tenant_id: String,
    pub organisation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_email: Option<String>,
    pub display_name: String,
    pub user_type: UserType,
    pub blocked: bool,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<Box<PersonObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<RoleObject>>,
}

impl EntityObject for UserObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let user = expect_record!(aggregate, User);
        Ok(Self {
            id: user.id.to_string(),
            tenant_id: user.tenant_id.to_string(),
            organisation_id: user.organisation_id.to_string(),
            person_id: user.person_id.map(|id| id.to_string()),
            account_email: user.account_email.clone(),
            display_name: user.display_name.clone(),
            user_type: user.user_type,
            blocked: user.blocked,
            created_date_time: timestamp(&user.created_timestamp),
            last_modified_date_time: timestamp(&user.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
            person: factory.one(aggregate, "person")?,
            roles: factory.many(aggregate, "roles")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionObject {
    #[serde(rename = "type")]
    pub permission_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleObject {
    pub id: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
    pub name: String,
    pub description: String,
    pub role_type: RoleType,
    pub permissions: Vec<PermissionObject>,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
}

impl EntityObject for RoleObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let role = expect_record!(aggregate, Role);
        let permissions = role
            .permissions
            .iter()
            .map(|permission| PermissionObject {
                permission_type: permission.clone(),
                description: factory.permission_description(permission),
            })
            .collect();

        Ok(Self {
            id: role.id.to_string(),
            tenant_id: role.tenant_id.to_string(),
            organisation_id: role.organisation_id.map(|id| id.to_string()),
            name: role.name.clone(),
            description: role.description.clone(),
            role_type: role.role_type,
            permissions,
            created_date_time: timestamp(&role.created_timestamp),
            last_modified_date_time: timestamp(&role.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteObject {
    pub id: String,
    pub tenant_id: String,
    pub organisation_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    pub environment: DeploymentEnvironment,
    pub quote_reference: String,
    pub quote_type: QuoteType,
    pub quote_state: String,
    pub test_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data_formatted: Option<Value>,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Box<ProductObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<CustomerObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<UserObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<Box<PolicyObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_versions: Option<Vec<QuoteVersionObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<EmailMessageObject>>,
}

impl EntityObject for QuoteObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        root: bool,
    ) -> Result<Self, SerialisationError> {
        let quote = expect_record!(aggregate, Quote);
        let (form_data, form_data_formatted) = factory.form_data(quote.form_data.as_ref(), root);
        Ok(Self {
            id: quote.id.to_string(),
            tenant_id: quote.tenant_id.to_string(),
            organisation_id: quote.organisation_id.to_string(),
            product_id: quote.product_id.to_string(),
            customer_id: quote.customer_id.map(|id| id.to_string()),
            owner_user_id: quote.owner_user_id.map(|id| id.to_string()),
            policy_id: quote.policy_id.map(|id| id.to_string()),
            environment: quote.environment,
            quote_reference: quote.quote_reference.clone(),
            quote_type: quote.quote_type,
            quote_state: quote.quote_state.clone(),
            test_data: quote.is_test_data,
            form_data,
            form_data_formatted,
            created_date_time: timestamp(&quote.created_timestamp),
            last_modified_date_time: timestamp(&quote.last_modified_timestamp),
            expiry_date_time: quote.expiry_timestamp.as_ref().map(timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
            product: factory.one(aggregate, "product")?,
            customer: factory.one(aggregate, "customer")?,
            owner: factory.one(aggregate, "owner")?,
            policy: factory.one(aggregate, "policy")?,
            quote_versions: factory.many(aggregate, "quoteVersions")?,
            documents: factory.many(aggregate, "documents")?,
            emails: factory.many(aggregate, "emails")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteVersionObject {
    pub id: String,
    pub tenant_id: String,
    pub quote_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<String>,
    pub environment: DeploymentEnvironment,
    pub version_number: u32,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data_formatted: Option<Value>,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Box<QuoteObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<CustomerObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<UserObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentObject>>,
}

impl EntityObject for QuoteVersionObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        root: bool,
    ) -> Result<Self, SerialisationError> {
        let version = expect_record!(aggregate, QuoteVersion);
        let (form_data, form_data_formatted) =
            factory.form_data(version.form_data.as_ref(), root);
        Ok(Self {
            id: version.id.to_string(),
            tenant_id: version.tenant_id.to_string(),
            quote_id: version.quote_id.to_string(),
            customer_id: version.customer_id.map(|id| id.to_string()),
            owner_user_id: version.owner_user_id.map(|id| id.to_string()),
            environment: version.environment,
            version_number: version.version_number,
            state: version.state.clone(),
            form_data,
            form_data_formatted,
            created_date_time: timestamp(&version.created_timestamp),
            last_modified_date_time: timestamp(&version.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            quote: factory.one(aggregate, "quote")?,
            customer: factory.one(aggregate, "customer")?,
            owner: factory.one(aggregate, "owner")?,
            documents: factory.many(aggregate, "documents")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyObject {
    pub id: String,
    pub tenant_id: String,
    pub organisation_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<String>,
    pub environment: DeploymentEnvironment,
    pub policy_number: String,
    pub policy_state: String,
    pub inception_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date_time: Option<String>,
    pub test_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data_formatted: Option<Value>,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Box<ProductObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<CustomerObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<UserObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes: Option<Vec<QuoteObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<PolicyTransactionObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Vec<ClaimObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<EmailMessageObject>>,
}

impl EntityObject for PolicyObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        root: bool,
    ) -> Result<Self, SerialisationError> {
        let policy = expect_record!(aggregate, Policy);
        let (form_data, form_data_formatted) = factory.form_data(policy.form_data.as_ref(), root);
        Ok(Self {
            id: policy.id.to_string(),
            tenant_id: policy.tenant_id.to_string(),
            organisation_id: policy.organisation_id.to_string(),
            product_id: policy.product_id.to_string(),
            customer_id: policy.customer_id.map(|id| id.to_string()),
            owner_user_id: policy.owner_user_id.map(|id| id.to_string()),
            environment: policy.environment,
            policy_number: policy.policy_number.clone(),
            policy_state: policy.policy_state.clone(),
            inception_date_time: factory.policy_date_time(policy.inception_date),
            expiry_date_time: policy.expiry_date.map(|date| factory.policy_date_time(date)),
            test_data: policy.is_test_data,
            form_data,
            form_data_formatted,
            created_date_time: timestamp(&policy.created_timestamp),
            last_modified_date_time: timestamp(&policy.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
            product: factory.one(aggregate, "product")?,
            customer: factory.one(aggregate, "customer")?,
            owner: factory.one(aggregate, "owner")?,
            quotes: factory.many(aggregate, "quotes")?,
            transactions: factory.many(aggregate, "transactions")?,
            claims: factory.many(aggregate, "claims")?,
            documents: factory.many(aggregate, "documents")?,
            emails: factory.many(aggregate, "emails")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTransactionObject {
    pub id: String,
    pub tenant_id: String,
    pub policy_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub environment: DeploymentEnvironment,
    pub transaction_type: PolicyTransactionType,
    pub effective_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data_formatted: Option<Value>,
    pub created_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<Box<PolicyObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Box<QuoteObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<CustomerObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentObject>>,
}

impl EntityObject for PolicyTransactionObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        root: bool,
    ) -> Result<Self, SerialisationError> {
        let transaction = expect_record!(aggregate, PolicyTransaction);
        let (form_data, form_data_formatted) =
            factory.form_data(transaction.form_data.as_ref(), root);
        Ok(Self {
            id: transaction.id.to_string(),
            tenant_id: transaction.tenant_id.to_string(),
            policy_id: transaction.policy_id.to_string(),
            quote_id: transaction.quote_id.map(|id| id.to_string()),
            customer_id: transaction.customer_id.map(|id| id.to_string()),
            environment: transaction.environment,
            transaction_type: transaction.transaction_type,
            effective_date_time: factory.policy_date_time(transaction.effective_date),
            form_data,
            form_data_formatted,
            created_date_time: timestamp(&transaction.created_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            policy: factory.one(aggregate, "policy")?,
            quote: factory.one(aggregate, "quote")?,
            customer: factory.one(aggregate, "customer")?,
            documents: factory.many(aggregate, "documents")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimObject {
    pub id: String,
    pub tenant_id: String,
    pub organisation_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<String>,
    pub environment: DeploymentEnvironment,
    pub claim_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,
    pub claim_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_date_time: Option<String>,
    pub test_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data_formatted: Option<Value>,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Box<ProductObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<CustomerObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<UserObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<Box<PolicyObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_versions: Option<Vec<ClaimVersionObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<EmailMessageObject>>,
}

impl EntityObject for ClaimObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        root: bool,
    ) -> Result<Self, SerialisationError> {
        let claim = expect_record!(aggregate, Claim);
        let (form_data, form_data_formatted) = factory.form_data(claim.form_data.as_ref(), root);
        Ok(Self {
            id: claim.id.to_string(),
            tenant_id: claim.tenant_id.to_string(),
            organisation_id: claim.organisation_id.to_string(),
            product_id: claim.product_id.to_string(),
            customer_id: claim.customer_id.map(|id| id.to_string()),
            policy_id: claim.policy_id.map(|id| id.to_string()),
            owner_user_id: claim.owner_user_id.map(|id| id.to_string()),
            environment: claim.environment,
            claim_reference: claim.claim_reference.clone(),
            claim_number: claim.claim_number.clone(),
            claim_state: claim.claim_state.clone(),
            description: claim.description.clone(),
            incident_date_time: claim.incident_timestamp.as_ref().map(timestamp),
            test_data: claim.is_test_data,
            form_data,
            form_data_formatted,
            created_date_time: timestamp(&claim.created_timestamp),
            last_modified_date_time: timestamp(&claim.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
            product: factory.one(aggregate, "product")?,
            customer: factory.one(aggregate, "customer")?,
            owner: factory.one(aggregate, "owner")?,
            policy: factory.one(aggregate, "policy")?,
            claim_versions: factory.many(aggregate, "claimVersions")?,
            documents: factory.many(aggregate, "documents")?,
            emails: factory.many(aggregate, "emails")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimVersionObject {
    pub id: String,
    pub tenant_id: String,
    pub claim_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<String>,
    pub environment: DeploymentEnvironment,
    pub version_number: u32,
    pub claim_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data_formatted: Option<Value>,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim: Option<Box<ClaimObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<CustomerObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<UserObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentObject>>,
}

impl EntityObject for ClaimVersionObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        root: bool,
    ) -> Result<Self, SerialisationError> {
        let version = expect_record!(aggregate, ClaimVersion);
        let (form_data, form_data_formatted) =
            factory.form_data(version.form_data.as_ref(), root);
        Ok(Self {
            id: version.id.to_string(),
            tenant_id: version.tenant_id.to_string(),
            claim_id: version.claim_id.to_string(),
            customer_id: version.customer_id.map(|id| id.to_string()),
            owner_user_id: version.owner_user_id.map(|id| id.to_string()),
            environment: version.environment,
            version_number: version.version_number,
            claim_reference: version.claim_reference.clone(),
            form_data,
            form_data_formatted,
            created_date_time: timestamp(&version.created_timestamp),
            last_modified_date_time: timestamp(&version.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            claim: factory.one(aggregate, "claim")?,
            customer: factory.one(aggregate, "customer")?,
            owner: factory.one(aggregate, "owner")?,
            documents: factory.many(aggregate, "documents")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentObject {
    pub id: String,
    pub tenant_id: String,
    pub environment: DeploymentEnvironment,
    pub name: String,
    pub mime_type: String,
    pub size_in_bytes: u64,
    pub download_url: String,
    pub created_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
}

impl EntityObject for DocumentObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let document = expect_record!(aggregate, Document);
        Ok(Self {
            id: document.id.to_string(),
            tenant_id: document.tenant_id.to_string(),
            environment: document.environment,
            name: document.name.clone(),
            mime_type: document.mime_type.clone(),
            size_in_bytes: document.size_in_bytes,
            download_url: factory.document_download_url(
                document.tenant_id,
                document.environment,
                document.id,
            ),
            created_date_time: timestamp(&document.created_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessageObject {
    pub id: String,
    pub tenant_id: String,
    pub environment: DeploymentEnvironment,
    pub subject: String,
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    pub created_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<CustomerObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Box<QuoteObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<Box<PolicyObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim: Option<Box<ClaimObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentObject>>,
}

impl EntityObject for EmailMessageObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let email = expect_record!(aggregate, EmailMessage);
        Ok(Self {
            id: email.id.to_string(),
            tenant_id: email.tenant_id.to_string(),
            environment: email.environment,
            subject: email.subject.clone(),
            from: email.from.clone(),
            to: email.to.clone(),
            cc: email.cc.clone(),
            text_body: email.text_body.clone(),
            created_date_time: timestamp(&email.created_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
            customer: factory.one(aggregate, "customer")?,
            quote: factory.one(aggregate, "quote")?,
            policy: factory.one(aggregate, "policy")?,
            claim: factory.one(aggregate, "claim")?,
            documents: factory.many(aggregate, "documents")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportObject {
    pub id: String,
    pub tenant_id: String,
    pub organisation_id: String,
    pub name: String,
    pub description: String,
    pub source_data: Vec<String>,
    pub mime_type: String,
    pub filename: String,
    pub deleted: bool,
    pub created_date_time: String,
    pub last_modified_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Box<TenantObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Box<OrganisationObject>>,
}

impl EntityObject for ReportObject {
    fn build(
        factory: &SerialisedEntityFactory,
        aggregate: &EntityAggregate,
        _root: bool,
    ) -> Result<Self, SerialisationError> {
        let report = expect_record!(aggregate, Report);
        Ok(Self {
            id: report.id.to_string(),
            tenant_id: report.tenant_id.to_string(),
            organisation_id: report.organisation_id.to_string(),
            name: report.name.clone(),
            description: report.description.clone(),
            source_data: report.source_data.clone(),
            mime_type: report.mime_type.clone(),
            filename: report.filename.clone(),
            deleted: report.is_deleted,
            created_date_time: timestamp(&report.created_timestamp),
            last_modified_date_time: timestamp(&report.last_modified_timestamp),
            tenant: factory.one(aggregate, "tenant")?,
            organisation: factory.one(aggregate, "organisation")?,
        })
    }
}
