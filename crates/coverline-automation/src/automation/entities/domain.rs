use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::catalog::EntityType;
use super::locator::LocatorKind;

/// Partition of otherwise identical business data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeploymentEnvironment {
    Development,
    Staging,
    Production,
}

impl DeploymentEnvironment {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" => Some(Self::Development),
            "staging" => Some(Self::Staging),
            "production" => Some(Self::Production),
            _ => None,
        }
    }
}

impl fmt::Display for DeploymentEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ambient state of the automation that requested a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomationContext {
    pub tenant_id: Uuid,
    pub environment: DeploymentEnvironment,
}

impl AutomationContext {
    pub fn new(tenant_id: Uuid, environment: DeploymentEnvironment) -> Self {
        Self {
            tenant_id,
            environment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub alias: String,
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub default_organisation_id: Option<Uuid>,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub alias: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub disabled: bool,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub alias: String,
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortalUserType {
    Agent,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portal {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organisation_id: Uuid,
    pub alias: String,
    pub name: String,
    pub user_type: PortalUserType,
    #[serde(default)]
    pub disabled: bool,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organisation_id: Uuid,
    pub environment: DeploymentEnvironment,
    pub display_name: String,
    #[serde(default)]
    pub account_email: Option<String>,
    #[serde(default)]
    pub primary_person_id: Option<Uuid>,
    #[serde(default)]
    pub owner_user_id: Option<Uuid>,
    #[serde(default)]
    pub is_test_data: bool,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organisation_id: Uuid,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserType {
    Master,
    Client,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organisation_id: Uuid,
    #[serde(default)]
    pub person_id: Option<Uuid>,
    #[serde(default)]
    pub account_email: Option<String>,
    pub display_name: String,
    pub user_type: UserType,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleType {
    Master,
    Client,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub tenant_id: Uuid,
    #[serde(default)]
    pub organisation_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub role_type: RoleType,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteType {
    NewBusiness,
    Adjustment,
    Renewal,
    Cancellation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organisation_id: Uuid,
    pub product_id: Uuid,
    pub environment: DeploymentEnvironment,
    pub quote_reference: String,
    pub quote_type: QuoteType,
    pub quote_state: String,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub owner_user_id: Option<Uuid>,
    #[serde(default)]
    pub policy_id: Option<Uuid>,
    #[serde(default)]
    pub form_data: Option<Value>,
    #[serde(default)]
    pub is_test_data: bool,
    #[serde(default)]
    pub expiry_timestamp: Option<DateTime<Utc>>,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteVersion {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub quote_id: Uuid,
    pub environment: DeploymentEnvironment,
    pub version_number: u32,
    pub state: String,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub owner_user_id: Option<Uuid>,
    #[serde(default)]
    pub form_data: Option<Value>,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organisation_id: Uuid,
    pub product_id: Uuid,
    pub environment: DeploymentEnvironment,
    pub policy_number: String,
    pub policy_state: String,
    pub inception_date: NaiveDate,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub owner_user_id: Option<Uuid>,
    #[serde(default)]
    pub form_data: Option<Value>,
    #[serde(default)]
    pub is_test_data: bool,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicyTransactionType {
    NewBusiness,
    Adjustment,
    Renewal,
    Cancellation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTransaction {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub policy_id: Uuid,
    pub environment: DeploymentEnvironment,
    pub transaction_type: PolicyTransactionType,
    pub effective_date: NaiveDate,
    #[serde(default)]
    pub quote_id: Option<Uuid>,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub form_data: Option<Value>,
    pub created_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organisation_id: Uuid,
    pub product_id: Uuid,
    pub environment: DeploymentEnvironment,
    pub claim_reference: String,
    #[serde(default)]
    pub claim_number: Option<String>,
    pub claim_state: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub incident_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub policy_id: Option<Uuid>,
    #[serde(default)]
    pub owner_user_id: Option<Uuid>,
    #[serde(default)]
    pub form_data: Option<Value>,
    #[serde(default)]
    pub is_test_data: bool,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimVersion {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub claim_id: Uuid,
    pub environment: DeploymentEnvironment,
    pub version_number: u32,
    pub claim_reference: String,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub owner_user_id: Option<Uuid>,
    #[serde(default)]
    pub form_data: Option<Value>,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

/// File attached to one of the business entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: DeploymentEnvironment,
    pub name: String,
    pub mime_type: String,
    pub size_in_bytes: u64,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub quote_id: Option<Uuid>,
    #[serde(default)]
    pub quote_version_id: Option<Uuid>,
    #[serde(default)]
    pub policy_id: Option<Uuid>,
    #[serde(default)]
    pub policy_transaction_id: Option<Uuid>,
    #[serde(default)]
    pub claim_id: Option<Uuid>,
    #[serde(default)]
    pub claim_version_id: Option<Uuid>,
    #[serde(default)]
    pub email_message_id: Option<Uuid>,
    pub created_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub environment: DeploymentEnvironment,
    pub subject: String,
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub text_body: Option<String>,
    #[serde(default)]
    pub organisation_id: Option<Uuid>,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub quote_id: Option<Uuid>,
    #[serde(default)]
    pub policy_id: Option<Uuid>,
    #[serde(default)]
    pub claim_id: Option<Uuid>,
    pub created_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organisation_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_data: Vec<String>,
    pub mime_type: String,
    pub filename: String,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_timestamp: DateTime<Utc>,
    pub last_modified_timestamp: DateTime<Utc>,
}

/// Read model for any resolvable entity, as returned by a repository.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRecord {
    Tenant(Tenant),
    Organisation(Organisation),
    Product(Product),
    Portal(Portal),
    Customer(Customer),
    Person(Person),
    User(User),
    Role(Role),
    Quote(Quote),
    QuoteVersion(QuoteVersion),
    Policy(Policy),
    PolicyTransaction(PolicyTransaction),
    Claim(Claim),
    ClaimVersion(ClaimVersion),
    Document(Document),
    EmailMessage(EmailMessage),
    Report(Report),
}

impl EntityRecord {
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

    pub fn id(&self) -> Uuid {
        match self {
            Self::Tenant(record) => record.id,
            Self::Organisation(record) => record.id,
            Self::Product(record) => record.id,
            Self::Portal(record) => record.id,
            Self::Customer(record) => record.id,
            Self::Person(record) => record.id,
            Self::User(record) => record.id,
            Self::Role(record) => record.id,
            Self::Quote(record) => record.id,
            Self::QuoteVersion(record) => record.id,
            Self::Policy(record) => record.id,
            Self::PolicyTransaction(record) => record.id,
            Self::Claim(record) => record.id,
            Self::ClaimVersion(record) => record.id,
            Self::Document(record) => record.id,
            Self::EmailMessage(record) => record.id,
            Self::Report(record) => record.id,
        }
    }

    /// Owning tenant. A tenant owns itself.
    pub fn tenant_id(&self) -> Uuid {
        match self {
            Self::Tenant(record) => record.id,
            Self::Organisation(record) => record.tenant_id,
            Self::Product(record) => record.tenant_id,
            Self::Portal(record) => record.tenant_id,
            Self::Customer(record) => record.tenant_id,
            Self::Person(record) => record.tenant_id,
            Self::User(record) => record.tenant_id,
            Self::Role(record) => record.tenant_id,
            Self::Quote(record) => record.tenant_id,
            Self::QuoteVersion(record) => record.tenant_id,
            Self::Policy(record) => record.tenant_id,
            Self::PolicyTransaction(record) => record.tenant_id,
            Self::Claim(record) => record.tenant_id,
            Self::ClaimVersion(record) => record.tenant_id,
            Self::Document(record) => record.tenant_id,
            Self::EmailMessage(record) => record.tenant_id,
            Self::Report(record) => record.tenant_id,
        }
    }

    pub fn environment(&self) -> Option<DeploymentEnvironment> {
        match self {
            Self::Customer(record) => Some(record.environment),
            Self::Quote(record) => Some(record.environment),
            Self::QuoteVersion(record) => Some(record.environment),
            Self::Policy(record) => Some(record.environment),
            Self::PolicyTransaction(record) => Some(record.environment),
            Self::Claim(record) => Some(record.environment),
            Self::ClaimVersion(record) => Some(record.environment),
            Self::Document(record) => Some(record.environment),
            Self::EmailMessage(record) => Some(record.environment),
            Self::Tenant(_)
            | Self::Organisation(_)
            | Self::Product(_)
            | Self::Portal(_)
            | Self::Person(_)
            | Self::User(_)
            | Self::Role(_)
            | Self::Report(_) => None,
        }
    }

    /// Value of an alternate key such as a reference, number, alias or email.
    pub fn alternate_key(&self, kind: LocatorKind) -> Option<&str> {
        match (self, kind) {
            (Self::Tenant(record), LocatorKind::Alias) => Some(&record.alias),
            (Self::Organisation(record), LocatorKind::Alias) => Some(&record.alias),
            (Self::Product(record), LocatorKind::Alias) => Some(&record.alias),
            (Self::Portal(record), LocatorKind::Alias) => Some(&record.alias),
            (Self::Customer(record), LocatorKind::Email) => record.account_email.as_deref(),
            (Self::User(record), LocatorKind::Email) => record.account_email.as_deref(),
            (Self::Quote(record), LocatorKind::Reference) => Some(&record.quote_reference),
            (Self::Policy(record), LocatorKind::Number) => Some(&record.policy_number),
            (Self::Claim(record), LocatorKind::Reference) => Some(&record.claim_reference),
            (Self::Claim(record), LocatorKind::Number) => record.claim_number.as_deref(),
            _ => None,
        }
    }

    pub fn version_number(&self) -> Option<u32> {
        match self {
            Self::QuoteVersion(record) => Some(record.version_number),
            Self::ClaimVersion(record) => Some(record.version_number),
            _ => None,
        }
    }

    /// Foreign key stored under a relation property name.
    pub fn reference(&self, property: &str) -> Option<Uuid> {
        match (self, property) {
            (_, "tenant") => Some(self.tenant_id()),
            (Self::Tenant(record), "defaultOrganisation") => record.default_organisation_id,
            (Self::Portal(record), "organisation") => Some(record.organisation_id),
            (Self::Customer(record), "organisation") => Some(record.organisation_id),
            (Self::Customer(record), "primaryPerson") => record.primary_person_id,
            (Self::Customer(record), "owner") => record.owner_user_id,
            (Self::Person(record), "organisation") => Some(record.organisation_id),
            (Self::Person(record), "customer") => record.customer_id,
            (Self::Person(record), "user") => record.user_id,
            (Self::User(record), "organisation") => Some(record.organisation_id),
            (Self::User(record), "person") => record.person_id,
            (Self::Role(record), "organisation") => record.organisation_id,
            (Self::Quote(record), "organisation") => Some(record.organisation_id),
            (Self::Quote(record), "product") => Some(record.product_id),
            (Self::Quote(record), "customer") => record.customer_id,
            (Self::Quote(record), "owner") => record.owner_user_id,
            (Self::Quote(record), "policy") => record.policy_id,
            (Self::QuoteVersion(record), "quote") => Some(record.quote_id),
            (Self::QuoteVersion(record), "customer") => record.customer_id,
            (Self::QuoteVersion(record), "owner") => record.owner_user_id,
            (Self::Policy(record), "organisation") => Some(record.organisation_id),
            (Self::Policy(record), "product") => Some(record.product_id),
            (Self::Policy(record), "customer") => record.customer_id,
            (Self::Policy(record), "owner") => record.owner_user_id,
            (Self::PolicyTransaction(record), "policy") => Some(record.policy_id),
            (Self::PolicyTransaction(record), "quote") => record.quote_id,
            (Self::PolicyTransaction(record), "customer") => record.customer_id,
            (Self::Claim(record), "organisation") => Some(record.organisation_id),
            (Self::Claim(record), "product") => Some(record.product_id),
            (Self::Claim(record), "customer") => record.customer_id,
            (Self::Claim(record), "policy") => record.policy_id,
            (Self::Claim(record), "owner") => record.owner_user_id,
            (Self::ClaimVersion(record), "claim") => Some(record.claim_id),
            (Self::ClaimVersion(record), "customer") => record.customer_id,
            (Self::ClaimVersion(record), "owner") => record.owner_user_id,
            (Self::Document(record), "customer") => record.customer_id,
            (Self::Document(record), "quote") => record.quote_id,
            (Self::Document(record), "quoteVersion") => record.quote_version_id,
            (Self::Document(record), "policy") => record.policy_id,
            (Self::Document(record), "policyTransaction") => record.policy_transaction_id,
            (Self::Document(record), "claim") => record.claim_id,
            (Self::Document(record), "claimVersion") => record.claim_version_id,
            (Self::Document(record), "emailMessage") => record.email_message_id,
            (Self::EmailMessage(record), "organisation") => record.organisation_id,
            (Self::EmailMessage(record), "customer") => record.customer_id,
            (Self::EmailMessage(record), "quote") => record.quote_id,
            (Self::EmailMessage(record), "policy") => record.policy_id,
            (Self::EmailMessage(record), "claim") => record.claim_id,
            (Self::Report(record), "organisation") => Some(record.organisation_id),
            _ => None,
        }
    }

    /// Foreign keys stored as a list under a relation property name.
    pub fn references(&self, property: &str) -> &[Uuid] {
        match (self, property) {
            (Self::User(record), "roles") => &record.role_ids,
            _ => &[],
        }
    }

    pub fn form_data(&self) -> Option<&Value> {
        match self {
            Self::Quote(record) => record.form_data.as_ref(),
            Self::QuoteVersion(record) => record.form_data.as_ref(),
            Self::Policy(record) => record.form_data.as_ref(),
            Self::PolicyTransaction(record) => record.form_data.as_ref(),
            Self::Claim(record) => record.form_data.as_ref(),
            Self::ClaimVersion(record) => record.form_data.as_ref(),
            _ => None,
        }
    }
}

macro_rules! impl_record_from {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for EntityRecord {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_record_from!(
    Tenant,
    Organisation,
    Product,
    Portal,
    Customer,
    Person,
    User,
    Role,
    Quote,
    QuoteVersion,
    Policy,
    PolicyTransaction,
    Claim,
    ClaimVersion,
    Document,
    EmailMessage,
    Report,
);
