//! Maps loaded aggregates onto the external entity objects handed to automations.
//!
//! The factory only walks relations that are present in the aggregate; it never
//! loads or expands anything on its own, so mutually recursive object types
//! (quote → customer → policies → quotes) terminate with the projected graph.

mod objects;
mod prettifier;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::config::SerialisationConfig;

use super::catalog::EntityType;
use super::domain::DeploymentEnvironment;
use super::repository::{EntityAggregate, Related};

pub use objects::{
    ClaimObject, ClaimVersionObject, CustomerObject, DocumentObject, EmailMessageObject,
    EntityObject, OrganisationObject, PermissionObject, PersonObject, PolicyObject,
    PolicyTransactionObject, PortalObject, ProductObject, QuoteObject, QuoteVersionObject,
    ReportObject, RoleObject, SerialisedEntity, TenantObject, UserObject,
};
pub use prettifier::{FormDataPrettifier, LabelledFormDataPrettifier};

/// Error raised while building entity objects.
#[derive(Debug, thiserror::Error)]
pub enum SerialisationError {
    #[error("a base API URL must be configured before entities can be serialised")]
    MissingBaseApiUrl,
    #[error("base API URL '{value}' is invalid: {source}")]
    InvalidBaseApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("expected a {expected} record but found {found}")]
    UnexpectedRecord {
        expected: EntityType,
        found: EntityType,
    },
    #[error("related property '{property}' should hold {expected}")]
    UnexpectedCardinality {
        property: String,
        expected: &'static str,
    },
}

/// Human readable descriptions for role permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionCatalog {
    descriptions: BTreeMap<String, String>,
}

impl PermissionCatalog {
    pub fn with(mut self, permission: impl Into<String>, description: impl Into<String>) -> Self {
        self.descriptions
            .insert(permission.into(), description.into());
        self
    }

    pub fn describe(&self, permission: &str) -> Option<&str> {
        self.descriptions.get(permission).map(String::as_str)
    }

    pub fn standard() -> Self {
        Self::default()
            .with("viewQuotes", "View quotes")
            .with("manageQuotes", "Manage quotes")
            .with("viewPolicies", "View policies")
            .with("managePolicies", "Manage policies")
            .with("viewClaims", "View claims")
            .with("manageClaims", "Manage claims")
            .with("viewCustomers", "View customers")
            .with("manageCustomers", "Manage customers")
            .with("viewUsers", "View users")
            .with("manageUsers", "Manage users")
            .with("viewReports", "View reports")
            .with("manageReports", "Manage reports")
            .with("manageTenants", "Manage tenants")
    }
}

/// Settings the factory needs to produce links and display values.
#[derive(Debug, Clone)]
pub struct SerialisationSettings {
    pub base_api_url: String,
    /// Time of day applied to policy dates (inception, expiry, transaction effective).
    pub policy_time_of_day: NaiveTime,
    pub permissions: PermissionCatalog,
}

impl SerialisationSettings {
    pub fn new(base_api_url: impl Into<String>) -> Self {
        Self {
            base_api_url: base_api_url.into(),
            policy_time_of_day: default_policy_time_of_day(),
            permissions: PermissionCatalog::standard(),
        }
    }

    pub fn with_policy_time_of_day(mut self, time: NaiveTime) -> Self {
        self.policy_time_of_day = time;
        self
    }

    pub fn with_permissions(mut self, permissions: PermissionCatalog) -> Self {
        self.permissions = permissions;
        self
    }
}

impl From<&SerialisationConfig> for SerialisationSettings {
    fn from(config: &SerialisationConfig) -> Self {
        Self::new(config.base_api_url.clone()).with_policy_time_of_day(config.policy_time_of_day)
    }
}

pub(crate) fn default_policy_time_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default()
}

pub struct SerialisedEntityFactory {
    base_api_url: String,
    policy_time_of_day: NaiveTime,
    permissions: PermissionCatalog,
    prettifier: Arc<dyn FormDataPrettifier>,
}

impl SerialisedEntityFactory {
    pub fn new(
        settings: SerialisationSettings,
        prettifier: Arc<dyn FormDataPrettifier>,
    ) -> Result<Self, SerialisationError> {
        let trimmed = settings.base_api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(SerialisationError::MissingBaseApiUrl);
        }
        Url::parse(trimmed).map_err(|source| SerialisationError::InvalidBaseApiUrl {
            value: settings.base_api_url.clone(),
            source,
        })?;

        Ok(Self {
            base_api_url: trimmed.to_string(),
            policy_time_of_day: settings.policy_time_of_day,
            permissions: settings.permissions,
            prettifier,
        })
    }

    /// Build the object for a root entity. Only the root carries form data.
    pub fn build(&self, aggregate: &EntityAggregate) -> Result<SerialisedEntity, SerialisationError> {
        let entity = match aggregate.entity_type() {
            EntityType::Tenant => SerialisedEntity::Tenant(self.build_root(aggregate)?),
            EntityType::Organisation => SerialisedEntity::Organisation(self.build_root(aggregate)?),
            EntityType::Product => SerialisedEntity::Product(self.build_root(aggregate)?),
            EntityType::Portal => SerialisedEntity::Portal(self.build_root(aggregate)?),
            EntityType::Customer => SerialisedEntity::Customer(self.build_root(aggregate)?),
            EntityType::Person => SerialisedEntity::Person(self.build_root(aggregate)?),
            EntityType::User => SerialisedEntity::User(self.build_root(aggregate)?),
            EntityType::Role => SerialisedEntity::Role(self.build_root(aggregate)?),
            EntityType::Quote => SerialisedEntity::Quote(self.build_root(aggregate)?),
            EntityType::QuoteVersion => SerialisedEntity::QuoteVersion(self.build_root(aggregate)?),
            EntityType::Policy => SerialisedEntity::Policy(self.build_root(aggregate)?),
            EntityType::PolicyTransaction => {
                SerialisedEntity::PolicyTransaction(self.build_root(aggregate)?)
            }
            EntityType::Claim => SerialisedEntity::Claim(self.build_root(aggregate)?),
            EntityType::ClaimVersion => SerialisedEntity::ClaimVersion(self.build_root(aggregate)?),
            EntityType::Document => SerialisedEntity::Document(self.build_root(aggregate)?),
            EntityType::EmailMessage => SerialisedEntity::EmailMessage(self.build_root(aggregate)?),
            EntityType::Report => SerialisedEntity::Report(self.build_root(aggregate)?),
        };
        Ok(entity)
    }

    /// Typed variant of [`Self::build`] for callers that know the entity type.
    pub fn build_root<T: EntityObject>(
        &self,
        aggregate: &EntityAggregate,
    ) -> Result<T, SerialisationError> {
        T::build(self, aggregate, true)
    }

    pub(crate) fn one<T: EntityObject>(
        &self,
        aggregate: &EntityAggregate,
        property: &str,
    ) -> Result<Option<Box<T>>, SerialisationError> {
        match aggregate.related(property) {
            None => Ok(None),
            Some(Related::One(child)) => Ok(Some(Box::new(T::build(self, child, false)?))),
            Some(Related::Many(_)) => Err(SerialisationError::UnexpectedCardinality {
                property: property.to_string(),
                expected: "a single entity",
            }),
        }
    }

    pub(crate) fn many<T: EntityObject>(
        &self,
        aggregate: &EntityAggregate,
        property: &str,
    ) -> Result<Option<Vec<T>>, SerialisationError> {
        match aggregate.related(property) {
            None => Ok(None),
            Some(Related::Many(children)) => children
                .iter()
                .map(|child| T::build(self, child, false))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(Related::One(_)) => Err(SerialisationError::UnexpectedCardinality {
                property: property.to_string(),
                expected: "a collection",
            }),
        }
    }

    /// Raw and prettified form data, for the root entity only.
    pub(crate) fn form_data(
        &self,
        form_data: Option<&Value>,
        root: bool,
    ) -> (Option<Value>, Option<Value>) {
        match form_data {
            Some(value) if root => (Some(value.clone()), Some(self.prettifier.prettify(value))),
            _ => (None, None),
        }
    }

    pub(crate) fn policy_date_time(&self, date: NaiveDate) -> String {
        date.and_time(self.policy_time_of_day)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    }

    pub(crate) fn document_download_url(
        &self,
        tenant_id: Uuid,
        environment: DeploymentEnvironment,
        document_id: Uuid,
    ) -> String {
        format!(
            "{}/api/v1/tenant/{}/environment/{}/document/{}/content",
            self.base_api_url,
            tenant_id,
            environment.label().to_ascii_lowercase(),
            document_id
        )
    }

    pub(crate) fn permission_description(&self, permission: &str) -> Option<String> {
        self.permissions.describe(permission).map(str::to_string)
    }
}

pub(crate) fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
