//! Static description of every resolvable entity type: its configuration tag,
//! the locator parameters it accepts, whether it is environment scoped, and the
//! related entities that can be requested through `includeOptionalProperties`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::locator::LocatorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
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
}

/// Configuration parameter naming one locator variant for an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorKey {
    pub kind: LocatorKind,
    pub parameter: &'static str,
    pub label: &'static str,
}

impl LocatorKey {
    const fn new(kind: LocatorKind, parameter: &'static str, label: &'static str) -> Self {
        Self {
            kind,
            parameter,
            label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// How a relation is joined in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// The source record holds the target id under the relation name.
    Forward,
    /// Target records hold the source id under the given relation name.
    Inverse(&'static str),
    /// The source record holds a list of target ids under the relation name.
    ForwardList,
}

/// Related entity reachable from an entity type, named by its external property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub property: &'static str,
    pub target: EntityType,
    pub cardinality: Cardinality,
    pub join: Join,
}

impl Relation {
    const fn one(property: &'static str, target: EntityType) -> Self {
        Self {
            property,
            target,
            cardinality: Cardinality::One,
            join: Join::Forward,
        }
    }

    const fn many(property: &'static str, target: EntityType, inverse: &'static str) -> Self {
        Self {
            property,
            target,
            cardinality: Cardinality::Many,
            join: Join::Inverse(inverse),
        }
    }

    const fn listed(property: &'static str, target: EntityType) -> Self {
        Self {
            property,
            target,
            cardinality: Cardinality::Many,
            join: Join::ForwardList,
        }
    }
}

pub const VERSION_NUMBER_PARAMETER: &str = "versionNumber";
pub const VERSION_NUMBER_LABEL: &str = "Version Number";

use EntityType as T;
use LocatorKind as K;

const TENANT_KEYS: &[LocatorKey] = &[
    LocatorKey::new(K::Id, "tenantId", "Tenant Id"),
    LocatorKey::new(K::Alias, "tenantAlias", "Tenant Alias"),
];
const ORGANISATION_KEYS: &[LocatorKey] = &[
    LocatorKey::new(K::Id, "organisationId", "Organisation Id"),
    LocatorKey::new(K::Alias, "organisationAlias", "Organisation Alias"),
];
const PRODUCT_KEYS: &[LocatorKey] = &[
    LocatorKey::new(K::Id, "productId", "Product Id"),
    LocatorKey::new(K::Alias, "productAlias", "Product Alias"),
];
const PORTAL_KEYS: &[LocatorKey] = &[
    LocatorKey::new(K::Id, "portalId", "Portal Id"),
    LocatorKey::new(K::Alias, "portalAlias", "Portal Alias"),
];
const CUSTOMER_KEYS: &[LocatorKey] = &[
    LocatorKey::new(K::Id, "customerId", "Customer Id"),
    LocatorKey::new(K::Email, "customerAccountEmail", "Customer Account Email"),
];
const PERSON_KEYS: &[LocatorKey] = &[LocatorKey::new(K::Id, "personId", "Person Id")];
const USER_KEYS: &[LocatorKey] = &[
    LocatorKey::new(K::Id, "userId", "User Id"),
    LocatorKey::new(K::Email, "userAccountEmail", "User Account Email"),
];
const ROLE_KEYS: &[LocatorKey] = &[LocatorKey::new(K::Id, "roleId", "Role Id")];
const QUOTE_KEYS: &[LocatorKey] = &[
    LocatorKey::new(K::Id, "quoteId", "Quote Id"),
    LocatorKey::new(K::Reference, "quoteReference", "Quote Reference"),
];
const QUOTE_VERSION_KEYS: &[LocatorKey] =
    &[LocatorKey::new(K::Id, "quoteVersionId", "Quote Version Id")];
const POLICY_KEYS: &[LocatorKey] = &[
    LocatorKey::new(K::Id, "policyId", "Policy Id"),
    LocatorKey::new(K::Number, "policyNumber", "Policy Number"),
];
const POLICY_TRANSACTION_KEYS: &[LocatorKey] = &[LocatorKey::new(
    K::Id,
    "policyTransactionId",
    "Policy Transaction Id",
)];
const CLAIM_KEYS: &[LocatorKey] = &[
    LocatorKey::new(K::Id, "claimId", "Claim Id"),
    LocatorKey::new(K::Reference, "claimReference", "Claim Reference"),
    LocatorKey::new(K::Number, "claimNumber", "Claim Number"),
];
const CLAIM_VERSION_KEYS: &[LocatorKey] =
    &[LocatorKey::new(K::Id, "claimVersionId", "Claim Version Id")];
const DOCUMENT_KEYS: &[LocatorKey] = &[LocatorKey::new(K::Id, "documentId", "Document Id")];
const EMAIL_KEYS: &[LocatorKey] = &[LocatorKey::new(K::Id, "emailId", "Email Id")];
const REPORT_KEYS: &[LocatorKey] = &[LocatorKey::new(K::Id, "reportId", "Report Id")];

const TENANT_RELATIONS: &[Relation] = &[Relation::one("defaultOrganisation", T::Organisation)];
const TENANT_ONLY: &[Relation] = &[Relation::one("tenant", T::Tenant)];
const TENANT_AND_ORGANISATION: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("organisation", T::Organisation),
];
const CUSTOMER_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("organisation", T::Organisation),
    Relation::one("primaryPerson", T::Person),
    Relation::one("owner", T::User),
    Relation::many("quotes", T::Quote, "customer"),
    Relation::many("policies", T::Policy, "customer"),
    Relation::many("claims", T::Claim, "customer"),
    Relation::many("documents", T::Document, "customer"),
    Relation::many("emails", T::EmailMessage, "customer"),
];
const PERSON_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("organisation", T::Organisation),
    Relation::one("customer", T::Customer),
    Relation::one("user", T::User),
];
const USER_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("organisation", T::Organisation),
    Relation::one("person", T::Person),
    Relation::listed("roles", T::Role),
];
const QUOTE_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("organisation", T::Organisation),
    Relation::one("product", T::Product),
    Relation::one("customer", T::Customer),
    Relation::one("owner", T::User),
    Relation::one("policy", T::Policy),
    Relation::many("quoteVersions", T::QuoteVersion, "quote"),
    Relation::many("documents", T::Document, "quote"),
    Relation::many("emails", T::EmailMessage, "quote"),
];
const QUOTE_VERSION_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("quote", T::Quote),
    Relation::one("customer", T::Customer),
    Relation::one("owner", T::User),
    Relation::many("documents", T::Document, "quoteVersion"),
];
const POLICY_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("organisation", T::Organisation),
    Relation::one("product", T::Product),
    Relation::one("customer", T::Customer),
    Relation::one("owner", T::User),
    Relation::many("quotes", T::Quote, "policy"),
    Relation::many("transactions", T::PolicyTransaction, "policy"),
    Relation::many("claims", T::Claim, "policy"),
    Relation::many("documents", T::Document, "policy"),
    Relation::many("emails", T::EmailMessage, "policy"),
];
const POLICY_TRANSACTION_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("policy", T::Policy),
    Relation::one("quote", T::Quote),
    Relation::one("customer", T::Customer),
    Relation::many("documents", T::Document, "policyTransaction"),
];
const CLAIM_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("organisation", T::Organisation),
    Relation::one("product", T::Product),
    Relation::one("customer", T::Customer),
    Relation::one("owner", T::User),
    Relation::one("policy", T::Policy),
    Relation::many("claimVersions", T::ClaimVersion, "claim"),
    Relation::many("documents", T::Document, "claim"),
    Relation::many("emails", T::EmailMessage, "claim"),
];
const CLAIM_VERSION_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("claim", T::Claim),
    Relation::one("customer", T::Customer),
    Relation::one("owner", T::User),
    Relation::many("documents", T::Document, "claimVersion"),
];
const EMAIL_RELATIONS: &[Relation] = &[
    Relation::one("tenant", T::Tenant),
    Relation::one("organisation", T::Organisation),
    Relation::one("customer", T::Customer),
    Relation::one("quote", T::Quote),
    Relation::one("policy", T::Policy),
    Relation::one("claim", T::Claim),
    Relation::many("documents", T::Document, "emailMessage"),
];

impl EntityType {
    pub const fn all() -> [Self; 17] {
        [
            Self::Tenant,
            Self::Organisation,
            Self::Product,
            Self::Portal,
            Self::Customer,
            Self::Person,
            Self::User,
            Self::Role,
            Self::Quote,
            Self::QuoteVersion,
            Self::Policy,
            Self::PolicyTransaction,
            Self::Claim,
            Self::ClaimVersion,
            Self::Document,
            Self::EmailMessage,
            Self::Report,
        ]
    }

    /// Tag used by automation configuration, e.g. `policyTransaction`.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Organisation => "organisation",
            Self::Product => "product",
            Self::Portal => "portal",
            Self::Customer => "customer",
            Self::Person => "person",
            Self::User => "user",
            Self::Role => "role",
            Self::Quote => "quote",
            Self::QuoteVersion => "quoteVersion",
            Self::Policy => "policy",
            Self::PolicyTransaction => "policyTransaction",
            Self::Claim => "claim",
            Self::ClaimVersion => "claimVersion",
            Self::Document => "document",
            Self::EmailMessage => "emailMessage",
            Self::Report => "report",
        }
    }

    /// Name reported in diagnostics, e.g. `Entity Type: PolicyTransaction`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tenant => "Tenant",
            Self::Organisation => "Organisation",
            Self::Product => "Product",
            Self::Portal => "Portal",
            Self::Customer => "Customer",
            Self::Person => "Person",
            Self::User => "User",
            Self::Role => "Role",
            Self::Quote => "Quote",
            Self::QuoteVersion => "QuoteVersion",
            Self::Policy => "Policy",
            Self::PolicyTransaction => "PolicyTransaction",
            Self::Claim => "Claim",
            Self::ClaimVersion => "ClaimVersion",
            Self::Document => "Document",
            Self::EmailMessage => "EmailMessage",
            Self::Report => "Report",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::all()
            .into_iter()
            .find(|candidate| candidate.tag().eq_ignore_ascii_case(tag))
    }

    /// Whether records are partitioned by deployment environment.
    pub const fn is_environment_scoped(self) -> bool {
        matches!(
            self,
            Self::Customer
                | Self::Quote
                | Self::QuoteVersion
                | Self::Policy
                | Self::PolicyTransaction
                | Self::Claim
                | Self::ClaimVersion
                | Self::Document
                | Self::EmailMessage
        )
    }

    pub const fn locator_keys(self) -> &'static [LocatorKey] {
        match self {
            Self::Tenant => TENANT_KEYS,
            Self::Organisation => ORGANISATION_KEYS,
            Self::Product => PRODUCT_KEYS,
            Self::Portal => PORTAL_KEYS,
            Self::Customer => CUSTOMER_KEYS,
            Self::Person => PERSON_KEYS,
            Self::User => USER_KEYS,
            Self::Role => ROLE_KEYS,
            Self::Quote => QUOTE_KEYS,
            Self::QuoteVersion => QUOTE_VERSION_KEYS,
            Self::Policy => POLICY_KEYS,
            Self::PolicyTransaction => POLICY_TRANSACTION_KEYS,
            Self::Claim => CLAIM_KEYS,
            Self::ClaimVersion => CLAIM_VERSION_KEYS,
            Self::Document => DOCUMENT_KEYS,
            Self::EmailMessage => EMAIL_KEYS,
            Self::Report => REPORT_KEYS,
        }
    }

    pub fn locator_key(self, kind: LocatorKind) -> Option<&'static LocatorKey> {
        self.locator_keys().iter().find(|key| key.kind == kind)
    }

    /// Parent entity whose locator combines with a version number.
    pub const fn versioned_parent(self) -> Option<Self> {
        match self {
            Self::QuoteVersion => Some(Self::Quote),
            Self::ClaimVersion => Some(Self::Claim),
            _ => None,
        }
    }

    pub const fn relations(self) -> &'static [Relation] {
        match self {
            Self::Tenant => TENANT_RELATIONS,
            Self::Organisation | Self::Product | Self::Document => TENANT_ONLY,
            Self::Portal | Self::Role | Self::Report => TENANT_AND_ORGANISATION,
            Self::Customer => CUSTOMER_RELATIONS,
            Self::Person => PERSON_RELATIONS,
            Self::User => USER_RELATIONS,
            Self::Quote => QUOTE_RELATIONS,
            Self::QuoteVersion => QUOTE_VERSION_RELATIONS,
            Self::Policy => POLICY_RELATIONS,
            Self::PolicyTransaction => POLICY_TRANSACTION_RELATIONS,
            Self::Claim => CLAIM_RELATIONS,
            Self::ClaimVersion => CLAIM_VERSION_RELATIONS,
            Self::EmailMessage => EMAIL_RELATIONS,
        }
    }

    /// Case-insensitive lookup of a relation by its external property name.
    pub fn relation(self, property: &str) -> Option<&'static Relation> {
        self.relations()
            .iter()
            .find(|relation| relation.property.eq_ignore_ascii_case(property))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
