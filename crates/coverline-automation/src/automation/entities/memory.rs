use std::io::Read;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::trace;
use uuid::Uuid;

use super::catalog::{EntityType, Join};
use super::domain::{
    Claim, ClaimVersion, Customer, DeploymentEnvironment, Document, EmailMessage, EntityRecord,
    Organisation, Person, Policy, PolicyTransaction, Portal, Product, Quote, QuoteVersion, Report,
    Role, Tenant, User,
};
use super::locator::EntityLocator;
use super::projection::RelationTree;
use super::repository::{
    AliasResolver, EntityAggregate, EntityQuery, EntityRepository, Related, RepositoryError,
};

/// JSON document listing records per entity type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitySnapshot {
    pub tenants: Vec<Tenant>,
    pub organisations: Vec<Organisation>,
    pub products: Vec<Product>,
    pub portals: Vec<Portal>,
    pub customers: Vec<Customer>,
    pub people: Vec<Person>,
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub quotes: Vec<Quote>,
    pub quote_versions: Vec<QuoteVersion>,
    pub policies: Vec<Policy>,
    pub policy_transactions: Vec<PolicyTransaction>,
    pub claims: Vec<Claim>,
    pub claim_versions: Vec<ClaimVersion>,
    pub documents: Vec<Document>,
    pub email_messages: Vec<EmailMessage>,
    pub reports: Vec<Report>,
}

impl EntitySnapshot {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    fn into_records(self) -> Vec<EntityRecord> {
        let mut records = Vec::new();
        records.extend(self.tenants.into_iter().map(EntityRecord::from));
        records.extend(self.organisations.into_iter().map(EntityRecord::from));
        records.extend(self.products.into_iter().map(EntityRecord::from));
        records.extend(self.portals.into_iter().map(EntityRecord::from));
        records.extend(self.customers.into_iter().map(EntityRecord::from));
        records.extend(self.people.into_iter().map(EntityRecord::from));
        records.extend(self.users.into_iter().map(EntityRecord::from));
        records.extend(self.roles.into_iter().map(EntityRecord::from));
        records.extend(self.quotes.into_iter().map(EntityRecord::from));
        records.extend(self.quote_versions.into_iter().map(EntityRecord::from));
        records.extend(self.policies.into_iter().map(EntityRecord::from));
        records.extend(self.policy_transactions.into_iter().map(EntityRecord::from));
        records.extend(self.claims.into_iter().map(EntityRecord::from));
        records.extend(self.claim_versions.into_iter().map(EntityRecord::from));
        records.extend(self.documents.into_iter().map(EntityRecord::from));
        records.extend(self.email_messages.into_iter().map(EntityRecord::from));
        records.extend(self.reports.into_iter().map(EntityRecord::from));
        records
    }
}

/// Snapshot-backed store used by the CLI and tests.
///
/// Lookups are scoped to the query tenant (tenants themselves excepted) and, for
/// environment-scoped types, to the query environment. Related entities are
/// joined through the foreign keys held on each record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityStore {
    records: Vec<EntityRecord>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: EntitySnapshot) -> Self {
        Self {
            records: snapshot.into_records(),
        }
    }

    pub fn insert(&mut self, record: impl Into<EntityRecord>) {
        self.records.push(record.into());
    }

    pub fn with(mut self, record: impl Into<EntityRecord>) -> Self {
        self.insert(record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn in_tenant(
        &self,
        entity_type: EntityType,
        tenant_id: Uuid,
    ) -> impl Iterator<Item = &EntityRecord> {
        self.records.iter().filter(move |record| {
            record.entity_type() == entity_type
                && (entity_type == EntityType::Tenant || record.tenant_id() == tenant_id)
        })
    }

    fn find(
        &self,
        entity_type: EntityType,
        tenant_id: Uuid,
        environment: Option<DeploymentEnvironment>,
        locator: &EntityLocator,
    ) -> Option<&EntityRecord> {
        let parent = match locator {
            EntityLocator::Composite { primary, .. } => {
                let parent_type = entity_type.versioned_parent()?;
                Some(self.find(parent_type, tenant_id, environment, primary)?)
            }
            _ => None,
        };

        self.in_tenant(entity_type, tenant_id)
            .filter(|record| environment.is_none() || record.environment() == environment)
            .find(|record| match locator {
                EntityLocator::ById(id) => record.id() == *id,
                EntityLocator::ByAlias(value) | EntityLocator::ByEmail(value) => locator
                    .kind()
                    .and_then(|kind| record.alternate_key(kind))
                    .is_some_and(|key| key.eq_ignore_ascii_case(value)),
                EntityLocator::ByReference(value) | EntityLocator::ByNumber(value) => locator
                    .kind()
                    .and_then(|kind| record.alternate_key(kind))
                    .is_some_and(|key| key == value),
                EntityLocator::Composite { version_number, .. } => {
                    let parent_id = parent.map(EntityRecord::id);
                    let parent_property = parent.map(|parent| parent.entity_type().tag());
                    parent_property.and_then(|property| record.reference(property)) == parent_id
                        && record.version_number() == Some(*version_number)
                }
            })
    }

    fn by_id(&self, entity_type: EntityType, tenant_id: Uuid, id: Uuid) -> Option<&EntityRecord> {
        self.in_tenant(entity_type, tenant_id)
            .find(|record| record.id() == id)
    }

    /// Relations are joined within the tenant of `record`, which differs from the
    /// query tenant when a tenant is resolved across tenants.
    fn expand(&self, record: &EntityRecord, tree: &RelationTree) -> EntityAggregate {
        let tenant_id = record.tenant_id();
        let mut aggregate = EntityAggregate::new(record.clone());

        for (property, subtree) in tree.children() {
            let Some(relation) = record.entity_type().relation(property) else {
                continue;
            };

            let related = match relation.join {
                Join::Forward => record
                    .reference(relation.property)
                    .and_then(|id| self.by_id(relation.target, tenant_id, id))
                    .map(|target| Related::One(Box::new(self.expand(target, subtree)))),
                Join::ForwardList => Some(Related::Many(
                    record
                        .references(relation.property)
                        .iter()
                        .filter_map(|id| self.by_id(relation.target, tenant_id, *id))
                        .map(|target| self.expand(target, subtree))
                        .collect(),
                )),
                Join::Inverse(back) => Some(Related::Many(
                    self.in_tenant(relation.target, tenant_id)
                        .filter(|target| target.reference(back) == Some(record.id()))
                        .map(|target| self.expand(target, subtree))
                        .collect(),
                )),
            };

            if let Some(related) = related {
                aggregate.related.insert(relation.property.to_string(), related);
            }
        }

        aggregate
    }
}

#[async_trait]
impl EntityRepository for InMemoryEntityStore {
    async fn get_with_related_entities(
        &self,
        query: EntityQuery<'_>,
    ) -> Result<Option<EntityAggregate>, RepositoryError> {
        trace!(
            entity_type = %query.entity_type,
            tenant_id = %query.tenant_id,
            environment = ?query.environment,
            "in-memory entity lookup"
        );
        Ok(self
            .find(query.entity_type, query.tenant_id, query.environment, query.locator)
            .map(|record| self.expand(record, query.related)))
    }
}

#[async_trait]
impl AliasResolver for InMemoryEntityStore {
    async fn resolve_alias(
        &self,
        tenant_id: Uuid,
        entity_type: EntityType,
        alias: &str,
    ) -> Result<Option<Uuid>, RepositoryError> {
        let locator = EntityLocator::ByAlias(alias.to_string());
        Ok(self
            .find(entity_type, tenant_id, None, &locator)
            .map(EntityRecord::id))
    }
}
