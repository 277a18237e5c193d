use std::collections::BTreeMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::catalog::EntityType;
use super::domain::{DeploymentEnvironment, EntityRecord};
use super::locator::EntityLocator;
use super::projection::RelationTree;

/// A loaded record plus whichever related entities were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityAggregate {
    pub record: EntityRecord,
    pub related: BTreeMap<String, Related>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    One(Box<EntityAggregate>),
    Many(Vec<EntityAggregate>),
}

impl EntityAggregate {
    pub fn new(record: impl Into<EntityRecord>) -> Self {
        Self {
            record: record.into(),
            related: BTreeMap::new(),
        }
    }

    pub fn with_one(mut self, property: &str, aggregate: EntityAggregate) -> Self {
        self.related
            .insert(property.to_string(), Related::One(Box::new(aggregate)));
        self
    }

    pub fn with_many(mut self, property: &str, aggregates: Vec<EntityAggregate>) -> Self {
        self.related
            .insert(property.to_string(), Related::Many(aggregates));
        self
    }

    pub fn entity_type(&self) -> EntityType {
        self.record.entity_type()
    }

    pub fn related(&self, property: &str) -> Option<&Related> {
        self.related.get(property)
    }
}

/// Single lookup request sent to a repository.
#[derive(Debug, Clone, Copy)]
pub struct EntityQuery<'a> {
    pub entity_type: EntityType,
    pub tenant_id: Uuid,
    /// `None` for environment-agnostic entity types.
    pub environment: Option<DeploymentEnvironment>,
    pub locator: &'a EntityLocator,
    /// Related entities to eager-load, keyed by external property name.
    pub related: &'a RelationTree,
}

/// Storage collaborator able to load an entity together with requested relations.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    async fn get_with_related_entities(
        &self,
        query: EntityQuery<'_>,
    ) -> Result<Option<EntityAggregate>, RepositoryError>;
}

/// Caching lookup translating aliases (tenant, product, organisation, portal) into ids.
#[async_trait]
pub trait AliasResolver: Send + Sync {
    async fn resolve_alias(
        &self,
        tenant_id: Uuid,
        entity_type: EntityType,
        alias: &str,
    ) -> Result<Option<Uuid>, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("repository call timed out after {0} ms")]
    Timeout(u64),
}
