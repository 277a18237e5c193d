use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use super::catalog::EntityType;
use super::domain::AutomationContext;
use super::error::ResolutionError;
use super::locator::EntityLocator;
use super::repository::{AliasResolver, EntityRepository};
use super::resolver::{EntityLocatorResolver, EntityRequest, ResolveEntity};
use super::serialisation::{SerialisedEntity, SerialisedEntityFactory};

/// Routes an entity type tag to the resolver registered for it.
pub struct DynamicEntityDispatcher {
    resolvers: HashMap<EntityType, Arc<dyn ResolveEntity>>,
}

#[derive(Default)]
pub struct DynamicEntityDispatcherBuilder {
    resolvers: HashMap<EntityType, Arc<dyn ResolveEntity>>,
}

impl DynamicEntityDispatcherBuilder {
    /// Register a resolver under its own entity type, replacing any previous one.
    pub fn register(mut self, resolver: Arc<dyn ResolveEntity>) -> Self {
        self.resolvers.insert(resolver.entity_type(), resolver);
        self
    }

    /// Register a catalog-driven resolver for one type backed by `repository`.
    pub fn register_repository(
        self,
        entity_type: EntityType,
        repository: Arc<dyn EntityRepository>,
        aliases: Arc<dyn AliasResolver>,
        factory: Arc<SerialisedEntityFactory>,
    ) -> Self {
        self.register(Arc::new(EntityLocatorResolver::new(
            entity_type,
            repository,
            aliases,
            factory,
        )))
    }

    /// Register every catalog type against a single shared store.
    pub fn register_all(
        self,
        repository: Arc<dyn EntityRepository>,
        aliases: Arc<dyn AliasResolver>,
        factory: Arc<SerialisedEntityFactory>,
    ) -> Self {
        EntityType::all().into_iter().fold(self, |builder, entity_type| {
            builder.register_repository(
                entity_type,
                repository.clone(),
                aliases.clone(),
                factory.clone(),
            )
        })
    }

    pub fn build(self) -> DynamicEntityDispatcher {
        DynamicEntityDispatcher {
            resolvers: self.resolvers,
        }
    }
}

impl DynamicEntityDispatcher {
    pub fn builder() -> DynamicEntityDispatcherBuilder {
        DynamicEntityDispatcherBuilder::default()
    }

    pub fn supported_types(&self) -> Vec<EntityType> {
        let mut types: Vec<EntityType> = self.resolvers.keys().copied().collect();
        types.sort();
        types
    }

    fn resolver_for(&self, tag: &str) -> Result<&Arc<dyn ResolveEntity>, ResolutionError> {
        EntityType::from_tag(tag)
            .and_then(|entity_type| self.resolvers.get(&entity_type))
            .ok_or_else(|| {
                warn!(tag, "no entity resolver registered for tag");
                ResolutionError::UnsupportedEntityType {
                    tag: tag.to_string(),
                }
            })
    }

    /// Resolve an entity by type tag and id using the ambient environment.
    pub async fn resolve(
        &self,
        tag: &str,
        entity_id: Uuid,
        related_paths: &[String],
        context: &AutomationContext,
    ) -> Result<SerialisedEntity, ResolutionError> {
        let resolver = self.resolver_for(tag)?;
        debug!(tag, %entity_id, "dispatching dynamic entity resolution");
        let request = EntityRequest::new(EntityLocator::ById(entity_id))
            .including(related_paths.iter().cloned());
        resolver.resolve(&request, context).await
    }

    /// Resolve a fully specified request through the resolver registered for `entity_type`.
    pub async fn resolve_request(
        &self,
        entity_type: EntityType,
        request: &EntityRequest,
        context: &AutomationContext,
    ) -> Result<SerialisedEntity, ResolutionError> {
        let resolver = self.resolver_for(entity_type.tag())?;
        resolver.resolve(request, context).await
    }
}
