//! Entity reference resolution for automation providers.
//!
//! A provider block names an entity type and a locator. The dispatcher routes it
//! to the resolver for that type, which loads the record and the requested
//! related entities from the repository, projects the graph and serialises it.

pub mod catalog;
mod dispatcher;
pub mod domain;
pub mod error;
pub mod locator;
mod memory;
pub mod projection;
mod provider;
pub mod repository;
mod resolver;
pub mod serialisation;

#[cfg(test)]
mod tests;

pub use catalog::{Cardinality, EntityType, Join, LocatorKey, Relation};
pub use dispatcher::{DynamicEntityDispatcher, DynamicEntityDispatcherBuilder};
pub use domain::{AutomationContext, DeploymentEnvironment, EntityRecord};
pub use error::{ErrorData, ResolutionError};
pub use locator::{EntityLocator, LocatorKind};
pub use memory::{EntitySnapshot, InMemoryEntityStore};
pub use projection::{RelatedEntityRequest, RelationTree};
pub use provider::{EntityProvider, EntityProviderConfig};
pub use repository::{
    AliasResolver, EntityAggregate, EntityQuery, EntityRepository, Related, RepositoryError,
};
pub use resolver::{EntityLocatorResolver, EntityRequest, ResolveEntity};
pub use serialisation::{
    FormDataPrettifier, LabelledFormDataPrettifier, PermissionCatalog, SerialisationError,
    SerialisationSettings, SerialisedEntity, SerialisedEntityFactory,
};
