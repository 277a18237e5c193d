use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use super::catalog::{EntityType, LocatorKey, VERSION_NUMBER_PARAMETER};
use super::domain::{AutomationContext, DeploymentEnvironment};
use super::error::ResolutionError;
use super::locator::{EntityLocator, LocatorKind};
use super::projection::{RelatedEntityRequest, INCLUDE_OPTIONAL_PROPERTIES};
use super::repository::{AliasResolver, EntityQuery, EntityRepository};
use super::serialisation::{SerialisedEntity, SerialisedEntityFactory};

pub const ENVIRONMENT_PARAMETER: &str = "environment";

/// Locator plus the optional overrides an automation step can supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRequest {
    pub locator: EntityLocator,
    /// Overrides the ambient environment for environment-scoped types.
    pub environment: Option<DeploymentEnvironment>,
    pub include_optional_properties: Vec<String>,
}

impl EntityRequest {
    pub fn new(locator: EntityLocator) -> Self {
        Self {
            locator,
            environment: None,
            include_optional_properties: Vec::new(),
        }
    }

    pub fn in_environment(mut self, environment: DeploymentEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn including<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_optional_properties
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Build a request from the parameters of a `<type>Entity` provider block.
    ///
    /// Exactly one locator must be present. Versioned types accept their own id,
    /// or a key of the parent entity together with `versionNumber`. Parameters the
    /// entity type does not understand are rejected. `null` values count as absent.
    pub fn from_parameters(
        entity_type: EntityType,
        parameters: &Map<String, Value>,
    ) -> Result<Self, ResolutionError> {
        let parent = entity_type.versioned_parent();
        let mut own: Vec<(&'static LocatorKey, &Value)> = Vec::new();
        let mut parent_keys: Vec<(&'static LocatorKey, &Value)> = Vec::new();
        let mut version_number = None;
        let mut environment = None;
        let mut include_optional_properties = Vec::new();

        for (name, value) in parameters {
            if value.is_null() {
                continue;
            }
            if let Some(key) = find_key(entity_type, name) {
                own.push((key, value));
            } else if let Some(key) = parent.and_then(|parent| find_key(parent, name)) {
                parent_keys.push((key, value));
            } else if parent.is_some() && name.eq_ignore_ascii_case(VERSION_NUMBER_PARAMETER) {
                version_number = Some(parse_version_number(value)?);
            } else if name.eq_ignore_ascii_case(ENVIRONMENT_PARAMETER) {
                environment = Some(parse_environment(value)?);
            } else if name.eq_ignore_ascii_case(INCLUDE_OPTIONAL_PROPERTIES) {
                include_optional_properties = string_list(INCLUDE_OPTIONAL_PROPERTIES, value)?;
            } else {
                return Err(ResolutionError::invalid(
                    name.clone(),
                    format!("not recognised by the {} entity provider", entity_type.name()),
                ));
            }
        }

        let supplied: Vec<&'static str> = own
            .iter()
            .chain(parent_keys.iter())
            .map(|(key, _)| key.parameter)
            .collect();
        if supplied.len() > 1 {
            return Err(ResolutionError::AmbiguousLocator {
                entity_type,
                supplied,
            });
        }

        let locator = match (own.first(), parent_keys.first()) {
            (Some((key, value)), None) => {
                if version_number.is_some() {
                    return Err(ResolutionError::invalid(
                        VERSION_NUMBER_PARAMETER,
                        format!("only applies when locating by a key of the parent entity, not {}", key.parameter),
                    ));
                }
                locator_from(key, value)?
            }
            (None, Some((key, value))) => {
                let version_number =
                    version_number.ok_or_else(|| ResolutionError::ParameterMissing {
                        entity_type,
                        expected: vec![VERSION_NUMBER_PARAMETER],
                    })?;
                EntityLocator::composite(locator_from(key, value)?, version_number)
            }
            _ => {
                return Err(ResolutionError::ParameterMissing {
                    entity_type,
                    expected: expected_parameters(entity_type),
                })
            }
        };

        Ok(Self {
            locator,
            environment,
            include_optional_properties,
        })
    }
}

fn find_key(entity_type: EntityType, name: &str) -> Option<&'static LocatorKey> {
    entity_type
        .locator_keys()
        .iter()
        .find(|key| key.parameter.eq_ignore_ascii_case(name))
}

fn expected_parameters(entity_type: EntityType) -> Vec<&'static str> {
    let mut expected: Vec<&'static str> = entity_type
        .locator_keys()
        .iter()
        .map(|key| key.parameter)
        .collect();
    if let Some(parent) = entity_type.versioned_parent() {
        expected.extend(parent.locator_keys().iter().map(|key| key.parameter));
        expected.push(VERSION_NUMBER_PARAMETER);
    }
    expected
}

fn locator_from(key: &LocatorKey, value: &Value) -> Result<EntityLocator, ResolutionError> {
    let raw = value
        .as_str()
        .map(str::trim)
        .ok_or_else(|| ResolutionError::invalid(key.parameter, "expected a string value"))?;
    if raw.is_empty() {
        return Err(ResolutionError::invalid(key.parameter, "must not be blank"));
    }

    let locator = match key.kind {
        LocatorKind::Id => EntityLocator::ById(parse_uuid(key.parameter, raw)?),
        LocatorKind::Alias => EntityLocator::ByAlias(raw.to_string()),
        LocatorKind::Reference => EntityLocator::ByReference(raw.to_string()),
        LocatorKind::Number => EntityLocator::ByNumber(raw.to_string()),
        LocatorKind::Email => EntityLocator::ByEmail(raw.to_string()),
    };
    Ok(locator)
}

pub(crate) fn parse_uuid(parameter: &str, raw: &str) -> Result<Uuid, ResolutionError> {
    Uuid::parse_str(raw.trim())
        .map_err(|err| ResolutionError::invalid(parameter, format!("'{raw}' is not a valid id ({err})")))
}

fn parse_version_number(value: &Value) -> Result<u32, ResolutionError> {
    let parsed = match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(raw) => raw.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ResolutionError::invalid(
            VERSION_NUMBER_PARAMETER,
            format!("expected a non-negative integer, got {value}"),
        )
    })
}

fn parse_environment(value: &Value) -> Result<DeploymentEnvironment, ResolutionError> {
    value
        .as_str()
        .and_then(DeploymentEnvironment::parse)
        .ok_or_else(|| {
            ResolutionError::invalid(
                ENVIRONMENT_PARAMETER,
                format!("expected Development, Staging or Production, got {value}"),
            )
        })
}

/// Accepts either a single string or an array of strings.
pub(crate) fn string_list(parameter: &str, value: &Value) -> Result<Vec<String>, ResolutionError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(single) => Ok(vec![single.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ResolutionError::invalid(parameter, format!("expected strings, got {item}"))
                })
            })
            .collect(),
        other => Err(ResolutionError::invalid(
            parameter,
            format!("expected a list of property paths, got {other}"),
        )),
    }
}

/// Resolves one entity type from a request and the ambient automation context.
#[async_trait]
pub trait ResolveEntity: Send + Sync {
    fn entity_type(&self) -> EntityType;

    async fn resolve(
        &self,
        request: &EntityRequest,
        context: &AutomationContext,
    ) -> Result<SerialisedEntity, ResolutionError>;
}

/// Catalog-driven resolver; one instance per entity type.
pub struct EntityLocatorResolver {
    entity_type: EntityType,
    repository: Arc<dyn EntityRepository>,
    aliases: Arc<dyn AliasResolver>,
    factory: Arc<SerialisedEntityFactory>,
}

impl EntityLocatorResolver {
    pub fn new(
        entity_type: EntityType,
        repository: Arc<dyn EntityRepository>,
        aliases: Arc<dyn AliasResolver>,
        factory: Arc<SerialisedEntityFactory>,
    ) -> Self {
        Self {
            entity_type,
            repository,
            aliases,
            factory,
        }
    }

    /// Explicit request environment, then the ambient one. Agnostic types get none.
    fn effective_environment(
        &self,
        request: &EntityRequest,
        context: &AutomationContext,
    ) -> Option<DeploymentEnvironment> {
        if self.entity_type.is_environment_scoped() {
            Some(request.environment.unwrap_or(context.environment))
        } else {
            None
        }
    }

    fn not_found(
        &self,
        locator: &EntityLocator,
        environment: Option<DeploymentEnvironment>,
    ) -> ResolutionError {
        let mut details = vec![format!("Entity Type: {}", self.entity_type.name())];
        details.extend(locator.describe(self.entity_type));
        if let Some(environment) = environment {
            details.push(format!("Environment: {environment}"));
        }
        warn!(
            entity_type = %self.entity_type,
            key = %locator.value(),
            "entity reference could not be resolved"
        );
        ResolutionError::not_found(self.entity_type, details)
    }
}

#[async_trait]
impl ResolveEntity for EntityLocatorResolver {
    fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    async fn resolve(
        &self,
        request: &EntityRequest,
        context: &AutomationContext,
    ) -> Result<SerialisedEntity, ResolutionError> {
        let entity_type = self.entity_type;
        if !request.locator.is_supported_by(entity_type) {
            return Err(ResolutionError::UnsupportedLocator {
                entity_type,
                kind: request.locator.kind(),
            });
        }

        let related = RelatedEntityRequest::parse(entity_type, &request.include_optional_properties)?;
        let environment = self.effective_environment(request, context);

        let locator = match &request.locator {
            EntityLocator::ByAlias(alias) => {
                let id = self
                    .aliases
                    .resolve_alias(context.tenant_id, entity_type, alias)
                    .await?;
                match id {
                    Some(id) => EntityLocator::ById(id),
                    None => return Err(self.not_found(&request.locator, environment)),
                }
            }
            other => other.clone(),
        };

        debug!(
            entity_type = %entity_type,
            tenant_id = %context.tenant_id,
            environment = ?environment,
            related = ?related.paths(),
            "loading entity with related entities"
        );

        let aggregate = self
            .repository
            .get_with_related_entities(EntityQuery {
                entity_type,
                tenant_id: context.tenant_id,
                environment,
                locator: &locator,
                related: related.tree(),
            })
            .await?
            .ok_or_else(|| self.not_found(&request.locator, environment))?;

        let projected = related.project(aggregate)?;
        Ok(self.factory.build(&projected)?)
    }
}
