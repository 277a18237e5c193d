//! Entity providers as they appear in automation configuration.
//!
//! ```json
//! { "claimEntity": { "claimReference": "NKHSA", "environment": "Development" } }
//! { "dynamicEntity": { "entityType": "quote", "entityId": "6f1c2d3e-0000-4000-8000-000000000001", "includeOptionalProperties": ["/customer"] } }
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use super::catalog::EntityType;
use super::domain::AutomationContext;
use super::error::ResolutionError;
use super::dispatcher::DynamicEntityDispatcher;
use super::projection::INCLUDE_OPTIONAL_PROPERTIES;
use super::resolver::{parse_uuid, string_list, EntityRequest};
use super::serialisation::SerialisedEntity;

const PROVIDER_SUFFIX: &str = "Entity";
const DYNAMIC_PROVIDER: &str = "dynamicEntity";
const ENTITY_TYPE_PARAMETER: &str = "entityType";
const ENTITY_ID_PARAMETER: &str = "entityId";

/// Parsed entity provider block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityProviderConfig {
    Typed {
        entity_type: EntityType,
        request: EntityRequest,
    },
    Dynamic {
        entity_type: String,
        entity_id: Uuid,
        include_optional_properties: Vec<String>,
    },
}

impl EntityProviderConfig {
    pub fn from_json(value: &Value) -> Result<Self, ResolutionError> {
        let object = value
            .as_object()
            .ok_or_else(|| ResolutionError::invalid("provider", "expected a JSON object"))?;
        let mut entries = object.iter();
        let (name, body) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(ResolutionError::invalid(
                    "provider",
                    "expected exactly one entity provider",
                ))
            }
        };
        let parameters = body.as_object().ok_or_else(|| {
            ResolutionError::invalid(name.clone(), "provider parameters must be an object")
        })?;

        if name.eq_ignore_ascii_case(DYNAMIC_PROVIDER) {
            return dynamic_from_parameters(parameters);
        }

        let tag = name
            .strip_suffix(PROVIDER_SUFFIX)
            .ok_or_else(|| ResolutionError::UnsupportedEntityType { tag: name.clone() })?;
        let entity_type = EntityType::from_tag(tag)
            .ok_or_else(|| ResolutionError::UnsupportedEntityType { tag: tag.to_string() })?;

        Ok(Self::Typed {
            entity_type,
            request: EntityRequest::from_parameters(entity_type, parameters)?,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, ResolutionError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|err| ResolutionError::invalid("provider", err.to_string()))?;
        Self::from_json(&value)
    }
}

fn dynamic_from_parameters(parameters: &Map<String, Value>) -> Result<EntityProviderConfig, ResolutionError> {
    let mut entity_type = None;
    let mut entity_id = None;
    let mut include_optional_properties = Vec::new();

    for (name, value) in parameters {
        if name.eq_ignore_ascii_case(ENTITY_TYPE_PARAMETER) {
            let raw = value.as_str().ok_or_else(|| {
                ResolutionError::invalid(ENTITY_TYPE_PARAMETER, "expected a string value")
            })?;
            entity_type = Some(raw.trim().to_string());
        } else if name.eq_ignore_ascii_case(ENTITY_ID_PARAMETER) {
            let raw = value.as_str().ok_or_else(|| {
                ResolutionError::invalid(ENTITY_ID_PARAMETER, "expected a string value")
            })?;
            entity_id = Some(parse_uuid(ENTITY_ID_PARAMETER, raw)?);
        } else if name.eq_ignore_ascii_case(INCLUDE_OPTIONAL_PROPERTIES) {
            include_optional_properties = string_list(INCLUDE_OPTIONAL_PROPERTIES, value)?;
        } else {
            return Err(ResolutionError::invalid(
                name.clone(),
                "not recognised by the dynamic entity provider",
            ));
        }
    }

    let entity_type = entity_type
        .filter(|tag| !tag.is_empty())
        .ok_or_else(|| ResolutionError::invalid(ENTITY_TYPE_PARAMETER, "is required"))?;
    let entity_id =
        entity_id.ok_or_else(|| ResolutionError::invalid(ENTITY_ID_PARAMETER, "is required"))?;

    Ok(EntityProviderConfig::Dynamic {
        entity_type,
        entity_id,
        include_optional_properties,
    })
}

/// Facade used by automation steps to turn provider configuration into an entity.
#[derive(Clone)]
pub struct EntityProvider {
    dispatcher: Arc<DynamicEntityDispatcher>,
}

impl EntityProvider {
    pub fn new(dispatcher: Arc<DynamicEntityDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn resolve(
        &self,
        config: &EntityProviderConfig,
        context: &AutomationContext,
    ) -> Result<SerialisedEntity, ResolutionError> {
        let entity = match config {
            EntityProviderConfig::Typed {
                entity_type,
                request,
            } => {
                self.dispatcher
                    .resolve_request(*entity_type, request, context)
                    .await?
            }
            EntityProviderConfig::Dynamic {
                entity_type,
                entity_id,
                include_optional_properties,
            } => {
                self.dispatcher
                    .resolve(entity_type, *entity_id, include_optional_properties, context)
                    .await?
            }
        };
        info!(
            entity_type = %entity.entity_type(),
            entity_id = entity.id(),
            "entity provider resolved"
        );
        Ok(entity)
    }
}
