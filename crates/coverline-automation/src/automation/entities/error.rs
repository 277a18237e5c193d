use serde::Serialize;

use super::catalog::EntityType;
use super::locator::LocatorKind;
use super::repository::RepositoryError;
use super::serialisation::SerialisationError;

pub const ENTITY_NOT_FOUND_TITLE: &str = "Cannot resolve entity reference";

/// Structured error surfaced verbatim to operators and debugging tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    pub code: String,
    pub title: String,
    pub message: String,
    pub additional_details: Vec<String>,
}

impl ErrorData {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        additional_details: Vec<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            message: message.into(),
            additional_details,
        }
    }

    pub fn entity_not_found(entity_type: EntityType, additional_details: Vec<String>) -> Self {
        Self::new(
            "automation.providers.entity.not.found",
            ENTITY_NOT_FOUND_TITLE,
            format!(
                "When trying to resolve a {} entity, no matching record could be found using the supplied key.",
                entity_type.name()
            ),
            additional_details,
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("{}: {}", .0.title, .0.message)]
    EntityNotFound(ErrorData),
    #[error("entity type '{tag}' is not supported")]
    UnsupportedEntityType { tag: String },
    #[error("{entity_type} entity provider requires one of: {}", .expected.join(", "))]
    ParameterMissing {
        entity_type: EntityType,
        expected: Vec<&'static str>,
    },
    #[error("{entity_type} entity provider accepts a single locator but received: {}", .supplied.join(", "))]
    AmbiguousLocator {
        entity_type: EntityType,
        supplied: Vec<&'static str>,
    },
    #[error("parameter '{parameter}' is invalid: {reason}")]
    ParameterInvalid { parameter: String, reason: String },
    #[error("{entity_type} cannot be located by {}", .kind.map(LocatorKind::label).unwrap_or("composite key"))]
    UnsupportedLocator {
        entity_type: EntityType,
        kind: Option<LocatorKind>,
    },
    #[error("related entity '{path}' of {entity_type} could not be resolved")]
    RelatedEntityMissing {
        entity_type: EntityType,
        path: String,
    },
    #[error(transparent)]
    Serialisation(#[from] SerialisationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ResolutionError {
    pub fn not_found(entity_type: EntityType, additional_details: Vec<String>) -> Self {
        Self::EntityNotFound(ErrorData::entity_not_found(entity_type, additional_details))
    }

    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParameterInvalid {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// True when the failure points at a configuration or programming defect rather
    /// than a record missing from the store.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedEntityType { .. }
                | Self::ParameterMissing { .. }
                | Self::AmbiguousLocator { .. }
                | Self::ParameterInvalid { .. }
                | Self::UnsupportedLocator { .. }
                | Self::Serialisation(_)
        )
    }

    pub fn error_data(&self) -> ErrorData {
        match self {
            Self::EntityNotFound(data) => data.clone(),
            Self::UnsupportedEntityType { tag } => ErrorData::new(
                "automation.providers.entity.type.not.supported",
                "Unsupported entity type",
                self.to_string(),
                vec![format!("Entity Type: {tag}")],
            ),
            Self::ParameterMissing { entity_type, .. } => ErrorData::new(
                "automation.providers.parameter.missing",
                "Missing entity provider parameter",
                self.to_string(),
                vec![format!("Entity Type: {entity_type}")],
            ),
            Self::AmbiguousLocator { entity_type, .. } => ErrorData::new(
                "automation.providers.parameter.ambiguous",
                "Conflicting entity provider parameters",
                self.to_string(),
                vec![format!("Entity Type: {entity_type}")],
            ),
            Self::ParameterInvalid { parameter, .. } => ErrorData::new(
                "automation.providers.parameter.invalid",
                "Invalid entity provider parameter",
                self.to_string(),
                vec![format!("Parameter: {parameter}")],
            ),
            Self::UnsupportedLocator { entity_type, .. } => ErrorData::new(
                "automation.providers.locator.not.supported",
                "Unsupported entity locator",
                self.to_string(),
                vec![format!("Entity Type: {entity_type}")],
            ),
            Self::RelatedEntityMissing { entity_type, path } => ErrorData::new(
                "automation.providers.related.entity.not.found",
                ENTITY_NOT_FOUND_TITLE,
                self.to_string(),
                vec![
                    format!("Entity Type: {entity_type}"),
                    format!("Property Path: {path}"),
                ],
            ),
            Self::Serialisation(_) => ErrorData::new(
                "automation.providers.serialisation.failed",
                "Entity serialisation failed",
                self.to_string(),
                Vec::new(),
            ),
            Self::Repository(_) => ErrorData::new(
                "automation.providers.repository.unavailable",
                "Entity store unavailable",
                self.to_string(),
                Vec::new(),
            ),
        }
    }
}
