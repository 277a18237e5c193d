use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::{EntityType, VERSION_NUMBER_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocatorKind {
    Id,
    Alias,
    Reference,
    Number,
    Email,
}

impl LocatorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Alias => "alias",
            Self::Reference => "reference",
            Self::Number => "number",
            Self::Email => "account email",
        }
    }
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Caller supplied key identifying a single entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityLocator {
    ById(Uuid),
    ByAlias(String),
    ByReference(String),
    ByNumber(String),
    ByEmail(String),
    /// Locator of a parent entity combined with a version number.
    Composite {
        primary: Box<EntityLocator>,
        version_number: u32,
    },
}

impl EntityLocator {
    pub fn composite(primary: EntityLocator, version_number: u32) -> Self {
        Self::Composite {
            primary: Box::new(primary),
            version_number,
        }
    }

    /// Kind of the innermost key; `None` for composite locators.
    pub fn kind(&self) -> Option<LocatorKind> {
        match self {
            Self::ById(_) => Some(LocatorKind::Id),
            Self::ByAlias(_) => Some(LocatorKind::Alias),
            Self::ByReference(_) => Some(LocatorKind::Reference),
            Self::ByNumber(_) => Some(LocatorKind::Number),
            Self::ByEmail(_) => Some(LocatorKind::Email),
            Self::Composite { .. } => None,
        }
    }

    /// The key value as it was supplied, for diagnostics.
    pub fn value(&self) -> String {
        match self {
            Self::ById(id) => id.to_string(),
            Self::ByAlias(value)
            | Self::ByReference(value)
            | Self::ByNumber(value)
            | Self::ByEmail(value) => value.clone(),
            Self::Composite { primary, .. } => primary.value(),
        }
    }

    /// Whether `entity_type` can be found with this locator.
    pub fn is_supported_by(&self, entity_type: EntityType) -> bool {
        match self {
            Self::Composite { primary, .. } => match entity_type.versioned_parent() {
                Some(parent) => !matches!(**primary, Self::Composite { .. })
                    && primary.is_supported_by(parent),
                None => false,
            },
            other => other
                .kind()
                .and_then(|kind| entity_type.locator_key(kind))
                .is_some(),
        }
    }

    /// `Key Label: value` lines naming the exact key used for a lookup.
    pub fn describe(&self, entity_type: EntityType) -> Vec<String> {
        match self {
            Self::Composite {
                primary,
                version_number,
            } => {
                let parent = entity_type.versioned_parent().unwrap_or(entity_type);
                let mut lines = primary.describe(parent);
                lines.push(format!("{VERSION_NUMBER_LABEL}: {version_number}"));
                lines
            }
            other => {
                let label = other
                    .kind()
                    .and_then(|kind| entity_type.locator_key(kind))
                    .map(|key| key.label.to_string())
                    .unwrap_or_else(|| format!("{} Key", entity_type.name()));
                vec![format!("{label}: {}", other.value())]
            }
        }
    }
}
