use std::env;
use std::fmt;

use chrono::NaiveTime;
use uuid::Uuid;

use crate::automation::entities::{AutomationContext, DeploymentEnvironment};

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub automation: AutomationConfig,
    pub serialisation: SerialisationConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw_environment =
            env::var("APP_DEPLOYMENT_ENVIRONMENT").unwrap_or_else(|_| "production".to_string());
        let default_environment = DeploymentEnvironment::parse(&raw_environment)
            .ok_or(ConfigError::InvalidEnvironment {
                value: raw_environment,
            })?;

        let tenant_id = match env::var("APP_TENANT_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Uuid::parse_str(raw.trim())
                    .map_err(|source| ConfigError::InvalidTenantId { source })?,
            ),
            _ => None,
        };

        let base_api_url =
            env::var("APP_BASE_API_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

        let raw_time = env::var("APP_POLICY_TIME_OF_DAY").unwrap_or_else(|_| "16:00".to_string());
        let policy_time_of_day = parse_time_of_day(&raw_time)
            .ok_or(ConfigError::InvalidTimeOfDay { value: raw_time })?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            automation: AutomationConfig {
                default_environment,
                tenant_id,
            },
            serialisation: SerialisationConfig {
                base_api_url,
                policy_time_of_day,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Ambient automation settings used when a request does not override them.
#[derive(Debug, Clone)]
pub struct AutomationConfig {
    pub default_environment: DeploymentEnvironment,
    pub tenant_id: Option<Uuid>,
}

impl AutomationConfig {
    /// Build the ambient context, preferring explicit overrides.
    pub fn context(
        &self,
        tenant_id: Option<Uuid>,
        environment: Option<DeploymentEnvironment>,
    ) -> Result<AutomationContext, ConfigError> {
        let tenant_id = tenant_id
            .or(self.tenant_id)
            .ok_or(ConfigError::MissingTenantId)?;
        Ok(AutomationContext::new(
            tenant_id,
            environment.unwrap_or(self.default_environment),
        ))
    }
}

/// Link and date formatting settings for serialised entities.
#[derive(Debug, Clone)]
pub struct SerialisationConfig {
    pub base_api_url: String,
    pub policy_time_of_day: NaiveTime,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment { value: String },
    InvalidTenantId { source: uuid::Error },
    InvalidTimeOfDay { value: String },
    MissingTenantId,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEnvironment { value } => write!(
                f,
                "APP_DEPLOYMENT_ENVIRONMENT must be Development, Staging or Production (got '{}')",
                value
            ),
            ConfigError::InvalidTenantId { .. } => write!(f, "APP_TENANT_ID must be a UUID"),
            ConfigError::InvalidTimeOfDay { value } => {
                write!(f, "APP_POLICY_TIME_OF_DAY must be HH:MM (got '{}')", value)
            }
            ConfigError::MissingTenantId => {
                write!(f, "a tenant id is required (set APP_TENANT_ID or pass --tenant)")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidTenantId { source } => Some(source),
            ConfigError::InvalidEnvironment { .. }
            | ConfigError::InvalidTimeOfDay { .. }
            | ConfigError::MissingTenantId => None,
        }
    }
}
