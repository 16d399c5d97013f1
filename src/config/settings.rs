//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from configuration files and environment variables.

use serde::{Deserialize, Serialize};
use crate::models::{EventStatusFilter, EventType, FilterCriteria, Role, Session};
use crate::utils::errors::{EventZenError, Result};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Which registration endpoint the controller talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationContract {
    /// `POST /events/:id/register`
    EventScoped,
    /// `POST /registrations`
    Legacy,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub registration_contract: RegistrationContract,
}

/// Stored session, if the caller keeps one in configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    pub token: Option<String>,
    pub visitor_id: Option<i64>,
    pub role: Option<Role>,
}

/// Default filter criteria used by the command-line browser
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub search_text: String,
    pub category: String,
    pub location: String,
    pub organizer: String,
    pub event_type: Option<String>,
    pub status: Option<String>,
}

/// Format of the rolling log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub file_prefix: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    /// Re-fetch the catalog after a successful registration or cancellation
    pub reconcile_after_mutation: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> std::result::Result<Self, config::ConfigError> {
        Self::from_file("eventzen")
    }

    /// Load settings layered as defaults, then `path` (if present), then `EVENTZEN__*` variables
    pub fn from_file(path: &str) -> std::result::Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("EVENTZEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        super::validation::validate_settings(self)
    }

    /// Session built from the configured token, if any
    pub fn session(&self) -> Session {
        Session {
            token: self.session.token.clone(),
            visitor_id: self.session.visitor_id,
            role: self.session.role,
        }
    }

    /// Filter criteria built from the `filter` section
    pub fn filter_criteria(&self) -> Result<FilterCriteria> {
        let event_type = match self.filter.event_type.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(raw.parse::<EventType>()?),
            _ => None,
        };
        let status = match self.filter.status.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(raw.parse::<EventStatusFilter>()?),
            _ => None,
        };

        Ok(FilterCriteria {
            search_text: self.filter.search_text.clone(),
            category: self.filter.category.clone(),
            location: self.filter.location.clone(),
            organizer: self.filter.organizer.clone(),
            event_type,
            status,
        })
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api.timeout_seconds)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
                timeout_seconds: 10,
                user_agent: format!("EventZen-Client/{}", env!("CARGO_PKG_VERSION")),
                registration_contract: RegistrationContract::EventScoped,
            },
            session: SessionConfig::default(),
            filter: FilterConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
                file_prefix: "eventzen.log".to_string(),
                format: LogFormat::Text,
            },
            features: FeaturesConfig {
                reconcile_after_mutation: true,
            },
        }
    }
}

impl From<config::ConfigError> for EventZenError {
    fn from(error: config::ConfigError) -> Self {
        EventZenError::Config(error.to_string())
    }
}
