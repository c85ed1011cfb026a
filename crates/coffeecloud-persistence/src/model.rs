//! Domain model types for the persistence abstraction layer
//!
//! Optional configuration fields are resolved to defaults and validated once, when
//! a configuration is loaded or submitted, so the sync cycle only ever sees a
//! complete `Configuration`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_REFRESH_INTERVAL_SECS: u32 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 120;

/// One rule of an asset filter: a regex applied to a named attribute
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub parameter: String,
    pub regex: String,
}

impl FilterRule {
    pub fn new(parameter: &str, regex: &str) -> Self {
        Self {
            parameter: parameter.to_string(),
            regex: regex.to_string(),
        }
    }
}

/// Disjunction of AND-groups of filter rules
pub type FilterExpression = Vec<Vec<FilterRule>>;

/// Validated tenant configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: i64,
    pub url: String,
    pub username: String,
    pub password: String,
    pub api_key: String,
    pub enable: bool,
    /// Seconds to sleep after each cycle
    pub refresh_interval: u32,
    /// Seconds each source request may take
    pub request_timeout: u32,
    pub asset_filter: FilterExpression,
    pub active: bool,
    #[serde(rename = "projectIDs")]
    pub project_ids: Vec<String>,
}

impl Configuration {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.refresh_interval))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout))
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("enable", &self.enable)
            .field("refresh_interval", &self.refresh_interval)
            .field("request_timeout", &self.request_timeout)
            .field("asset_filter", &self.asset_filter)
            .field("active", &self.active)
            .field("project_ids", &self.project_ids)
            .finish_non_exhaustive()
    }
}

/// Errors raised while validating a configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("configuration field '{0}' is required")]
    MissingField(&'static str),

    #[error("configuration field '{field}' must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("configuration field '{field}' is out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

/// Configuration as submitted through the API or read from storage, before
/// defaults and validation are applied
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDraft {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub enable: Option<bool>,
    #[serde(default)]
    pub refresh_interval: Option<i64>,
    #[serde(default)]
    pub request_timeout: Option<i64>,
    #[serde(default)]
    pub asset_filter: Option<FilterExpression>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default, rename = "projectIDs")]
    pub project_ids: Option<Vec<String>>,
}

fn positive_seconds(
    field: &'static str,
    value: Option<i64>,
    default: u32,
) -> Result<u32, ConfigurationError> {
    match value {
        None => Ok(default),
        Some(v) if v <= 0 => Err(ConfigurationError::NotPositive { field, value: v }),
        Some(v) => u32::try_from(v).map_err(|_| ConfigurationError::OutOfRange { field, value: v }),
    }
}

impl ConfigurationDraft {
    /// Apply defaults and validate into a `Configuration` with the given id
    pub fn validate(self, id: i64) -> Result<Configuration, ConfigurationError> {
        let url = self
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or(ConfigurationError::MissingField("url"))?;

        Ok(Configuration {
            id,
            url,
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            api_key: self.api_key.unwrap_or_default(),
            enable: self.enable.unwrap_or(true),
            refresh_interval: positive_seconds(
                "refreshInterval",
                self.refresh_interval,
                DEFAULT_REFRESH_INTERVAL_SECS,
            )?,
            request_timeout: positive_seconds(
                "requestTimeout",
                self.request_timeout,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            asset_filter: self.asset_filter.unwrap_or_default(),
            active: self.active.unwrap_or(false),
            project_ids: self.project_ids.unwrap_or_default(),
        })
    }
}

/// Persisted link between a source entity and its target platform asset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMapping {
    pub configuration_id: i64,
    pub project_id: String,
    pub global_asset_id: String,
    pub asset_id: i32,
}

/// Storage backend in use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageMode {
    ExternalDb,
    Memory,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::ExternalDb => write!(f, "external-db"),
            StorageMode::Memory => write!(f, "memory"),
        }
    }
}
