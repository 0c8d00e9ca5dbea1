//! Tap configuration
//!
//! The configuration is a flat JSON object supplied once at process start.
//! Credentials, the default watermark and the entity list live here and are
//! passed by reference into every component that needs them.

use crate::bookmark::normalize_timestamp;
use crate::entities::DEFAULT_ENTITIES;
use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Airship API host used when no override is configured
pub const DEFAULT_API_BASE_URL: &str = "https://go.urbanairship.com/api/";

/// Complete tap configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TapConfig {
    /// Application key, used as the Basic auth username
    #[serde(default)]
    pub app_key: String,

    /// Application master secret, used as the Basic auth password
    #[serde(default)]
    pub app_secret: String,

    /// Default watermark for entities that were never synced
    #[serde(default)]
    pub start_date: String,

    /// Entities to sync, in order
    #[serde(default = "default_entities")]
    pub entities: Vec<String>,

    /// Optional User-Agent header override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Base URL of the API (defaults to the Airship host)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Optional client-side request rate limit
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_entities() -> Vec<String> {
    DEFAULT_ENTITIES.iter().map(ToString::to_string).collect()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl TapConfig {
    /// Create a config with the required fields set and defaults elsewhere
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        start_date: impl Into<String>,
    ) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            start_date: start_date.into(),
            entities: default_entities(),
            user_agent: None,
            api_base_url: default_api_base_url(),
            requests_per_second: None,
            request_timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Set the entity list
    #[must_use]
    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = entities.into_iter().map(Into::into).collect();
        self
    }

    /// Set the API base URL
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the User-Agent override
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Parse and validate a config from a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::config("config must be a JSON object"));
        }
        let mut config: Self = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&contents)
    }

    /// Validate required fields and normalize values
    ///
    /// `start_date` is rewritten to the watermark format. Row timestamps are
    /// compared against it as instants, so the rewrite does not move the
    /// threshold.
    pub fn validate(&mut self) -> Result<()> {
        if self.app_key.trim().is_empty() {
            return Err(Error::missing_field("app_key"));
        }
        if self.app_secret.trim().is_empty() {
            return Err(Error::missing_field("app_secret"));
        }
        if self.start_date.trim().is_empty() {
            return Err(Error::missing_field("start_date"));
        }
        self.start_date = normalize_timestamp(&self.start_date)
            .ok_or_else(|| Error::invalid_value("start_date", "expected an ISO-8601 date"))?;

        if self.entities.is_empty() {
            return Err(Error::invalid_value("entities", "at least one entity is required"));
        }

        if !self.api_base_url.ends_with('/') {
            self.api_base_url.push('/');
        }
        url::Url::parse(&self.api_base_url)
            .map_err(|e| Error::invalid_value("api_base_url", e.to_string()))?;

        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be greater than zero",
            ));
        }

        self.user_agent = self.user_agent.take().none_if_empty();
        Ok(())
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .field("start_date", &self.start_date)
            .field("entities", &self.entities)
            .field("user_agent", &self.user_agent)
            .field("api_base_url", &self.api_base_url)
            .field("requests_per_second", &self.requests_per_second)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}
