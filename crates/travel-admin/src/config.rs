//! # Configuration
//!
//! `AdminConfig` is read from a TOML file. The path comes from the caller, then from the
//! `TRAVEL_ADMIN_CONFIG` environment variable, then `travel-admin.toml` in the working
//! directory. A missing default file means "use the defaults"; a missing explicit file is
//! an error.
//!
//! ```toml
//! [api]
//! base_url = "https://api.example-travel.com/admin"
//! auth_token = "..."
//! connect_timeout_ms = 3000
//! request_timeout_ms = 15000
//!
//! [store]
//! buffer_size = 32
//!
//! [ui]
//! cooldown_ms = 500
//! notification_ttl_ms = 3000
//! success_ttl_ms = 2000
//! error_ttl_ms = 5000
//!
//! [session]
//! acting_user_id = 1
//!
//! [uploads]
//! staging_dir = "/var/tmp/travel-admin/uploads"
//!
//! [uploads.images]
//! kind = "Image"
//! allowed_types = ["image/jpg", "image/jpeg", "image/png"]
//! max_bytes = 5242880
//! ```

use resource_framework::UploadPolicy;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub(crate) const CONFIG_ENV_VAR: &str = "TRAVEL_ADMIN_CONFIG";
const DEFAULT_CONFIG_NAME: &str = "travel-admin.toml";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub ui: UiConfig,
    pub session: SessionConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            auth_token: None,
            connect_timeout_ms: 3_000,
            request_timeout_ms: 15_000,
        }
    }
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Request channel capacity per store.
    pub buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub cooldown_ms: u64,
    pub notification_ttl_ms: u64,
    /// How long a "saved" message stays up on screens that override it.
    pub success_ttl_ms: u64,
    pub error_ttl_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 500,
            notification_ttl_ms: 3_000,
            success_ttl_ms: 2_000,
            error_ttl_ms: 5_000,
        }
    }
}

impl UiConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn success_ttl(&self) -> Duration {
        Duration::from_millis(self.success_ttl_ms)
    }

    pub fn error_ttl(&self) -> Duration {
        Duration::from_millis(self.error_ttl_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// The signed-in admin's user id. Guards the user screen against self-deletion.
    pub acting_user_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    pub staging_dir: PathBuf,
    pub images: UploadPolicy,
    pub videos: UploadPolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            staging_dir: env::temp_dir().join("travel-admin").join("uploads"),
            images: UploadPolicy::images(),
            videos: UploadPolicy::videos(),
        }
    }
}

impl AdminConfig {
    /// Loads configuration using the resolution rules above.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path);
        if !explicit && !resolved.exists() {
            tracing::info!(path = %resolved.display(), "No config file, using defaults");
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let content =
            fs::read_to_string(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %resolved.display(), base_url = %config.api.base_url, "Config loaded");
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(
                "api.base_url must be an http(s) URL".to_string(),
            ));
        }
        if self.api.request_timeout_ms == 0 || self.api.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "api timeouts must be greater than zero".to_string(),
            ));
        }
        if self.store.buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "store.buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.ui.notification_ttl_ms == 0 {
            return Err(ConfigError::Invalid(
                "ui.notification_ttl_ms must be greater than zero".to_string(),
            ));
        }
        for (name, policy) in [("images", &self.uploads.images), ("videos", &self.uploads.videos)] {
            if policy.allowed_types.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "uploads.{name}.allowed_types must not be empty"
                )));
            }
            if policy.max_bytes == 0 {
                return Err(ConfigError::Invalid(format!(
                    "uploads.{name}.max_bytes must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

/// Returns the path to read and whether it was asked for explicitly.
fn resolve_path(path: Option<&Path>) -> (PathBuf, bool) {
    if let Some(path) = path {
        return (path.to_path_buf(), true);
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        return (PathBuf::from(env_path), true);
    }
    (PathBuf::from(DEFAULT_CONFIG_NAME), false)
}
