//! Client configuration with validation and versioning.

use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration version for migration support.
/// Increment when adding new fields or changing structure.
pub const CONFIG_VERSION: u32 = 1;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIER_TIMEOUT_SECS: u64 = 5;
const DEFAULT_DEGRADED_RETRY_DELAY_SECS: u64 = 2;
const DEFAULT_STALE_BANNER_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_RETENTION: u32 = 7;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration invalid: {message} {location}")]
    Invalid {
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Config file format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Remote endpoint settings
    #[serde(default)]
    pub endpoints: EndpointSettings,

    /// Resolution timing settings
    #[serde(default)]
    pub resilience: ResilienceSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    /// Service URL the identity tiers are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceSettings {
    /// Deadline for each remote tier (seconds)
    #[serde(default = "default_tier_timeout")]
    pub tier_timeout_secs: u64,

    /// Delay before the degraded dashboard's dependent refresh (seconds)
    #[serde(default = "default_degraded_retry_delay")]
    pub degraded_retry_delay_secs: u64,

    /// How long the stale-data banner stays visible (seconds)
    #[serde(default = "default_stale_banner")]
    pub stale_banner_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory (relative to data directory)
    #[serde(default = "default_log_dir")]
    pub directory: String,

    /// Number of rotated log files to keep
    #[serde(default = "default_log_retention")]
    pub retention_count: u32,
}

// === Default Value Functions ===

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_tier_timeout() -> u64 {
    DEFAULT_TIER_TIMEOUT_SECS
}
fn default_degraded_retry_delay() -> u64 {
    DEFAULT_DEGRADED_RETRY_DELAY_SECS
}
fn default_stale_banner() -> u64 {
    DEFAULT_STALE_BANNER_SECS
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.into()
}
fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.into()
}
fn default_log_retention() -> u32 {
    DEFAULT_LOG_RETENTION
}

// === Default Implementations ===

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            endpoints: EndpointSettings::default(),
            resilience: ResilienceSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for ResilienceSettings {
    fn default() -> Self {
        Self {
            tier_timeout_secs: default_tier_timeout(),
            degraded_retry_delay_secs: default_degraded_retry_delay(),
            stale_banner_secs: default_stale_banner(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_dir(),
            retention_count: default_log_retention(),
        }
    }
}

// === Configuration Operations ===

impl ClientConfig {
    /// Load config from file, creating default if not exists.
    pub fn load_or_create(data_dir: &Path) -> ConfigResult<Self> {
        let config_path = data_dir.join("config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let mut config: Self =
                toml::from_str(&content).map_err(|e| ConfigError::invalid(e.to_string()))?;

            // Migrate if needed
            if config.version < CONFIG_VERSION {
                config = Self::migrate(config)?;
                config.save(data_dir)?;
            }

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(data_dir)?;
            Ok(config)
        }
    }

    /// Save config to file atomically.
    ///
    /// Uses write-to-temp-then-rename pattern to prevent
    /// partial writes if the process is interrupted.
    pub fn save(&self, data_dir: &Path) -> ConfigResult<()> {
        let config_path = data_dir.join("config.toml");
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::invalid(e.to_string()))?;

        let temp_path = config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &config_path)?;

        Ok(())
    }

    /// Migrate config from older version.
    fn migrate(mut config: Self) -> ConfigResult<Self> {
        // Version 0 -> 1: Add resilience settings
        if config.version == 0 {
            config.resilience = ResilienceSettings::default();
            config.version = 1;
        }

        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> ConfigResult<()> {
        let base_url = &self.endpoints.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::invalid(format!(
                "Base URL must be http(s), got {base_url}"
            )));
        }

        if self.resilience.tier_timeout_secs == 0 {
            return Err(ConfigError::invalid("Tier timeout must be > 0"));
        }

        if self.resilience.stale_banner_secs == 0 {
            return Err(ConfigError::invalid("Stale banner duration must be > 0"));
        }

        Ok(())
    }

    pub fn tier_timeout(&self) -> Duration {
        Duration::from_secs(self.resilience.tier_timeout_secs)
    }

    pub fn degraded_retry_delay(&self) -> Duration {
        Duration::from_secs(self.resilience.degraded_retry_delay_secs)
    }

    pub fn stale_banner(&self) -> Duration {
        Duration::from_secs(self.resilience.stale_banner_secs)
    }
}
