//! # Configuration
//!
//! Application configuration loading and management.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables (prefixed with `MARKET_`)
//!
//! The file path is read from `MARKET_CONFIG_FILE` and defaults to `market.toml`.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MARKET_LOG_LEVEL` | Log level | `info` |
//! | `MARKET_LOG_FORMAT` | Log format (json/pretty) | `json` |
//! | `MARKET_EVENT_CHANNEL_CAPACITY` | Buffered events before publishing fails | `1024` |
//! | `MARKET_EVENTS_ENABLED` | Publish events at all | `true` |
//! | `MARKET_LOCK_PRUNE_THRESHOLD` | Lock entries kept before idle ones are pruned | `1024` |
//! | `MARKET_SERVICE_NAME` | Service name for logs | `instrument-market` |
//! | `MARKET_ENVIRONMENT` | Deployment environment | `development` |
//!
//! # Examples
//!
//! ```ignore
//! use instrument_market::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! println!("event buffer: {}", config.events.channel_capacity);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const ENV_PREFIX: &str = "MARKET_";

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level or `EnvFilter` directive (e.g. `info`, `instrument_market=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

// ============================================================================
// Event Configuration
// ============================================================================

/// Event publishing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Capacity of the outbound event channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Publish events; when false every event is discarded.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            enabled: true,
        }
    }
}

// ============================================================================
// Lock Configuration
// ============================================================================

/// Scope lock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Number of lock entries kept before idle ones are pruned.
    #[serde(default = "default_prune_threshold")]
    pub prune_threshold: usize,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            prune_threshold: default_prune_threshold(),
        }
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Event publishing configuration.
    #[serde(default)]
    pub events: EventConfig,

    /// Scope lock configuration.
    #[serde(default)]
    pub locks: LockConfig,

    /// Service name for logs.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Environment (development, staging, production).
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            events: EventConfig::default(),
            locks: LockConfig::default(),
            service_name: default_service_name(),
            environment: default_environment(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if an environment override cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let config_path = std::env::var(format!("{ENV_PREFIX}CONFIG_FILE"))
            .unwrap_or_else(|_| "market.toml".to_string());
        if Path::new(&config_path).exists() {
            config = Self::from_file(&config_path)?;
        }

        config.apply_overrides(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies overrides looked up by unprefixed key (`LOG_LEVEL`, ...).
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        // Logging configuration
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        // Event configuration
        if let Some(capacity) = lookup("EVENT_CHANNEL_CAPACITY") {
            self.events.channel_capacity = parse_number("events.channel_capacity", &capacity)?;
        }
        if let Some(enabled) = lookup("EVENTS_ENABLED") {
            self.events.enabled = parse_flag("events.enabled", &enabled)?;
        }

        // Lock configuration
        if let Some(threshold) = lookup("LOCK_PRUNE_THRESHOLD") {
            self.locks.prune_threshold = parse_number("locks.prune_threshold", &threshold)?;
        }

        // Service configuration
        if let Some(name) = lookup("SERVICE_NAME") {
            self.service_name = name;
        }
        if let Some(env) = lookup("ENVIRONMENT") {
            self.environment = env;
        }
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "log.level",
                format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            ));
        }

        if self.events.channel_capacity == 0 {
            return Err(ConfigError::invalid(
                "events.channel_capacity",
                "must be greater than 0",
            ));
        }

        if self.locks.prune_threshold == 0 {
            return Err(ConfigError::invalid(
                "locks.prune_threshold",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn parse_number(field: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(field, format!("'{value}': {e}")))
}

fn parse_flag(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(field, format!("'{value}' is not a boolean"))),
    }
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_channel_capacity() -> usize {
    1024
}

fn default_prune_threshold() -> usize {
    crate::infrastructure::persistence::locks::DEFAULT_PRUNE_THRESHOLD
}

fn default_service_name() -> String {
    "instrument-market".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.events.channel_capacity, 1024);
        assert!(config.events.enabled);
        assert_eq!(config.locks.prune_threshold, 1024);
        assert_eq!(config.service_name, "instrument-market");
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn app_config_validate_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn app_config_validate_invalid_log_level() {
        let mut config = AppConfig::default();
        config.log.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn app_config_validate_zero_sizes() {
        let mut config = AppConfig::default();
        config.events.channel_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.locks.prune_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            environment = "staging"

            [log]
            format = "pretty"

            [events]
            channel_capacity = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.environment, "staging");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.events.channel_capacity, 16);
        assert!(config.events.enabled);
        assert_eq!(config.service_name, "instrument-market");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AppConfig::from_toml("[log").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(overrides(&[
                ("LOG_LEVEL", "debug"),
                ("LOG_FORMAT", "PRETTY"),
                ("EVENT_CHANNEL_CAPACITY", "64"),
                ("EVENTS_ENABLED", "off"),
                ("LOCK_PRUNE_THRESHOLD", "8"),
                ("SERVICE_NAME", "market-test"),
            ]))
            .unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.events.channel_capacity, 64);
        assert!(!config.events.enabled);
        assert_eq!(config.locks.prune_threshold, 8);
        assert_eq!(config.service_name, "market-test");
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn unparsable_override_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(overrides(&[("EVENT_CHANNEL_CAPACITY", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "events.channel_capacity"));

        let err = config
            .apply_overrides(overrides(&[("EVENTS_ENABLED", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
