//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `capbridge.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exposure ledger settings.
    pub ledger: LedgerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Bridge behaviour settings.
    pub bridge: BridgeConfig,
    /// Integration toggles.
    pub integrations: IntegrationsConfig,
}

/// Exposure ledger persistence configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path of the JSON ledger document.
    pub path: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Bridge behaviour.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Whether devices first seen on this run are exposed by default.
    pub expose_new_devices: bool,
}

/// Per-integration toggles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Enable the virtual/demo integration.
    pub virtual_enabled: bool,
}

impl Config {
    /// Load configuration from `capbridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("capbridge.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CAPBRIDGE_LEDGER_PATH") {
            self.ledger.path = val;
        }
        if let Ok(val) = std::env::var("CAPBRIDGE_EXPOSE_NEW") {
            if let Ok(expose) = val.parse() {
                self.bridge.expose_new_devices = expose;
            }
        }
        if let Ok(val) = std::env::var("CAPBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.path.is_empty() {
            return Err(ConfigError::Validation(
                "ledger path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: "capbridge-exposure.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "capbridged=info,capbridge=info".to_string(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            expose_new_devices: true,
        }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            virtual_enabled: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.ledger.path, "capbridge-exposure.json");
        assert!(config.bridge.expose_new_devices);
        assert!(config.integrations.virtual_enabled);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.ledger.path, "capbridge-exposure.json");
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [ledger]
            path = '/var/lib/capbridge/exposure.json'

            [logging]
            filter = 'debug'

            [bridge]
            expose_new_devices = false

            [integrations]
            virtual_enabled = false
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.ledger.path, "/var/lib/capbridge/exposure.json");
        assert_eq!(config.logging.filter, "debug");
        assert!(!config.bridge.expose_new_devices);
        assert!(!config.integrations.virtual_enabled);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [bridge]
            expose_new_devices = false
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.bridge.expose_new_devices);
        assert_eq!(config.ledger.path, "capbridge-exposure.json");
        assert!(config.integrations.virtual_enabled);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.ledger.path, "capbridge-exposure.json");
    }

    #[test]
    fn should_reject_empty_ledger_path() {
        let mut config = Config::default();
        config.ledger.path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
