//! Configuration schema definitions.
//!
//! Structure of `kmbox.toml`. Every section and field has a default, so an
//! empty file (or none at all) is a valid configuration.

use crate::client::KmboxConfig;
use crate::port::{DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{ConfigError, ConfigResult};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device client settings
    pub client: ClientSection,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values the transport cannot use.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.client.baud_rate == 0 {
            return Err(ConfigError::validation(
                "client.baud_rate",
                "must be greater than zero",
            ));
        }
        if self.client.timeout_ms == 0 {
            return Err(ConfigError::validation(
                "client.timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// `[client]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    /// Port to open; discovery is used when unset
    pub port: Option<String>,
    /// Baud rate
    pub baud_rate: u32,
    /// Read/write timeout in milliseconds
    pub timeout_ms: u64,
    /// Log lifecycle events and dropped errors
    pub debug: bool,
    /// Probe discovery candidates in device-path order
    pub sort_ports: bool,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            debug: false,
            sort_ports: false,
        }
    }
}

impl ClientSection {
    /// Get the timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Build the client settings described by this section.
    pub fn to_client_config(&self) -> KmboxConfig {
        KmboxConfig {
            port: self.port.clone(),
            baud_rate: self.baud_rate,
            timeout: self.timeout(),
            debug: self.debug,
            sort_ports: self.sort_ports,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Log format: "pretty", "compact" or "json"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human oriented
    #[default]
    Pretty,
    /// Single line per event
    Compact,
    /// Newline-delimited JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.client.baud_rate, 115_200);
        assert_eq!(config.client.timeout_ms, 50);
        assert_eq!(config.client.port, None);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("[client]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [client]
            port = "COM7"
            timeout_ms = 100

            [logging]
            format = "json"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.client.port.as_deref(), Some("COM7"));
        assert_eq!(config.client.timeout(), Duration::from_millis(100));
        assert_eq!(config.logging.format, LogFormat::Json);
        // Defaults should still work
        assert_eq!(config.client.baud_rate, 115_200);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_to_client_config() {
        let section = ClientSection {
            port: Some("/dev/ttyUSB1".to_string()),
            baud_rate: 9600,
            timeout_ms: 20,
            debug: true,
            sort_ports: true,
        };
        let config = section.to_client_config();
        assert_eq!(config.port.as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.timeout, Duration::from_millis(20));
        assert!(config.debug);
        assert!(config.sort_ports);
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.client.baud_rate = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { ref key, .. }) if key == "client.baud_rate"
        ));

        let mut config = Config::default();
        config.client.timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
