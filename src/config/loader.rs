//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "KMBOX";

/// Config file name
const CONFIG_FILE_NAME: &str = "kmbox.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "KMBOX_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `KMBOX_CONFIG` environment variable (explicit path)
    /// 2. `./kmbox.toml` (current directory)
    /// 3. `kmbox.toml` in the platform config directory
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables override file values afterwards.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        let mut config = Config::default();
        // Still apply env overrides even with defaults
        if apply_env_overrides(&mut config).is_err() || config.validate().is_err() {
            config = Config::default();
        }

        Self {
            config_path: None,
            config,
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Save the current configuration to a specific file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        save_to_file(&self.config, path.as_ref())
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    get_default_config_path().filter(|path| path.exists())
}

/// Platform config directory for kmbox (`~/.config/kmbox`, `%APPDATA%\kmbox\config`, ...).
pub fn get_default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kmbox").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default config file path for creating new config files.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Save configuration to a file.
fn save_to_file(config: &Config, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Apply `KMBOX_*` environment variables to the configuration.
///
/// - `KMBOX_PORT=COM3`
/// - `KMBOX_BAUD_RATE=115200`
/// - `KMBOX_TIMEOUT_MS=50`
/// - `KMBOX_DEBUG=1`
/// - `KMBOX_SORT_PORTS=true`
/// - `KMBOX_LOG_LEVEL=debug`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    apply_overrides(config, |var| std::env::var(var).ok())
}

/// Apply overrides from an arbitrary variable lookup.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| format!("{}_{}", ENV_PREFIX, key);

    if let Some(val) = lookup(&var("PORT")) {
        config.client.port = (!val.is_empty()).then_some(val);
    }
    if let Some(val) = lookup(&var("BAUD_RATE")) {
        config.client.baud_rate = parse_value(&var("BAUD_RATE"), &val, "Invalid baud rate")?;
    }
    if let Some(val) = lookup(&var("TIMEOUT_MS")) {
        config.client.timeout_ms = parse_value(&var("TIMEOUT_MS"), &val, "Invalid timeout")?;
    }
    if let Some(val) = lookup(&var("DEBUG")) {
        config.client.debug = parse_flag(&var("DEBUG"), &val)?;
    }
    if let Some(val) = lookup(&var("SORT_PORTS")) {
        config.client.sort_ports = parse_flag(&var("SORT_PORTS"), &val)?;
    }
    if let Some(val) = lookup(&var("LOG_LEVEL")) {
        config.logging.level = val;
    }

    Ok(())
}

fn parse_value<T: FromStr>(var: &str, val: &str, message: &str) -> ConfigResult<T> {
    val.trim()
        .parse()
        .map_err(|_| ConfigError::env_parse(var, message))
}

fn parse_flag(var: &str, val: &str) -> ConfigResult<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::env_parse(var, "Expected a boolean")),
    }
}
