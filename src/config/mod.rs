//! Configuration for the kmbox CLI and embedding applications.
//!
//! TOML configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! 1. `KMBOX_CONFIG` environment variable (explicit path)
//! 2. `./kmbox.toml` (current directory)
//! 3. `kmbox.toml` in the platform config directory
//! 4. Built-in defaults (no file required)
//!
//! # Example file
//!
//! ```toml
//! [client]
//! port = "COM3"        # omit to auto-detect a CH340 adapter
//! baud_rate = 115200
//! timeout_ms = 50
//! debug = false
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```
//!
//! ```rust,no_run
//! use kmbox::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! let client_config = loader.config().client.to_client_config();
//! println!("Baud rate: {}", client_config.baud_rate);
//! # Ok::<(), kmbox::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    apply_overrides, get_default_config_dir, get_default_config_path, resolve_config_path,
    ConfigLoader,
};
pub use schema::{ClientSection, Config, LogFormat, LoggingConfig};
