//! KMBox client library
//!
//! Finds a KMBox behind a CH340 USB-serial adapter, opens it and sends
//! `km.*` text commands. The device never answers; every command is
//! fire-and-forget.
//!
//! # Modules
//!
//! - `client`: the `Kmbox` device client
//! - `command`: wire encoding of `km.move` / `km.click`
//! - `discovery`: CH340 / USB-SERIAL port matching and open-probing
//! - `port`: transport traits, the `serialport` backend and mocks
//! - `config`: TOML configuration with environment overrides
//! - `logging`: `tracing-subscriber` setup
//! - `error`: client error type
//!
//! # Example
//!
//! ```no_run
//! use kmbox::{Kmbox, KmboxConfig};
//!
//! let mut kmbox = Kmbox::new(KmboxConfig::default())?;
//! kmbox.move_rel(10, 0);
//! kmbox.right_click();
//! # Ok::<(), kmbox::KmboxError>(())
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod port;

// Re-export commonly used types for convenience
pub use client::{Kmbox, KmboxConfig};
pub use command::{Command, MouseButton};
pub use discovery::{find_port, is_candidate, DiscoveryOptions};
pub use error::{KmboxError, KmboxResult};
pub use port::{
    MockBackend, MockSerialPort, PortBackend, PortConfiguration, PortDescriptor, PortError,
    SerialPortAdapter, SystemBackend,
};

// Re-export config types
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
