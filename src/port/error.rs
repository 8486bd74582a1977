//! Port-specific error types.
//!
//! Transport failures are kept apart from the client-level `KmboxError` so the
//! backends stay usable on their own.

use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred while writing or flushing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The port rejected its configuration (baud rate, path syntax, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A write did not complete within the port timeout.
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The handle has already been closed.
    #[error("Port is not open")]
    NotOpen,

    /// No serial transport was compiled into this build.
    #[error("Serial transport unavailable: {0}")]
    Unavailable(&'static str),

    /// A serialport-specific error occurred.
    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Timeout error from a duration.
    pub fn timeout(duration: std::time::Duration) -> Self {
        Self::Timeout(duration)
    }
}
