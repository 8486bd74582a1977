//! Client-level error type.
//!
//! Only `MissingDependency` ever escapes the fire-and-forget surface of
//! [`Kmbox`](crate::Kmbox). The other variants are returned by `connect` and
//! `send_raw` for callers that ask, and are otherwise only logged.

use crate::port::PortError;
use thiserror::Error;

/// A specialized `Result` type for client operations.
pub type KmboxResult<T> = Result<T, KmboxError>;

/// Errors produced by the device client.
#[derive(Debug, Error)]
pub enum KmboxError {
    /// The serial transport is not part of this build.
    #[error("KMBox requires a serial transport: {0}")]
    MissingDependency(&'static str),

    /// Discovery found no matching port that could be opened.
    #[error("No compatible CH340 device found")]
    NoDevice,

    /// A command was sent while no port was open.
    #[error("Not connected to a device")]
    NotConnected,

    /// `connect` was called on a connected client.
    #[error("Already connected to {0}")]
    AlreadyConnected(String),

    /// Opening, writing or flushing the port failed.
    #[error("Port error on {port}: {source}")]
    Port {
        port: String,
        #[source]
        source: PortError,
    },
}

impl KmboxError {
    pub(crate) fn port(port: impl Into<String>, source: PortError) -> Self {
        Self::Port {
            port: port.into(),
            source,
        }
    }

    /// Whether this error is a configuration problem rather than a runtime fault.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingDependency(_))
    }
}
