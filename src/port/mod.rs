//! Port abstraction layer for serial communication.
//!
//! Provides the transport traits, the real `serialport`-backed
//! implementation and mocks, so the client can be driven without hardware.

pub mod error;
pub mod mock;
pub mod system;
pub mod traits;

#[cfg(feature = "serial")]
pub mod sync_port;

pub use error::PortError;
pub use mock::{MockBackend, MockSerialPort};
pub use system::SystemBackend;
pub use traits::*;

#[cfg(feature = "serial")]
pub use sync_port::SyncSerialPort;
