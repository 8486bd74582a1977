//! Core traits for the serial transport seam.
//!
//! `SerialPortAdapter` is an open handle, `PortBackend` is the factory that
//! opens handles and enumerates the ports visible on the system. Real
//! hardware and the mock implementations plug in behind the same pair.

use super::error::PortError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default baud rate of KMBox firmware.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default read/write timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(50);

/// Parameters used when opening a port.
///
/// Framing is always 8 data bits, no parity, one stop bit and no flow
/// control; only the rate and the timeout vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Applied to both reads and writes.
    pub timeout: Duration,
}

impl PortConfiguration {
    pub fn new(baud_rate: u32, timeout: Duration) -> Self {
        Self { baud_rate, timeout }
    }
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT)
    }
}

/// A serial port as reported by enumeration.
///
/// Only used for matching during discovery. `description` and `hwid` may be
/// empty when the platform reports nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDescriptor {
    /// System path or name, e.g. `COM3` or `/dev/ttyUSB0`.
    pub device: String,

    /// Human-readable description (USB product string, friendly name).
    pub description: String,

    /// Hardware ID, e.g. `USB VID:PID=1A86:7523 SER=0001`.
    pub hwid: String,
}

impl PortDescriptor {
    pub fn new(
        device: impl Into<String>,
        description: impl Into<String>,
        hwid: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            description: description.into(),
            hwid: hwid.into(),
        }
    }
}

/// An open serial port handle.
pub trait SerialPortAdapter: Send + std::fmt::Debug {
    /// Write all of `data` to the port.
    ///
    /// Returns the number of bytes written, which is `data.len()` on success.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Block until buffered output has been handed to the device.
    fn flush(&mut self) -> Result<(), PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Whether the handle is still open.
    fn is_open(&self) -> bool;

    /// Release the underlying handle. Closing twice is not an error.
    fn close(&mut self) -> Result<(), PortError>;
}

/// Opens ports and lists the ports present on the system.
pub trait PortBackend: std::fmt::Debug {
    /// Open `port_name` with the given configuration.
    fn open(
        &self,
        port_name: &str,
        config: &PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError>;

    /// List the serial ports currently visible, in platform order.
    fn list_ports(&self) -> Result<Vec<PortDescriptor>, PortError>;

    /// Whether this backend can talk to real ports at all.
    fn is_available(&self) -> bool {
        true
    }
}

impl<B: PortBackend + ?Sized> PortBackend for &B {
    fn open(
        &self,
        port_name: &str,
        config: &PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        (**self).open(port_name, config)
    }

    fn list_ports(&self) -> Result<Vec<PortDescriptor>, PortError> {
        (**self).list_ports()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
