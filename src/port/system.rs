//! The operating-system port backend.

use super::error::PortError;
use super::traits::{PortBackend, PortConfiguration, PortDescriptor, SerialPortAdapter};

/// Opens and enumerates real serial ports through the `serialport` crate.
///
/// When the crate is built without the `serial` feature this backend is
/// still constructible but reports itself unavailable and fails every open.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBackend;

impl SystemBackend {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "serial")]
impl PortBackend for SystemBackend {
    fn open(
        &self,
        port_name: &str,
        config: &PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        let port = super::sync_port::SyncSerialPort::open(port_name, config)?;
        Ok(Box::new(port))
    }

    fn list_ports(&self) -> Result<Vec<PortDescriptor>, PortError> {
        let ports = serialport::available_ports()?;
        Ok(ports.into_iter().map(PortDescriptor::from).collect())
    }
}

#[cfg(not(feature = "serial"))]
impl PortBackend for SystemBackend {
    fn open(
        &self,
        _port_name: &str,
        _config: &PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        Err(PortError::Unavailable("built without the `serial` feature"))
    }

    fn list_ports(&self) -> Result<Vec<PortDescriptor>, PortError> {
        Err(PortError::Unavailable("built without the `serial` feature"))
    }

    fn is_available(&self) -> bool {
        false
    }
}
