//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate's `SerialPort` trait with our own
//! `SerialPortAdapter` trait for dependency injection and testing.

use super::error::PortError;
use super::traits::{PortConfiguration, PortDescriptor, SerialPortAdapter};
use serialport::{SerialPortInfo, SerialPortType};
use std::io::Write;

/// Synchronous serial port implementation wrapping `serialport::SerialPort`.
pub struct SyncSerialPort {
    /// The underlying serial port, `None` once closed.
    port: Option<Box<dyn serialport::SerialPort>>,
    /// The port name/path for identification.
    name: String,
}

impl SyncSerialPort {
    /// Open a serial port at 8N1 with the given rate and timeout.
    ///
    /// # Example
    /// ```no_run
    /// use kmbox::port::{PortConfiguration, SyncSerialPort};
    ///
    /// let port = SyncSerialPort::open("/dev/ttyUSB0", &PortConfiguration::default())?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(port_name: &str, config: &PortConfiguration) -> Result<Self, PortError> {
        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|e| open_error(port_name, e))?;

        Ok(Self {
            port: Some(port),
            name: port_name.to_string(),
        })
    }

    fn inner(&mut self) -> Result<&mut Box<dyn serialport::SerialPort>, PortError> {
        self.port.as_mut().ok_or(PortError::NotOpen)
    }
}

/// Missing devices surface as `NoDevice` on Windows and as an I/O
/// `NotFound` on Unix.
fn open_error(port_name: &str, e: serialport::Error) -> PortError {
    match e.kind() {
        serialport::ErrorKind::NoDevice
        | serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
            PortError::not_found(port_name)
        }
        serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
        _ => PortError::Serial(e),
    }
}

impl SerialPortAdapter for SyncSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let port = self.inner()?;
        port.write_all(data).map_err(|e| match e.kind() {
            std::io::ErrorKind::TimedOut => PortError::timeout(port.timeout()),
            _ => PortError::Io(e),
        })?;
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), PortError> {
        self.inner()?.flush().map_err(PortError::Io)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn close(&mut self) -> Result<(), PortError> {
        // The OS handle is released when the boxed port drops.
        self.port.take();
        Ok(())
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field(
                "baud_rate",
                &self.port.as_ref().and_then(|p| p.baud_rate().ok()),
            )
            .finish()
    }
}

impl From<SerialPortInfo> for PortDescriptor {
    fn from(info: SerialPortInfo) -> Self {
        let (description, hwid) = match info.port_type {
            SerialPortType::UsbPort(usb) => {
                let description = usb
                    .product
                    .or(usb.manufacturer)
                    .unwrap_or_default();
                let mut hwid = format!("USB VID:PID={:04X}:{:04X}", usb.vid, usb.pid);
                if let Some(serial) = usb.serial_number {
                    hwid.push_str(" SER=");
                    hwid.push_str(&serial);
                }
                (description, hwid)
            }
            SerialPortType::PciPort => (String::new(), "PCI".to_string()),
            SerialPortType::BluetoothPort => ("Bluetooth".to_string(), String::new()),
            SerialPortType::Unknown => (String::new(), String::new()),
        };

        Self {
            device: info.port_name,
            description,
            hwid,
        }
    }
}
