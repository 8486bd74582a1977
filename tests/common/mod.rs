//! Shared test utilities for kmbox integration tests.
//!
//! - Port descriptors shaped like what Windows and Linux report
//! - Mock backends pre-loaded with common port layouts
//! - Helpers to build a connected client over a mock

#![allow(dead_code)]

use kmbox::port::{MockBackend, MockSerialPort, PortDescriptor};
use kmbox::{Kmbox, KmboxConfig};

/// A CH340 adapter as Windows names it (the product string is the
/// device manager name).
pub fn windows_ch340(com: &str) -> PortDescriptor {
    PortDescriptor::new(com, format!("USB-SERIAL CH340 ({com})"), "USB VID:PID=1A86:7523")
}

/// A CH340 on Linux whose udev model string names the chip.
///
/// Same shape `PortDescriptor::from(SerialPortInfo)` produces: product as
/// description, `USB VID:PID=` as hwid.
pub fn linux_ch340(path: &str) -> PortDescriptor {
    PortDescriptor::new(path, "USB-SERIAL CH340", "USB VID:PID=1A86:7523")
}

/// A CH340 on Linux whose model string is the generic `USB Serial`.
///
/// The vendor ID alone does not make a port a candidate.
pub fn linux_generic_ch340(path: &str) -> PortDescriptor {
    PortDescriptor::new(path, "USB Serial", "USB VID:PID=1A86:7523")
}

/// A built-in UART that must never be picked.
pub fn onboard_uart(device: &str) -> PortDescriptor {
    PortDescriptor::new(device, "Communications Port", "ACPI\\PNP0501\\1")
}

/// An Arduino, also USB but not a KMBox.
pub fn arduino(device: &str) -> PortDescriptor {
    PortDescriptor::new(device, "Arduino Uno", "USB VID:PID=2341:0043 SER=7503330")
}

/// Backend whose enumeration returns `ports` in order.
pub fn backend_with(ports: Vec<PortDescriptor>) -> MockBackend {
    ports
        .into_iter()
        .fold(MockBackend::new(), |backend, port| backend.with_port(port))
}

/// Client connected to `port_name` over `backend`, plus the mock handle.
pub fn connected_client<'a>(
    backend: &'a MockBackend,
    port_name: &str,
) -> (Kmbox<&'a MockBackend>, MockSerialPort) {
    let client = Kmbox::from_backend(backend, KmboxConfig::new().with_port(port_name))
        .expect("mock backend is always available");
    assert!(client.is_connected(), "client should connect to {port_name}");
    let port = backend
        .last_opened(port_name)
        .expect("port should have been opened");
    (client, port)
}
