//! The KMBox device client.
//!
//! # Architecture
//!
//! ```text
//! Kmbox ──> discovery::find_port ──> PortBackend::list_ports / open (probe)
//!   │
//!   └────> PortBackend::open ──> SerialPortAdapter::write_bytes + flush
//! ```
//!
//! The command methods are fire-and-forget. Failures are logged when the
//! client was built with `debug` set and otherwise dropped; `connect` and
//! `send_raw` return them for callers that want to look.

use crate::command::{Command, MouseButton, TERMINATOR};
use crate::discovery::{self, DiscoveryOptions};
use crate::error::{KmboxError, KmboxResult};
use crate::port::{
    PortBackend, PortConfiguration, SerialPortAdapter, SystemBackend, DEFAULT_BAUD_RATE,
    DEFAULT_TIMEOUT,
};
use std::time::Duration;
use tracing::{error, info, warn};

/// Settings for a [`Kmbox`] client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmboxConfig {
    /// Explicit port; `None` runs discovery.
    pub port: Option<String>,
    pub baud_rate: u32,
    /// Read and write timeout of the open port.
    pub timeout: Duration,
    /// Log lifecycle events and swallowed errors.
    pub debug: bool,
    /// Probe discovery candidates in device-path order.
    pub sort_ports: bool,
}

impl Default for KmboxConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            debug: false,
            sort_ports: false,
        }
    }
}

impl KmboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_sorted_ports(mut self, sort_ports: bool) -> Self {
        self.sort_ports = sort_ports;
        self
    }

    /// Transport settings derived from this configuration.
    pub fn port_configuration(&self) -> PortConfiguration {
        PortConfiguration::new(self.baud_rate, self.timeout)
    }

    /// Discovery settings derived from this configuration.
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            probe: self.port_configuration(),
            sort_ports: self.sort_ports,
            debug: self.debug,
        }
    }

    /// The explicit port, ignoring an empty string.
    fn explicit_port(&self) -> Option<&str> {
        self.port.as_deref().filter(|p| !p.is_empty())
    }
}

/// Client for a KMBox attached through a USB-serial adapter.
///
/// # Example
/// ```no_run
/// use kmbox::{Kmbox, KmboxConfig};
///
/// let mut kmbox = Kmbox::new(KmboxConfig::new().with_debug(true))?;
/// if kmbox.is_connected() {
///     kmbox.move_rel(25, -10);
///     kmbox.left_click();
/// }
/// kmbox.close();
/// # Ok::<(), kmbox::KmboxError>(())
/// ```
#[derive(Debug)]
pub struct Kmbox<B: PortBackend = SystemBackend> {
    backend: B,
    config: KmboxConfig,
    /// Absent or open, never a closed handle outside `close`.
    port: Option<Box<dyn SerialPortAdapter>>,
    /// Port chosen by the last `connect`, even if opening it failed.
    port_name: Option<String>,
    write_buffer: Vec<u8>,
}

impl Kmbox<SystemBackend> {
    /// Create a client on the system serial ports and try to connect.
    ///
    /// A client that could not find or open a port is still returned; check
    /// [`Kmbox::is_connected`]. The only error is a build without the serial
    /// transport.
    pub fn new(config: KmboxConfig) -> KmboxResult<Self> {
        Self::from_backend(SystemBackend::new(), config)
    }

    /// Discover a device with default settings.
    pub fn auto() -> KmboxResult<Self> {
        Self::new(KmboxConfig::default())
    }
}

impl<B: PortBackend> Kmbox<B> {
    /// Create an unconnected client. Performs no I/O.
    pub fn with_backend(backend: B, config: KmboxConfig) -> Self {
        Self {
            backend,
            config,
            port: None,
            port_name: None,
            write_buffer: Vec::with_capacity(32),
        }
    }

    /// Create a client on `backend` and try to connect, like [`Kmbox::new`].
    pub fn from_backend(backend: B, config: KmboxConfig) -> KmboxResult<Self> {
        if !backend.is_available() {
            return Err(KmboxError::MissingDependency(
                "build with the `serial` feature to use system serial ports",
            ));
        }

        let mut client = Self::with_backend(backend, config);
        if client.config.debug {
            info!("KMBox Library v{}", env!("CARGO_PKG_VERSION"));
        }

        // Connection failures leave an inert client; they were logged above
        // when debug is on.
        let _ = client.connect();
        Ok(client)
    }

    /// Resolve the port and open it.
    ///
    /// Uses the configured port verbatim, otherwise runs discovery.
    pub fn connect(&mut self) -> KmboxResult<()> {
        if let Some(port) = self.port.as_ref().filter(|p| p.is_open()) {
            return Err(KmboxError::AlreadyConnected(port.name().to_string()));
        }
        self.port = None;

        self.port_name = match self.config.explicit_port() {
            Some(port) => Some(port.to_string()),
            None => {
                if self.config.debug {
                    info!("Searching for CH340 device...");
                }
                self.find_port()
            }
        };

        let Some(port_name) = self.port_name.as_deref() else {
            if self.config.debug {
                error!("No compatible CH340 device found");
            }
            return Err(KmboxError::NoDevice);
        };

        match self
            .backend
            .open(port_name, &self.config.port_configuration())
        {
            Ok(handle) => {
                if self.config.debug {
                    info!("Connected to {}", port_name);
                }
                self.port = Some(handle);
                Ok(())
            }
            Err(e) => {
                if self.config.debug {
                    error!("Connection to {} failed: {}", port_name, e);
                }
                Err(KmboxError::port(port_name, e))
            }
        }
    }

    /// Run discovery without connecting.
    pub fn find_port(&self) -> Option<String> {
        discovery::find_port(&self.backend, &self.config.discovery_options())
    }

    /// Send one newline-terminated line of arbitrary text.
    pub fn send_raw(&mut self, line: &str) -> KmboxResult<()> {
        self.write_buffer.clear();
        self.write_buffer.extend_from_slice(line.as_bytes());
        self.write_buffer.push(TERMINATOR);
        self.write_buffer_out()
    }

    /// Encode and send a command, returning any transport failure.
    pub fn send(&mut self, command: &Command) -> KmboxResult<()> {
        command.encode_into(&mut self.write_buffer);
        self.write_buffer_out()
    }

    fn write_buffer_out(&mut self) -> KmboxResult<()> {
        let port = self.port.as_mut().ok_or(KmboxError::NotConnected)?;

        let result = port
            .write_bytes(&self.write_buffer)
            .and_then(|_| port.flush());
        if let Err(e) = result {
            return Err(KmboxError::port(port.name(), e));
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command) {
        if let Err(e) = self.send(&command) {
            if self.config.debug {
                error!("Send failed ({}): {}", command, e);
            }
        }
    }

    /// Move the pointer by `(x, y)`.
    pub fn move_rel(&mut self, x: i32, y: i32) {
        self.dispatch(Command::Move { x, y });
    }

    pub fn click(&mut self, button: MouseButton) {
        self.dispatch(Command::Click(button));
    }

    pub fn left_click(&mut self) {
        self.click(MouseButton::Left);
    }

    pub fn right_click(&mut self) {
        self.click(MouseButton::Right);
    }

    pub fn middle_click(&mut self) {
        self.click(MouseButton::Middle);
    }

    /// True iff a port handle exists and reports itself open.
    pub fn is_connected(&self) -> bool {
        self.port.as_ref().is_some_and(|p| p.is_open())
    }

    /// Close the port. Does nothing when not connected.
    pub fn close(&mut self) {
        let Some(mut port) = self.port.take() else {
            return;
        };

        let was_open = port.is_open();
        if let Err(e) = port.close() {
            if self.config.debug {
                warn!("Error while closing {}: {}", port.name(), e);
            }
        }
        if was_open && self.config.debug {
            info!("Connection closed");
        }
    }

    /// Port resolved by the last `connect`, if any.
    pub fn port_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }

    pub fn config(&self) -> &KmboxConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: PortBackend> Drop for Kmbox<B> {
    fn drop(&mut self) {
        self.close();
    }
}
