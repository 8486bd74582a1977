//! Mock transport for testing.
//!
//! `MockSerialPort` records every write and flush and can be told to fail.
//! `MockBackend` serves a scripted port list, refuses to open selected ports
//! and hands out `MockSerialPort`s whose state the test can still inspect
//! after the client took ownership of the handle.

use super::error::PortError;
use super::traits::{PortBackend, PortConfiguration, PortDescriptor, SerialPortAdapter};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Inner state of the mock port, shared between clones.
#[derive(Debug, Default)]
struct MockPortState {
    /// Every buffer passed to `write_bytes`, one entry per call.
    write_log: Vec<Vec<u8>>,
    /// Number of successful flushes.
    flush_count: usize,
    /// Whether the handle is open.
    open: bool,
    /// Whether the next write should time out.
    should_timeout: bool,
    /// Whether every write should fail with an I/O error.
    fail_writes: bool,
    /// Whether every flush should fail with an I/O error.
    fail_flush: bool,
    /// Configuration the port was opened with.
    config: PortConfiguration,
}

/// Mock serial port implementation for testing.
///
/// # Example
/// ```
/// use kmbox::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.write_bytes(b"km.click(0)\n").unwrap();
/// port.flush().unwrap();
///
/// assert_eq!(port.written(), b"km.click(0)\n");
/// assert_eq!(port.flush_count(), 1);
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create an open mock port with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, PortConfiguration::default())
    }

    /// Create an open mock port that remembers the configuration it got.
    pub fn with_config(name: impl Into<String>, config: PortConfiguration) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState {
                open: true,
                config,
                ..Default::default()
            })),
        }
    }

    /// Get a copy of all data written to the port, one entry per write.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().write_log.clone()
    }

    /// All written bytes concatenated.
    pub fn written(&self) -> Vec<u8> {
        self.state.lock().unwrap().write_log.concat()
    }

    /// Clear the write log.
    pub fn clear_write_log(&mut self) {
        self.state.lock().unwrap().write_log.clear();
    }

    /// Number of successful flushes.
    pub fn flush_count(&self) -> usize {
        self.state.lock().unwrap().flush_count
    }

    /// Make the next write time out.
    pub fn set_should_timeout(&mut self, should_timeout: bool) {
        self.state.lock().unwrap().should_timeout = should_timeout;
    }

    /// Make every write fail with a broken-pipe error until reset.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    /// Make every flush fail with an I/O error until reset. Writes still
    /// land in the log.
    pub fn set_fail_flush(&mut self, fail: bool) {
        self.state.lock().unwrap().fail_flush = fail;
    }

    /// The configuration passed when the port was opened.
    pub fn config(&self) -> PortConfiguration {
        self.state.lock().unwrap().config
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock().unwrap();

        if !state.open {
            return Err(PortError::NotOpen);
        }

        if state.should_timeout {
            state.should_timeout = false;
            return Err(PortError::timeout(state.config.timeout));
        }

        if state.fail_writes {
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "simulated write failure",
            )));
        }

        state.write_log.push(data.to_vec());
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), PortError> {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return Err(PortError::NotOpen);
        }
        if state.fail_flush {
            return Err(PortError::Io(std::io::Error::other("simulated flush failure")));
        }
        state.flush_count += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }

    fn close(&mut self) -> Result<(), PortError> {
        self.state.lock().unwrap().open = false;
        Ok(())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .finish()
    }
}

#[derive(Debug, Default)]
struct MockBackendState {
    ports: Vec<PortDescriptor>,
    unopenable: HashSet<String>,
    list_fails: bool,
    unavailable: bool,
    list_calls: usize,
    open_log: Vec<String>,
    opened: Vec<MockSerialPort>,
}

/// Scripted `PortBackend` for tests.
///
/// Any port name can be opened unless it was marked with
/// [`MockBackend::refuse_open`]; the port list only affects discovery.
///
/// # Example
/// ```
/// use kmbox::port::{MockBackend, PortBackend, PortConfiguration, PortDescriptor};
///
/// let backend = MockBackend::new()
///     .with_port(PortDescriptor::new("COM3", "USB-SERIAL CH340 (COM3)", ""))
///     .refuse_open("COM4");
///
/// assert_eq!(backend.list_ports().unwrap().len(), 1);
/// assert!(backend.open("COM4", &PortConfiguration::default()).is_err());
/// assert!(backend.open("COM3", &PortConfiguration::default()).is_ok());
/// assert_eq!(backend.open_log(), vec!["COM4", "COM3"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockBackendState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a port to the enumeration result.
    pub fn with_port(self, port: PortDescriptor) -> Self {
        self.state.lock().unwrap().ports.push(port);
        self
    }

    /// Make every open of `port_name` fail, as if another process held it.
    pub fn refuse_open(self, port_name: impl Into<String>) -> Self {
        self.state.lock().unwrap().unopenable.insert(port_name.into());
        self
    }

    /// Make enumeration itself fail.
    pub fn failing_enumeration(self) -> Self {
        self.state.lock().unwrap().list_fails = true;
        self
    }

    /// Report the backend as not compiled in.
    pub fn unavailable(self) -> Self {
        self.state.lock().unwrap().unavailable = true;
        self
    }

    /// How often `list_ports` was called.
    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    /// Every port name passed to `open`, in call order, failures included.
    pub fn open_log(&self) -> Vec<String> {
        self.state.lock().unwrap().open_log.clone()
    }

    /// The most recently opened handle for `port_name`.
    pub fn last_opened(&self, port_name: &str) -> Option<MockSerialPort> {
        self.state
            .lock()
            .unwrap()
            .opened
            .iter()
            .rev()
            .find(|p| p.name() == port_name)
            .cloned()
    }
}

impl PortBackend for MockBackend {
    fn open(
        &self,
        port_name: &str,
        config: &PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        let mut state = self.state.lock().unwrap();
        state.open_log.push(port_name.to_string());

        if state.unavailable {
            return Err(PortError::Unavailable("mock backend marked unavailable"));
        }
        if state.unopenable.contains(port_name) {
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("{port_name} is busy"),
            )));
        }

        let port = MockSerialPort::with_config(port_name, *config);
        state.opened.push(port.clone());
        Ok(Box::new(port))
    }

    fn list_ports(&self) -> Result<Vec<PortDescriptor>, PortError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;

        if state.list_fails {
            return Err(PortError::Io(std::io::Error::other("enumeration failed")));
        }
        Ok(state.ports.clone())
    }

    fn is_available(&self) -> bool {
        !self.state.lock().unwrap().unavailable
    }
}
