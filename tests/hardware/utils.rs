//! Helpers for tests that talk to real hardware.

use kmbox::port::{PortBackend, PortConfiguration, PortDescriptor, SystemBackend};
use kmbox::{discovery, DiscoveryOptions, KmboxConfig};
use std::env;
use std::time::{Duration, Instant};

/// Test port configuration from environment.
pub struct TestPortConfig {
    pub port_name: Option<String>,
    pub baud_rate: u32,
}

impl TestPortConfig {
    /// `TEST_PORT` (or `KMBOX_PORT`) and `TEST_BAUD`.
    pub fn from_env() -> Self {
        let port_name = env::var("TEST_PORT")
            .or_else(|_| env::var("KMBOX_PORT"))
            .ok()
            .filter(|name| !name.is_empty());
        let baud_rate = env::var("TEST_BAUD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(kmbox::port::DEFAULT_BAUD_RATE);

        TestPortConfig {
            port_name,
            baud_rate,
        }
    }

    pub fn to_client_config(&self) -> KmboxConfig {
        let config = KmboxConfig::new()
            .with_baud_rate(self.baud_rate)
            .with_debug(true);
        match &self.port_name {
            Some(name) => config.with_port(name.clone()),
            None => config,
        }
    }

    pub fn to_discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            probe: PortConfiguration::new(self.baud_rate, Duration::from_millis(100)),
            sort_ports: true,
            debug: true,
        }
    }
}

/// Everything the OS reports, empty on enumeration failure.
pub fn discover_available_ports() -> Vec<PortDescriptor> {
    SystemBackend::new().list_ports().unwrap_or_default()
}

/// Print available ports for debugging.
pub fn print_available_ports() {
    let ports = discover_available_ports();
    if ports.is_empty() {
        println!("No serial ports detected on this system");
        return;
    }

    println!("Available serial ports ({}):", ports.len());
    for (idx, port) in ports.iter().enumerate() {
        let marker = if discovery::is_candidate(port) {
            " [kmbox]"
        } else {
            ""
        };
        println!("  {}. {}{}", idx + 1, port.device, marker);
        println!("     Description: {}", port.description);
        println!("     HWID: {}", port.hwid);
    }
}

/// Port to run against: `TEST_PORT` if set, otherwise discovery.
pub fn resolve_test_port(config: &TestPortConfig) -> Option<String> {
    if let Some(name) = &config.port_name {
        return Some(name.clone());
    }
    discovery::find_port(&SystemBackend::new(), &config.to_discovery_options())
}

/// Resolve the port or print why the test is being skipped.
pub fn require_device(config: &TestPortConfig) -> Option<String> {
    let port = resolve_test_port(config);
    if port.is_none() {
        println!("Skipping: no KMBox found (set TEST_PORT to force a port)");
        print_available_ports();
    }
    port
}

/// Time a closure.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}
