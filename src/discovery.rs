//! KMBox port discovery.
//!
//! A port is a candidate when its description or hardware ID names the CH340
//! bridge, or when the two together contain `USB-SERIAL`. Candidates are
//! probed with an open/close before one is returned, so ports held by another
//! process are skipped.

use crate::port::{PortBackend, PortConfiguration, PortDescriptor};
use tracing::{debug, error, info, warn};

/// Signature of the WCH bridge chip.
pub const CH340_SIGNATURE: &str = "CH340";

/// Generic USB-serial signature, matched over description and hwid together.
pub const USB_SERIAL_SIGNATURE: &str = "USB-SERIAL";

/// Settings for one discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Configuration used for the open probe.
    pub probe: PortConfiguration,
    /// Sort candidates by device path instead of keeping platform order.
    pub sort_ports: bool,
    /// Log enumeration and probe results.
    pub debug: bool,
}

/// Whether `port` looks like a KMBox adapter.
pub fn is_candidate(port: &PortDescriptor) -> bool {
    let desc = port.description.to_uppercase();
    let hwid = port.hwid.to_uppercase();

    desc.contains(CH340_SIGNATURE)
        || hwid.contains(CH340_SIGNATURE)
        || format!("{desc}{hwid}").contains(USB_SERIAL_SIGNATURE)
}

/// Filter `ports` down to candidates, optionally sorted by device path.
pub fn candidates(ports: Vec<PortDescriptor>, sort_ports: bool) -> Vec<PortDescriptor> {
    let mut matching: Vec<_> = ports.into_iter().filter(is_candidate).collect();
    if sort_ports {
        matching.sort_by(|a, b| a.device.cmp(&b.device));
    }
    matching
}

/// Open and immediately close `port_name`.
pub fn probe<B: PortBackend + ?Sized>(
    backend: &B,
    port_name: &str,
    config: &PortConfiguration,
) -> bool {
    match backend.open(port_name, config) {
        Ok(mut handle) => {
            let _ = handle.close();
            true
        }
        Err(_) => false,
    }
}

/// Find the first candidate port that can currently be opened.
///
/// Enumeration failures are treated as an empty port list.
pub fn find_port<B: PortBackend + ?Sized>(
    backend: &B,
    options: &DiscoveryOptions,
) -> Option<String> {
    let ports = match backend.list_ports() {
        Ok(ports) => ports,
        Err(e) => {
            if options.debug {
                error!("Port enumeration failed: {}", e);
            }
            return None;
        }
    };

    if options.debug {
        for port in &ports {
            debug!(
                "Found port {} (description: {:?}, hwid: {:?})",
                port.device, port.description, port.hwid
            );
        }
    }

    for port in candidates(ports, options.sort_ports) {
        if options.debug {
            info!("Found device on {}", port.device);
        }

        if probe(backend, &port.device, &options.probe) {
            return Some(port.device);
        }

        if options.debug {
            warn!("Failed to open candidate port {}, skipping", port.device);
        }
    }

    None
}
