//! Real-device tests. Every command used here is a no-op for the pointer
//! (`km.move(0,0)`) except the explicit click test.

use super::utils::{discover_available_ports, measure, require_device, TestPortConfig};
use kmbox::{discovery, Command, Kmbox, KmboxError};
use serial_test::serial;
use std::time::Duration;

#[test]
#[ignore]
fn test_enumeration_matches_candidates() {
    let ports = discover_available_ports();
    let candidates = discovery::candidates(ports.clone(), true);
    for port in &candidates {
        assert!(discovery::is_candidate(port));
    }
    assert!(candidates.len() <= ports.len());
}

#[test]
#[ignore]
#[serial]
fn test_connect_and_zero_move() {
    let config = TestPortConfig::from_env();
    let Some(port) = require_device(&config) else {
        return;
    };

    let mut kmbox = Kmbox::new(config.to_client_config().with_port(port.clone()))
        .expect("serial backend is compiled in");
    assert!(kmbox.is_connected(), "could not open {port}");
    assert_eq!(kmbox.port_name(), Some(port.as_str()));

    kmbox
        .send(&Command::Move { x: 0, y: 0 })
        .expect("write to KMBox");

    kmbox.close();
    assert!(!kmbox.is_connected());
}

#[test]
#[ignore]
#[serial]
fn test_auto_detection() {
    let config = TestPortConfig::from_env();
    if config.port_name.is_some() {
        println!("Skipping: TEST_PORT is set, auto-detection not exercised");
        return;
    }
    let Some(expected) = require_device(&config) else {
        return;
    };

    let kmbox = Kmbox::auto().expect("serial backend is compiled in");
    assert!(kmbox.is_connected());
    assert_eq!(kmbox.port_name(), Some(expected.as_str()));
}

#[test]
#[ignore]
#[serial]
fn test_second_connect_is_rejected() {
    let config = TestPortConfig::from_env();
    let Some(port) = require_device(&config) else {
        return;
    };

    let mut kmbox = Kmbox::new(config.to_client_config().with_port(port)).unwrap();
    assert!(kmbox.is_connected());
    assert!(matches!(
        kmbox.connect(),
        Err(KmboxError::AlreadyConnected(_))
    ));
}

#[test]
#[ignore]
#[serial]
fn test_burst_of_moves_stays_fast() {
    let config = TestPortConfig::from_env();
    let Some(port) = require_device(&config) else {
        return;
    };

    let mut kmbox = Kmbox::new(config.to_client_config().with_port(port)).unwrap();
    let (_, elapsed) = measure(|| {
        for _ in 0..100 {
            kmbox.move_rel(0, 0);
        }
    });
    println!("100 moves in {:?}", elapsed);
    assert!(kmbox.is_connected());
    assert!(elapsed < Duration::from_secs(5));
}

#[test]
#[ignore]
#[serial]
fn test_left_click() {
    let config = TestPortConfig::from_env();
    let Some(port) = require_device(&config) else {
        return;
    };

    let mut kmbox = Kmbox::new(config.to_client_config().with_port(port)).unwrap();
    kmbox.left_click();
    assert!(kmbox.is_connected());
}
