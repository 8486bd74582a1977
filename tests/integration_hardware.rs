//! Hardware integration test suite.
//!
//! These tests require a KMBox on a CH340 adapter and are ignored by default.
//! Run with:
//! TEST_PORT=COM3 cargo test --features hardware-tests --test integration_hardware -- --ignored
//!
//! Without `TEST_PORT` the tests fall back to auto-detection.

#![cfg(all(feature = "serial", feature = "hardware-tests"))]

#[path = "common/mod.rs"]
mod common;

#[path = "hardware/mod.rs"]
mod hardware;

pub use hardware::*;
