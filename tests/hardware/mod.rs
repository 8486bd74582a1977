//! Tests against a real KMBox.

pub mod device_tests;
pub mod utils;
