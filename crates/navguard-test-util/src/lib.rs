//! Shared test utilities for the navguard workspace.
//!
//! Certificate fixtures are generated at test time, and their expected pins are
//! computed here from the key pair, not through the code under test.

pub mod certs;
pub mod logs;

pub use logs::capture_logs;
