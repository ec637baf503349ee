//! tiercheck - a tier-aware smoke-test harness for HTTP endpoints
//!
//! Groups endpoint checks into test-pyramid tiers (unit, integration,
//! acceptance), runs each tier against a server under test, and reports
//! pass/fail and per-tier timing.

pub mod asserts;
pub mod cli;
pub mod client;
pub mod commands;
pub mod common;
pub mod report;
pub mod runner;
pub mod sampling;
pub mod suite;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use runner::{TestCase, Tier};
