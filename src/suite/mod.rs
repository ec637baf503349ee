//! Suite definitions and execution
//!
//! A suite is a YAML document naming the server under test, optional setup
//! steps and stub routes, and the test cases of every tier.

pub mod config;
pub mod runner;

pub use config::SuiteConfig;
pub use runner::{run_suite, SuiteOptions, SuiteOutcome};
