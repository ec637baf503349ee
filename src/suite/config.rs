//! Suite configuration types
//!
//! Defines the data structures for deserializing YAML suite files.

use std::path::Path;

use serde::Deserialize;

use crate::client::{Method, StubBackend};
use crate::common::{Error, Result};
use crate::runner::TestCase;

/// A complete suite loaded from a YAML file
#[derive(Debug, Deserialize)]
pub struct SuiteConfig {
    /// Name of the suite
    pub name: String,
    /// Optional description of what the suite verifies
    pub description: Option<String>,
    /// Optional setup steps to run before the suite (e.g., compilation)
    #[serde(default)]
    pub setup: Vec<SetupStep>,
    /// The server under test
    pub server: ServerConfig,
    /// Stub routes used by the unit and integration tiers
    #[serde(default)]
    pub stubs: Vec<StubConfig>,
    /// The test cases, each belonging to exactly one tier
    pub cases: Vec<TestCase>,
}

/// A setup step that runs before the suite
#[derive(Debug, Deserialize)]
pub struct SetupStep {
    /// Shell command to execute
    pub shell: String,
}

/// Configuration for the server under test
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Base URL the acceptance tier talks to
    pub base_url: String,
    /// Optional shell command that launches the server; it is killed when
    /// the run finishes
    pub start: Option<String>,
    /// Route polled until the server answers
    #[serde(default = "default_ready_path")]
    pub ready_path: String,
    /// Readiness timeout in seconds; falls back to the harness config
    pub ready_timeout_secs: Option<u64>,
}

fn default_ready_path() -> String {
    "/hello".to_string()
}

/// One stub route
#[derive(Debug, Deserialize)]
pub struct StubConfig {
    pub method: Method,
    pub path: String,
    #[serde(default = "default_stub_status")]
    pub status: u16,
    /// Fixed body answering every call
    pub body: Option<String>,
    /// Bodies rotated across calls, for variable endpoints
    #[serde(default)]
    pub bodies: Vec<String>,
}

fn default_stub_status() -> u16 {
    200
}

impl SuiteConfig {
    /// Load and parse a suite from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            Error::ConfigParse(format!("invalid suite '{}': {}", path.display(), e))
        })
    }

    /// Build the stub backend, if any stub routes are declared
    pub fn stub_backend(&self) -> Option<StubBackend> {
        if self.stubs.is_empty() {
            return None;
        }

        let mut backend = StubBackend::new();
        for stub in &self.stubs {
            let bodies = if stub.bodies.is_empty() {
                vec![stub.body.clone().unwrap_or_default()]
            } else {
                stub.bodies.clone()
            };
            backend.route(stub.method, &stub.path, stub.status, bodies);
        }
        Some(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Tier;

    const SAMPLE: &str = r#"
name: storefront smoke
description: Checks the greeting and data endpoints.

server:
  base_url: http://127.0.0.1:8080
  ready_path: /health
  ready_timeout_secs: 5

stubs:
  - { method: GET, path: /hello, status: 200, body: "Hello World" }
  - { method: GET, path: /data, bodies: ["fact one", "fact two"] }

cases:
  - name: greeting responds
    tier: unit
    request: { method: GET, path: /hello }
    expect: { status: 200, body_equals: "Hello World" }
  - name: data endpoint varies
    tier: acceptance
    request: { method: GET, path: /data }
    expect: { not_null: true, distinct_consecutive: true }
"#;

    #[test]
    fn parses_a_full_suite() {
        let suite: SuiteConfig = serde_yaml::from_str(SAMPLE).expect("sample should parse");
        assert_eq!(suite.name, "storefront smoke");
        assert_eq!(suite.server.ready_path, "/health");
        assert_eq!(suite.server.ready_timeout_secs, Some(5));
        assert_eq!(suite.cases.len(), 2);
        assert_eq!(suite.cases[0].tier, Tier::Unit);
        assert_eq!(suite.cases[1].tier, Tier::Acceptance);
        assert!(suite.cases[1].expect.distinct_consecutive);
    }

    #[test]
    fn ready_path_defaults_to_hello() {
        let suite: SuiteConfig = serde_yaml::from_str(
            r#"
name: minimal
server:
  base_url: http://127.0.0.1:8080
cases: []
"#,
        )
        .expect("minimal suite should parse");
        assert_eq!(suite.server.ready_path, "/hello");
        assert!(suite.server.ready_timeout_secs.is_none());
        assert!(suite.stub_backend().is_none());
    }

    #[test]
    fn stub_backend_covers_declared_routes() {
        let suite: SuiteConfig = serde_yaml::from_str(SAMPLE).expect("sample should parse");
        assert!(suite.stub_backend().is_some());
    }

    #[test]
    fn load_rejects_missing_file() {
        let result = SuiteConfig::load(Path::new("/nonexistent/suite.yaml"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result: std::result::Result<SuiteConfig, _> = serde_yaml::from_str("cases: 12");
        assert!(result.is_err());
    }
}
