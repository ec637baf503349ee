//! Configuration file handling
//!
//! Harness-level defaults live in an optional `config.toml`; suite files
//! carry everything specific to one server under test.

use serde::Deserialize;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Repeated-sampling settings
    #[serde(default)]
    pub sampling: Sampling,
}

/// Default settings
#[derive(Debug, Deserialize)]
pub struct Defaults {
    /// Base URL used when a command does not name one
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// Per-request timeout; bounds every exchange so an unreachable
    /// dependency cannot hang a run
    #[serde(default = "default_request")]
    pub request_secs: u64,

    /// Default readiness-poll timeout for the server under test
    #[serde(default = "default_ready")]
    pub ready_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: default_request(),
            ready_secs: default_ready(),
        }
    }
}

fn default_request() -> u64 {
    10
}
fn default_ready() -> u64 {
    15
}

/// Repeated-sampling settings for the distinctness property
#[derive(Debug, Deserialize)]
pub struct Sampling {
    /// Number of consecutive-response pairs to compare
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Minimum number of distinct pairs for a pass
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            threshold: default_threshold(),
        }
    }
}

fn default_samples() -> usize {
    100
}
fn default_threshold() -> usize {
    95
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }
}
