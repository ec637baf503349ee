//! CLI command definitions
//!
//! Defines the clap commands for the harness.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Subcommand;

use crate::client::Method;
use crate::common::Error;
use crate::runner::Tier;

/// Which tiers a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierFilter {
    All,
    Only(Tier),
}

impl TierFilter {
    /// Tiers to run, in canonical order
    pub fn tiers(&self) -> Vec<Tier> {
        match self {
            TierFilter::All => Tier::ALL.to_vec(),
            TierFilter::Only(tier) => vec![*tier],
        }
    }
}

impl FromStr for TierFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(TierFilter::All)
        } else {
            Ok(TierFilter::Only(s.parse()?))
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a suite from a YAML file
    Run {
        /// Path to the YAML suite file
        suite: PathBuf,

        /// Tier to run: unit, integration, acceptance, or all
        #[arg(long, default_value = "all")]
        tier: TierFilter,

        /// Halt each case at its first failed expectation
        #[arg(long)]
        stop_on_first_failure: bool,

        /// Emit the tier reports as JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Probe a single endpoint and check expectations against the response
    Check {
        /// Endpoint path, e.g. /hello
        path: String,

        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: Method,

        /// Base URL of the server under test
        #[arg(long)]
        base_url: Option<String>,

        /// Expected status code
        #[arg(long)]
        status: Option<u16>,

        /// Expected exact body
        #[arg(long)]
        body_equals: Option<String>,
    },

    /// Sample an endpoint repeatedly and check consecutive responses differ
    Sample {
        /// Endpoint path, e.g. /data
        path: String,

        /// Base URL of the server under test
        #[arg(long)]
        base_url: Option<String>,

        /// Number of consecutive-response pairs to compare
        #[arg(long)]
        samples: Option<usize>,

        /// Minimum number of distinct pairs for a pass
        #[arg(long)]
        threshold: Option<usize>,
    },
}
