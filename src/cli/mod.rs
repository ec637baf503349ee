//! CLI command handling
//!
//! Dispatches CLI commands and maps run outcomes to exit codes:
//! 0 all-pass, 1 any failure, 2 setup abort.

pub mod ready;

use std::time::Duration;

use colored::Colorize;

use crate::asserts::AssertionSet;
use crate::client::{Backend, HttpBackend, Method};
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::report;
use crate::sampling;
use crate::suite::{self, SuiteConfig, SuiteOptions};

const EXIT_OK: i32 = 0;
const EXIT_FAILED: i32 = 1;

/// Dispatch a CLI command, returning the process exit code
pub async fn dispatch(command: Commands) -> Result<i32> {
    let config = Config::load()?;

    match command {
        Commands::Run {
            suite,
            tier,
            stop_on_first_failure,
            json,
        } => {
            let suite_config = SuiteConfig::load(&suite)?;
            let opts = SuiteOptions {
                tiers: tier.tiers(),
                stop_on_first: stop_on_first_failure,
                request_timeout: Duration::from_secs(config.timeouts.request_secs),
                default_ready_timeout: Duration::from_secs(config.timeouts.ready_secs),
                quiet: json,
            };

            let outcome = suite::run_suite(&suite_config, &opts).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.reports)?);
            } else {
                println!();
                print!("{}", report::render(&outcome.reports));
            }

            let failed: usize = outcome.reports.iter().map(|r| r.fail_count).sum();
            if failed == 0 {
                if !json {
                    println!("{}", "All tiers passed".green().bold());
                }
                Ok(EXIT_OK)
            } else {
                if !json {
                    println!("{}", format!("{failed} case(s) failed").red().bold());
                }
                Ok(EXIT_FAILED)
            }
        }

        Commands::Check {
            path,
            method,
            base_url,
            status,
            body_equals,
        } => {
            let base_url = base_url.unwrap_or(config.defaults.base_url);
            let backend = HttpBackend::new(
                &base_url,
                Duration::from_secs(config.timeouts.request_secs),
            )?;

            let exchange = backend.execute(method, &path).await;
            if !exchange.is_connected() {
                return Err(Error::ServerUnreachable(
                    exchange
                        .error
                        .unwrap_or_else(|| "no response".to_string()),
                ));
            }

            println!(
                "{} {} -> {} ({} ms)",
                method,
                path,
                exchange.status,
                exchange.elapsed_ms
            );
            if !exchange.body.is_empty() {
                println!("{}", exchange.body);
            }

            let mut checks = AssertionSet::new();
            if let Some(code) = status {
                checks.expect_status(&exchange, code);
            }
            if let Some(text) = &body_equals {
                checks.expect_body_equals(&exchange, text);
            }

            if checks.passed() {
                Ok(EXIT_OK)
            } else {
                for mismatch in checks.mismatches() {
                    println!("{} {}", "✗".red(), mismatch);
                }
                Ok(EXIT_FAILED)
            }
        }

        Commands::Sample {
            path,
            base_url,
            samples,
            threshold,
        } => {
            let base_url = base_url.unwrap_or(config.defaults.base_url);
            let samples = samples.unwrap_or(config.sampling.samples);
            let threshold = threshold.unwrap_or(config.sampling.threshold);
            let backend = HttpBackend::new(
                &base_url,
                Duration::from_secs(config.timeouts.request_secs),
            )?;

            let report =
                sampling::sample_distinct(&backend, Method::Get, &path, samples, threshold)
                    .await?;

            println!(
                "{} distinct in {} consecutive pairs ({} null bodies, threshold {})",
                report.distinct, report.samples, report.null_bodies, report.threshold
            );

            if report.passed() {
                println!("{}", "Endpoint varies across calls".green().bold());
                Ok(EXIT_OK)
            } else {
                println!(
                    "{}",
                    "Endpoint repeated itself too often (flaky or broken randomness?)"
                        .red()
                        .bold()
                );
                Ok(EXIT_FAILED)
            }
        }
    }
}
