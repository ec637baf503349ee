//! Suite execution
//!
//! Runs setup steps, launches and awaits the server under test, then drives
//! one tier runner per requested tier. The acceptance tier always exercises
//! the full stack over HTTP; unit and integration tiers run against the
//! suite's stub routes when any are declared.

use std::process::Stdio;
use std::time::Duration;

use colored::Colorize;
use tokio::process::{Child, Command as TokioCommand};

use crate::cli::ready;
use crate::client::{Backend, HttpBackend};
use crate::common::{Error, Result};
use crate::report::{tier_reports, TierReport};
use crate::runner::{CaseRecord, Tier, TierRunner};

use super::config::{ServerConfig, SetupStep, SuiteConfig};

/// Options for one suite run
pub struct SuiteOptions {
    /// Tiers to run, in canonical order
    pub tiers: Vec<Tier>,
    /// Halt each case at its first failed expectation
    pub stop_on_first: bool,
    /// Global per-request timeout
    pub request_timeout: Duration,
    /// Readiness timeout used when the suite does not set one
    pub default_ready_timeout: Duration,
    /// Suppress progress output (JSON mode)
    pub quiet: bool,
}

/// Everything a run produced
pub struct SuiteOutcome {
    pub records: Vec<CaseRecord>,
    pub reports: Vec<TierReport>,
}

/// Run the requested tiers of a suite
pub async fn run_suite(config: &SuiteConfig, opts: &SuiteOptions) -> Result<SuiteOutcome> {
    if !opts.quiet {
        println!("\n{} {}", "Running suite:".blue().bold(), config.name.bold());
        if let Some(description) = &config.description {
            println!("  {}", description.dimmed());
        }
    }

    run_setup_steps(&config.setup, opts.quiet).await?;

    let mut server = launch_server(&config.server, opts.quiet)?;
    let http = HttpBackend::new(&config.server.base_url, opts.request_timeout)?;
    let stub = config.stub_backend();

    let ready_timeout = config
        .server
        .ready_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(opts.default_ready_timeout);

    let mut records = Vec::new();
    let mut ran = Vec::new();
    let mut ready_checked = false;

    let result = async {
        for &tier in &opts.tiers {
            let declared = config.cases.iter().filter(|c| c.tier == tier).count();
            if declared == 0 {
                tracing::debug!(%tier, "no cases declared, skipping tier");
                continue;
            }

            let uses_live = stub.is_none() || tier == Tier::Acceptance;
            let backend: &dyn Backend = match &stub {
                Some(stub) if tier != Tier::Acceptance => stub,
                _ => &http,
            };

            let mut runner =
                TierRunner::new(backend).stop_on_first_failure(opts.stop_on_first);

            if uses_live && !ready_checked {
                if let Err(e) =
                    ready::wait_until_ready(&http, &config.server.ready_path, ready_timeout)
                        .await
                {
                    runner.abort();
                    tracing::error!(%tier, "server under test never became ready");
                    return Err(e);
                }
                ready_checked = true;
            }

            if !opts.quiet {
                println!("\n{}", format!("{tier}:").cyan());
            }
            runner.run_tier(tier, &config.cases, opts.quiet).await;
            records.extend(runner.into_records());
            ran.push(tier);
        }
        Ok(())
    }
    .await;

    if let Some(child) = server.as_mut() {
        let _ = child.kill().await;
    }
    result?;

    let reports = tier_reports(&records, &ran);
    Ok(SuiteOutcome { records, reports })
}

/// Run setup shell steps; any failure aborts the whole run
async fn run_setup_steps(steps: &[SetupStep], quiet: bool) -> Result<()> {
    if steps.is_empty() {
        return Ok(());
    }

    if !quiet {
        println!("\n{}", "Setup:".cyan());
    }

    for step in steps {
        let status = TokioCommand::new("sh")
            .arg("-c")
            .arg(&step.shell)
            .stdin(Stdio::null())
            .stdout(if quiet { Stdio::null() } else { Stdio::inherit() })
            .stderr(if quiet { Stdio::null() } else { Stdio::inherit() })
            .status()
            .await
            .map_err(|e| Error::SetupAbort(format!("setup command failed to execute: {e}")))?;

        if !status.success() {
            return Err(Error::SetupAbort(format!(
                "setup command '{}' exited with {:?}",
                step.shell,
                status.code()
            )));
        }

        if !quiet {
            println!("  {} {}", "✓".green(), step.shell.dimmed());
        }
    }

    Ok(())
}

/// Launch the server under test, when the suite declares a start command
fn launch_server(server: &ServerConfig, quiet: bool) -> Result<Option<Child>> {
    let Some(command) = &server.start else {
        return Ok(None);
    };

    // Resolve the program up front so a missing binary fails with a clear
    // message instead of a readiness timeout
    if let Some(program) = command.split_whitespace().next() {
        if !program.contains('/') {
            which::which(program).map_err(|_| {
                Error::Config(format!("server command '{program}' not found in PATH"))
            })?;
        }
    }

    if !quiet {
        println!("\n{}", "Starting server under test...".cyan());
    }

    let child = TokioCommand::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::SetupAbort(format!("failed to start server under test: {e}")))?;

    Ok(Some(child))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite_from_yaml(yaml: &str) -> SuiteConfig {
        serde_yaml::from_str(yaml).expect("test suite should parse")
    }

    fn options(tiers: Vec<Tier>) -> SuiteOptions {
        SuiteOptions {
            tiers,
            stop_on_first: false,
            request_timeout: Duration::from_secs(2),
            default_ready_timeout: Duration::from_secs(1),
            quiet: true,
        }
    }

    const STUBBED_SUITE: &str = r#"
name: stub only
server:
  base_url: http://127.0.0.1:1
stubs:
  - { method: GET, path: /hello, body: "Hello World" }
  - { method: GET, path: /data, bodies: ["fact one", "fact two"] }
cases:
  - name: greeting responds
    tier: unit
    request: { method: GET, path: /hello }
    expect: { status: 200, body_equals: "Hello World" }
  - name: data varies
    tier: integration
    request: { method: GET, path: /data }
    expect: { not_null: true, distinct_consecutive: true }
"#;

    #[tokio::test]
    async fn stubbed_tiers_run_without_a_live_server() {
        // base_url points at a dead port; stub tiers must never touch it
        let config = suite_from_yaml(STUBBED_SUITE);
        let outcome = run_suite(&config, &options(vec![Tier::Unit, Tier::Integration]))
            .await
            .expect("stubbed run should succeed");

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.records.iter().all(|r| r.passed));
        let tiers: Vec<Tier> = outcome.reports.iter().map(|r| r.tier).collect();
        assert_eq!(tiers, [Tier::Unit, Tier::Integration]);
    }

    #[tokio::test]
    async fn pass_and_fail_counts_partition_every_tier() {
        let config = suite_from_yaml(
            r#"
name: mixed verdicts
server:
  base_url: http://127.0.0.1:1
stubs:
  - { method: GET, path: /hello, body: "Hello World" }
cases:
  - name: right body
    tier: unit
    request: { method: GET, path: /hello }
    expect: { body_equals: "Hello World" }
  - name: wrong body
    tier: unit
    request: { method: GET, path: /hello }
    expect: { body_equals: "Goodbye" }
  - name: wrong status
    tier: unit
    request: { method: GET, path: /hello }
    expect: { status: 500 }
"#,
        );
        let outcome = run_suite(&config, &options(vec![Tier::Unit]))
            .await
            .expect("run should succeed");

        let report = &outcome.reports[0];
        assert_eq!(report.pass_count, 1);
        assert_eq!(report.fail_count, 2);
        assert_eq!(report.case_count(), 3);
    }

    #[tokio::test]
    async fn acceptance_against_dead_server_aborts_with_ready_timeout() {
        let config = suite_from_yaml(
            r#"
name: unreachable
server:
  base_url: http://127.0.0.1:1
  ready_timeout_secs: 1
cases:
  - name: greeting responds
    tier: acceptance
    request: { method: GET, path: /hello }
    expect: { status: 200 }
"#,
        );
        let result = run_suite(&config, &options(vec![Tier::Acceptance])).await;
        assert!(matches!(result, Err(Error::ReadyTimeout(_))));
    }

    #[tokio::test]
    async fn failing_setup_step_aborts_the_run() {
        let config = suite_from_yaml(
            r#"
name: broken setup
setup:
  - shell: "exit 3"
server:
  base_url: http://127.0.0.1:1
cases: []
"#,
        );
        let result = run_suite(&config, &options(vec![Tier::Unit])).await;
        assert!(matches!(result, Err(Error::SetupAbort(_))));
    }

    #[tokio::test]
    async fn missing_server_command_is_reported_before_launch() {
        let config = suite_from_yaml(
            r#"
name: missing server binary
server:
  base_url: http://127.0.0.1:1
  start: definitely-not-a-real-binary-1138
cases: []
"#,
        );
        let result = run_suite(&config, &options(vec![Tier::Unit])).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn tiers_with_no_cases_are_skipped() {
        let config = suite_from_yaml(STUBBED_SUITE);
        let outcome = run_suite(&config, &options(Tier::ALL.to_vec()))
            .await
            .expect("run should succeed");

        // No acceptance cases declared, so no acceptance report (and no
        // attempt to reach the dead base_url)
        let tiers: Vec<Tier> = outcome.reports.iter().map(|r| r.tier).collect();
        assert_eq!(tiers, [Tier::Unit, Tier::Integration]);
    }
}
