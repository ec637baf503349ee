//! Tier runner
//!
//! Executes the test cases of one tier sequentially, in declared order, and
//! records a per-case verdict with elapsed time. Case failures never stop a
//! run; only setup-level problems abort it.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::asserts::AssertionSet;
use crate::client::{Backend, Method};
use crate::common::Error;

/// Test pyramid tier; the ordering is the canonical report order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Unit,
    Integration,
    Acceptance,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Unit, Tier::Integration, Tier::Acceptance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Unit => "unit",
            Tier::Integration => "integration",
            Tier::Acceptance => "acceptance",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unit" => Ok(Tier::Unit),
            "integration" => Ok(Tier::Integration),
            "acceptance" => Ok(Tier::Acceptance),
            other => Err(Error::Config(format!(
                "unknown tier '{other}' (expected unit, integration, or acceptance)"
            ))),
        }
    }
}

/// The request a test case issues
#[derive(Debug, Clone, Deserialize)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
}

/// Declarative expectations evaluated against the captured exchange
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Expectations {
    /// Expected status code
    pub status: Option<u16>,
    /// Expected exact body
    pub body_equals: Option<String>,
    /// Expected body substring
    pub body_contains: Option<String>,
    /// Require a response with a non-empty body
    #[serde(default)]
    pub not_null: bool,
    /// Issue the request twice and require two non-null, distinct bodies
    #[serde(default)]
    pub distinct_consecutive: bool,
}

/// One test case; belongs to exactly one tier
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub tier: Tier,
    pub request: RequestSpec,
    #[serde(default)]
    pub expect: Expectations,
}

/// Verdict for one executed case
#[derive(Debug, Clone)]
pub struct CaseRecord {
    pub name: String,
    pub tier: Tier,
    pub passed: bool,
    pub mismatches: Vec<String>,
    pub elapsed_ms: u64,
}

/// Runner lifecycle. Aborted is reached only on unrecoverable setup
/// failure; individual case failures keep the runner in Running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Aborted,
}

pub struct TierRunner<'a> {
    backend: &'a dyn Backend,
    stop_on_first: bool,
    state: RunState,
    records: Vec<CaseRecord>,
}

impl<'a> TierRunner<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self {
            backend,
            stop_on_first: false,
            state: RunState::Idle,
            records: Vec::new(),
        }
    }

    pub fn stop_on_first_failure(mut self, stop: bool) -> Self {
        self.stop_on_first = stop;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CaseRecord> {
        self.records
    }

    /// Mark the run as aborted before it produced results
    pub fn abort(&mut self) {
        self.state = RunState::Aborted;
    }

    /// Run every case of `tier` in declared order
    pub async fn run_tier(&mut self, tier: Tier, cases: &[TestCase], quiet: bool) {
        self.state = RunState::Running;

        for case in cases.iter().filter(|c| c.tier == tier) {
            let record = self.run_case(case).await;
            if !quiet {
                if record.passed {
                    println!(
                        "  {} {} ({} ms)",
                        "✓".green(),
                        record.name,
                        record.elapsed_ms
                    );
                } else {
                    println!(
                        "  {} {}: {}",
                        "✗".red(),
                        record.name,
                        record.mismatches.join("; ")
                    );
                }
            }
            self.records.push(record);
        }

        self.state = RunState::Completed;
    }

    async fn run_case(&self, case: &TestCase) -> CaseRecord {
        let start = Instant::now();
        let exchange = self
            .backend
            .execute(case.request.method, &case.request.path)
            .await;

        let mut checks = if self.stop_on_first {
            AssertionSet::stop_on_first_failure()
        } else {
            AssertionSet::new()
        };

        let expect = &case.expect;
        if let Some(code) = expect.status {
            checks.expect_status(&exchange, code);
        }
        if let Some(text) = &expect.body_equals {
            checks.expect_body_equals(&exchange, text);
        }
        if let Some(text) = &expect.body_contains {
            checks.expect_body_contains(&exchange, text);
        }
        if expect.not_null {
            checks.expect_not_null(&exchange);
        }
        if expect.distinct_consecutive {
            let second = self
                .backend
                .execute(case.request.method, &case.request.path)
                .await;
            checks
                .expect_not_null(&exchange)
                .expect_not_null(&second)
                .expect_distinct(&exchange, &second);
        }

        let mismatches: Vec<String> = checks
            .into_mismatches()
            .into_iter()
            .map(|m| m.to_string())
            .collect();

        CaseRecord {
            name: case.name.clone(),
            tier: case.tier,
            passed: mismatches.is_empty(),
            mismatches,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StubBackend;

    fn case(name: &str, tier: Tier, path: &str, expect: Expectations) -> TestCase {
        TestCase {
            name: name.to_string(),
            tier,
            request: RequestSpec {
                method: Method::Get,
                path: path.to_string(),
            },
            expect,
        }
    }

    fn greeting_backend() -> StubBackend {
        let mut backend = StubBackend::new();
        backend.route(Method::Get, "/hello", 200, vec!["Hello World".into()]);
        backend.route(
            Method::Get,
            "/data",
            200,
            vec!["fact one".into(), "fact two".into()],
        );
        backend
    }

    #[test]
    fn tier_parses_and_rejects() {
        assert_eq!("unit".parse::<Tier>().unwrap(), Tier::Unit);
        assert_eq!("Acceptance".parse::<Tier>().unwrap(), Tier::Acceptance);
        assert!("smoke".parse::<Tier>().is_err());
    }

    #[test]
    fn tier_ordering_is_unit_integration_acceptance() {
        assert!(Tier::Unit < Tier::Integration);
        assert!(Tier::Integration < Tier::Acceptance);
    }

    #[tokio::test]
    async fn runner_starts_idle_and_completes() {
        let backend = greeting_backend();
        let mut runner = TierRunner::new(&backend);
        assert_eq!(runner.state(), RunState::Idle);

        let cases = [case(
            "greeting responds",
            Tier::Unit,
            "/hello",
            Expectations {
                status: Some(200),
                body_equals: Some("Hello World".into()),
                ..Default::default()
            },
        )];
        runner.run_tier(Tier::Unit, &cases, true).await;

        assert_eq!(runner.state(), RunState::Completed);
        assert_eq!(runner.records().len(), 1);
        assert!(runner.records()[0].passed);
    }

    #[tokio::test]
    async fn case_failures_do_not_stop_the_tier() {
        let backend = greeting_backend();
        let mut runner = TierRunner::new(&backend);

        let cases = [
            case(
                "wrong body",
                Tier::Unit,
                "/hello",
                Expectations {
                    body_equals: Some("Goodbye".into()),
                    ..Default::default()
                },
            ),
            case(
                "right status",
                Tier::Unit,
                "/hello",
                Expectations {
                    status: Some(200),
                    ..Default::default()
                },
            ),
        ];
        runner.run_tier(Tier::Unit, &cases, true).await;

        assert_eq!(runner.state(), RunState::Completed);
        assert_eq!(runner.records().len(), 2);
        assert!(!runner.records()[0].passed);
        assert!(runner.records()[1].passed);
    }

    #[tokio::test]
    async fn only_cases_of_the_requested_tier_run_in_declared_order() {
        let backend = greeting_backend();
        let mut runner = TierRunner::new(&backend);

        let cases = [
            case("first", Tier::Unit, "/hello", Expectations::default()),
            case("skipped", Tier::Acceptance, "/hello", Expectations::default()),
            case("second", Tier::Unit, "/hello", Expectations::default()),
        ];
        runner.run_tier(Tier::Unit, &cases, true).await;

        let names: Vec<&str> = runner.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[tokio::test]
    async fn distinct_consecutive_passes_on_rotating_route() {
        let backend = greeting_backend();
        let mut runner = TierRunner::new(&backend);

        let cases = [case(
            "data varies",
            Tier::Unit,
            "/data",
            Expectations {
                distinct_consecutive: true,
                ..Default::default()
            },
        )];
        runner.run_tier(Tier::Unit, &cases, true).await;
        assert!(runner.records()[0].passed);
    }

    #[tokio::test]
    async fn distinct_consecutive_fails_on_fixed_route() {
        let backend = greeting_backend();
        let mut runner = TierRunner::new(&backend);

        let cases = [case(
            "greeting should not vary",
            Tier::Unit,
            "/hello",
            Expectations {
                distinct_consecutive: true,
                ..Default::default()
            },
        )];
        runner.run_tier(Tier::Unit, &cases, true).await;
        assert!(!runner.records()[0].passed);
    }

    #[tokio::test]
    async fn abort_marks_the_runner_aborted() {
        let backend = greeting_backend();
        let mut runner = TierRunner::new(&backend);
        runner.abort();
        assert_eq!(runner.state(), RunState::Aborted);
        assert!(runner.records().is_empty());
    }

    #[tokio::test]
    async fn stop_on_first_failure_truncates_mismatch_list() {
        let backend = greeting_backend();
        let mut runner = TierRunner::new(&backend).stop_on_first_failure(true);

        let cases = [case(
            "everything wrong",
            Tier::Unit,
            "/hello",
            Expectations {
                status: Some(500),
                body_equals: Some("Goodbye".into()),
                ..Default::default()
            },
        )];
        runner.run_tier(Tier::Unit, &cases, true).await;
        assert_eq!(runner.records()[0].mismatches.len(), 1);
    }
}
