//! Repeated-sampling distinctness check
//!
//! Exact inequality of two calls to a variable endpoint cannot be guaranteed
//! on every run, so the property is checked statistically: N+1 requests give
//! N consecutive pairs, and the endpoint passes when at least `threshold`
//! pairs are non-null and distinct.

use indicatif::{ProgressBar, ProgressStyle};

use crate::client::{Backend, Method};
use crate::common::Result;

/// Outcome of one sampling run
#[derive(Debug, Clone)]
pub struct SampleReport {
    /// Consecutive pairs compared
    pub samples: usize,
    /// Pairs that were non-null and distinct
    pub distinct: usize,
    /// Responses with no body (empty or unreachable)
    pub null_bodies: usize,
    /// Minimum distinct pairs for a pass
    pub threshold: usize,
}

impl SampleReport {
    pub fn passed(&self) -> bool {
        self.distinct >= self.threshold
    }
}

/// Sample `path` repeatedly and compare consecutive responses
pub async fn sample_distinct(
    backend: &dyn Backend,
    method: Method,
    path: &str,
    samples: usize,
    threshold: usize,
) -> Result<SampleReport> {
    let bar = ProgressBar::new(samples as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan} {pos}/{len} samples")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut previous = backend.execute(method, path).await;
    let mut distinct = 0;
    let mut null_bodies = usize::from(previous.body.is_empty());

    for _ in 0..samples {
        let current = backend.execute(method, path).await;
        if current.body.is_empty() {
            null_bodies += 1;
        } else if !previous.body.is_empty() && current.body != previous.body {
            distinct += 1;
        }
        previous = current;
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(SampleReport {
        samples,
        distinct,
        null_bodies,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StubBackend;

    #[tokio::test]
    async fn rotating_endpoint_passes_the_distinctness_check() {
        let mut backend = StubBackend::new();
        backend.route(
            Method::Get,
            "/data",
            200,
            vec!["fact one".into(), "fact two".into(), "fact three".into()],
        );

        let report = sample_distinct(&backend, Method::Get, "/data", 20, 19)
            .await
            .unwrap();
        assert_eq!(report.distinct, 20);
        assert_eq!(report.null_bodies, 0);
        assert!(report.passed());
    }

    #[tokio::test]
    async fn fixed_endpoint_fails_the_distinctness_check() {
        let mut backend = StubBackend::new();
        backend.route(Method::Get, "/hello", 200, vec!["Hello World".into()]);

        let report = sample_distinct(&backend, Method::Get, "/hello", 10, 1)
            .await
            .unwrap();
        assert_eq!(report.distinct, 0);
        assert!(!report.passed());
    }

    #[tokio::test]
    async fn null_bodies_never_count_as_distinct() {
        let mut backend = StubBackend::new();
        backend.route(
            Method::Get,
            "/flaky",
            200,
            vec!["something".into(), String::new()],
        );

        let report = sample_distinct(&backend, Method::Get, "/flaky", 10, 10)
            .await
            .unwrap();
        assert_eq!(report.distinct, 0);
        assert_eq!(report.null_bodies, 5);
        assert!(!report.passed());
    }
}
