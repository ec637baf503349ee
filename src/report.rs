//! Per-tier reports and the summary formatter
//!
//! Reports are recomputed from the full case-record list after a run,
//! never accumulated incrementally, so the counts cannot go stale.

use std::fmt::Write as _;

use serde::Serialize;

use crate::runner::{CaseRecord, Tier};

/// Aggregated verdict for one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierReport {
    pub tier: Tier,
    pub pass_count: usize,
    pub fail_count: usize,
    pub total_elapsed_ms: u64,
}

impl TierReport {
    /// Recompute the aggregate from scratch for one tier
    pub fn from_records(tier: Tier, records: &[CaseRecord]) -> Self {
        let mut pass_count = 0;
        let mut fail_count = 0;
        let mut total_elapsed_ms = 0;

        for record in records.iter().filter(|r| r.tier == tier) {
            if record.passed {
                pass_count += 1;
            } else {
                fail_count += 1;
            }
            total_elapsed_ms += record.elapsed_ms;
        }

        Self {
            tier,
            pass_count,
            fail_count,
            total_elapsed_ms,
        }
    }

    pub fn case_count(&self) -> usize {
        self.pass_count + self.fail_count
    }
}

/// Build one report per tier that ran, in canonical tier order
pub fn tier_reports(records: &[CaseRecord], ran: &[Tier]) -> Vec<TierReport> {
    Tier::ALL
        .iter()
        .copied()
        .filter(|tier| ran.contains(tier))
        .map(|tier| TierReport::from_records(tier, records))
        .collect()
}

/// Render the summary table.
///
/// Pure function of its input; tiers always appear unit → integration →
/// acceptance regardless of run order or elapsed time. The cost column
/// shows each tier's total elapsed as a multiple of the fastest timed tier.
pub fn render(reports: &[TierReport]) -> String {
    let mut ordered: Vec<&TierReport> = reports.iter().collect();
    ordered.sort_by_key(|r| r.tier);

    let fastest = ordered
        .iter()
        .map(|r| r.total_elapsed_ms)
        .filter(|&ms| ms > 0)
        .min();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>5} {:>5} {:>10} {:>8}",
        "tier", "pass", "fail", "elapsed", "cost"
    );

    for report in &ordered {
        let cost = match fastest {
            Some(f) if report.total_elapsed_ms > 0 => {
                format!("{:.1}x", report.total_elapsed_ms as f64 / f as f64)
            }
            _ => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<12} {:>5} {:>5} {:>7} ms {:>8}",
            report.tier.as_str(),
            report.pass_count,
            report.fail_count,
            report.total_elapsed_ms,
            cost
        );
    }

    let passed: usize = ordered.iter().map(|r| r.pass_count).sum();
    let failed: usize = ordered.iter().map(|r| r.fail_count).sum();
    let _ = writeln!(out, "\n{passed} passed, {failed} failed");

    out
}
