//! Declarative response checks
//!
//! An `AssertionSet` evaluates expectations against captured exchanges and
//! collects every mismatch instead of bailing at the first one, so a report
//! can show everything wrong with a response at once. Stop-on-first-failure
//! mode turns later checks into no-ops once a mismatch is recorded.

use std::fmt;

use crate::client::Exchange;
use crate::common::Error;

/// One failed expectation, with expected/actual detail
#[derive(Debug, Clone)]
pub struct Mismatch {
    pub check: &'static str,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.check, self.expected, self.actual
        )
    }
}

impl From<Mismatch> for Error {
    fn from(mismatch: Mismatch) -> Self {
        Error::AssertionFailed {
            expected: format!("{} {}", mismatch.check, mismatch.expected),
            actual: mismatch.actual,
        }
    }
}

#[derive(Debug, Default)]
pub struct AssertionSet {
    mismatches: Vec<Mismatch>,
    stop_on_first: bool,
}

impl AssertionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later expectations become no-ops once one has failed
    pub fn stop_on_first_failure() -> Self {
        Self {
            mismatches: Vec::new(),
            stop_on_first: true,
        }
    }

    fn halted(&self) -> bool {
        self.stop_on_first && !self.mismatches.is_empty()
    }

    fn record(&mut self, check: &'static str, expected: String, actual: String) {
        self.mismatches.push(Mismatch {
            check,
            expected,
            actual,
        });
    }

    pub fn expect_status(&mut self, exchange: &Exchange, code: u16) -> &mut Self {
        if self.halted() {
            return self;
        }
        if exchange.status != code {
            self.record("status", code.to_string(), exchange.describe_status());
        }
        self
    }

    pub fn expect_body_equals(&mut self, exchange: &Exchange, text: &str) -> &mut Self {
        if self.halted() {
            return self;
        }
        if exchange.body != text {
            self.record(
                "body",
                format!("{text:?}"),
                if exchange.is_connected() {
                    format!("{:?}", exchange.body)
                } else {
                    exchange.describe_status()
                },
            );
        }
        self
    }

    pub fn expect_body_contains(&mut self, exchange: &Exchange, text: &str) -> &mut Self {
        if self.halted() {
            return self;
        }
        if !exchange.body.contains(text) {
            self.record(
                "body",
                format!("containing {text:?}"),
                format!("{:?}", exchange.body),
            );
        }
        self
    }

    /// A non-null response: connected and with a non-empty body
    pub fn expect_not_null(&mut self, exchange: &Exchange) -> &mut Self {
        if self.halted() {
            return self;
        }
        if !exchange.is_connected() {
            self.record(
                "body",
                "a response".to_string(),
                exchange.describe_status(),
            );
        } else if exchange.body.is_empty() {
            self.record("body", "non-empty".to_string(), "empty".to_string());
        }
        self
    }

    /// Two consecutive responses must differ
    pub fn expect_distinct(&mut self, first: &Exchange, second: &Exchange) -> &mut Self {
        if self.halted() {
            return self;
        }
        if first.body == second.body {
            self.record(
                "consecutive bodies",
                "distinct values".to_string(),
                format!("{:?} both times", first.body),
            );
        }
        self
    }

    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn into_mismatches(self) -> Vec<Mismatch> {
        self.mismatches
    }
}
