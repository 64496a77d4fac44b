//! Per-target statistics and batch aggregates
//!
//! Defines the parsed trailer record, per-target outcomes and the
//! batch-wide totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;

use super::{MissingTarget, Target};

/// Statistics parsed from one runner trailer line
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub total: u64,
    pub failed: u64,
    pub skipped: u64,
    /// Elapsed seconds reported by the runner
    pub time: f64,
}

impl StatRecord {
    pub fn new(total: u64, failed: u64, skipped: u64, time: f64) -> Self {
        Self {
            total,
            failed,
            skipped,
            time,
        }
    }
}

impl fmt::Display for StatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total, {} failed, {} skipped, took {} seconds",
            self.total, self.failed, self.skipped, self.time
        )
    }
}

/// Sum of every record collected during a batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub total: u64,
    pub failed: u64,
    pub skipped: u64,
    pub time: f64,
}

impl AggregateResult {
    /// Fold records into a fresh aggregate
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a StatRecord>) -> Self {
        records.into_iter().copied().sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl AddAssign<StatRecord> for AggregateResult {
    fn add_assign(&mut self, record: StatRecord) {
        self.total = self.total.saturating_add(record.total);
        self.failed = self.failed.saturating_add(record.failed);
        self.skipped = self.skipped.saturating_add(record.skipped);
        self.time += record.time;
    }
}

impl Sum<StatRecord> for AggregateResult {
    fn sum<I: Iterator<Item = StatRecord>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, record| {
            acc += record;
            acc
        })
    }
}

impl fmt::Display for AggregateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total, {} failed, {} skipped, took {} seconds",
            self.total, self.failed, self.skipped, self.time
        )
    }
}

/// What one runner invocation produced
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetOutcome {
    Stats(StatRecord),
    TrailerNotFound,
    TrailerMalformed { message: String },
    SpawnFailed { message: String },
    /// The process started but its output or exit status was lost
    InvokeFailed { message: String },
}

impl TargetOutcome {
    pub fn record(&self) -> Option<&StatRecord> {
        match self {
            TargetOutcome::Stats(record) => Some(record),
            _ => None,
        }
    }

    /// Error text for outcomes that should be surfaced in the final report
    pub fn error(&self) -> Option<&str> {
        match self {
            TargetOutcome::TrailerMalformed { message }
            | TargetOutcome::SpawnFailed { message }
            | TargetOutcome::InvokeFailed { message } => Some(message),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TargetOutcome::Stats(_) => "OK",
            TargetOutcome::TrailerNotFound => "NO TRAILER",
            TargetOutcome::TrailerMalformed { .. } => "MALFORMED",
            TargetOutcome::SpawnFailed { .. } => "SPAWN FAILED",
            TargetOutcome::InvokeFailed { .. } => "INVOKE FAILED",
        }
    }
}

/// Result of running one target
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetResult {
    pub target: Target,
    pub command: String,
    /// `None` when the process never started or was killed by a signal
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
    pub outcome: TargetOutcome,
}

impl TargetResult {
    pub fn record(&self) -> Option<&StatRecord> {
        self.outcome.record()
    }
}

impl fmt::Display for TargetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] [{}ms]", self.target, self.outcome.label(), self.duration_ms)?;
        match &self.outcome {
            TargetOutcome::Stats(record) => write!(f, " - {record}"),
            other => match other.error() {
                Some(message) => write!(f, " - {message}"),
                None => Ok(()),
            },
        }
    }
}

/// Everything a finished batch produced
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub results: Vec<TargetResult>,
    pub missing: Vec<MissingTarget>,
    pub aggregate: AggregateResult,
}

impl BatchReport {
    pub fn new(
        started_at: DateTime<Utc>,
        results: Vec<TargetResult>,
        missing: Vec<MissingTarget>,
    ) -> Self {
        let aggregate = AggregateResult::from_records(results.iter().filter_map(|r| r.record()));
        Self {
            started_at,
            results,
            missing,
            aggregate,
        }
    }

    /// Per-target errors worth reporting, in run order
    pub fn errors(&self) -> Vec<(&Target, &str)> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.error().map(|e| (&r.target, e)))
            .collect()
    }
}
