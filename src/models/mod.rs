//! Data models for xUnit batch runs
//!
//! This module contains the targets, per-target statistics and batch
//! aggregates used throughout the application.

mod stats;
mod target;

pub use stats::{AggregateResult, BatchReport, StatRecord, TargetOutcome, TargetResult};
pub use target::{resolve_targets, MissingTarget, Target};
