//! Trailer extraction
//!
//! Parses the console runner's final statistics line, for example
//! `12 total, 3 failed, 1 skipped, took 4.5 seconds`.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::StatRecord;

static TRAILER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\d+[ \t]total.*$").unwrap());

/// A trailer line that matched but could not be parsed
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("malformed trailer {line:?}: expected 4 comma-separated fields, found {found}")]
    FieldCount { line: String, found: usize },

    #[error("malformed trailer {line:?}: missing {field} value")]
    MissingValue { line: String, field: &'static str },

    #[error("malformed trailer {line:?}: invalid {field} value {value:?}")]
    InvalidValue {
        line: String,
        field: &'static str,
        value: String,
    },
}

/// Extract statistics from the captured stdout chunks of one invocation.
///
/// Only the last chunk is searched; a trailer split across two chunks is
/// not found. Returns `Ok(None)` when no trailer line is present.
pub fn extract_stats(chunks: &[String]) -> Result<Option<StatRecord>, ExtractError> {
    let Some(last) = chunks.last() else {
        return Ok(None);
    };

    match TRAILER_RE.find(last) {
        Some(m) => parse_trailer(m.as_str().trim_end_matches('\r')).map(Some),
        None => Ok(None),
    }
}

/// Parse one trailer line into a record
pub fn parse_trailer(line: &str) -> Result<StatRecord, ExtractError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 4 {
        return Err(ExtractError::FieldCount {
            line: line.to_string(),
            found: fields.len(),
        });
    }

    let total = parse_token(line, fields[0], 0, "total")?;
    let failed = parse_token(line, fields[1], 0, "failed")?;
    let skipped = parse_token(line, fields[2], 0, "skipped")?;
    // "took <seconds> seconds"
    let time: f64 = parse_token(line, fields[3], 1, "time")?;
    if !time.is_finite() || time < 0.0 {
        return Err(ExtractError::InvalidValue {
            line: line.to_string(),
            field: "time",
            value: time.to_string(),
        });
    }

    Ok(StatRecord::new(total, failed, skipped, time))
}

fn parse_token<T: std::str::FromStr>(
    line: &str,
    field: &str,
    index: usize,
    name: &'static str,
) -> Result<T, ExtractError> {
    let token = field
        .split_whitespace()
        .nth(index)
        .ok_or_else(|| ExtractError::MissingValue {
            line: line.to_string(),
            field: name,
        })?;

    token.parse().map_err(|_| ExtractError::InvalidValue {
        line: line.to_string(),
        field: name,
        value: token.to_string(),
    })
}
