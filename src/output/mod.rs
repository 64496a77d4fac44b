//! Output formatting module
//!
//! Provides output formats for batch results and report persistence.

mod formatter;
mod report;

pub use formatter::{OutputFormat, ResultFormatter};
pub use report::save_report;
