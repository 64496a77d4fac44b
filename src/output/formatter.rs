//! Output formatters for batch results
//!
//! Provides table, JSON, and summary output formats plus the final
//! grand-total line.

use crate::models::{AggregateResult, BatchReport, TargetOutcome, TargetResult};

const GREEN: &str = "\x1b[32m";
const MAGENTA: &str = "\x1b[35m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colorize {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn format_result_line(&self, result: &TargetResult) -> String {
        let (color, label) = match &result.outcome {
            TargetOutcome::Stats(record) if record.failed > 0 => (MAGENTA, "FAIL"),
            TargetOutcome::Stats(_) => (GREEN, "PASS"),
            TargetOutcome::TrailerNotFound => (YELLOW, "NO TRAILER"),
            TargetOutcome::TrailerMalformed { .. } => (RED, "MALFORMED"),
            TargetOutcome::SpawnFailed { .. } => (RED, "SPAWN FAILED"),
            TargetOutcome::InvokeFailed { .. } => (RED, "INVOKE FAILED"),
        };
        let exit = result
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());

        let detail = match &result.outcome {
            TargetOutcome::Stats(record) => record.to_string(),
            other => other.error().unwrap_or_default().to_string(),
        };

        format!(
            "{} {:12} exit {:>3} [{:>6}ms] {}",
            self.paint(CYAN, &result.target.to_string()),
            self.paint(color, label),
            exit,
            result.duration_ms,
            detail
        )
    }

    /// Format the whole batch report
    pub fn format_report(&self, report: &BatchReport) -> String {
        match self.format {
            OutputFormat::Table => self.format_report_table(report),
            OutputFormat::Json => serde_json::to_string(report).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Summary => self.format_final(&report.aggregate),
        }
    }

    fn format_report_table(&self, report: &BatchReport) -> String {
        let mut output = String::new();

        output.push_str("\nAssemblies\n");
        output.push_str("──────────────────────────────────────────────────────────────────────\n");
        for result in &report.results {
            output.push_str(&format!("  {}\n", self.format_result_line(result)));
        }

        if !report.missing.is_empty() {
            output.push_str("\nSkipped (not found)\n");
            for missing in &report.missing {
                output.push_str(&format!("  {}\n", self.paint(YELLOW, &missing.to_string())));
            }
        }

        let errors = report.errors();
        if !errors.is_empty() {
            output.push_str("\nErrors\n");
            for (target, message) in errors {
                output.push_str(&format!("  {}: {}\n", target, self.paint(RED, message)));
            }
        }

        output.push('\n');
        output.push_str(&self.format_final(&report.aggregate));
        output
    }

    /// Format the grand total, highlighted by whether anything failed
    pub fn format_final(&self, aggregate: &AggregateResult) -> String {
        let color = if aggregate.has_failures() {
            MAGENTA
        } else {
            GREEN
        };
        format!(
            "-----------------------------Final-----------------------------------\n{}",
            self.paint(color, &aggregate.to_string())
        )
    }
}
