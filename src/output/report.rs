//! Batch report persistence

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::config::is_yaml_file;
use crate::models::BatchReport;

/// Save a batch report as YAML or pretty JSON, chosen by extension
pub fn save_report(report: &BatchReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    if is_yaml_file(path) {
        serde_yaml::to_writer(writer, report).context("Failed to write report")?;
    } else {
        serde_json::to_writer_pretty(writer, report).context("Failed to write report")?;
    }

    info!("Saved batch report to {}", path.display());
    Ok(())
}
