use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::domain::history::OperationRecord;

pub const HISTORY_CSV_HEADER: [&str; 7] = [
    "ID",
    "Operation",
    "Inputs",
    "Result",
    "Timestamp",
    "Execution Time (ms)",
    "Status",
];

pub const DEFAULT_EXPORT_FILE: &str = "operation_history.csv";

#[derive(Debug, PartialEq)]
pub enum ExportOutcome {
    /// Nothing to export; no file was written.
    Skipped,
    Written { path: PathBuf, rows: usize },
}

/// Materialize the whole history into one CSV string with the fixed
/// seven-column header. The Inputs cell is the JSON serialization of the
/// inputs map; quoting follows RFC 4180 (internal quotes doubled), so the
/// output re-parses with any standard CSV reader.
pub fn history_to_csv(records: &[OperationRecord]) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(HISTORY_CSV_HEADER)?;
    for record in records {
        writer.write_record(&[
            record.id.to_string(),
            record.operation.to_string(),
            Value::Object(record.inputs.clone()).to_string(),
            record.result.to_string(),
            normalized_timestamp(&record.timestamp),
            record.execution_time.to_string(),
            record.status.to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("could not flush csv writer: {}", err))?;
    String::from_utf8(bytes).context("csv output was not utf-8")
}

/// Write the history to `path`. An empty history performs no file write and
/// reports `Skipped` so the caller can surface a notice instead.
pub fn export_history(records: &[OperationRecord], path: &Path) -> anyhow::Result<ExportOutcome> {
    if records.is_empty() {
        return Ok(ExportOutcome::Skipped);
    }
    let csv = history_to_csv(records)?;
    fs::write(path, csv).with_context(|| format!("could not write {}", path.display()))?;
    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows: records.len(),
    })
}

/// Server timestamps arrive as strings, with or without an offset. Render
/// them uniformly as RFC 3339 UTC; anything unparseable passes through
/// verbatim.
fn normalized_timestamp(raw: &str) -> String {
    if let Ok(parsed) = raw.parse::<DateTime<FixedOffset>>() {
        return parsed.with_timezone(&Utc).to_rfc3339();
    }
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Utc.from_utc_datetime(&naive).to_rfc3339();
    }
    raw.to_string()
}
