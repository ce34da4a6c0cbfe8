//! JSON output for machine-readable reports.
//!
//! With `--json` the tool prints a single pretty-printed document instead of
//! the colored summary. The document carries the same totals plus one entry
//! per processed file.

use serde::Serialize;

use crate::{
    aggregator::{FileOutcome, Tally},
    utils::{format_hours, format_time_spent, total_seconds},
};

/// Top-level JSON report.
#[derive(Serialize, Debug)]
pub struct JsonOutput {
    pub total_files: usize,
    pub succeeded: usize,
    pub failed: usize,

    /// Exact total in seconds, including the fractional part
    pub total_seconds: f64,

    /// Total in hours, rounded to two decimal places
    pub total_hours: f64,

    /// Exact total in `[D day[s], ]H:MM:SS[.ffffff]` form
    pub total_time: String,

    pub files: Vec<JsonFileEntry>,
}

/// Per-file entry of the JSON report.
#[derive(Serialize, Debug)]
pub struct JsonFileEntry {
    pub path: String,
    pub status: FileStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Parsed,
    Failed,
}

impl From<&FileOutcome> for JsonFileEntry {
    fn from(outcome: &FileOutcome) -> Self {
        let path = outcome.path().display().to_string();

        match outcome {
            FileOutcome::Parsed {
                time_spent,
                version,
                ..
            } => Self {
                path,
                status: FileStatus::Parsed,
                seconds: Some(total_seconds(*time_spent)),
                version: version.clone(),
                error: None,
            },
            FileOutcome::Failed { reason, .. } => Self {
                path,
                status: FileStatus::Failed,
                seconds: None,
                version: None,
                error: Some(reason.to_string()),
            },
        }
    }
}

impl JsonOutput {
    /// Build the report for a finished aggregation run.
    #[must_use]
    pub fn from_tally(tally: &Tally) -> Self {
        let total = tally.total_time();
        let seconds = total_seconds(total);

        Self {
            total_files: tally.total_files(),
            succeeded: tally.success_count(),
            failed: tally.failure_count(),
            total_seconds: seconds,
            total_hours: format_hours(total).parse().unwrap_or(seconds / 3_600.0),
            total_time: format_time_spent(total),
            files: tally.outcomes().iter().map(JsonFileEntry::from).collect(),
        }
    }

    /// Build the report for a run that found no project files.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_tally(&Tally::default())
    }
}
