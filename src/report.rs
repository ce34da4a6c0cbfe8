//! Human-readable reporting.
//!
//! Everything here writes to stdout. Counts and totals are highlighted with
//! `colored`, which honours `NO_COLOR`.

use std::path::PathBuf;

use colored::Colorize;

use crate::{
    aggregator::Tally,
    config::scan::PROJECT_EXTENSION,
    utils::{format_hours, format_time_spent},
};

const SEPARATOR_WIDTH: usize = 40;

/// Message announcing how many project files were discovered.
#[must_use]
pub fn found_message(count: usize) -> String {
    format!(
        "Found {} {PROJECT_EXTENSION} files",
        count.to_string().bright_white()
    )
}

/// Message shown when discovery came up empty.
#[must_use]
pub fn no_files_message(dirs: &[PathBuf]) -> String {
    let dirs = dirs
        .iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!("No {PROJECT_EXTENSION} files found in [{dirs}]")
}

/// Render the end-of-run summary.
///
/// # Output Format
///
/// ```text
/// ----------------------------------------
/// Total 12 files, success: 11, failed: 1
/// Total working time = 1 day, 2:03:04
///                    = 26.05 hours
/// ```
#[must_use]
pub fn render_summary(tally: &Tally) -> String {
    let total = tally.total_time();
    let failed = tally.failure_count().to_string();
    let failed = if tally.failure_count() > 0 {
        failed.red()
    } else {
        failed.normal()
    };

    let label = "Total working time";

    [
        "-".repeat(SEPARATOR_WIDTH),
        format!(
            "Total {} files, success: {}, failed: {failed}",
            tally.total_files(),
            tally.success_count().to_string().green(),
        ),
        format!(
            "{label} = {}",
            format_time_spent(total).bright_green().bold()
        ),
        format!(
            "{:width$} = {} hours",
            "",
            format_hours(total).bright_green().bold(),
            width = label.len(),
        ),
    ]
    .join("\n")
}

/// Print the end-of-run summary, preceded by a blank line.
pub fn print_summary(tally: &Tally) {
    println!("\n{}", render_summary(tally));
}
