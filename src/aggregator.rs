//! Working time aggregation across project files.
//!
//! This module runs the parser over every discovered file, one at a time,
//! and accumulates the results. A failure on one file is recorded and the
//! run moves on; nothing here aborts early.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use indicatif::{ProgressBar, ProgressStyle};

use crate::parser::{ParseError, ParsedProject, ProjectParser};

/// Result of processing a single project file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file parsed and its working time was added to the total
    Parsed {
        path: PathBuf,
        time_spent: TimeDelta,
        version: Option<String>,
    },

    /// The file could not be used; it contributes nothing to the total
    Failed { path: PathBuf, reason: ParseError },
}

impl FileOutcome {
    /// Path of the file this outcome belongs to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Parsed { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed { .. })
    }
}

/// Accumulated results of an aggregation run.
///
/// Outcomes are kept in processing order. The total only ever includes
/// durations from [`FileOutcome::Parsed`] entries.
#[derive(Debug)]
pub struct Tally {
    outcomes: Vec<FileOutcome>,
    total: TimeDelta,
    failed: usize,
}

impl Default for Tally {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
            total: TimeDelta::zero(),
            failed: 0,
        }
    }
}

impl Tally {
    /// Fold one parse result into the tally.
    ///
    /// A duration that would overflow the running total is recorded as a
    /// failure instead.
    pub fn record(
        &mut self,
        path: PathBuf,
        result: Result<ParsedProject, ParseError>,
    ) -> &FileOutcome {
        let outcome = match result {
            Ok(project) => match self.total.checked_add(&project.time_spent) {
                Some(total) => {
                    self.total = total;
                    FileOutcome::Parsed {
                        path,
                        time_spent: project.time_spent,
                        version: project.version,
                    }
                }
                None => FileOutcome::Failed {
                    path,
                    reason: ParseError::DurationOverflow,
                },
            },
            Err(reason) => FileOutcome::Failed { path, reason },
        };

        if !outcome.is_parsed() {
            self.failed += 1;
        }

        self.outcomes.push(outcome);
        &self.outcomes[self.outcomes.len() - 1]
    }

    #[must_use]
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn total_files(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        self.outcomes.len() - self.failed
    }

    #[must_use]
    pub const fn failure_count(&self) -> usize {
        self.failed
    }

    /// Sum of working time over all successfully parsed files.
    #[must_use]
    pub const fn total_time(&self) -> TimeDelta {
        self.total
    }
}

/// Runs a [`ProjectParser`] over a list of files and tallies the results.
pub struct Aggregator<P> {
    parser: P,

    /// Append the failure reason to each failure notice
    verbose: bool,

    /// Hide the progress bar and failure notices (used by `--json` mode)
    quiet: bool,
}

impl<P: ProjectParser> Aggregator<P> {
    #[must_use]
    pub const fn new(parser: P) -> Self {
        Self {
            parser,
            verbose: false,
            quiet: false,
        }
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Parse every file in order and return the accumulated tally.
    ///
    /// Each failure prints a one-line notice naming the file to stdout, above
    /// the progress bar. Processing always continues with the next file.
    pub fn run(&self, files: &[PathBuf]) -> Tally {
        let progress = if self.quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::with_template(
                    "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )
                .map(|style| style.progress_chars("█▉▊▋▌▍▎▏  "))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        };

        let mut tally = Tally::default();

        for path in files {
            let result = self.parser.parse(path);

            match &result {
                Ok(project) => tracing::debug!(
                    path = %path.display(),
                    version = project.version.as_deref().unwrap_or("unknown"),
                    seconds = project.time_spent.num_seconds(),
                    "parsed project"
                ),
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "parse failed"),
            }

            if let FileOutcome::Failed { path, reason } = tally.record(path.clone(), result)
                && !self.quiet
            {
                let notice = self.failure_notice(path, reason);
                progress.suspend(|| println!("{notice}"));
            }

            progress.inc(1);
        }

        progress.finish_and_clear();

        tally
    }

    fn failure_notice(&self, path: &Path, reason: &ParseError) -> String {
        if self.verbose {
            format!("{} failed to parse: {reason}", path.display())
        } else {
            format!("{} failed to parse", path.display())
        }
    }
}
