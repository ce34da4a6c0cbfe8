//! Output configuration for the final report.

/// Configuration for how results are reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutputOptions {
    /// Emit a single JSON document instead of the human-readable summary.
    ///
    /// Also hides the progress bar so that stdout only carries the JSON.
    pub json: bool,
}
