//! Project file parsing.
//!
//! The aggregation pipeline only needs one thing from a project file: the
//! working time recorded in it. This module defines the [`ProjectParser`]
//! capability that provides it, the [`ParsedProject`] value it yields, and
//! the [`ParseError`] taxonomy for everything that can go wrong.
//!
//! ## Main Parts
//!
//! - [`ProjectParser`] - The parse capability consumed by the aggregator
//! - [`ParsedProject`] - The attributes read out of a project file
//! - [`ParseError`] - Why a file could not be parsed
//! - [`flp::FlpParser`] - The FL Studio `.flp` implementation

pub mod flp;

use std::{io, path::Path};

use chrono::TimeDelta;
use thiserror::Error;

pub use flp::FlpParser;

/// Attributes read from a successfully parsed project file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedProject {
    /// Accumulated working time stored in the project
    pub time_spent: TimeDelta,

    /// Version string of the application that saved the project, if present
    pub version: Option<String>,
}

impl ParsedProject {
    /// Create a parsed project with only a time spent value.
    #[must_use]
    pub const fn new(time_spent: TimeDelta) -> Self {
        Self {
            time_spent,
            version: None,
        }
    }
}

/// Reasons a project file can fail to parse.
///
/// All of these are folded into a single failure counter when reporting, but
/// they are kept distinct so verbose and JSON output can name the cause.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),

    #[error("expected {expected:?} chunk, found {found:?}")]
    BadMagic { expected: &'static str, found: [u8; 4] },

    #[error("header chunk has length {0}, expected 6")]
    BadHeaderLength(u32),

    #[error("unsupported file format {0}")]
    UnsupportedFormat(i16),

    #[error("unexpected end of data while reading {0}")]
    Truncated(&'static str),

    #[error("malformed event length at offset {0}")]
    BadEventLength(usize),

    #[error("project has no timestamp event")]
    MissingTimestamp,

    #[error("invalid time spent value: {0} days")]
    InvalidTimeSpent(f64),

    #[error("working time total overflowed")]
    DurationOverflow,
}

/// A capability that turns a project file path into a [`ParsedProject`].
///
/// The aggregator depends only on this trait, so callers can substitute a
/// stub that returns fixed durations or forced errors. Any closure with the
/// matching signature implements it.
pub trait ProjectParser {
    /// Parse the project file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the file cannot be read or decoded, or if
    /// it carries no usable time spent value.
    fn parse(&self, path: &Path) -> Result<ParsedProject, ParseError>;
}

impl<F> ProjectParser for F
where
    F: Fn(&Path) -> Result<ParsedProject, ParseError>,
{
    fn parse(&self, path: &Path) -> Result<ParsedProject, ParseError> {
        self(path)
    }
}
