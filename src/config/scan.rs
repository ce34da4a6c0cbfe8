//! Scanning configuration for project discovery.
//!
//! This module defines the options that control how directory trees are
//! traversed while looking for project files.

use std::path::PathBuf;

/// File name suffix of FL Studio project files.
pub const PROJECT_EXTENSION: &str = ".flp";

/// Configuration options for directory scanning.
///
/// This struct contains the settings that control how the scanner
/// traverses directories and which subtrees it leaves out.
#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    /// Whether to show failure reasons and debug diagnostics
    pub verbose: bool,

    /// Directory names that are not descended into
    pub skip: Vec<PathBuf>,
}
