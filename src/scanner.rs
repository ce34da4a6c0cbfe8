//! Input validation and project file discovery.
//!
//! This module checks the directories given on the command line and then
//! traverses each of them recursively to collect every `.flp` project file.
//! Unreadable entries are logged and skipped so that one bad directory never
//! hides the rest of a tree.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::{DirEntry, WalkDir};

use crate::config::{ScanOptions, scan::PROJECT_EXTENSION};

/// Check that every path refers to an existing directory.
///
/// Validation is fail-fast: the first path that is not a directory aborts
/// with an error and later paths are not looked at.
///
/// # Returns
///
/// The same paths, in the order given.
///
/// # Errors
///
/// Returns an `Invalid path` error naming the first path that does not exist
/// or is not a directory.
pub fn validate_directories(dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    for dir in dirs {
        if !dir.is_dir() {
            bail!("Invalid path: {}", dir.display());
        }
    }

    Ok(dirs.to_vec())
}

/// Directory scanner for locating project files.
///
/// The `Scanner` walks directory trees and collects the paths of files whose
/// name ends with `.flp`. Traversal is sequential; entries inside one
/// directory are visited in file name order so repeated runs list files in
/// the same order.
pub struct Scanner {
    /// Configuration options for scanning behavior
    scan_options: ScanOptions,

    /// When `true`, suppresses the progress spinner (used by `--json` mode).
    quiet: bool,
}

impl Scanner {
    /// Create a new scanner with the specified options.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flp_worktime::{config::ScanOptions, scanner::Scanner};
    /// let scanner = Scanner::new(ScanOptions::default());
    /// ```
    #[must_use]
    pub const fn new(scan_options: ScanOptions) -> Self {
        Self {
            scan_options,
            quiet: false,
        }
    }

    /// Enable or disable quiet mode (suppresses progress spinner).
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Collect project files from every directory, in argument order.
    ///
    /// Directories that overlap contribute their shared files more than once.
    pub fn discover(&self, dirs: &[PathBuf]) -> Vec<PathBuf> {
        let progress = if self.quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        };

        let mut files = Vec::new();

        for dir in dirs {
            progress.set_message(format!("Scanning {}...", dir.display()));
            files.extend(self.scan_directory(dir));
        }

        progress.finish_and_clear();

        files
    }

    /// Recursively collect project files below a single directory.
    ///
    /// # Returns
    ///
    /// The full paths of all matching files in the subtree, excluding those
    /// under directories named in the skip list.
    pub fn scan_directory(&self, root: &Path) -> Vec<PathBuf> {
        tracing::debug!(root = %root.display(), "scanning directory");

        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_skipped_directory(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("{e}");
                    None
                }
            })
            .filter(Self::is_project_file)
            .map(DirEntry::into_path)
            .collect()
    }

    /// Check whether an entry is a project file.
    ///
    /// The name must end with `.flp` exactly (case-sensitive). Symlinks
    /// count when they resolve to a regular file.
    fn is_project_file(entry: &DirEntry) -> bool {
        let has_extension = entry
            .file_name()
            .to_string_lossy()
            .ends_with(PROJECT_EXTENSION);

        if !has_extension {
            return false;
        }

        let file_type = entry.file_type();
        file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
    }

    /// Check whether a directory entry is in the skip list.
    ///
    /// The scan roots themselves are never skipped.
    fn is_skipped_directory(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self.is_name_in_skip_list(entry.path())
    }

    /// Check if a path's final component is in the skip list
    fn is_name_in_skip_list(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.scan_options.skip.iter().any(|skip| skip == name))
    }
}
