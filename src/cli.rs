//! Command-line interface definition and option parsing.
//!
//! This module defines the command-line interface using the `clap` crate,
//! and converts the parsed arguments into the option structs used by the
//! rest of the application, layered over the configuration file.

use std::path::PathBuf;

use clap::{Parser, ValueHint};

use flp_worktime::config::{FileConfig, OutputOptions, ScanOptions};

/// Scanning-related command-line arguments.
#[derive(Parser)]
struct ScanningArgs {
    /// Show why each failed project could not be parsed
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Directory names to skip during scanning (e.g. Backup)
    #[arg(long, value_name = "NAME", action = clap::ArgAction::Append)]
    skip: Vec<PathBuf>,
}

/// Output-related command-line arguments.
#[derive(Parser)]
struct OutputArgs {
    /// Print the report as JSON instead of the human-readable summary
    #[arg(long)]
    json: bool,
}

/// Command-line interface for flp-worktime.
#[derive(Parser)]
#[command(name = "flp-worktime")]
#[command(version, about = "Sum up the working time recorded in FL Studio project files")]
pub(crate) struct Cli {
    /// Directories to search recursively for .flp files
    #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub(crate) dirs: Vec<PathBuf>,

    /// Scanning options
    #[command(flatten)]
    scanning: ScanningArgs,

    /// Output options
    #[command(flatten)]
    output: OutputArgs,
}

impl Cli {
    /// Build scan options, falling back to the config file for unset flags.
    ///
    /// Skip lists from the command line and the config file are combined.
    pub(crate) fn scan_options(&self, file_config: &FileConfig) -> ScanOptions {
        let mut skip = file_config.scanning.skip.clone().unwrap_or_default();
        skip.extend(self.scanning.skip.iter().cloned());

        ScanOptions {
            verbose: self.scanning.verbose || file_config.scanning.verbose.unwrap_or(false),
            skip,
        }
    }

    /// Whether `--json` was passed, before any config file is consulted.
    pub(crate) const fn json_requested(&self) -> bool {
        self.output.json
    }

    pub(crate) fn output_options(&self, file_config: &FileConfig) -> OutputOptions {
        OutputOptions {
            json: self.output.json || file_config.output.json.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use flp_worktime::config::file::{FileOutputConfig, FileScanConfig};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dirs_are_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["flp-worktime"]).unwrap();
        assert!(cli.dirs.is_empty());
    }

    #[test]
    fn test_dirs_keep_order() {
        let cli = Cli::try_parse_from(["flp-worktime", "/b", "/a"]).unwrap();
        assert_eq!(cli.dirs, vec![PathBuf::from("/b"), PathBuf::from("/a")]);
    }

    #[test]
    fn test_defaults_without_config() {
        let cli = Cli::try_parse_from(["flp-worktime", "/music"]).unwrap();
        let config = FileConfig::default();

        let scan = cli.scan_options(&config);
        assert!(!scan.verbose);
        assert!(scan.skip.is_empty());
        assert!(!cli.output_options(&config).json);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "flp-worktime",
            "-v",
            "--json",
            "--skip",
            "Backup",
            "--skip",
            "Old",
            "/music",
        ])
        .unwrap();
        let config = FileConfig::default();

        let scan = cli.scan_options(&config);
        assert!(scan.verbose);
        assert_eq!(scan.skip, vec![PathBuf::from("Backup"), PathBuf::from("Old")]);
        assert!(cli.output_options(&config).json);
    }

    #[test]
    fn test_json_requested_ignores_config() {
        let plain = Cli::try_parse_from(["flp-worktime", "/music"]).unwrap();
        let json = Cli::try_parse_from(["flp-worktime", "--json", "/music"]).unwrap();

        assert!(!plain.json_requested());
        assert!(json.json_requested());
    }

    #[test]
    fn test_config_fills_unset_flags() {
        let cli = Cli::try_parse_from(["flp-worktime", "--skip", "Old", "/music"]).unwrap();
        let config = FileConfig {
            scanning: FileScanConfig {
                verbose: Some(true),
                skip: Some(vec![PathBuf::from("Backup")]),
            },
            output: FileOutputConfig { json: Some(true) },
        };

        let scan = cli.scan_options(&config);
        assert!(scan.verbose);
        assert_eq!(scan.skip, vec![PathBuf::from("Backup"), PathBuf::from("Old")]);
        assert!(cli.output_options(&config).json);
    }
}
