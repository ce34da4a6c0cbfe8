//! # flp-worktime
//!
//! A CLI tool that recursively scans directories for FL Studio `.flp` project
//! files and sums up the working time recorded in them.
//!
//! Each project file stores how long it has been open for editing. This tool
//! finds every project below the given directories, reads that value from
//! each one, and prints the total. Files that fail to parse are reported and
//! counted but never stop the run.
//!
//! ## Usage
//!
//! ```bash
//! # Sum up everything under one folder
//! flp-worktime ~/Music/Projects
//!
//! # Several folders, leaving out FL Studio's autosave backups
//! flp-worktime ~/Music/Projects /mnt/old-projects --skip Backup
//!
//! # Machine-readable output
//! flp-worktime ~/Music/Projects --json
//! ```

mod cli;

use std::process::exit;

use anyhow::Result;
use clap::{CommandFactory, Parser, error::ErrorKind};
use cli::Cli;
use colored::Colorize;
use flp_worktime::{
    aggregator::Aggregator,
    config::FileConfig,
    output::JsonOutput,
    parser::FlpParser,
    report,
    scanner::{Scanner, validate_directories},
};
use tracing_subscriber::EnvFilter;

/// Entry point for the flp-worktime application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// This function:
/// 1. Parses command-line arguments, printing usage if no directory was given.
///    Every rejected argument exits with status 1
/// 2. Loads the persistent configuration file (if present)
/// 3. Validates that every argument is a directory
/// 4. Discovers `.flp` files below those directories
/// 5. Parses every file and sums up the working time
/// 6. Prints the summary, or a single JSON document with `--json`
///
/// # Errors
///
/// This function can return errors from:
/// - Directory validation (an argument that is not a directory)
/// - JSON serialization
fn inner_main() -> Result<()> {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();

            exit(1);
        }
    };

    if args.dirs.is_empty() {
        eprintln!("{}", Cli::command().render_usage());

        exit(1);
    }

    let file_config = match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            if !args.json_requested() {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    };

    let scan_options = args.scan_options(&file_config);
    let output_options = args.output_options(&file_config);
    let json_mode = output_options.json;
    let verbose = scan_options.verbose;

    init_tracing(verbose);

    let dirs = validate_directories(&args.dirs)?;

    let scanner = Scanner::new(scan_options).with_quiet(json_mode);
    let files = scanner.discover(&dirs);

    if files.is_empty() {
        if json_mode {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::empty())?);
        } else {
            println!("{}", report::no_files_message(&dirs));
        }
        return Ok(());
    }

    if !json_mode {
        println!("{}", report::found_message(files.len()));
    }

    let tally = Aggregator::new(FlpParser::new())
        .with_verbose(verbose)
        .with_quiet(json_mode)
        .run(&files);

    if json_mode {
        let output = JsonOutput::from_tally(&tally);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        report::print_summary(&tally);
    }

    Ok(())
}

/// Send diagnostics to stderr: warnings by default, everything with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
