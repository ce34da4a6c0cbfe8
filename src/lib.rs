//! # flp-worktime
//!
//! A CLI tool that recursively scans directories for FL Studio `.flp` project
//! files and sums up the working time recorded in them.
//!
//! This library provides the core functionality for the flp-worktime CLI tool:
//! validating input directories, discovering project files, parsing them, and
//! aggregating and reporting their working time.

pub mod aggregator;
pub mod config;
pub mod output;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod utils;
