//! Utility functions and helpers.
//!
//! This module contains utility functions used throughout the application,
//! such as duration formatting helpers.

pub mod time;

pub use time::{format_hours, format_time_spent, total_seconds};
