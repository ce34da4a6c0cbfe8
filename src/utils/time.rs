//! Working time formatting.
//!
//! Totals are shown two ways: an exact `[D day[s], ]H:MM:SS[.ffffff]` form
//! and a decimal hour count rounded to two places.

use chrono::TimeDelta;

const SECONDS_PER_DAY: i64 = 86_400;

/// Format a duration as `[D day[s], ]H:MM:SS[.ffffff]`.
///
/// The day prefix is omitted for durations under 24 hours and the fraction
/// is only shown when there are leftover microseconds. Negative durations
/// are formatted by magnitude with a leading `-`.
///
/// # Examples
///
/// ```
/// # use chrono::TimeDelta;
/// # use flp_worktime::utils::format_time_spent;
/// assert_eq!(format_time_spent(TimeDelta::seconds(5400)), "1:30:00");
/// assert_eq!(format_time_spent(TimeDelta::hours(26)), "1 day, 2:00:00");
/// ```
#[must_use]
pub fn format_time_spent(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let delta = delta.abs();

    let total_secs = delta.num_seconds();
    let micros = delta.subsec_nanos() / 1_000;

    let days = total_secs / SECONDS_PER_DAY;
    let secs_of_day = total_secs % SECONDS_PER_DAY;
    let hours = secs_of_day / 3_600;
    let minutes = secs_of_day % 3_600 / 60;
    let seconds = secs_of_day % 60;

    let mut out = String::from(sign);

    if days > 0 {
        let plural = if days == 1 { "" } else { "s" };
        out.push_str(&format!("{days} day{plural}, "));
    }

    out.push_str(&format!("{hours}:{minutes:02}:{seconds:02}"));

    if micros > 0 {
        out.push_str(&format!(".{micros:06}"));
    }

    out
}

/// Total length of a duration in seconds, including the fractional part.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn total_seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}

/// Format a duration as decimal hours rounded to two places (`"1.50"`).
#[must_use]
pub fn format_hours(delta: TimeDelta) -> String {
    format!("{:.2}", total_seconds(delta) / 3_600.0)
}
