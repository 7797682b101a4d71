//! Utility functions for the team balancer

use chrono::{DateTime, Local, Utc};

/// Get the current UTC timestamp, truncated to whole seconds like persisted matches
pub fn current_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now)
}

/// Render a timestamp in local time for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Max minus min of a set of totals, 0 for an empty set
pub fn spread_of(totals: &[f64]) -> f64 {
    let (min, max) = min_max(totals);
    if totals.is_empty() {
        0.0
    } else {
        max - min
    }
}

/// Smallest and largest value; (inf, -inf) for an empty slice
pub fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
