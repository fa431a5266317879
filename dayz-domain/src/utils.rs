use chrono::NaiveDateTime;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Signed seconds from `from` to `to`, millisecond precision.
pub fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
