//! Định dạng hiển thị dùng chung giữa các màn hình.

use chrono::{DateTime, Duration, NaiveDate, Utc};

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M").to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(timestamp);
    let abs_delta: Duration = delta.abs();
    let (amount, unit) = if abs_delta.num_days() >= 1 {
        (abs_delta.num_days(), "d")
    } else if abs_delta.num_hours() >= 1 {
        (abs_delta.num_hours(), "h")
    } else if abs_delta.num_minutes() >= 1 {
        (abs_delta.num_minutes(), "m")
    } else {
        return "just now".to_string();
    };

    if delta.num_seconds() >= 0 {
        format!("{amount}{unit} ago")
    } else {
        format!("in {amount}{unit}")
    }
}
