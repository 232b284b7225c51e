use chrono::{DateTime, Utc};

pub const TIME2_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Human-readable form of an epoch timestamp, minute precision, UTC.
/// `None` when the timestamp is outside the representable range.
pub fn format_time2(timestamp: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|time| time.format(TIME2_FORMAT).to_string())
}

pub fn format_date(time: DateTime<Utc>) -> String {
    time.format(DATE_FORMAT).to_string()
}

pub fn output_file_name(market: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("{market}_{}_{}.csv", format_date(start), format_date(end))
}
