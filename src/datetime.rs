use chrono::{DateTime, Utc};

#[must_use]
pub fn display_datetime(datetime: DateTime<Utc>) -> String {
    datetime.with_timezone(&chrono::Local).to_rfc3339()
}

/// Whole seconds since the epoch, as the sensor payload expects.
#[must_use]
pub fn unix_seconds(datetime: DateTime<Utc>) -> i64 {
    datetime.timestamp()
}
