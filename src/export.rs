//! CSV export of the session history.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::Reading;

pub const CSV_HEADER: &str = "Time,Temperature,Humidity";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Render readings as CSV, oldest first.
///
/// Times are ISO-8601 UTC instants with millisecond precision; values are written
/// unrounded. Rows are separated by `\n` with no trailing newline.
pub fn to_csv<'a>(readings: impl IntoIterator<Item = &'a Reading>) -> String {
    let mut out = String::from(CSV_HEADER);
    for r in readings {
        out.push('\n');
        out.push_str(&format!(
            "{},{},{}",
            r.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            r.temperature,
            r.humidity
        ));
    }
    out
}

/// Download filename for an export taken at `at`.
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("onion-storage-data-{}.csv", at.format("%Y-%m-%d"))
}
