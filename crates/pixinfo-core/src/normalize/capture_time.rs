//! Capture time resolution.
//!
//! Picks the best available timestamp from several candidate tags and formats
//! it consistently. Candidates are consulted in decreasing order of precision
//! and trustworthiness; the first one that parses wins.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use super::sentinel;
use crate::models::RawMetadata;

/// Candidate tags in fixed priority order: sub-second original time beats
/// original time, which beats file create time, which beats GPS-derived time.
/// Do not reorder.
pub const CAPTURE_TIME_CANDIDATES: [&str; 4] = [
    "SubSecDateTimeOriginal",
    "DateTimeOriginal",
    "CreateDate",
    "GPSDateTime",
];

/// Resolve the capture time from the raw tag map.
///
/// Numeric candidates are interpreted as seconds since the epoch (subject to
/// the pre-1970 sentinel floor); string candidates use the EXIF
/// `YYYY:MM:DD HH:MM:SS[.fff][Z]` form. Returns `None` when no candidate
/// yields a usable timestamp, so callers omit the field rather than emit a
/// placeholder.
pub fn resolve(raw: &RawMetadata) -> Option<String> {
    for tag in CAPTURE_TIME_CANDIDATES {
        let Some(value) = raw.get(tag) else {
            continue;
        };
        if !sentinel::is_meaningful(value) {
            continue;
        }

        match value {
            Value::Number(n) => {
                if !sentinel::is_plausible_epoch_seconds(value) {
                    continue;
                }
                let Some(secs) = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)) else {
                    continue;
                };
                if let Some(dt) = DateTime::from_timestamp(secs, 0) {
                    return Some(format_capture_time(dt.naive_utc()));
                }
            }
            Value::String(s) => {
                if let Some(dt) = parse_exif_datetime(s) {
                    return Some(format_capture_time(dt));
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse the EXIF datetime form: a `:`-separated date, a space, and a time
/// with optional fractional seconds and trailing `Z`.
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let (date, time) = s.trim().split_once(' ')?;
    let iso = format!(
        "{}T{}",
        date.replace(':', "-"),
        time.trim().trim_end_matches('Z')
    );
    NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

fn format_capture_time(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %I:%M:%S %p").to_string()
}
