//! Geographic coordinate conversion.
//!
//! EXIF stores coordinates as a degrees/minutes/seconds triple plus a
//! hemisphere reference letter. Both converters reject malformed input by
//! returning `None`; they never panic.

use serde_json::Value;

/// Convert a DMS triple and hemisphere reference to decimal degrees.
///
/// The result is negated for the southern and western hemispheres and rounded
/// to 6 decimal places (sub-meter precision).
pub fn to_decimal(dms: &Value, hemisphere: &str) -> Option<f64> {
    let (degrees, minutes, seconds) = components(dms)?;
    let mut decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    if matches!(hemisphere.trim(), "S" | "W") {
        decimal = -decimal;
    }
    Some((decimal * 1_000_000.0).round() / 1_000_000.0)
}

/// Render a DMS triple as a human-readable string, e.g. `12° 34' 56.1" N`.
pub fn to_pretty(dms: &Value, hemisphere: &str) -> Option<String> {
    let (degrees, minutes, seconds) = components(dms)?;
    Some(format!(
        "{}\u{b0} {}' {}\" {}",
        degrees,
        minutes,
        seconds,
        hemisphere.trim()
    ))
}

/// A coordinate value must be a sequence of at least 3 numeric components.
fn components(dms: &Value) -> Option<(f64, f64, f64)> {
    let parts = dms.as_array()?;
    if parts.len() < 3 {
        return None;
    }
    Some((
        parts[0].as_f64()?,
        parts[1].as_f64()?,
        parts[2].as_f64()?,
    ))
}
