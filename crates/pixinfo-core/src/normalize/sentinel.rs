//! Sentinel value detection.
//!
//! Some encoders emit placeholder values instead of omitting unknown fields:
//! zero dates (`"0000:00:00 00:00:00"`), blank strings, or epoch timestamps
//! before 1970. These predicates decide whether a raw value is meaningful or
//! should be treated as absent.

use serde_json::Value;

/// Numeric timestamps below this are pre-1970 placeholders, not real capture
/// times (1_000_000_000 seconds = 2001-09-09). Only applies to fields whose
/// semantic type is epoch seconds; small numeric tags like ISO or FNumber
/// must never be run through this check.
pub const EPOCH_SENTINEL_FLOOR: i64 = 1_000_000_000;

const ZERO_DATE_SENTINEL: &str = "0000:00:00";

/// Whether a raw tag value carries meaning, or is a known placeholder.
///
/// Rejects absent values, strings that are blank after trimming, and strings
/// containing the zero-date marker.
pub fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty() && !trimmed.contains(ZERO_DATE_SENTINEL)
        }
        _ => true,
    }
}

/// Whether a numeric value is a plausible seconds-since-epoch timestamp.
///
/// Returns false for non-numeric values and for anything below
/// [`EPOCH_SENTINEL_FLOOR`].
pub fn is_plausible_epoch_seconds(value: &Value) -> bool {
    let secs = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    };
    matches!(secs, Some(n) if n >= EPOCH_SENTINEL_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_not_meaningful() {
        assert!(!is_meaningful(&Value::Null));
    }

    #[test]
    fn test_blank_strings_are_not_meaningful() {
        assert!(!is_meaningful(&json!("")));
        assert!(!is_meaningful(&json!("   ")));
        assert!(!is_meaningful(&json!("\t\n")));
    }

    #[test]
    fn test_zero_date_marker_is_not_meaningful() {
        assert!(!is_meaningful(&json!("0000:00:00 00:00:00")));
        assert!(!is_meaningful(&json!("0000:00:00")));
        // Anywhere in the string counts
        assert!(!is_meaningful(&json!("captured 0000:00:00 exactly")));
    }

    #[test]
    fn test_ordinary_values_are_meaningful() {
        assert!(is_meaningful(&json!("Canon")));
        assert!(is_meaningful(&json!("2024:01:15 10:30:00")));
        assert!(is_meaningful(&json!(100)));
        assert!(is_meaningful(&json!(2.8)));
        assert!(is_meaningful(&json!([12, 34, 56.1])));
    }

    #[test]
    fn test_small_numbers_stay_meaningful() {
        // ISO 100 or FNumber 2.8 are legitimate small numbers; the epoch
        // floor must not leak into the general predicate.
        assert!(is_meaningful(&json!(100)));
        assert!(is_meaningful(&json!(0)));
    }

    #[test]
    fn test_epoch_below_floor_rejected() {
        assert!(!is_plausible_epoch_seconds(&json!(0)));
        assert!(!is_plausible_epoch_seconds(&json!(999_999_999)));
        assert!(!is_plausible_epoch_seconds(&json!(-100)));
    }

    #[test]
    fn test_epoch_at_or_above_floor_accepted() {
        assert!(is_plausible_epoch_seconds(&json!(1_000_000_000)));
        assert!(is_plausible_epoch_seconds(&json!(1_736_457_475)));
        assert!(is_plausible_epoch_seconds(&json!(1_736_457_475.5)));
    }

    #[test]
    fn test_non_numeric_epoch_rejected() {
        assert!(!is_plausible_epoch_seconds(&json!("1736457475")));
        assert!(!is_plausible_epoch_seconds(&Value::Null));
        assert!(!is_plausible_epoch_seconds(&json!([1_736_457_475])));
    }
}
