//! Metadata normalization core.
//!
//! Takes the flat tag map produced by the metadata extractor plus the
//! uploaded file's attributes, and partitions the result into three
//! groupings: `clean` (normalized, human-meaningful fields), `analysis`
//! (vetted shooting-condition fields), and `raw` (everything else,
//! untouched). Pure and total: malformed or missing sub-fields degrade to
//! omission, never to an error.

pub mod capture_time;
pub mod geo;
pub mod sentinel;

use serde_json::{json, Map, Value};

use crate::models::{FileAttributes, NormalizedOutput, RawMetadata};

/// GPS source tags. Consumed whether or not they produce output.
const GPS_TAGS: [&str; 4] = [
    "GPSLatitude",
    "GPSLatitudeRef",
    "GPSLongitude",
    "GPSLongitudeRef",
];

/// Device identification tags copied into `clean` verbatim when meaningful.
const DEVICE_TAGS: [&str; 3] = ["Make", "Model", "LensModel"];

/// Dimension/format tags copied into `clean` verbatim when present.
const DIMENSION_TAGS: [&str; 4] = ["ImageWidth", "ImageHeight", "Megapixels", "MIMEType"];

/// The fixed allow-list of shooting-condition tags surfaced as `analysis`.
/// Never expanded automatically; anything else stays in `raw` so unvetted
/// tag noise is not presented as analysis data.
const ANALYSIS_TAGS: [&str; 5] = [
    "ISO",
    "FNumber",
    "ExposureTime",
    "WhiteBalance",
    "MeteringMode",
];

const NOTE_METADATA_FOUND: &str = "Camera metadata found and normalized.";
const NOTE_METADATA_MISSING: &str =
    "No camera metadata found; it may have been stripped by a messaging app or export tool.";

/// Normalize a raw tag map against the uploaded file's attributes.
pub fn normalize(raw: &RawMetadata, file: &FileAttributes) -> NormalizedOutput {
    let mut clean = Map::new();
    let mut analysis = Map::new();

    if let Some(captured) = capture_time::resolve(raw) {
        clean.insert("CapturedTime".to_string(), Value::String(captured));
    }

    let latitude = coordinate_pair(raw, "GPSLatitude", "GPSLatitudeRef");
    if let Some((pretty, decimal)) = &latitude {
        clean.insert("Latitude_DMS".to_string(), Value::String(pretty.clone()));
        clean.insert("Latitude_Decimal".to_string(), json!(decimal));
    }
    let longitude = coordinate_pair(raw, "GPSLongitude", "GPSLongitudeRef");
    if let Some((pretty, decimal)) = &longitude {
        clean.insert("Longitude_DMS".to_string(), Value::String(pretty.clone()));
        clean.insert("Longitude_Decimal".to_string(), json!(decimal));
    }
    if let (Some((lat, _)), Some((lon, _))) = (&latitude, &longitude) {
        clean.insert(
            "GPSPosition".to_string(),
            Value::String(format!("{}, {}", lat, lon)),
        );
    }

    for tag in DEVICE_TAGS {
        if let Some(value) = raw.get(tag) {
            if sentinel::is_meaningful(value) {
                clean.insert(tag.to_string(), value.clone());
            }
        }
    }

    // Everything above this point came out of the embedded metadata; the
    // fields below are derivable from the file itself even when metadata
    // was stripped.
    let mut metadata_found = !clean.is_empty();

    for tag in DIMENSION_TAGS {
        if let Some(value) = raw.get(tag) {
            if sentinel::is_meaningful(value) {
                clean.insert(tag.to_string(), value.clone());
            }
        }
    }

    clean.insert(
        "FileName".to_string(),
        Value::String(file.original_name.clone()),
    );
    clean.insert(
        "FileSizeMB".to_string(),
        Value::String(format!("{:.2}", file.size_bytes as f64 / 1_048_576.0)),
    );

    for tag in ANALYSIS_TAGS {
        if let Some(value) = raw.get(tag) {
            if sentinel::is_meaningful(value) {
                analysis.insert(tag.to_string(), value.clone());
            }
        }
    }
    metadata_found = metadata_found || !analysis.is_empty();

    // Every examined source tag is consumed whether or not it produced
    // output; what remains is copied through verbatim.
    let rest: Map<String, Value> = raw
        .iter()
        .filter(|(key, _)| !is_consumed(key.as_str(), &clean, &analysis))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let note = if metadata_found {
        NOTE_METADATA_FOUND
    } else {
        NOTE_METADATA_MISSING
    };

    NormalizedOutput {
        clean,
        analysis,
        raw: rest,
        note: Some(note.to_string()),
    }
}

/// A key is consumed when it was written into `clean`/`analysis` or belongs
/// to one of the fixed source-tag tables examined above.
fn is_consumed(key: &str, clean: &Map<String, Value>, analysis: &Map<String, Value>) -> bool {
    clean.contains_key(key)
        || analysis.contains_key(key)
        || capture_time::CAPTURE_TIME_CANDIDATES.contains(&key)
        || GPS_TAGS.contains(&key)
        || DEVICE_TAGS.contains(&key)
        || DIMENSION_TAGS.contains(&key)
        || ANALYSIS_TAGS.contains(&key)
}

/// Derive the pretty string and decimal value for one coordinate axis.
/// Requires both the DMS triple and its hemisphere reference to be present
/// and meaningful.
fn coordinate_pair(
    raw: &RawMetadata,
    coord_tag: &str,
    ref_tag: &str,
) -> Option<(String, f64)> {
    let coord = raw.get(coord_tag)?;
    let reference = raw.get(ref_tag)?;
    if !sentinel::is_meaningful(coord) || !sentinel::is_meaningful(reference) {
        return None;
    }
    let hemisphere = reference.as_str()?;
    let decimal = geo::to_decimal(coord, hemisphere)?;
    let pretty = geo::to_pretty(coord, hemisphere)?;
    Some((pretty, decimal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_attrs() -> FileAttributes {
        FileAttributes {
            original_name: "holiday.jpg".to_string(),
            size_bytes: 2_097_152,
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn raw(entries: &[(&str, Value)]) -> RawMetadata {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_gps_fields_normalized() {
        let metadata = raw(&[
            ("GPSLatitude", json!([12, 34, 56.1])),
            ("GPSLatitudeRef", json!("N")),
            ("GPSLongitude", json!([77, 12, 3.4])),
            ("GPSLongitudeRef", json!("E")),
        ]);
        let output = normalize(&metadata, &file_attrs());

        assert_eq!(output.clean["Latitude_Decimal"].as_f64().unwrap(), 12.58225);
        assert_eq!(
            output.clean["Longitude_DMS"].as_str().unwrap(),
            "77\u{b0} 12' 3.4\" E"
        );
        assert_eq!(
            output.clean["GPSPosition"].as_str().unwrap(),
            "12\u{b0} 34' 56.1\" N, 77\u{b0} 12' 3.4\" E"
        );
    }

    #[test]
    fn test_gps_position_requires_both_axes() {
        let metadata = raw(&[
            ("GPSLatitude", json!([12, 34, 56.1])),
            ("GPSLatitudeRef", json!("N")),
        ]);
        let output = normalize(&metadata, &file_attrs());
        assert!(output.clean.contains_key("Latitude_DMS"));
        assert!(!output.clean.contains_key("GPSPosition"));
    }

    #[test]
    fn test_coordinate_without_reference_consumed_but_not_surfaced() {
        let metadata = raw(&[("GPSLatitude", json!([12, 34, 56.1]))]);
        let output = normalize(&metadata, &file_attrs());
        assert!(!output.clean.contains_key("Latitude_DMS"));
        // Examined tags never leak back into raw
        assert!(!output.raw.contains_key("GPSLatitude"));
    }

    #[test]
    fn test_file_attributes_always_present() {
        let output = normalize(&RawMetadata::new(), &file_attrs());
        assert_eq!(output.clean["FileName"].as_str().unwrap(), "holiday.jpg");
        assert_eq!(output.clean["FileSizeMB"].as_str().unwrap(), "2.00");
    }

    #[test]
    fn test_device_fields_copied_when_meaningful() {
        let metadata = raw(&[
            ("Make", json!("Canon")),
            ("Model", json!("   ")),
            ("LensModel", json!("EF 50mm f/1.8")),
        ]);
        let output = normalize(&metadata, &file_attrs());
        assert_eq!(output.clean["Make"].as_str().unwrap(), "Canon");
        assert!(!output.clean.contains_key("Model"));
        assert_eq!(
            output.clean["LensModel"].as_str().unwrap(),
            "EF 50mm f/1.8"
        );
    }

    #[test]
    fn test_analysis_allow_list() {
        let metadata = raw(&[
            ("ISO", json!(100)),
            ("FNumber", json!(2.8)),
            ("ExposureTime", json!(0.005)),
            ("WhiteBalance", json!(0)),
            ("MeteringMode", json!(5)),
            ("Sharpness", json!(2)),
        ]);
        let output = normalize(&metadata, &file_attrs());
        assert_eq!(output.analysis.len(), 5);
        assert_eq!(output.analysis["ISO"].as_i64().unwrap(), 100);
        // Not on the allow-list, so it stays raw
        assert!(!output.analysis.contains_key("Sharpness"));
        assert_eq!(output.raw["Sharpness"].as_i64().unwrap(), 2);
    }

    #[test]
    fn test_unconsumed_tags_pass_through_verbatim() {
        let metadata = raw(&[
            ("Make", json!("Canon")),
            ("Orientation", json!(6)),
            ("Software", json!("darktable 4.6")),
        ]);
        let output = normalize(&metadata, &file_attrs());
        assert_eq!(output.raw["Orientation"].as_i64().unwrap(), 6);
        assert_eq!(output.raw["Software"].as_str().unwrap(), "darktable 4.6");
        assert!(!output.raw.contains_key("Make"));
    }

    #[test]
    fn test_clean_and_raw_are_disjoint() {
        let metadata = raw(&[
            ("SubSecDateTimeOriginal", json!("2024:01:01 01:00:00.12")),
            ("DateTimeOriginal", json!("2024:02:02 02:00:00")),
            ("GPSLatitude", json!([12, 34, 56.1])),
            ("GPSLatitudeRef", json!("N")),
            ("Make", json!("Canon")),
            ("ISO", json!(200)),
            ("Orientation", json!(1)),
        ]);
        let output = normalize(&metadata, &file_attrs());
        for key in output.raw.keys() {
            assert!(!output.clean.contains_key(key), "{key} leaked into raw");
            assert!(!output.analysis.contains_key(key), "{key} leaked into raw");
        }
        // Examined-but-unproductive tags are consumed too
        assert!(!output.raw.contains_key("DateTimeOriginal"));
        assert!(!output.raw.contains_key("GPSLatitudeRef"));
        // Unexamined tags survive
        assert!(output.raw.contains_key("Orientation"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let metadata = raw(&[
            ("DateTimeOriginal", json!("2026:01:09 21:17:55")),
            ("GPSLatitude", json!([12, 34, 56.1])),
            ("GPSLatitudeRef", json!("N")),
            ("GPSLongitude", json!([77, 12, 3.4])),
            ("GPSLongitudeRef", json!("E")),
            ("Make", json!("Canon")),
            ("ISO", json!(100)),
        ]);
        let first = normalize(&metadata, &file_attrs());
        let second = normalize(&metadata, &file_attrs());
        assert_eq!(first, second);
    }

    #[test]
    fn test_captured_time_included_when_resolvable() {
        let metadata = raw(&[("DateTimeOriginal", json!("2026:01:09 21:17:55"))]);
        let output = normalize(&metadata, &file_attrs());
        assert_eq!(
            output.clean["CapturedTime"].as_str().unwrap(),
            "2026-01-09 09:17:55 PM"
        );
    }

    #[test]
    fn test_captured_time_omitted_when_unresolvable() {
        let metadata = raw(&[("DateTimeOriginal", json!("0000:00:00 00:00:00"))]);
        let output = normalize(&metadata, &file_attrs());
        assert!(!output.clean.contains_key("CapturedTime"));
    }

    #[test]
    fn test_note_distinguishes_present_from_stripped() {
        let with_metadata = normalize(
            &raw(&[("Make", json!("Canon"))]),
            &file_attrs(),
        );
        assert_eq!(with_metadata.note.as_deref(), Some(NOTE_METADATA_FOUND));

        // Dimensions alone come from decoding the file, not from embedded
        // metadata, so they do not count as metadata found.
        let stripped = normalize(
            &raw(&[("ImageWidth", json!(4032)), ("ImageHeight", json!(3024))]),
            &file_attrs(),
        );
        assert_eq!(stripped.note.as_deref(), Some(NOTE_METADATA_MISSING));
    }

    #[test]
    fn test_dimension_fields_copied_when_present() {
        let metadata = raw(&[
            ("ImageWidth", json!(4032)),
            ("ImageHeight", json!(3024)),
            ("Megapixels", json!(12.2)),
            ("MIMEType", json!("image/jpeg")),
        ]);
        let output = normalize(&metadata, &file_attrs());
        assert_eq!(output.clean["ImageWidth"].as_i64().unwrap(), 4032);
        assert_eq!(output.clean["Megapixels"].as_f64().unwrap(), 12.2);
        assert_eq!(output.clean["MIMEType"].as_str().unwrap(), "image/jpeg");
    }

    #[test]
    fn test_malformed_gps_degrades_to_omission() {
        let metadata = raw(&[
            ("GPSLatitude", json!([12, 34])),
            ("GPSLatitudeRef", json!("N")),
        ]);
        let output = normalize(&metadata, &file_attrs());
        assert!(!output.clean.contains_key("Latitude_DMS"));
        assert!(!output.clean.contains_key("Latitude_Decimal"));
    }
}
