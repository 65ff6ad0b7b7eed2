//! EXIF tag extraction.
//!
//! Reads the EXIF block from an image byte buffer and flattens it into the
//! untyped tag map the normalization core consumes. Tag names follow the
//! exiftool convention (`ISO`, `CreateDate`) since that is what downstream
//! consumers expect; composite tags (`SubSecDateTimeOriginal`,
//! `GPSDateTime`) are assembled here from their component fields.

use std::io::Cursor;

use exif::{In, Tag};
use pixinfo_core::models::RawMetadata;
use serde_json::Value;

/// Tags whose kamadak-exif names differ from the exiftool names used by the
/// normalizer's allow-lists.
const TAG_ALIASES: [(&str, &str); 2] = [
    ("PhotographicSensitivity", "ISO"),
    ("DateTimeDigitized", "CreateDate"),
];

/// Extract the flat tag map from an image byte buffer.
///
/// Unreadable individual fields are skipped; a missing or corrupt EXIF block
/// is an error the caller is expected to downgrade to an empty map.
pub fn extract_metadata(data: &[u8]) -> Result<RawMetadata, anyhow::Error> {
    let mut reader = exif::Reader::new();
    reader.continue_on_error(true);
    let mut cursor = Cursor::new(data);

    let parsed = reader
        .read_from_container(&mut cursor)
        .or_else(|e| {
            e.distill_partial_result(|errors| {
                tracing::debug!(count = errors.len(), "Skipping unreadable EXIF fields");
            })
        })
        .map_err(|e| anyhow::anyhow!("Failed to read EXIF data: {}", e))?;

    let mut raw = RawMetadata::new();
    for field in parsed.fields() {
        if field.ifd_num != In::PRIMARY {
            continue;
        }
        let name = field.tag.to_string();
        if name.starts_with("Tag(") {
            // Unknown/vendor tag without a stable name
            continue;
        }
        if let Some(value) = convert_value(&field.value) {
            raw.entry(name).or_insert(value);
        }
    }

    apply_tag_aliases(&mut raw);

    if let Some(combined) = subsec_datetime_original(&parsed) {
        raw.insert(
            "SubSecDateTimeOriginal".to_string(),
            Value::String(combined),
        );
    }
    if let Some(combined) = gps_datetime(&parsed) {
        raw.insert("GPSDateTime".to_string(), Value::String(combined));
    }

    Ok(raw)
}

/// Flatten a typed EXIF value into a JSON scalar or array of numbers.
/// Binary blobs (maker notes, thumbnails) are dropped entirely.
fn convert_value(value: &exif::Value) -> Option<Value> {
    match value {
        exif::Value::Ascii(lines) => {
            let text = join_ascii(lines);
            if text.is_empty() {
                None
            } else {
                Some(Value::String(text))
            }
        }
        exif::Value::Byte(v) => unsigned(v.iter().map(|&n| u64::from(n))),
        exif::Value::Short(v) => unsigned(v.iter().map(|&n| u64::from(n))),
        exif::Value::Long(v) => unsigned(v.iter().map(|&n| u64::from(n))),
        exif::Value::SByte(v) => signed(v.iter().map(|&n| i64::from(n))),
        exif::Value::SShort(v) => signed(v.iter().map(|&n| i64::from(n))),
        exif::Value::SLong(v) => signed(v.iter().map(|&n| i64::from(n))),
        exif::Value::Rational(v) => floats(v.iter().map(|r| r.to_f64())),
        exif::Value::SRational(v) => floats(v.iter().map(|r| r.to_f64())),
        exif::Value::Float(v) => floats(v.iter().map(|&f| f64::from(f))),
        exif::Value::Double(v) => floats(v.iter().copied()),
        _ => None,
    }
}

fn join_ascii(lines: &[Vec<u8>]) -> String {
    lines
        .iter()
        .map(|line| String::from_utf8_lossy(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn unsigned(values: impl Iterator<Item = u64>) -> Option<Value> {
    collect_scalars(values.map(Value::from))
}

fn signed(values: impl Iterator<Item = i64>) -> Option<Value> {
    collect_scalars(values.map(Value::from))
}

fn floats(values: impl Iterator<Item = f64>) -> Option<Value> {
    collect_scalars(values.map(|f| {
        serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }))
}

fn collect_scalars(values: impl Iterator<Item = Value>) -> Option<Value> {
    let mut items: Vec<Value> = values.collect();
    match items.len() {
        0 => None,
        1 => Some(items.remove(0)),
        _ => Some(Value::Array(items)),
    }
}

fn apply_tag_aliases(raw: &mut RawMetadata) {
    for (from, to) in TAG_ALIASES {
        if let Some(value) = raw.remove(from) {
            raw.entry(to.to_string()).or_insert(value);
        }
    }
}

/// Composite of DateTimeOriginal and its separate sub-second fraction field.
fn subsec_datetime_original(parsed: &exif::Exif) -> Option<String> {
    let datetime = ascii_field(parsed, Tag::DateTimeOriginal)?;
    let subsec = ascii_field(parsed, Tag::SubSecTimeOriginal)?;
    let digits: String = subsec.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!("{}.{}", datetime, digits))
}

/// Composite of the GPS date stamp and the hour/minute/second triple,
/// rendered as a UTC datetime string.
fn gps_datetime(parsed: &exif::Exif) -> Option<String> {
    let date = ascii_field(parsed, Tag::GPSDateStamp)?;
    let field = parsed.get_field(Tag::GPSTimeStamp, In::PRIMARY)?;
    let hms = match &field.value {
        exif::Value::Rational(r) if r.len() >= 3 => r,
        _ => return None,
    };
    Some(format!(
        "{} {:02}:{:02}:{:02}Z",
        date,
        hms[0].to_f64() as u32,
        hms[1].to_f64() as u32,
        hms[2].to_f64() as u32
    ))
}

fn ascii_field(parsed: &exif::Exif, tag: Tag) -> Option<String> {
    let field = parsed.get_field(tag, In::PRIMARY)?;
    match &field.value {
        exif::Value::Ascii(lines) => {
            let text = join_ascii(lines);
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}
