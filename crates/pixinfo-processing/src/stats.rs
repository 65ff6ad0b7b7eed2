//! Image decoding and pixel statistics.
//!
//! Decodes the uploaded bytes to obtain structural metadata (dimensions,
//! format) and grayscale pixel statistics, from which categorical
//! brightness/contrast labels are derived.

use std::fmt;
use std::io::Cursor;

use image::{GenericImageView, ImageReader};

/// Categorical label for brightness/contrast classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneLabel {
    Low,
    Normal,
    High,
}

impl fmt::Display for ToneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ToneLabel::Low => "Low",
            ToneLabel::Normal => "Normal",
            ToneLabel::High => "High",
        };
        f.write_str(label)
    }
}

/// Structural metadata and pixel statistics for a decoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub mime_type: Option<String>,
    pub mean_brightness: f64,
    pub contrast_stddev: f64,
    pub brightness: ToneLabel,
    pub contrast: ToneLabel,
}

impl ImageAnalysis {
    /// Width times height in millions of pixels, to one decimal place.
    pub fn megapixels(&self) -> f64 {
        let mp = f64::from(self.width) * f64::from(self.height) / 1_000_000.0;
        (mp * 10.0).round() / 10.0
    }
}

/// Decode an image and compute grayscale statistics.
///
/// CPU-bound; callers on an async runtime should run this under
/// `spawn_blocking`.
pub fn analyze(data: &[u8]) -> Result<ImageAnalysis, anyhow::Error> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = reader.format();
    let format_name = format
        .map(|f| format!("{:?}", f))
        .unwrap_or_else(|| "unknown".to_string());
    let mime_type = format.map(|f| f.to_mime_type().to_string());

    let img = reader.decode()?;
    let (width, height) = img.dimensions();

    let gray = img.to_luma8();
    let pixel_count = u64::from(gray.width()) * u64::from(gray.height());
    if pixel_count == 0 {
        anyhow::bail!("Image has no pixels");
    }

    let mut sum = 0.0_f64;
    let mut sum_squares = 0.0_f64;
    for pixel in gray.pixels() {
        let luminance = f64::from(pixel.0[0]);
        sum += luminance;
        sum_squares += luminance * luminance;
    }
    let n = pixel_count as f64;
    let mean = sum / n;
    let variance = (sum_squares / n - mean * mean).max(0.0);
    let stddev = variance.sqrt();

    Ok(ImageAnalysis {
        width,
        height,
        format: format_name,
        mime_type,
        mean_brightness: mean,
        contrast_stddev: stddev,
        brightness: classify_brightness(mean),
        contrast: classify_contrast(stddev),
    })
}

/// Threshold values preserved verbatim from the service this replaces;
/// they are uncalibrated and kept for output compatibility.
fn classify_brightness(mean: f64) -> ToneLabel {
    if mean < 60.0 {
        ToneLabel::Low
    } else if mean > 180.0 {
        ToneLabel::High
    } else {
        ToneLabel::Normal
    }
}

fn classify_contrast(stddev: f64) -> ToneLabel {
    if stddev < 20.0 {
        ToneLabel::Low
    } else if stddev > 80.0 {
        ToneLabel::High
    } else {
        ToneLabel::Normal
    }
}
