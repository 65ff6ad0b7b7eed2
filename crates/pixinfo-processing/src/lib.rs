//! Pixinfo Processing Library
//!
//! File-level collaborators for the normalization core: EXIF tag extraction,
//! image decoding with pixel statistics, and upload validation.

pub mod exif_tags;
pub mod stats;
pub mod validator;

pub use exif_tags::extract_metadata;
pub use stats::{analyze, ImageAnalysis, ToneLabel};
pub use validator::{ImageValidator, ValidationError};
