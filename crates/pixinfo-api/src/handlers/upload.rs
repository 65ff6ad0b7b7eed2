//! Image upload handler.
//!
//! Receives a single multipart image upload, runs EXIF extraction and pixel
//! statistics off the async runtime, normalizes the tag map, and returns the
//! JSON summary. Extraction and decoding failures degrade gracefully: the
//! response is still produced from whatever could be derived from the file.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use pixinfo_core::{
    models::{FileAttributes, RawMetadata},
    normalize, AppError, NormalizedOutput,
};
use pixinfo_processing::{exif_tags, stats, ImageAnalysis};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Response for a processed upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Normalized metadata partition (clean / analysis / raw)
    pub metadata: NormalizedOutput,
    /// Decoded image statistics; absent when the image could not be decoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSection>,
}

/// Decoded image statistics and derived tone labels.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImageSection {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub brightness: String,
    pub contrast: String,
    pub mean_brightness: f64,
    pub contrast_stddev: f64,
}

impl From<ImageAnalysis> for ImageSection {
    fn from(analysis: ImageAnalysis) -> Self {
        Self {
            width: analysis.width,
            height: analysis.height,
            format: analysis.format,
            brightness: analysis.brightness.to_string(),
            contrast: analysis.contrast.to_string(),
            mean_brightness: round2(analysis.mean_brightness),
            contrast_stddev: round2(analysis.contrast_stddev),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Upload image handler
///
/// Validates the uploaded file, extracts embedded metadata, computes pixel
/// statistics, and returns the normalized summary.
///
/// # Errors
/// - `AppError::InvalidInput` - Invalid file or multipart form
/// - `AppError::PayloadTooLarge` - File exceeds size limit
/// - `AppError::Internal` - Internal processing error
#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Metadata extracted and normalized", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let (data, original_name, content_type) = extract_multipart_file(multipart).await?;

    state
        .validator
        .validate_all(&original_name, &content_type, data.len())?;

    let size_bytes = data.len() as u64;
    let (mut raw, analysis) = tokio::task::spawn_blocking(move || {
        let raw = exif_tags::extract_metadata(&data).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "No readable EXIF block; continuing with empty tag map");
            RawMetadata::new()
        });
        let analysis = match stats::analyze(&data) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                tracing::warn!(error = %e, "Image decode failed; skipping pixel statistics");
                None
            }
        };
        (raw, analysis)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Image processing task failed: {}", e)))?;

    // Decoded dimensions backfill the tag map for formats that carry no
    // EXIF block (e.g. plain PNG); EXIF-sourced values win.
    if let Some(analysis) = &analysis {
        raw.entry("ImageWidth").or_insert(json!(analysis.width));
        raw.entry("ImageHeight").or_insert(json!(analysis.height));
        raw.entry("Megapixels").or_insert(json!(analysis.megapixels()));
        let mime = analysis
            .mime_type
            .clone()
            .unwrap_or_else(|| content_type.clone());
        raw.entry("MIMEType").or_insert(Value::String(mime));
    } else {
        raw.entry("MIMEType")
            .or_insert(Value::String(content_type.clone()));
    }

    let attributes = FileAttributes {
        original_name,
        size_bytes,
        mime_type: content_type,
    };
    let output = normalize::normalize(&raw, &attributes);

    tracing::info!(
        file_name = %attributes.original_name,
        file_size = attributes.size_bytes,
        clean_fields = output.clean.len(),
        raw_fields = output.raw.len(),
        "Image metadata normalized"
    );

    Ok(Json(UploadResponse {
        metadata: output,
        image: analysis.map(ImageSection::from),
    }))
}

/// Extract file data, filename, and content type from the multipart form.
/// Exactly one field named "image" is expected.
async fn extract_multipart_file(
    mut multipart: Multipart,
) -> Result<(Vec<u8>, String, String), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::InvalidInput(format!("Failed to read multipart form: {}", e))
    })? {
        if field.name() != Some("image") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidInput("Image field is missing a filename".to_string()))?;
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read image data: {}", e)))?;

        return Ok((data.to_vec(), original_name, content_type));
    }

    Err(AppError::InvalidInput(
        "No file field named 'image' in upload".to_string(),
    ))
}
