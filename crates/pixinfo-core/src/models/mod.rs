//! Domain models shared across the Pixinfo crates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Flat mapping from metadata tag name to a heterogeneous value, as produced
/// by the metadata extractor. No schema is enforced; values may be numbers,
/// strings, or arrays of numbers (coordinate triples).
pub type RawMetadata = Map<String, Value>;

/// Attributes of the uploaded file as reported by the upload handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttributes {
    pub original_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

/// The three-way partition produced by metadata normalization.
///
/// `clean` holds normalized, human-meaningful fields; `analysis` holds the
/// vetted shooting-condition fields; `raw` holds every tag not consumed into
/// the other two groupings. Keys consumed into `clean`/`analysis` never
/// appear in `raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NormalizedOutput {
    #[schema(value_type = Object)]
    pub clean: Map<String, Value>,
    #[schema(value_type = Object)]
    pub analysis: Map<String, Value>,
    #[schema(value_type = Object)]
    pub raw: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
