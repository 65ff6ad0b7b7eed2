//! OpenAPI documentation definition.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixinfo API",
        description = "Image metadata extraction and normalization service"
    ),
    paths(
        crate::handlers::health::root,
        crate::handlers::health::liveness_check,
        crate::handlers::upload::upload_image,
    ),
    components(schemas(
        crate::handlers::upload::UploadResponse,
        crate::handlers::upload::ImageSection,
        pixinfo_core::models::NormalizedOutput,
        crate::error::ErrorResponse,
    ))
)]
pub struct ApiDoc;
