//! Shared application state.

use pixinfo_core::Config;
use pixinfo_processing::ImageValidator;

/// State shared across request handlers.
pub struct AppState {
    pub config: Config,
    pub validator: ImageValidator,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let validator = ImageValidator::new(
            config.max_file_size_bytes,
            config.allowed_extensions.clone(),
            config.allowed_content_types.clone(),
        );
        Self { config, validator }
    }
}
