//! Pixinfo Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! metadata normalization core shared by the Pixinfo components.

pub mod config;
pub mod error;
pub mod models;
pub mod normalize;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileAttributes, NormalizedOutput, RawMetadata};
