//! Vidgate Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! input validation shared across all vidgate components.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, LogLevel};
pub use models::{FormatDescriptor, VideoMetadata};
pub use validation::{sanitize_filename, validate_format_id, validate_url, ValidationError};
