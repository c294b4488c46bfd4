//! Error types module
//!
//! All request-path failures are unified under `AppError`. Each variant knows
//! its HTTP status, its client-facing message, and how loudly it should be
//! logged. Extraction and streaming detail never reaches the client; the
//! specific cause stays in the server logs.

use crate::validation::ValidationError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Extraction probe failed: {0}")]
    Probe(String),

    #[error("Extraction download failed: {0}")]
    Download(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) => 400,
            AppError::Probe(_) | AppError::Download(_) | AppError::Internal(_) => 500,
        }
    }

    /// Client-facing message. Engine and I/O causes are replaced with a fixed
    /// generic string; validation messages are safe to echo back.
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Probe(_) => {
                "Failed to fetch video information. Please check the URL and try again.".to_string()
            }
            AppError::Download(_) => "Download failed. Please try again.".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Whether the full error text may be shown outside production builds.
    pub fn is_sensitive(&self) -> bool {
        !matches!(self, AppError::InvalidInput(_))
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::Probe(_) | AppError::Download(_) => LogLevel::Warn,
            AppError::Internal(_) => LogLevel::Error,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
