use vidgate_core::AppError;

/// Failures at the extraction-engine boundary.
///
/// The full detail (exit status, stderr) is kept for server-side logging;
/// conversion to [`AppError`] decides what the client is allowed to see.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to spawn extraction engine: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Extraction engine failed ({status}): {stderr}")]
    EngineFailure { status: String, stderr: String },

    #[error("Failed to parse engine output: {0}")]
    ParseOutput(#[source] serde_json::Error),

    #[error("Engine reported success but produced no output file")]
    NoOutputFile,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// Convert to the request-path error for a metadata probe.
    pub fn into_probe_error(self) -> AppError {
        AppError::Probe(self.to_string())
    }

    /// Convert to the request-path error for a format download.
    pub fn into_download_error(self) -> AppError {
        AppError::Download(self.to_string())
    }
}
