use std::path::{Path, PathBuf};

use crate::error::ExtractionError;
use crate::stream::FileStream;

/// A single request's exclusively-owned temporary on-disk artifact.
///
/// Created by [`YtDlp::fetch`](crate::YtDlp::fetch) under a randomized,
/// unguessable name. Deleted exactly once: either through
/// [`into_stream`](Self::into_stream) (the stream's drop guard removes the
/// file after full transmission or an aborted transfer) or through
/// [`delete`](Self::delete) on an error path. Deliberately not `Clone`.
#[derive(Debug)]
pub struct LocalFile {
    path: PathBuf,
    ext: String,
}

impl LocalFile {
    pub(crate) fn new(path: PathBuf, ext: String) -> Self {
        Self { path, ext }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.ext
    }

    /// Best-effort removal. A failed delete is logged, never propagated;
    /// the cleanup sweeper is the backstop for anything left behind.
    pub async fn delete(self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed temporary file");
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Failed to remove temporary file, cleanup sweeper will collect it"
                );
            }
        }
    }

    /// Consume the file into a chunked byte stream that removes the file
    /// when the stream is dropped. If the file cannot be opened it is
    /// removed immediately and the error propagated.
    pub async fn into_stream(self) -> Result<FileStream, ExtractionError> {
        match tokio::fs::File::open(&self.path).await {
            Ok(file) => Ok(FileStream::new(file, self.path)),
            Err(err) => {
                self.delete().await;
                Err(ExtractionError::Io(err))
            }
        }
    }
}
