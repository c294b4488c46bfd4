use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Chunk size for streamed downloads.
const CHUNK_SIZE: usize = 4096;

/// A finite, non-restartable sequence of byte chunks read from a temporary
/// file. The consumer drives iteration; when the stream is dropped - whether
/// it reached end of file or the transport aborted mid-transfer - the backing
/// file is removed exactly once.
pub struct FileStream {
    inner: ReaderStream<File>,
    _cleanup: RemoveOnDrop,
}

impl FileStream {
    pub(crate) fn new(file: File, path: PathBuf) -> Self {
        Self {
            inner: ReaderStream::with_capacity(file, CHUNK_SIZE),
            _cleanup: RemoveOnDrop { path },
        }
    }
}

impl Stream for FileStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Removes the temp file when the stream goes away. Runs in `Drop`, so the
/// removal is synchronous; the file is small-lived local state and a failed
/// delete is only logged - the cleanup sweeper collects stragglers.
struct RemoveOnDrop {
    path: PathBuf,
}

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed streamed temporary file");
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Failed to remove streamed temporary file"
                );
            }
        }
    }
}
