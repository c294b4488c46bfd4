use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Backoff applied after a failed sweep cycle before retrying.
const ERROR_BACKOFF: Duration = Duration::from_secs(300);

/// Background sweeper for the shared download directory.
///
/// The request path deletes its own temp files; this loop is the safety net
/// for anything left behind (crashes, failed deletes). The check is purely
/// age-based: a file younger than the retention window is never touched, no
/// matter which request created it.
#[derive(Clone)]
pub struct CleanupService {
    download_dir: PathBuf,
    retention_window: Duration,
    interval: Duration,
}

impl CleanupService {
    pub fn new(download_dir: PathBuf, retention_window: Duration, interval: Duration) -> Self {
        Self {
            download_dir,
            retention_window,
            interval,
        }
    }

    /// Start the background cleanup task. The loop never terminates: a
    /// failed cycle logs, backs off, and retries.
    /// Returns a JoinHandle for graceful shutdown.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tracing::debug!(dir = %self.download_dir.display(), "Starting scheduled cleanup of stale files");

                let sleep_for = match self.sweep().await {
                    Ok(removed) => {
                        if removed > 0 {
                            tracing::info!(removed, "Cleanup cycle completed");
                        } else {
                            tracing::debug!("Cleanup cycle completed, nothing to remove");
                        }
                        self.interval
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Cleanup cycle failed, backing off");
                        ERROR_BACKOFF
                    }
                };

                tokio::time::sleep(sleep_for).await;
            }
        })
    }

    /// One sweep cycle: delete every regular file older than the retention
    /// window. Returns the number of files removed. Per-file delete failures
    /// are logged and skipped; only a directory-level failure errors the
    /// cycle.
    pub async fn sweep(&self) -> Result<usize, anyhow::Error> {
        let now = SystemTime::now();
        let mut removed = 0;

        let mut entries = tokio::fs::read_dir(&self.download_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to stat entry, skipping");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let age = match file_age(&metadata, now) {
                Some(age) => age,
                None => {
                    tracing::warn!(path = %path.display(), "Entry has no usable timestamp, skipping");
                    continue;
                }
            };

            if age <= self.retention_window {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::info!(
                        path = %path.display(),
                        age_secs = age.as_secs(),
                        "Cleaned up stale file"
                    );
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale file");
                }
            }
        }

        Ok(removed)
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}

/// Age from creation time, falling back to modification time where the
/// filesystem does not report creation times.
fn file_age(metadata: &std::fs::Metadata, now: SystemTime) -> Option<Duration> {
    let stamp = metadata.created().or_else(|_| metadata.modified()).ok()?;
    now.duration_since(stamp).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &Path, retention: Duration) -> CleanupService {
        CleanupService::new(dir.to_path_buf(), retention, Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_sweep_removes_only_files_past_retention() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("stale.mp4");
        tokio::fs::write(&stale, b"old").await.unwrap();
        // Coarse-timestamp filesystems can report a zero age for a file
        // written in the same instant
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Zero retention: everything already on disk is past the window
        let removed = service(dir.path(), Duration::ZERO).sweep().await.unwrap();
        assert_eq!(removed, 1);
        assert!(!stale.exists());
    }

    #[tokio::test]
    async fn test_sweep_keeps_files_within_retention() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("fresh.mp4");
        tokio::fs::write(&fresh, b"new").await.unwrap();

        let removed = service(dir.path(), Duration::from_secs(3600))
            .sweep()
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert!(fresh.exists());
    }

    #[tokio::test]
    async fn test_sweep_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        tokio::fs::create_dir(&sub).await.unwrap();

        let removed = service(dir.path(), Duration::ZERO).sweep().await.unwrap();
        assert_eq!(removed, 0);
        assert!(sub.exists());
    }

    #[tokio::test]
    async fn test_sweep_on_missing_directory_errors_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("does-not-exist");
        assert!(service(&gone, Duration::ZERO).sweep().await.is_err());
    }
}
