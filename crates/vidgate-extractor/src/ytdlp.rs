//! YtDlp - adapter around the `yt-dlp` binary.
//!
//! Two operations only: probe metadata for a URL (no download) and download
//! one format to a randomized temp path. The URL and format id are passed as
//! separate argv entries, never through a shell.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use uuid::Uuid;
use vidgate_core::{FormatDescriptor, VideoMetadata};

use crate::error::ExtractionError;
use crate::local_file::LocalFile;

const DEFAULT_EXT: &str = "mp4";

/// Extraction engine handle: binary path plus the work directory downloads
/// land in. The work directory is the same one the cleanup sweeper scans, so
/// any file the request path fails to delete is collected once the retention
/// window elapses.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: String,
    work_dir: PathBuf,
}

/// Engine-side JSON shape for a single video, reduced to the fields we map.
#[derive(Debug, Deserialize)]
struct RawInfo {
    title: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
    uploader: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: Option<String>,
    ext: Option<String>,
    resolution: Option<String>,
    filesize: Option<u64>,
    filesize_approx: Option<f64>,
    format_note: Option<String>,
}

impl YtDlp {
    pub fn new(binary: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Probe a URL in metadata-only mode. Writes nothing to disk.
    #[tracing::instrument(skip(self))]
    pub async fn probe(&self, url: &str) -> Result<VideoMetadata, ExtractionError> {
        let output = Command::new(&self.binary)
            .args(["-J", "--no-warnings", "--no-playlist"])
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(ExtractionError::Spawn)?;

        if !output.status.success() {
            return Err(engine_failure(&output));
        }

        let raw: RawInfo =
            serde_json::from_slice(&output.stdout).map_err(ExtractionError::ParseOutput)?;
        Ok(map_info(raw))
    }

    /// Download exactly one format to a uuid-named temp path and return the
    /// resulting [`LocalFile`]. On failure after the engine ran, any partial
    /// output under the same random base name is removed best-effort before
    /// the error propagates; a failed run that created nothing is a normal
    /// failed outcome.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str, format_id: &str) -> Result<LocalFile, ExtractionError> {
        let stem = fresh_stem();
        let template = format!("{}.%(ext)s", self.work_dir.join(&stem).display());

        let result = Command::new(&self.binary)
            .arg("-f")
            .arg(format_id)
            .arg("-o")
            .arg(&template)
            .args([
                "--no-playlist",
                "--no-warnings",
                "--quiet",
                "--no-simulate",
                "--print",
                "after_move:filepath",
            ])
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(ExtractionError::Spawn)?;

        if !result.status.success() {
            remove_partials(&self.work_dir, &stem).await;
            return Err(engine_failure(&result));
        }

        // The engine prints the final path (post move/merge) as the last
        // non-empty stdout line.
        let stdout = String::from_utf8_lossy(&result.stdout);
        let reported = stdout.lines().rev().find(|l| !l.trim().is_empty());

        let path = match reported {
            Some(line) => PathBuf::from(line.trim()),
            None => {
                remove_partials(&self.work_dir, &stem).await;
                return Err(ExtractionError::NoOutputFile);
            }
        };

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            remove_partials(&self.work_dir, &stem).await;
            return Err(ExtractionError::NoOutputFile);
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(DEFAULT_EXT)
            .to_string();

        tracing::debug!(path = %path.display(), ext = %ext, "Fetched format to temporary file");
        Ok(LocalFile::new(path, ext))
    }
}

/// Randomized, unguessable temp-file stem. Not derived from any user input,
/// so concurrent fetches cannot collide and clients cannot guess paths.
fn fresh_stem() -> String {
    format!("vidgate_{}", Uuid::new_v4().simple())
}

fn engine_failure(output: &std::process::Output) -> ExtractionError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    tracing::warn!(status = %output.status, stderr = %stderr, "Extraction engine failed");
    ExtractionError::EngineFailure {
        status: output.status.to_string(),
        stderr,
    }
}

/// Remove any `<stem>.*` files the engine left behind. Returns the number of
/// files removed; zero is a valid outcome (the engine may have failed before
/// creating anything).
async fn remove_partials(dir: &Path, stem: &str) -> usize {
    let prefix = format!("{stem}.");
    let mut removed = 0;

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "Failed to scan for partial downloads");
            return 0;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(&prefix) {
            continue;
        }
        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => {
                tracing::info!(path = %entry.path().display(), "Removed partial download");
                removed += 1;
            }
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "Failed to remove partial download");
            }
        }
    }

    removed
}

fn map_info(raw: RawInfo) -> VideoMetadata {
    let formats = raw
        .formats
        .into_iter()
        .filter_map(map_format)
        .collect::<Vec<_>>();

    VideoMetadata {
        title: raw.title.unwrap_or_else(|| "Unknown".to_string()),
        duration: raw.duration.map(|d| d.max(0.0) as u64).unwrap_or(0),
        thumbnail: raw.thumbnail.unwrap_or_default(),
        uploader: raw.uploader.unwrap_or_else(|| "Unknown".to_string()),
        formats,
    }
}

/// Formats without any size information (exact or approximate) are dropped;
/// the frontend sorts and displays by size.
fn map_format(raw: RawFormat) -> Option<FormatDescriptor> {
    let format_id = raw.format_id?;
    let filesize = raw
        .filesize
        .filter(|size| *size > 0)
        .or_else(|| raw.filesize_approx.filter(|a| *a > 0.0).map(|a| a as u64))?;

    Some(FormatDescriptor {
        format_id,
        ext: raw.ext.unwrap_or_else(|| "unknown".to_string()),
        resolution: raw.resolution.unwrap_or_else(|| "unknown".to_string()),
        filesize,
        format_note: raw.format_note.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info_json() -> &'static str {
        r#"{
            "title": "Sample video",
            "duration": 213.4,
            "thumbnail": "https://i.ytimg.com/vi/x/hq.jpg",
            "uploader": "Some Channel",
            "formats": [
                {"format_id": "22", "ext": "mp4", "resolution": "1280x720", "filesize": 10485760, "format_note": "720p"},
                {"format_id": "137", "ext": "mp4", "resolution": "1920x1080", "filesize_approx": 52428800.0, "format_note": "1080p"},
                {"format_id": "sb0", "ext": "mhtml", "resolution": "48x27", "format_note": "storyboard"},
                {"ext": "mp4", "filesize": 1}
            ]
        }"#
    }

    #[test]
    fn test_map_info_filters_sizeless_and_idless_formats() {
        let raw: RawInfo = serde_json::from_str(sample_info_json()).unwrap();
        let metadata = map_info(raw);

        assert_eq!(metadata.title, "Sample video");
        assert_eq!(metadata.duration, 213);
        assert_eq!(metadata.uploader, "Some Channel");
        assert_eq!(metadata.formats.len(), 2);
        assert_eq!(metadata.formats[0].format_id, "22");
        assert_eq!(metadata.formats[0].filesize, 10_485_760);
        // Approximate size is accepted when no exact size exists
        assert_eq!(metadata.formats[1].format_id, "137");
        assert_eq!(metadata.formats[1].filesize, 52_428_800);
    }

    #[test]
    fn test_map_info_defaults_for_missing_fields() {
        let raw: RawInfo = serde_json::from_str("{}").unwrap();
        let metadata = map_info(raw);
        assert_eq!(metadata.title, "Unknown");
        assert_eq!(metadata.duration, 0);
        assert_eq!(metadata.thumbnail, "");
        assert_eq!(metadata.uploader, "Unknown");
        assert!(metadata.formats.is_empty());
    }

    #[test]
    fn test_fresh_stems_are_unique() {
        let a = fresh_stem();
        let b = fresh_stem();
        assert_ne!(a, b);
        assert!(a.starts_with("vidgate_"));
    }

    #[tokio::test]
    async fn test_remove_partials_only_touches_matching_stem() {
        let dir = tempfile::tempdir().unwrap();
        let stem = fresh_stem();
        let partial = dir.path().join(format!("{stem}.mp4.part"));
        let merged = dir.path().join(format!("{stem}.mp4"));
        let other = dir.path().join("unrelated.mp4");
        for p in [&partial, &merged, &other] {
            tokio::fs::write(p, b"x").await.unwrap();
        }

        let removed = remove_partials(dir.path(), &stem).await;

        assert_eq!(removed, 2);
        assert!(!partial.exists());
        assert!(!merged.exists());
        assert!(other.exists());
    }

    #[tokio::test]
    async fn test_remove_partials_with_nothing_created_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(remove_partials(dir.path(), &fresh_stem()).await, 0);
    }

    #[cfg(unix)]
    mod fake_engine {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Install a fake engine script and return (engine, work dir guard).
        fn engine_with(body: &str) -> (YtDlp, TempDir) {
            let work = tempfile::tempdir().unwrap();
            let script = work.path().join("fake-yt-dlp");
            std::fs::write(&script, body).unwrap();
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
            let engine = YtDlp::new(script.to_string_lossy().to_string(), work.path());
            (engine, work)
        }

        fn work_dir_files(work: &TempDir) -> Vec<String> {
            std::fs::read_dir(work.path())
                .unwrap()
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| name != "fake-yt-dlp")
                .collect()
        }

        #[tokio::test]
        async fn test_probe_parses_engine_json_and_writes_nothing() {
            let json = sample_info_json().replace('\n', " ");
            let (engine, work) = engine_with(&format!("#!/bin/sh\nprintf '%s' '{json}'\n"));

            let metadata = engine
                .probe("https://www.youtube.com/watch?v=X")
                .await
                .unwrap();

            assert_eq!(metadata.title, "Sample video");
            assert_eq!(metadata.formats.len(), 2);
            assert!(work_dir_files(&work).is_empty(), "probe must not create files");
        }

        #[tokio::test]
        async fn test_probe_surfaces_engine_stderr_on_failure() {
            let (engine, _work) =
                engine_with("#!/bin/sh\necho 'ERROR: Unsupported URL' >&2\nexit 1\n");

            let err = engine
                .probe("https://www.youtube.com/watch?v=X")
                .await
                .unwrap_err();

            match err {
                ExtractionError::EngineFailure { stderr, .. } => {
                    assert!(stderr.contains("Unsupported URL"));
                }
                other => panic!("expected EngineFailure, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_probe_with_missing_binary_is_spawn_error() {
            let work = tempfile::tempdir().unwrap();
            let engine = YtDlp::new("/nonexistent/vidgate-fake-binary", work.path());
            let err = engine
                .probe("https://www.youtube.com/watch?v=X")
                .await
                .unwrap_err();
            assert!(matches!(err, ExtractionError::Spawn(_)));
        }

        /// Fake engine that honors `-o <template>`: substitutes the extension,
        /// writes a file there, and prints the final path like
        /// `--print after_move:filepath` would.
        const FETCH_SCRIPT: &str = r#"#!/bin/sh
tmpl=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then tmpl="$arg"; fi
  prev="$arg"
done
out=$(printf '%s' "$tmpl" | sed 's/%(ext)s/mp4/')
printf 'fake-video-bytes' > "$out"
printf '%s\n' "$out"
"#;

        #[tokio::test]
        async fn test_fetch_returns_local_file_and_streaming_removes_it() {
            use futures::StreamExt;

            let (engine, work) = engine_with(FETCH_SCRIPT);
            let file = engine
                .fetch("https://www.youtube.com/watch?v=X", "22")
                .await
                .unwrap();

            assert_eq!(file.extension(), "mp4");
            let path = file.path().to_path_buf();
            assert!(path.starts_with(work.path()));
            assert!(path.exists());

            let mut stream = file.into_stream().await.unwrap();
            let mut total = 0;
            while let Some(chunk) = stream.next().await {
                total += chunk.unwrap().len();
            }
            assert_eq!(total, "fake-video-bytes".len());
            drop(stream);
            assert!(!path.exists(), "temp file must be gone after full stream");
        }

        #[tokio::test]
        async fn test_concurrent_fetches_use_distinct_paths() {
            let (engine, _work) = engine_with(FETCH_SCRIPT);

            let url = "https://www.youtube.com/watch?v=X";
            let (a, b) = tokio::join!(engine.fetch(url, "22"), engine.fetch(url, "22"));
            let (a, b) = (a.unwrap(), b.unwrap());

            assert_ne!(a.path(), b.path());
            a.delete().await;
            b.delete().await;
        }

        #[tokio::test]
        async fn test_failed_fetch_removes_partial_output() {
            // Engine writes a partial file, then fails
            let script_body = r#"#!/bin/sh
tmpl=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then tmpl="$arg"; fi
  prev="$arg"
done
out=$(printf '%s' "$tmpl" | sed 's/%(ext)s/mp4.part/')
printf 'partial' > "$out"
echo 'ERROR: network' >&2
exit 1
"#;
            let (engine, work) = engine_with(script_body);

            let err = engine
                .fetch("https://www.youtube.com/watch?v=X", "22")
                .await
                .unwrap_err();
            assert!(matches!(err, ExtractionError::EngineFailure { .. }));

            assert!(
                work_dir_files(&work).is_empty(),
                "failed fetch must leave no partials behind"
            );
        }
    }
}
