//! Wire models for probe responses.
//!
//! Field names follow the JSON contract the frontend already speaks:
//! `format_id`, `ext`, `resolution`, `filesize`, `format_note`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One selectable quality/container variant of a video, as reported by the
/// extraction engine. Only formats with a known (exact or approximate) size
/// make it into a [`VideoMetadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormatDescriptor {
    /// Opaque token assigned by the extraction engine.
    pub format_id: String,
    pub ext: String,
    pub resolution: String,
    /// Exact size when known, otherwise the engine's approximation.
    pub filesize: u64,
    pub format_note: String,
}

/// Metadata for a single probed URL. Constructed once per probe, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VideoMetadata {
    pub title: String,
    /// Duration in seconds, 0 when the engine does not report one.
    pub duration: u64,
    /// May be empty when the engine has no thumbnail.
    pub thumbnail: String,
    pub uploader: String,
    pub formats: Vec<FormatDescriptor>,
}
