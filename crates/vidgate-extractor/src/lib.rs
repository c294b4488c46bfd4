//! Vidgate Extractor
//!
//! Adapter around the external extraction engine (the `yt-dlp` binary):
//! metadata probes, format downloads into exclusively-owned temp files, and
//! the delete-on-drop byte stream used for the HTTP response body.

mod error;
mod local_file;
mod stream;
mod ytdlp;

pub use error::ExtractionError;
pub use local_file::LocalFile;
pub use stream::FileStream;
pub use ytdlp::YtDlp;
