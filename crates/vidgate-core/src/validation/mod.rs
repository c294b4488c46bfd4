//! Input validation
//!
//! Pure, total checks applied before anything reaches the extraction engine.
//! The URL allow-list keeps the backend from acting as an open download relay
//! for arbitrary domains; the format-id charset keeps engine-bound tokens to
//! a safe alphabet (the id is also passed as a separate argv entry, never
//! through a shell, so this is defense in depth).

mod filename;
mod format;
mod url_check;

pub use filename::sanitize_filename;
pub use format::validate_format_id;
pub use url_check::validate_url;

/// Validation failures, all client-caused and safe to echo back verbatim.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid URL scheme")]
    InvalidScheme,

    #[error("Invalid URL format")]
    MalformedUrl,

    #[error("Domain not supported. Only educational/lawful content platforms allowed.")]
    DomainNotAllowed,

    #[error("Invalid format ID")]
    InvalidFormatId,
}
