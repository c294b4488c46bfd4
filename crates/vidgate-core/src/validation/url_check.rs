use url::Url;

use super::ValidationError;

/// Domains allowed for submission, matched by substring against the
/// lowercased host. Extend as needed for other lawful content platforms.
const ALLOWED_DOMAINS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "youtu.be",
    "vimeo.com",
    "www.vimeo.com",
    "dailymotion.com",
    "www.dailymotion.com",
];

/// Validate a submitted video URL: http(s) scheme, non-empty host, host must
/// contain one of the allow-listed domains. Unparsable input is a plain
/// validation failure, never a panic.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url).map_err(|_| ValidationError::MalformedUrl)?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidScheme);
    }

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(ValidationError::MalformedUrl)?
        .to_lowercase();

    if !ALLOWED_DOMAINS.iter().any(|allowed| host.contains(allowed)) {
        return Err(ValidationError::DomainNotAllowed);
    }

    Ok(())
}
