use super::ValidationError;

/// Validate a format id against the safe charset `[A-Za-z0-9_-]+`.
///
/// The id is forwarded to the extraction engine; anything outside this
/// alphabet (including `+`, which yt-dlp itself would accept for merged
/// formats) is rejected.
pub fn validate_format_id(format_id: &str) -> Result<(), ValidationError> {
    if format_id.is_empty() {
        return Err(ValidationError::InvalidFormatId);
    }

    let safe = format_id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

    if safe {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormatId)
    }
}
