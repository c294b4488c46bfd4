const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const MAX_LEN: usize = 100;

/// Sanitize a client-supplied download filename: each forbidden or control
/// character is replaced with `_` and the result is truncated to 100
/// characters. Control characters would otherwise survive into the
/// `Content-Disposition` header, where CR/LF is rejected outright. The
/// extension is appended later from the actual downloaded file, so this only
/// covers the stem.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .take(MAX_LEN)
        .map(|c| {
            if FORBIDDEN.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
