//! Keep decoded filenames inside the output directory.

/// Sanitizes a decoded filename for use as a single path component.
///
/// - Replaces NUL, `/`, `\` and control characters with `_`
/// - Trims surrounding whitespace
/// - Limits length to 255 bytes (Linux NAME_MAX)
///
/// Spaces and punctuation inside the name are preserved.
pub fn sanitize_filename(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim();

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
