//! Filename extraction from URL path.

use percent_encoding::percent_decode_str;
use url::Url;

/// Extracts the last path segment of `url`, percent-decoded.
///
/// Returns `None` if the path is empty/root or the segment is `.`/`..`.
pub fn filename_from_url_path(url: &Url) -> Option<String> {
    let segment = url.path().split('/').filter(|s| !s.is_empty()).last()?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy().into_owned();
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded)
}
