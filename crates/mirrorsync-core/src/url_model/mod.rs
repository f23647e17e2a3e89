//! Destination filenames derived from download URLs.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

use url::Url;

/// Derives the local filename for a download from its URL.
///
/// Uses the percent-decoded last path segment, sanitized so it stays a single
/// path component. Falls back to `fallback` when the URL yields nothing usable.
///
/// - `https://host/files/Some%20Song.mp3` → `"Some Song.mp3"`
/// - `https://host/` → `fallback`
pub fn derive_filename(url: &Url, fallback: &str) -> String {
    let Some(raw) = filename_from_url_path(url) else {
        return fallback.to_string();
    };
    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        fallback.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(s: &str) -> String {
        derive_filename(&Url::parse(s).unwrap(), "item-1.bin")
    }

    #[test]
    fn derive_from_url_path() {
        assert_eq!(derive("https://example.com/remix/song.mp3"), "song.mp3");
        assert_eq!(
            derive("https://bt.example.org/torrents/Album%20Name.torrent"),
            "Album Name.torrent"
        );
    }

    #[test]
    fn encoded_separator_cannot_escape() {
        assert_eq!(derive("https://example.com/x/..%2F..%2Fevil.mp3"), ".._.._evil.mp3");
    }

    #[test]
    fn empty_path_falls_back() {
        assert_eq!(derive("https://example.com/"), "item-1.bin");
        assert_eq!(derive("https://example.com/%20"), "item-1.bin");
    }
}
