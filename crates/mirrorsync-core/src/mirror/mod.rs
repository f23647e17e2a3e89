//! Mirror candidates and load-aware ordering.

mod rank;

pub use rank::rank_mirrors;

use std::fmt;

use url::Url;

/// One alternate download location for an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorCandidate {
    url: Url,
    host: String,
}

impl MirrorCandidate {
    /// Parse an absolute URL. Returns `None` when the URL is invalid or has no host.
    pub fn parse(raw: &str) -> Option<Self> {
        Url::parse(raw.trim()).ok().and_then(Self::from_url)
    }

    pub fn from_url(url: Url) -> Option<Self> {
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(port)) => format!("{h}:{port}"),
            (Some(h), None) => h.to_string(),
            (None, _) => return None,
        };
        Some(Self { url, host })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Key into the host load table: host name, plus `:port` when the URL names one.
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for MirrorCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
