//! HTTP GET abstraction.
//!
//! Every network access of the engine goes through [`HttpFetcher`] so tests can
//! substitute in-memory fakes. The production implementation is
//! [`CurlFetcher`], which is blocking and meant to be called from the worker
//! threads (or `spawn_blocking`).

mod curl_fetcher;
#[cfg(test)]
pub(crate) mod fake;

pub use curl_fetcher::CurlFetcher;

/// Why a GET did not produce a 2xx body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// Connect, overall or low-speed timeout.
    #[error("timed out: {0}")]
    Timeout(String),
    /// Connection, DNS, TLS, or read failure.
    #[error("{0}")]
    Transport(String),
}

/// Blocking HTTP GET returning the full response body on 2xx.
pub trait HttpFetcher: Send + Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Convenience for pages: fetch and decode as (lossy) UTF-8.
pub fn get_text(fetcher: &dyn HttpFetcher, url: &str) -> Result<String, FetchError> {
    let bytes = fetcher.get(url)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
