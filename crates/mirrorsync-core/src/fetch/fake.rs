//! In-memory fetcher for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{FetchError, HttpFetcher};

/// Serves canned responses by exact URL; anything else is a 404.
#[derive(Default)]
pub(crate) struct MapFetcher {
    routes: HashMap<String, Result<Vec<u8>, FetchError>>,
    requested: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ok(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(url.to_string(), Ok(body.into()));
        self
    }

    pub(crate) fn err(mut self, url: &str, err: FetchError) -> Self {
        self.routes.insert(url.to_string(), Err(err));
        self
    }

    /// URLs requested so far, in call order.
    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl HttpFetcher for MapFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.routes
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }
}
