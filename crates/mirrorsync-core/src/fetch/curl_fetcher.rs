//! libcurl-backed fetcher.

use std::time::Duration;

use super::{FetchError, HttpFetcher};
use crate::config::HttpConfig;

/// One `Easy` handle per request; safe to share across worker threads.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    user_agent: String,
    connect_timeout: Duration,
    timeout: Duration,
    low_speed_limit: u32,
    low_speed_time: Duration,
}

impl CurlFetcher {
    pub fn new(http: &HttpConfig, user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            connect_timeout: Duration::from_secs(http.connect_timeout_secs),
            timeout: Duration::from_secs(http.timeout_secs),
            low_speed_limit: http.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(http.low_speed_time_secs),
        }
    }

    fn perform(&self, url: &str) -> Result<(u32, Vec<u8>), curl::Error> {
        let mut body = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // Some mirrors reject requests without a User-Agent.
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.low_speed_limit(self.low_speed_limit)?;
        easy.low_speed_time(self.low_speed_time)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, body))
    }
}

impl HttpFetcher for CurlFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match self.perform(url) {
            Ok((code, body)) if (200..300).contains(&code) => {
                tracing::debug!(url, code, bytes = body.len(), "GET ok");
                Ok(body)
            }
            Ok((code, _)) => {
                tracing::debug!(url, code, "GET returned non-success status");
                Err(FetchError::Status(code))
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "GET failed");
                Err(classify_curl_error(&e))
            }
        }
    }
}

fn classify_curl_error(e: &curl::Error) -> FetchError {
    if e.is_operation_timedout() {
        FetchError::Timeout(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}
