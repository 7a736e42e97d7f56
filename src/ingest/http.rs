// src/ingest/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::ingest::types::{FeedClient, FeedError};

/// Several outlets refuse non-browser agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// reqwest-backed feed transport. Accepts self-signed/invalid certificates:
/// a broken certificate on one outlet must not silence it.
pub struct HttpFeedClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFeedClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .danger_accept_invalid_certs(true)
            .build()
            .context("building feed http client")?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.to_feed_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        // Raw bytes: the XML declaration, not the Content-Type header, names the charset.
        let body = resp.bytes().await.map_err(|e| self.to_feed_error(e))?;
        Ok(body.to_vec())
    }
}

impl HttpFeedClient {
    fn to_feed_error(&self, e: reqwest::Error) -> FeedError {
        if e.is_timeout() {
            FeedError::Timeout(self.timeout.as_secs())
        } else {
            FeedError::Request(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_defaults() {
        let c = HttpFeedClient::new(Duration::from_secs(10), DEFAULT_USER_AGENT);
        assert!(c.is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let c = HttpFeedClient::new(Duration::from_secs(2), DEFAULT_USER_AGENT).unwrap();
        // Port 9 on localhost: connection refused, no network needed.
        let err = c.get("http://127.0.0.1:9/rss").await.unwrap_err();
        assert!(matches!(err, FeedError::Request(_) | FeedError::Timeout(_)));
    }
}
