//! HTTP document fetcher

use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::common::errors::{Result, WatchError};
use crate::common::traits::DocumentFetcher;
use crate::common::types::FetchedDocument;
use crate::config::types::FetcherConfig;

/// Fetches product pages over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client (timeout, redirect policy and User-Agent baked in)
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with default settings
    pub fn new() -> Result<Self> {
        Self::from_config(&FetcherConfig::default())
    }

    /// Create a fetcher from configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WatchError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        debug!("Fetching document from: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                WatchError::Timeout(format!("{} after {:?}", url, self.timeout))
            } else {
                WatchError::HttpRequest(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(WatchError::HttpStatus {
                status: response.status().as_u16(),
                url: response.url().to_string(),
            });
        }

        let final_host = response
            .url()
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| WatchError::InvalidInput(format!("No host in {}", response.url())))?;

        // decodes using the Content-Type charset, UTF-8 otherwise
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                WatchError::Timeout(format!("{} body after {:?}", url, self.timeout))
            } else {
                WatchError::HttpRequest(e)
            }
        })?;
        debug!("Fetched {} bytes from {}", body.len(), final_host);

        Ok(FetchedDocument { body, final_host })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = HttpFetcher::new();
        assert!(fetcher.is_ok());
        assert_eq!(fetcher.unwrap().timeout(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(result.is_err());
    }
}
