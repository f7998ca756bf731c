//! HTTP resource fetcher

use std::time::Duration;

use bytes::Bytes;
use contracts::{ContractError, ResourceFetcher};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::{Result, SchedulerError};

const USER_AGENT: &str = concat!("banner-refresher/", env!("CARGO_PKG_VERSION"));

/// `GET` over a shared connection pool
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Fetcher with an optional per-request timeout
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SchedulerError::Setup(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

impl ResourceFetcher for HttpFetcher {
    #[instrument(name = "http_fetch", skip(self))]
    async fn fetch(&self, url: &str) -> std::result::Result<Bytes, ContractError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ContractError::fetch(url, e.to_string()))?
            .error_for_status()
            .map_err(|e| ContractError::fetch(url, e.to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ContractError::fetch(url, e.to_string()))?;
        debug!(bytes = body.len(), "fetched");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(HttpFetcher::new(Some(Duration::from_secs(5))).is_ok());
        assert!(HttpFetcher::new(None).is_ok());
    }
}
