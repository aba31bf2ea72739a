//! Network access for the resolvers.
//!
//! Resolvers never talk to reqwest directly; they receive an
//! `Arc<dyn MetadataClient>`. Production code uses [`HttpClient`], tests use
//! the fixture client from `test_utils`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, warn};

use super::ResolutionError;
use crate::config::GlobalConfig;
use crate::constants::{METADATA_RETRIES, RETRY_DELAY_MS};

/// Fetches metadata documents from upstream distributors.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// GETs `url` and returns the body as text.
    ///
    /// Transport failures and non-success status codes are
    /// [`ResolutionError::UpstreamUnavailable`].
    async fn get_text(&self, url: &str) -> Result<String, ResolutionError>;
}

/// Fetches `url` and decodes it as JSON into `T`.
///
/// A body that does not decode is [`ResolutionError::UpstreamFormatChanged`].
pub async fn fetch_json<T: DeserializeOwned>(
    client: &dyn MetadataClient,
    url: &str,
) -> Result<T, ResolutionError> {
    let body = client.get_text(url).await?;
    serde_json::from_str(&body).map_err(|e| ResolutionError::format_changed(url, e.to_string()))
}

/// reqwest-backed client with a single retry for metadata.
///
/// `timeout` bounds each metadata request as a whole. Artifact downloads
/// share the connection pool but are only bounded by the connect timeout and
/// by how long the body may stall, so a slow but steady transfer completes.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Builds a client with the given timeout and `User-Agent`.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            inner,
            timeout,
        })
    }

    /// Builds a client from the timeout and user agent in `config`.
    pub fn from_config(config: &GlobalConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.http_timeout(), &config.user_agent)
    }

    /// The underlying reqwest client, shared with the downloader.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

#[async_trait]
impl MetadataClient for HttpClient {
    async fn get_text(&self, url: &str) -> Result<String, ResolutionError> {
        let client = &self.inner;
        let timeout = self.timeout;
        let strategy = FixedInterval::from_millis(RETRY_DELAY_MS).take(METADATA_RETRIES);

        debug!("GET {url}");
        let response = Retry::spawn(strategy, move || async move {
            let result = client
                .get(url)
                .timeout(timeout)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);
            if let Err(e) = &result {
                warn!("Request to {url} failed: {e}");
            }
            result
        })
        .await
        .map_err(|e| ResolutionError::unavailable(url, e.to_string()))?;

        response.text().await.map_err(|e| ResolutionError::unavailable(url, e.to_string()))
    }
}
