//! Test utilities for MCM
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests in `tests/`.
//!
//! - [`init_test_logging`] sets up tracing once per test binary
//! - [`FixtureClient`] serves canned upstream responses and artifacts
//!   without touching the network
//! - [`fixtures`] builds clients and pages shaped like the real upstreams
//!
//! # Example
//!
//! ```rust,no_run
//! use mcm_cli::resolver::{DistributorResolver, VanillaResolver};
//! use mcm_cli::test_utils::fixtures;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let upstream = fixtures::upstream();
//! let client = fixtures::vanilla(&upstream.vanilla_manifest_url, "1.20.1", &["1.20.1"]);
//! let resolver = VanillaResolver::new(Arc::new(client), upstream.vanilla_manifest_url);
//! let descriptor = resolver.resolve(None).await.unwrap();
//! assert_eq!(descriptor.canonical_version, "1.20.1");
//! # }
//! ```

pub mod fixtures;

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::download::{ArtifactSource, DownloadError};
use crate::resolver::{MetadataClient, ResolutionError};
use crate::utils::progress::DownloadProgress;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging
/// stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

#[derive(Default)]
struct FixtureState {
    pages: HashMap<String, String>,
    artifacts: HashMap<String, Vec<u8>>,
    requests: Vec<String>,
}

/// In-memory upstream.
///
/// Unknown URLs answer like an unreachable host
/// ([`ResolutionError::UpstreamUnavailable`] / [`DownloadError::Request`]).
/// Clones share state, so a test can keep a handle to inspect
/// [`requests`](Self::requests) after handing the client to an orchestrator.
#[derive(Clone, Default)]
pub struct FixtureClient {
    state: Arc<Mutex<FixtureState>>,
}

impl FixtureClient {
    /// Creates a client that knows no URLs.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Serves `body` for metadata requests to `url`.
    pub fn with(self, url: &str, body: &str) -> Self {
        self.state().pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Serves `bytes` for artifact downloads from `url`.
    pub fn with_artifact(self, url: &str, bytes: &[u8]) -> Self {
        self.state().artifacts.insert(url.to_string(), bytes.to_vec());
        self
    }

    /// Forgets every artifact, so downloads fail while metadata still resolves.
    pub fn without_artifacts(self) -> Self {
        self.state().artifacts.clear();
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state().requests.clone()
    }

    /// Whether `url` has been requested.
    pub fn requested(&self, url: &str) -> bool {
        self.state().requests.iter().any(|r| r == url)
    }
}

#[async_trait]
impl MetadataClient for FixtureClient {
    async fn get_text(&self, url: &str) -> Result<String, ResolutionError> {
        let mut state = self.state();
        state.requests.push(url.to_string());
        state.pages.get(url).cloned().ok_or_else(|| ResolutionError::UpstreamUnavailable {
            url: url.to_string(),
            reason: "404 Not Found".to_string(),
        })
    }
}

#[async_trait]
impl ArtifactSource for FixtureClient {
    async fn fetch_to(
        &self,
        url: &str,
        destination: &Path,
        progress: &mut DownloadProgress,
    ) -> Result<u64, DownloadError> {
        let bytes = {
            let mut state = self.state();
            state.requests.push(url.to_string());
            state.artifacts.get(url).cloned()
        };
        let bytes = bytes.ok_or_else(|| DownloadError::Request {
            url: url.to_string(),
            reason: "404 Not Found".to_string(),
        })?;

        progress.start(Some(bytes.len() as u64));
        tokio::fs::write(destination, &bytes).await.map_err(|source| DownloadError::Write {
            path: destination.to_path_buf(),
            source,
        })?;
        progress.advance(bytes.len() as u64);
        progress.finish();
        Ok(bytes.len() as u64)
    }
}
