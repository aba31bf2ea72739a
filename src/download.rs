//! Streaming artifact download.
//!
//! Server jars are tens of megabytes, so the body is streamed chunk by chunk
//! into the destination file while a [`DownloadProgress`] tracks it. The
//! file is written under a `.part` name and renamed into place once
//! complete, so an interrupted download never leaves a truncated jar where
//! the launch script expects a good one.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::resolver::HttpClient;
use crate::utils::progress::DownloadProgress;

/// Failures fetching or storing an artifact.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The request failed or upstream answered with an error status.
    #[error("Failed to download {url}: {reason}")]
    Request {
        /// Artifact URL
        url: String,
        /// Transport or status failure
        reason: String,
    },

    /// The artifact could not be written to disk.
    #[error("Failed to write {}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Something that can materialise an artifact URL as a local file.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Downloads `url` to `destination`, overwriting it, and returns the
    /// number of bytes written.
    async fn fetch_to(
        &self,
        url: &str,
        destination: &Path,
        progress: &mut DownloadProgress,
    ) -> Result<u64, DownloadError>;
}

#[async_trait]
impl ArtifactSource for HttpClient {
    async fn fetch_to(
        &self,
        url: &str,
        destination: &Path,
        progress: &mut DownloadProgress,
    ) -> Result<u64, DownloadError> {
        download(self.inner(), url, destination, progress).await
    }
}

/// Streams `url` into `destination`.
pub async fn download(
    client: &reqwest::Client,
    url: &str,
    destination: &Path,
    progress: &mut DownloadProgress,
) -> Result<u64, DownloadError> {
    let request_error = |e: reqwest::Error| DownloadError::Request {
        url: url.to_string(),
        reason: e.to_string(),
    };

    debug!("Downloading {url} to {}", destination.display());
    let mut response =
        client.get(url).send().await.and_then(reqwest::Response::error_for_status).map_err(request_error)?;

    let partial = destination.with_extension("part");
    let mut file = fs::File::create(&partial).await.map_err(|e| DownloadError::write(&partial, e))?;

    progress.start(response.content_length());
    let streamed: Result<(), DownloadError> = async {
        while let Some(chunk) = response.chunk().await.map_err(request_error)? {
            file.write_all(&chunk).await.map_err(|e| DownloadError::write(&partial, e))?;
            progress.advance(chunk.len() as u64);
        }
        file.flush().await.map_err(|e| DownloadError::write(&partial, e))?;
        Ok(())
    }
    .await;
    progress.finish();
    drop(file);

    if let Err(e) = streamed {
        let _ = fs::remove_file(&partial).await;
        return Err(e);
    }

    fs::rename(&partial, destination).await.map_err(|e| DownloadError::write(destination, e))?;
    info!(
        "Downloaded {} ({} bytes, {:.0} KiB/s)",
        destination.display(),
        progress.bytes(),
        progress.rate() / 1024.0
    );
    Ok(progress.bytes())
}
