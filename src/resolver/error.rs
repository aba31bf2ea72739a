//! Resolution error types.

use thiserror::Error;

use crate::core::Fork;

/// Failures turning a requested version into a downloadable artifact.
///
/// `UpstreamUnavailable` and `UpstreamFormatChanged` are kept apart so an
/// outage (retry later) is never confused with a layout change upstream
/// (mcm needs fixing).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The distributor does not publish the requested version.
    #[error("Unknown {fork} version '{version}'")]
    UnknownVersion {
        /// Distributor that was asked
        fork: Fork,
        /// Version as requested (after normalisation)
        version: String,
    },

    /// The version exists but not the requested build.
    #[error("Unknown {fork} build '{build}' for version {version}")]
    UnknownBuild {
        /// Distributor that was asked
        fork: Fork,
        /// Resolved version
        version: String,
        /// Build as requested
        build: String,
    },

    /// The metadata service could not be reached or answered with an error status.
    #[error("Upstream service unavailable: {url}")]
    UpstreamUnavailable {
        /// Request URL
        url: String,
        /// Transport or status failure
        reason: String,
    },

    /// The metadata document no longer has the expected shape.
    #[error("Unexpected upstream response format from {url}")]
    UpstreamFormatChanged {
        /// Request URL
        url: String,
        /// What was missing or malformed
        reason: String,
    },
}

impl ResolutionError {
    pub(crate) fn format_changed(url: &str, reason: impl Into<String>) -> Self {
        Self::UpstreamFormatChanged {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(url: &str, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
