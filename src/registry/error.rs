//! Registry error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing the registry document.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No record has the requested name.
    #[error("No server named '{name}' in the registry")]
    NotFound {
        /// The name that was looked up
        name: String,
    },

    /// The document or its directory could not be read or written.
    #[error("Failed to access registry at {}", path.display())]
    Io {
        /// Registry document path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The document is not a JSON array of records.
    #[error("Registry at {} is not a valid server list", path.display())]
    Parse {
        /// Registry document path
        path: PathBuf,
        /// Underlying JSON failure
        #[source]
        source: serde_json::Error,
    },
}
