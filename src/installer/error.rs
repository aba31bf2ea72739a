//! Orchestrator error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::download::DownloadError;
use crate::registry::RegistryError;
use crate::resolver::ResolutionError;
use crate::scripts::ScriptError;

/// Failures creating a server.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The requested version could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The server name contains something other than letters and digits.
    #[error("Invalid character '{character}' in server name '{name}'; only letters and numbers are allowed")]
    InvalidName {
        /// Name as given (trimmed)
        name: String,
        /// First offending character
        character: char,
    },

    /// The target directory already exists.
    #[error("{} already exists, not overwriting", path.display())]
    PathExists {
        /// Target directory
        path: PathBuf,
    },

    /// The target directory could not be created.
    #[error("Failed to create {}", path.display())]
    PathCreateFailed {
        /// Target directory
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The working directory is not writable.
    #[error("No permission to write to {}", path.display())]
    NoPermission {
        /// Directory that was checked
        path: PathBuf,
    },

    /// A registered server already uses this name or directory.
    #[error("A server named '{name}' or at {} is already registered", path.display())]
    AlreadyRegistered {
        /// Requested name
        name: String,
        /// Requested directory
        path: PathBuf,
    },

    /// The server jar could not be downloaded.
    #[error(transparent)]
    DownloadFailed(#[from] DownloadError),

    /// The registry could not be read or written.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The launch script could not be written.
    #[error("Failed to write launch script")]
    Script(#[from] ScriptError),
}

/// Failures updating a server.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// No registered server has this name.
    #[error("No server named '{name}'")]
    NotFound {
        /// Requested name
        name: String,
    },

    /// The record's fork is not one this build can resolve.
    #[error("Server '{name}' uses fork '{fork}', which this version of mcm cannot update")]
    UnsupportedFork {
        /// Server name
        name: String,
        /// Fork tag as stored
        fork: String,
    },

    /// The requested version could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The server jar could not be downloaded.
    #[error(transparent)]
    DownloadFailed(#[from] DownloadError),

    /// The registry could not be read or written.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The launch script could not be rewritten.
    #[error("Failed to write launch script")]
    Script(#[from] ScriptError),
}

/// Failures removing a server.
#[derive(Error, Debug)]
pub enum RemoveError {
    /// No registered server has this name.
    #[error("No server named '{name}'")]
    NotFound {
        /// Requested name
        name: String,
    },

    /// The registry could not be read or written.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The directory existed before the server was created, so it may hold
    /// unrelated files.
    #[error("Refusing to delete {}: it was not created by mcm", path.display())]
    NotManaged {
        /// Installation directory
        path: PathBuf,
    },

    /// The installation directory could not be deleted.
    #[error("Failed to delete {}", path.display())]
    Cleanup {
        /// Installation directory
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}
