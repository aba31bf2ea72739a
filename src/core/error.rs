//! Error handling for MCM
//!
//! Each subsystem owns a strongly-typed error (`ResolutionError`,
//! `RegistryError`, `InstallError`, ...). This module adds the CLI-facing
//! layer on top of them:
//!
//! - [`McmError`] - umbrella error for failures that do not belong to a
//!   single subsystem (bad fork names, configuration problems)
//! - [`ErrorContext`] - an error plus optional details and a suggestion,
//!   printed in color by the binary
//! - [`user_friendly_error`] - turns any [`anyhow::Error`] into an
//!   [`ErrorContext`], recognising the typed errors and attaching advice
//!
//! # Examples
//!
//! ```rust,no_run
//! use mcm_cli::core::{McmError, user_friendly_error};
//!
//! let error = McmError::InvalidFork { fork: "spigot".to_string() };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // error, details and suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::installer::{InstallError, RemoveError, UpdateError};
use crate::registry::RegistryError;
use crate::resolver::ResolutionError;

/// Umbrella error for the MCM command line.
///
/// Subsystem errors convert into it with `?`, so command handlers can work
/// with one error type while the typed source stays available for
/// [`user_friendly_error`].
#[derive(Error, Debug)]
pub enum McmError {
    /// The fork named on the command line is not one MCM can install.
    #[error("Unknown fork '{fork}'")]
    InvalidFork {
        /// The fork name as typed
        fork: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration file could not be parsed
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Path to the configuration file
        file: String,
        /// Parser message
        reason: String,
    },

    /// Server creation failed
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Server update failed
    #[error(transparent)]
    Update(#[from] UpdateError),

    /// Server removal failed
    #[error(transparent)]
    Remove(#[from] RemoveError),

    /// Registry could not be read or written
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, the error message is shown in red, details in yellow and
/// the suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying MCM error
    pub error: McmError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: McmError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Typed MCM errors are recognised (wherever they sit in the `anyhow` value)
/// and mapped to tailored advice. Anything else is reported with its full
/// cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<McmError>() {
        Ok(mcm) => return create_error_context(mcm),
        Err(other) => other,
    };
    let error = match error.downcast::<InstallError>() {
        Ok(install) => return create_error_context(McmError::Install(install)),
        Err(other) => other,
    };
    let error = match error.downcast::<UpdateError>() {
        Ok(update) => return create_error_context(McmError::Update(update)),
        Err(other) => other,
    };
    let error = match error.downcast::<RemoveError>() {
        Ok(remove) => return create_error_context(McmError::Remove(remove)),
        Err(other) => other,
    };
    let error = match error.downcast::<RegistryError>() {
        Ok(registry) => return create_error_context(McmError::Registry(registry)),
        Err(other) => other,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::PermissionDenied
    {
        return ErrorContext::new(McmError::Other {
            message: error.to_string(),
        })
        .with_suggestion("Run the command as root or choose a directory you own")
        .with_details("MCM needs write access to the server directory and its config directory");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(McmError::Other {
        message,
    })
}

fn resolution_advice(error: &ResolutionError) -> (&'static str, String) {
    match error {
        ResolutionError::UnknownVersion {
            fork,
            ..
        } => (
            "Check the version number, or omit --version to install the latest release",
            format!("The {fork} metadata does not list this version"),
        ),
        ResolutionError::UnknownBuild {
            version,
            ..
        } => (
            "Omit the build number to use the latest build of that version",
            format!("Builds are given as '<version>-<build>'; this build is not published for {version}"),
        ),
        ResolutionError::UpstreamUnavailable {
            reason,
            ..
        } => (
            "Check your internet connection and try again later",
            format!("The upstream metadata service could not be reached: {reason}"),
        ),
        ResolutionError::UpstreamFormatChanged {
            reason,
            ..
        } => (
            "The download site changed its layout; update mcm or report the problem",
            reason.clone(),
        ),
    }
}

fn create_error_context(error: McmError) -> ErrorContext {
    let (suggestion, details): (Option<String>, Option<String>) = match &error {
        McmError::InvalidFork {
            ..
        } => (
            Some("Use one of: vanilla, paper, forge".to_string()),
            None,
        ),
        McmError::ConfigError {
            ..
        } => (
            Some("Fix the value in your config file (see --config or MCM_CONFIG)".to_string()),
            None,
        ),
        McmError::ConfigParseError {
            reason,
            ..
        } => (
            Some("Fix the TOML syntax or delete the file to fall back to defaults".to_string()),
            Some(reason.clone()),
        ),
        McmError::Install(InstallError::Resolution(res))
        | McmError::Update(UpdateError::Resolution(res)) => {
            let (suggestion, details) = resolution_advice(res);
            (Some(suggestion.to_string()), Some(details))
        }
        McmError::Install(InstallError::InvalidName {
            ..
        }) => (
            Some("Choose a name made only of letters and numbers".to_string()),
            None,
        ),
        McmError::Install(InstallError::PathExists {
            ..
        }) => (
            Some("Pick a different --path or --name, or remove the existing directory".to_string()),
            None,
        ),
        McmError::Install(InstallError::NoPermission {
            ..
        }) => (
            Some("Pass --path to a directory you can write to".to_string()),
            None,
        ),
        McmError::Install(InstallError::AlreadyRegistered {
            ..
        }) => (
            Some("Run 'mcm list' to see registered servers, or 'mcm remove <name>' to forget one".to_string()),
            Some("Server names and directories must be unique".to_string()),
        ),
        McmError::Update(UpdateError::NotFound {
            ..
        })
        | McmError::Remove(RemoveError::NotFound {
            ..
        }) => (Some("Run 'mcm list' to see registered servers".to_string()), None),
        McmError::Remove(RemoveError::NotManaged {
            ..
        }) => (
            Some("Run 'mcm remove <name>' without --delete-files and delete the files yourself".to_string()),
            Some("The directory existed before mcm installed the server into it".to_string()),
        ),
        McmError::Update(UpdateError::UnsupportedFork {
            ..
        }) => (
            Some("Upgrade mcm; this server was created by a newer version".to_string()),
            None,
        ),
        McmError::Install(InstallError::DownloadFailed(_))
        | McmError::Update(UpdateError::DownloadFailed(_)) => (
            Some("Check your internet connection and free disk space, then retry".to_string()),
            None,
        ),
        McmError::Registry(_)
        | McmError::Install(InstallError::Registry(_))
        | McmError::Update(UpdateError::Registry(_))
        | McmError::Remove(RemoveError::Registry(_)) => (
            Some("Check ~/.config/mcm/saves.json is readable and valid JSON".to_string()),
            None,
        ),
        _ => (None, None),
    };

    let source_chain = std::error::Error::source(&error).map(std::string::ToString::to_string);
    let details = details.or(source_chain);

    let mut ctx = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fork;
    use std::path::PathBuf;

    #[test]
    fn test_error_display() {
        let error = McmError::InvalidFork {
            fork: "spigot".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown fork 'spigot'");

        let error = McmError::Install(InstallError::InvalidName {
            name: "server_1".to_string(),
            character: '_',
        });
        assert!(error.to_string().contains("'_'"));
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(McmError::Other {
            message: "boom".to_string(),
        })
        .with_suggestion("try again")
        .with_details("it broke");

        let display = format!("{ctx}");
        assert!(display.contains("boom"));
        assert!(display.contains("Details: it broke"));
        assert!(display.contains("Suggestion: try again"));
    }

    #[test]
    fn test_user_friendly_error_recognises_install_errors() {
        let error = anyhow::Error::from(InstallError::AlreadyRegistered {
            name: "s1".to_string(),
            path: PathBuf::from("/srv/s1"),
        });

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, McmError::Install(InstallError::AlreadyRegistered { .. })));
        assert!(ctx.suggestion.unwrap().contains("mcm list"));
    }

    #[test]
    fn test_user_friendly_error_distinguishes_upstream_failures() {
        let down = user_friendly_error(anyhow::Error::from(InstallError::Resolution(
            ResolutionError::UpstreamUnavailable {
                url: "https://example.invalid".to_string(),
                reason: "timed out".to_string(),
            },
        )));
        let changed = user_friendly_error(anyhow::Error::from(InstallError::Resolution(
            ResolutionError::UpstreamFormatChanged {
                url: "https://example.invalid".to_string(),
                reason: "no download section".to_string(),
            },
        )));

        assert_ne!(down.suggestion, changed.suggestion);
        assert!(down.details.unwrap().contains("timed out"));
    }

    #[test]
    fn test_user_friendly_error_unknown_version_suggestion() {
        let ctx = user_friendly_error(anyhow::Error::from(UpdateError::Resolution(
            ResolutionError::UnknownVersion {
                fork: Fork::Vanilla,
                version: "9.9.9".to_string(),
            },
        )));
        assert!(ctx.suggestion.unwrap().contains("--version"));
    }

    #[test]
    fn test_user_friendly_error_generic_chain() {
        let error = anyhow::anyhow!("root cause").context("outer failure");
        let ctx = user_friendly_error(error);
        match ctx.error {
            McmError::Other {
                message,
            } => {
                assert!(message.contains("outer failure"));
                assert!(message.contains("root cause"));
            }
            _ => panic!("Expected Other error"),
        }
    }
}
