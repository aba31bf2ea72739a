//! Server name validation and installation directory selection.

use std::path::{Path, PathBuf};
use tracing::info;

use super::InstallError;
use crate::utils::fs::{absolutize, is_writable_dir};

/// Trims `name` and checks that every character is a letter or a digit.
///
/// Returns the trimmed name.
///
/// ```rust
/// use mcm_cli::installer::validate_name;
///
/// assert_eq!(validate_name(" Server1 ").unwrap(), "Server1");
/// assert!(validate_name("server_1").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<String, InstallError> {
    let name = name.trim();
    if let Some(character) = name.chars().find(|c| !c.is_alphanumeric()) {
        return Err(InstallError::InvalidName {
            name: name.to_string(),
            character,
        });
    }
    Ok(name.to_string())
}

/// Where a server goes and whether the directory still has to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct InstallTarget {
    pub path: PathBuf,
    pub create: bool,
}

/// Picks the installation directory.
///
/// 1. An explicit path, made absolute against `working_dir`; it must not exist.
/// 2. `working_dir/<name>`; it must not exist.
/// 3. `working_dir` itself, which must be writable.
pub(super) fn select_install_path(
    working_dir: &Path,
    requested_path: Option<&Path>,
    name: Option<&str>,
) -> Result<InstallTarget, InstallError> {
    let fresh = match (requested_path, name) {
        (Some(path), _) => {
            let path = absolutize(working_dir, path);
            info!("Saving to {}", path.display());
            Some(path)
        }
        (None, Some(name)) => {
            let path = working_dir.join(name);
            info!("No path given, saving to {}", path.display());
            Some(path)
        }
        (None, None) => None,
    };

    match fresh {
        Some(path) if path.exists() => Err(InstallError::PathExists {
            path,
        }),
        Some(path) => Ok(InstallTarget {
            path,
            create: true,
        }),
        None if is_writable_dir(working_dir) => {
            info!("Using current directory {}", working_dir.display());
            Ok(InstallTarget {
                path: working_dir.to_path_buf(),
                create: false,
            })
        }
        None => Err(InstallError::NoPermission {
            path: working_dir.to_path_buf(),
        }),
    }
}

/// Derives a server name from the directory's final segment.
pub(super) fn name_from_path(path: &Path) -> Result<String, InstallError> {
    let segment = path.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    if segment.is_empty() {
        return Err(InstallError::InvalidName {
            name: path.display().to_string(),
            character: std::path::MAIN_SEPARATOR,
        });
    }
    validate_name(&segment)
}
