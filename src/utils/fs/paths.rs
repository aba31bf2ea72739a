//! Lexical path helpers for installation directories.
//!
//! Installation paths usually do not exist yet when they are chosen, so
//! `canonicalize` is not an option; these helpers work on components only.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path by resolving `.` and `..` components.
///
/// Does not touch the filesystem or follow symlinks. A `..` at the root
/// stays at the root.
///
/// ```rust
/// use mcm_cli::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_path(Path::new("/srv/./mc/../survival")), PathBuf::from("/srv/survival"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(normalized.components().next_back(), Some(Component::RootDir) | None) {
                    normalized.pop();
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Makes `path` absolute against `base` and normalizes it.
#[must_use]
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("/srv/mc/")), PathBuf::from("/srv/mc"));
    }

    #[test]
    fn test_absolutize_relative_and_absolute() {
        let base = Path::new("/home/steve");
        assert_eq!(absolutize(base, Path::new("servers/s1")), PathBuf::from("/home/steve/servers/s1"));
        assert_eq!(absolutize(base, Path::new("../alex/s1")), PathBuf::from("/home/alex/s1"));
        assert_eq!(absolutize(base, Path::new("/srv/s1")), PathBuf::from("/srv/s1"));
    }
}
