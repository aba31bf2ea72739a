//! Atomic file write operations using temp-and-rename strategy.
//!
//! The registry document and launch scripts are rewritten in full on every
//! change; writing through a temporary sibling keeps a crash from leaving a
//! half-written file behind.

use crate::utils::fs::dirs::ensure_dir;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Safely writes a string to a file using atomic operations.
///
/// Convenience wrapper around [`atomic_write`].
///
/// # Examples
///
/// ```rust,no_run
/// use mcm_cli::utils::fs::safe_write;
/// use std::path::Path;
///
/// # fn example() -> std::io::Result<()> {
/// safe_write(Path::new("/tmp/mcm/saves.json"), "[]")?;
/// # Ok(())
/// # }
/// ```
pub fn safe_write(path: &Path, content: &str) -> io::Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// 1. Writes content to a temporary file (`.tmp` extension) next to the target
/// 2. Syncs the temporary file to disk
/// 3. Renames the temporary file over the target path
///
/// Parent directories are created when missing.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("nested").join("deeper").join("saves.json");

        atomic_write(&target, b"[]").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
        assert!(!target.with_extension("tmp").exists());
    }

    #[test]
    fn test_safe_write_replaces_existing_content() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("start.sh");

        safe_write(&target, "first").unwrap();
        safe_write(&target, "second").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    }
}
