//! Filesystem and progress helpers.
//!
//! - [`fs`] - Atomic writes, directory helpers and lexical path handling
//! - [`progress`] - Progress bars and per-download progress tracking
//!
//! # Example
//!
//! ```rust,no_run
//! use mcm_cli::utils::{atomic_write, ensure_dir};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("servers/lobby"))?;
//! atomic_write(Path::new("servers/lobby/eula.txt"), b"eula=true\n")?;
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod progress;

pub use fs::{absolutize, atomic_write, ensure_dir, is_writable_dir, normalize_path, remove_dir_all, safe_write};
pub use progress::{DownloadProgress, ProgressBar, is_progress_disabled};
