//! File system utilities
//!
//! - **Atomic writes**: registry and script files are written via temp-and-rename
//! - **Directories**: creation, removal and writability checks for install paths
//! - **Paths**: lexical normalization of installation paths that may not exist yet

pub mod atomic;
pub mod dirs;
pub mod paths;

pub use atomic::{atomic_write, safe_write};
pub use dirs::{ensure_dir, is_writable_dir, remove_dir_all};
pub use paths::{absolutize, normalize_path};
