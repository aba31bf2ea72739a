//! Configuration management for MCM
//!
//! MCM reads a single optional user-wide file, `~/.config/mcm/config.toml`.
//! Every field has a default, so a missing file (or an empty one) behaves
//! exactly like a fresh install.
//!
//! # Location
//!
//! - `--config <path>` on the command line
//! - `MCM_CONFIG` environment variable
//! - otherwise `<config dir>/mcm/config.toml` (`~/.config/mcm/config.toml` on Linux)
//!
//! # Example
//!
//! ```toml
//! registry_path = "~/servers/saves.json"
//! service_dir = "/etc/systemd/system"
//! create_service = true
//! memory_gb = 6
//! http_timeout_secs = 20
//!
//! [upstream]
//! paper_api_url = "https://papermc.example.net/api/v1/paper"
//! ```
//!
//! Paths go through `shellexpand`, so `~` and `$VARS` are allowed.

mod global;

pub use global::{GlobalConfig, UpstreamConfig};
