//! MCM - Minecraft server manager
//!
//! Creates Minecraft servers from the vanilla, Paper and Forge distributions,
//! writes a `screen`-based launch script and an optional systemd unit for each,
//! and keeps a JSON registry of installed servers so they can later be updated
//! or removed by name.
//!
//! # Architecture Overview
//!
//! - A [`resolver`] turns a fork and a version request (`latest`, `1.16.4`,
//!   `1.16.4-416`) into a concrete jar download by querying that fork's
//!   upstream metadata.
//! - The [`installer`] orchestrator picks the target directory, downloads the
//!   jar, writes the [`scripts`] and records the installation in the
//!   [`registry`].
//! - Updates resolve a new version for a registered server and swap the jar in
//!   place.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Global configuration (`~/.config/mcm/config.toml`)
//! - [`core`] - Fork types and user-facing error handling
//! - [`resolver`] - Per-fork version resolution against upstream metadata
//! - [`download`] - Streaming jar downloads with progress tracking
//! - [`installer`] - Install, update and remove orchestration
//! - [`registry`] - Persistent list of installed servers
//! - [`scripts`] - Launch script and systemd unit rendering
//! - [`utils`] - Filesystem and progress helpers
//!
//! # Configuration Files
//!
//! - `~/.config/mcm/config.toml` - optional settings (memory, service
//!   directory, upstream URLs, HTTP timeout)
//! - `~/.config/mcm/saves.json` - the registry, a JSON array of
//!   `{name, fork, version, path}` records
//!
//! # Environment Variables
//!
//! - `MCM_CONFIG` - alternate config file
//! - `MCM_REGISTRY_PATH` - alternate registry file
//! - `MCM_NO_PROGRESS` - disable progress bars
//! - `RUST_LOG` - log filter when neither `--verbose` nor `--quiet` is given

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod download;
pub mod installer;
pub mod registry;
pub mod resolver;
pub mod scripts;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
