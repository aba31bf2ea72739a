//! Command-line interface for MCM (Minecraft server manager).
//!
//! # Available Commands
//!
//! - `create` - Download a server jar, write its launch script and unit file, and register it
//! - `update` - Move a registered server to another version of its fork
//! - `list` - Show registered servers
//! - `remove` - Forget a server, optionally deleting its files
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - Log at debug level / only log errors
//! - `--config <path>` - Use another config file (also `MCM_CONFIG`)
//! - `--no-progress` - Hide download progress bars (also `MCM_NO_PROGRESS`)
//!
//! # Examples
//!
//! ```bash
//! mcm create paper --name lobby --version 1.16.4
//! mcm create vanilla --path /srv/minecraft/survival
//! mcm update lobby
//! mcm list --format json
//! mcm remove lobby --delete-files
//! ```

mod create;
mod list;
mod remove;
mod update;

pub use create::CreateCommand;
pub use list::{ListCommand, OutputFormat};
pub use remove::RemoveCommand;
pub use update::UpdateCommand;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::config::GlobalConfig;
use crate::constants::{ENV_CONFIG, ENV_NO_PROGRESS};
use crate::installer::{InstallSettings, Orchestrator};
use crate::resolver::HttpClient;

/// Runtime configuration derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can drive commands with a prepared
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log directive forced by `--verbose`/`--quiet`; `None` defers to `RUST_LOG`.
    pub log_level: Option<String>,
    /// Hide progress bars.
    pub no_progress: bool,
    /// Config file override.
    pub config_path: Option<String>,
}

impl CliConfig {
    /// Create a new CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exports the settings other modules read from the environment.
    ///
    /// - `MCM_NO_PROGRESS=1` when progress is disabled
    /// - `MCM_CONFIG` when a config path was given
    ///
    /// Must run before any other thread is spawned.
    pub fn apply_to_env(&self) {
        if self.no_progress {
            // SAFETY: called once from the main task before work starts.
            unsafe { std::env::set_var(ENV_NO_PROGRESS, "1") };
        }

        if let Some(ref path) = self.config_path {
            // SAFETY: as above.
            unsafe { std::env::set_var(ENV_CONFIG, path) };
        }
    }
}

/// Main CLI structure for MCM.
#[derive(Parser)]
#[command(
    name = "mcm",
    about = "Minecraft server creator with start script and systemd service",
    version,
    author,
    long_about = "MCM downloads vanilla, Paper and Forge server jars, writes a screen-based \
                  launch script and a systemd unit, and keeps a registry of installed servers \
                  so they can be updated by name."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global configuration file.
    ///
    /// Defaults to `~/.config/mcm/config.toml`.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Disable progress bars.
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new server.
    Create(CreateCommand),

    /// Update a registered server to another version.
    Update(UpdateCommand),

    /// List registered servers.
    List(ListCommand),

    /// Remove a server from the registry.
    Remove(RemoveCommand),
}

impl Cli {
    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Execute the CLI with a specific configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply_to_env();
        let global = GlobalConfig::load().await?;

        match self.command {
            Commands::Create(cmd) => cmd.execute(&global).await,
            Commands::Update(cmd) => cmd.execute(&global).await,
            Commands::List(cmd) => cmd.execute(&global),
            Commands::Remove(cmd) => cmd.execute(&global),
        }
    }
}

/// Builds an orchestrator backed by the real network and the configured registry.
fn orchestrator(global: &GlobalConfig, create_service: bool) -> Result<Orchestrator> {
    let client = Arc::new(HttpClient::from_config(global).context("Failed to build HTTP client")?);
    let mut settings =
        InstallSettings::from_config(global).context("Failed to read the current directory")?;
    if !create_service {
        settings.service_dir = None;
    }

    Ok(Orchestrator::new(global.registry()?, client.clone(), client, global.upstream.clone(), settings))
}
