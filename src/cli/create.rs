//! `mcm create`: install and register a new server.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::GlobalConfig;
use crate::constants::START_SCRIPT_NAME;
use crate::core::Fork;

/// Create a new server.
///
/// The directory is `--path` if given, else `./<name>` if `--name` is given,
/// else the current directory. Without `--name` the directory name is used.
#[derive(Args)]
pub struct CreateCommand {
    /// Server distribution: vanilla, paper or forge.
    pub(super) fork: String,

    /// Version to install (`latest`, `1.16.4`, or `1.16.4-416` for a specific build).
    #[arg(long)]
    pub(super) version: Option<String>,

    /// Directory to install into; must not exist yet.
    #[arg(short, long)]
    pub(super) path: Option<PathBuf>,

    /// Server name (letters and numbers only).
    #[arg(short, long)]
    pub(super) name: Option<String>,

    /// Do not write a systemd unit file.
    #[arg(long)]
    pub(super) no_service: bool,
}

impl CreateCommand {
    /// Runs the installation.
    pub async fn execute(self, global: &GlobalConfig) -> Result<()> {
        let fork: Fork = self.fork.parse()?;
        let create_service = global.create_service && !self.no_service;
        let orchestrator = super::orchestrator(global, create_service)?;

        let record = orchestrator
            .install(fork, self.version.as_deref(), self.path.as_deref(), self.name.as_deref())
            .await?;

        println!(
            "{} {} {} at {}",
            "Created".green().bold(),
            record.name.bold(),
            format!("({} {})", record.fork, record.version).bright_black(),
            record.path.display()
        );

        let unit = global.service_dir().join(format!("{}.service", record.name));
        if create_service && unit.exists() {
            println!("Start it with {}", format!("systemctl start {}", record.name).cyan());
        } else {
            println!(
                "Start it with {}",
                record.path.join(START_SCRIPT_NAME).display().to_string().cyan()
            );
        }
        println!(
            "The server runs in a screen session; attach with {}",
            format!("screen -r {}", record.name).cyan()
        );
        Ok(())
    }
}
