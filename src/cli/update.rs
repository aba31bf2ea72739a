//! `mcm update`: move a registered server to another version.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::GlobalConfig;

/// Update a registered server.
///
/// Resolves the new version with the fork the server was created with,
/// downloads the jar into the server's directory and points `start.sh` at it.
/// Restart the server afterwards to pick it up.
#[derive(Args)]
pub struct UpdateCommand {
    /// Name of the registered server.
    pub(super) name: String,

    /// Target version; defaults to the latest release.
    #[arg(long)]
    pub(super) version: Option<String>,
}

impl UpdateCommand {
    /// Runs the update.
    pub async fn execute(self, global: &GlobalConfig) -> Result<()> {
        let orchestrator = super::orchestrator(global, false)?;
        let record = orchestrator.update(&self.name, self.version.as_deref()).await?;

        println!(
            "{} {} to {} {}",
            "Updated".green().bold(),
            record.name.bold(),
            record.fork,
            record.version.yellow()
        );
        println!("Restart the server to run the new version.");
        Ok(())
    }
}
