//! `mcm remove`: forget a registered server.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::GlobalConfig;

/// Remove a server from the registry.
///
/// Files are kept unless `--delete-files` is given. A running server is not
/// stopped.
#[derive(Args)]
pub struct RemoveCommand {
    /// Name of the registered server.
    pub(super) name: String,

    /// Also delete the server directory and its unit file.
    #[arg(long)]
    pub(super) delete_files: bool,
}

impl RemoveCommand {
    /// Runs the removal.
    pub fn execute(self, global: &GlobalConfig) -> Result<()> {
        let orchestrator = super::orchestrator(global, true)?;
        let record = orchestrator.remove(&self.name, self.delete_files)?;

        println!("{} {}", "Removed".green().bold(), record.name.bold());
        if self.delete_files {
            println!("Deleted {}", record.path.display());
        } else {
            println!("Files kept at {}", record.path.display().to_string().bright_black());
        }
        Ok(())
    }
}
