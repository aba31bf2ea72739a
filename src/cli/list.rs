//! `mcm list`: show registered servers.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;

use crate::config::GlobalConfig;
use crate::registry::InstallationRecord;

/// Output formats for `mcm list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for humans
    Table,
    /// The registry records as a JSON array
    Json,
}

/// List registered servers.
#[derive(Args)]
pub struct ListCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(super) format: OutputFormat,
}

impl ListCommand {
    /// Prints the registry.
    pub fn execute(self, global: &GlobalConfig) -> Result<()> {
        let records = global.registry()?.load()?;
        print!("{}", render(&records, self.format)?);
        Ok(())
    }
}

/// Renders `records` in `format`, newline-terminated.
fn render(records: &[InstallationRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(records)?)),
        OutputFormat::Table if records.is_empty() => Ok("No servers registered.\n".to_string()),
        OutputFormat::Table => Ok(render_table(records)),
    }
}

fn render_table(records: &[InstallationRecord]) -> String {
    let name_width = column_width("Name", records.iter().map(|r| r.name.len()));
    let fork_width = column_width("Fork", records.iter().map(|r| r.fork.to_string().len()));
    let version_width = column_width("Version", records.iter().map(|r| r.version.len()));

    let mut out = format!(
        "{:<name_width$}  {:<fork_width$}  {:<version_width$}  {}\n",
        "Name".cyan().bold(),
        "Fork".cyan().bold(),
        "Version".cyan().bold(),
        "Path".cyan().bold(),
    );
    out.push_str(&format!(
        "{}\n",
        "-".repeat(name_width + fork_width + version_width + 12).bright_black()
    ));
    for record in records {
        out.push_str(&format!(
            "{:<name_width$}  {:<fork_width$}  {:<version_width$}  {}\n",
            record.name.bright_white(),
            record.fork.to_string(),
            record.version.yellow(),
            record.path.display(),
        ));
    }
    out.push_str(&format!("{}: {} servers\n", "Total".green().bold(), records.len()));
    out
}

fn column_width(header: &str, values: impl Iterator<Item = usize>) -> usize {
    values.chain(std::iter::once(header.len())).max().unwrap_or(header.len())
}
