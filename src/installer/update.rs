//! In-place server updates.

use tracing::info;

use super::{Orchestrator, UpdateError};
use crate::registry::{InstallationRecord, RegistryError};
use crate::resolver::DistributorResolver;
use crate::scripts;

impl Orchestrator {
    /// Re-resolves a registered server with its stored fork, downloads the
    /// new jar into its directory and points `start.sh` at it.
    ///
    /// The name, fork and path of the record never change; only `version`
    /// is rewritten, and only after the download and script succeeded.
    pub async fn update(
        &self,
        name: &str,
        requested_version: Option<&str>,
    ) -> Result<InstallationRecord, UpdateError> {
        let record = self.registry.find_by_name(name)?.ok_or_else(|| UpdateError::NotFound {
            name: name.to_string(),
        })?;

        let fork = record.fork.known().ok_or_else(|| UpdateError::UnsupportedFork {
            name: record.name.clone(),
            fork: record.fork.to_string(),
        })?;

        let descriptor = self.resolver(fork).resolve(requested_version).await?;
        info!("Updating '{}' from {} to {}", record.name, record.version, descriptor.label());

        self.fetch_artifact(&descriptor, &record.path).await?;
        scripts::write_launch_script(
            &record.name,
            &record.path,
            &descriptor.jar_name,
            self.settings.memory_gb,
        )?;

        let updated = self
            .registry
            .update_version_and_persist(&record.name, &descriptor.label())
            .map_err(|e| match e {
                RegistryError::NotFound {
                    name,
                } => UpdateError::NotFound {
                    name,
                },
                other => UpdateError::Registry(other),
            })?;
        info!("Updated '{}' to {}", updated.name, updated.version);
        Ok(updated)
    }
}
