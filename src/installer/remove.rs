//! Server removal.

use tracing::{info, warn};

use super::{Orchestrator, RemoveError};
use crate::constants::MANAGED_MARKER;
use crate::registry::{InstallationRecord, RegistryError};
use crate::utils::fs::remove_dir_all;

impl Orchestrator {
    /// Forgets a server, optionally deleting its directory and unit file.
    ///
    /// Files go first, so a failed deletion leaves the record in place and
    /// the removal can be retried. A directory that is already gone is fine.
    /// Only directories `create` made (those holding [`MANAGED_MARKER`]) are
    /// deleted; anything else is [`RemoveError::NotManaged`].
    pub fn remove(
        &self,
        name: &str,
        delete_files: bool,
    ) -> Result<InstallationRecord, RemoveError> {
        let record = self.registry.find_by_name(name)?.ok_or_else(|| RemoveError::NotFound {
            name: name.to_string(),
        })?;

        if delete_files {
            if record.path.exists() && !record.path.join(MANAGED_MARKER).is_file() {
                return Err(RemoveError::NotManaged {
                    path: record.path,
                });
            }
            remove_dir_all(&record.path).map_err(|source| RemoveError::Cleanup {
                path: record.path.clone(),
                source,
            })?;
            info!("Deleted {}", record.path.display());

            if let Some(service_dir) = &self.settings.service_dir {
                let unit = service_dir.join(format!("{}.service", record.name));
                if unit.exists()
                    && let Err(e) = std::fs::remove_file(&unit)
                {
                    warn!("Could not delete {}: {e}", unit.display());
                }
            }
        }

        let removed = self.registry.remove_and_persist(&record.name).map_err(|e| match e {
            RegistryError::NotFound {
                name,
            } => RemoveError::NotFound {
                name,
            },
            other => RemoveError::Registry(other),
        })?;
        info!("Removed server '{}'", removed.name);
        Ok(removed)
    }
}
