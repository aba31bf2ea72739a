//! Server installation, update and removal.
//!
//! [`Orchestrator`] ties the pieces together. Every operation runs its steps
//! strictly in order and stops at the first failure:
//!
//! ```text
//! create:  resolve -> validate name -> choose path -> collision check
//!          -> mkdir -> download -> start.sh (+ unit) -> registry append
//! update:  registry lookup -> resolve (stored fork) -> download
//!          -> start.sh -> registry version rewrite
//! remove:  registry lookup -> delete files (optional) -> registry remove
//! ```
//!
//! Nothing is rolled back. A failed download after the directory was
//! created leaves the directory behind, and a failed update leaves the old
//! version recorded.

mod error;
mod paths;
mod remove;
mod update;

pub use error::{InstallError, RemoveError, UpdateError};
pub use paths::validate_name;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{GlobalConfig, UpstreamConfig};
use crate::constants::MANAGED_MARKER;
use crate::core::Fork;
use crate::download::ArtifactSource;
use crate::registry::{InstallationRecord, RegistryStore};
use crate::resolver::{DistributorResolver, MetadataClient, Resolver, VersionDescriptor};
use crate::scripts;
use crate::utils::fs::ensure_dir;
use crate::utils::progress::DownloadProgress;

/// Settings that shape what an installation writes.
#[derive(Debug, Clone)]
pub struct InstallSettings {
    /// Heap size for the launch script.
    pub memory_gb: u32,
    /// Directory for unit files; `None` skips unit creation.
    pub service_dir: Option<PathBuf>,
    /// Directory relative paths and default installs are based on.
    pub working_dir: PathBuf,
}

impl InstallSettings {
    /// Settings from the global config, rooted at the process working directory.
    pub fn from_config(config: &GlobalConfig) -> std::io::Result<Self> {
        Ok(Self {
            memory_gb: config.memory_gb,
            service_dir: config.create_service.then(|| config.service_dir()),
            working_dir: std::env::current_dir()?,
        })
    }
}

/// Creates, updates and removes servers against one registry.
pub struct Orchestrator {
    registry: RegistryStore,
    metadata: Arc<dyn MetadataClient>,
    artifacts: Arc<dyn ArtifactSource>,
    upstream: UpstreamConfig,
    settings: InstallSettings,
}

impl Orchestrator {
    /// Wires an orchestrator from its collaborators.
    pub fn new(
        registry: RegistryStore,
        metadata: Arc<dyn MetadataClient>,
        artifacts: Arc<dyn ArtifactSource>,
        upstream: UpstreamConfig,
        settings: InstallSettings,
    ) -> Self {
        Self {
            registry,
            metadata,
            artifacts,
            upstream,
            settings,
        }
    }

    /// The registry this orchestrator commits to.
    pub fn registry(&self) -> &RegistryStore {
        &self.registry
    }

    pub(crate) fn resolver(&self, fork: Fork) -> Resolver {
        Resolver::for_fork(fork, Arc::clone(&self.metadata), &self.upstream)
    }

    pub(crate) async fn fetch_artifact(
        &self,
        descriptor: &VersionDescriptor,
        install_path: &Path,
    ) -> Result<u64, crate::download::DownloadError> {
        let mut progress = DownloadProgress::new(descriptor.jar_name.clone());
        self.artifacts
            .fetch_to(&descriptor.download_url, &install_path.join(&descriptor.jar_name), &mut progress)
            .await
    }

    /// Creates a new server and registers it.
    ///
    /// `requested_path` wins over `requested_name` for the directory; with
    /// neither, the working directory itself is used. Without a name the
    /// directory's final segment becomes the name.
    pub async fn install(
        &self,
        fork: Fork,
        requested_version: Option<&str>,
        requested_path: Option<&Path>,
        requested_name: Option<&str>,
    ) -> Result<InstallationRecord, InstallError> {
        let descriptor = self.resolver(fork).resolve(requested_version).await?;
        info!("Using {fork} server version {}", descriptor.label());

        let name = requested_name.map(validate_name).transpose()?.filter(|name| !name.is_empty());
        let target = paths::select_install_path(&self.settings.working_dir, requested_path, name.as_deref())?;
        let name = match name {
            Some(name) => name,
            None => paths::name_from_path(&target.path)?,
        };

        if self.registry.exists(&name, &target.path)? {
            return Err(InstallError::AlreadyRegistered {
                name,
                path: target.path,
            });
        }

        if target.create {
            ensure_dir(&target.path)
                .and_then(|()| std::fs::write(target.path.join(MANAGED_MARKER), format!("{name}\n")))
                .map_err(|source| InstallError::PathCreateFailed {
                    path: target.path.clone(),
                    source,
                })?;
        }

        self.fetch_artifact(&descriptor, &target.path).await?;

        scripts::write_launch_script(&name, &target.path, &descriptor.jar_name, self.settings.memory_gb)?;
        if let Some(service_dir) = &self.settings.service_dir
            && let Err(e) = scripts::write_service_unit(service_dir, &name, &target.path)
        {
            warn!("Skipping service unit: {e}");
        }

        let record = InstallationRecord::new(name, fork, descriptor.label(), target.path);
        self.registry.append_and_persist(record.clone())?;
        info!("Created server '{}' at {}", record.name, record.path.display());
        Ok(record)
    }
}
