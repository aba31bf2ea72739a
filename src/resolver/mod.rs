//! Version resolution across the supported distributors.
//!
//! A resolver turns what the user typed after `--version` (possibly nothing)
//! into a [`VersionDescriptor`]: the concrete version, the build when the
//! distributor has builds, and the URL of the server jar.
//!
//! | Fork      | Scheme          | Request forms                          |
//! |-----------|-----------------|----------------------------------------|
//! | `vanilla` | launcher manifest | `latest`, `1.20.1`                   |
//! | `paper`   | numbered builds | `latest`, `1.16.4`, `1.16.4-416`       |
//! | `forge`   | HTML index      | `latest`, `1.12.2`, `1.12.2-14.23.5.2854` |
//!
//! "Latest" always means the entry upstream lists first (or marks as
//! latest). Versions are never sorted locally, so snapshots or pre-releases
//! that upstream lists out of order do not win by accident.
//!
//! Each distributor implements [`DistributorResolver`]; [`Resolver`] is the
//! closed set of them, selected by [`Fork`].

pub mod client;
mod error;
pub mod forge;
pub mod paper;
pub mod vanilla;

pub use client::{HttpClient, MetadataClient, fetch_json};
pub use error::ResolutionError;
pub use forge::ForgeResolver;
pub use paper::PaperResolver;
pub use vanilla::VanillaResolver;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::UpstreamConfig;
use crate::core::Fork;

/// A concrete, downloadable server artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    /// Minecraft version the artifact targets.
    pub canonical_version: String,
    /// Distributor build, when the distributor has builds.
    pub build: Option<String>,
    /// Where the jar is downloaded from.
    pub download_url: String,
    /// File name the jar is stored under in the installation directory.
    pub jar_name: String,
}

impl VersionDescriptor {
    /// The label stored in the registry: `version` or `version-build`.
    ///
    /// ```rust
    /// use mcm_cli::resolver::VersionDescriptor;
    ///
    /// let descriptor = VersionDescriptor {
    ///     canonical_version: "1.16.4".to_string(),
    ///     build: Some("416".to_string()),
    ///     download_url: "https://papermc.io/api/v1/paper/1.16.4/416/download".to_string(),
    ///     jar_name: "paper-1.16.4-416.jar".to_string(),
    /// };
    /// assert_eq!(descriptor.label(), "1.16.4-416");
    /// ```
    #[must_use]
    pub fn label(&self) -> String {
        match &self.build {
            Some(build) => format!("{}-{}", self.canonical_version, build),
            None => self.canonical_version.clone(),
        }
    }
}

/// Resolves version requests for one distributor.
#[async_trait]
pub trait DistributorResolver: Send + Sync {
    /// The fork this resolver serves.
    fn fork(&self) -> Fork;

    /// Resolves `requested` (`None` or `"latest"` for the newest release).
    async fn resolve(&self, requested: Option<&str>) -> Result<VersionDescriptor, ResolutionError>;
}

/// Resolver for any supported fork.
#[derive(Clone)]
pub enum Resolver {
    /// Mojang launcher manifest
    Vanilla(VanillaResolver),
    /// Paper build API
    Paper(PaperResolver),
    /// Forge files index
    Forge(ForgeResolver),
}

impl Resolver {
    /// Builds the resolver for `fork` against the configured upstream URLs.
    pub fn for_fork(fork: Fork, client: Arc<dyn MetadataClient>, upstream: &UpstreamConfig) -> Self {
        match fork {
            Fork::Vanilla => {
                Self::Vanilla(VanillaResolver::new(client, upstream.vanilla_manifest_url.clone()))
            }
            Fork::Paper => Self::Paper(PaperResolver::new(client, upstream.paper_api_url.clone())),
            Fork::Forge => Self::Forge(ForgeResolver::new(client, upstream.forge_files_url.clone())),
        }
    }

    fn inner(&self) -> &dyn DistributorResolver {
        match self {
            Self::Vanilla(resolver) => resolver,
            Self::Paper(resolver) => resolver,
            Self::Forge(resolver) => resolver,
        }
    }
}

#[async_trait]
impl DistributorResolver for Resolver {
    fn fork(&self) -> Fork {
        self.inner().fork()
    }

    async fn resolve(&self, requested: Option<&str>) -> Result<VersionDescriptor, ResolutionError> {
        self.inner().resolve(requested).await
    }
}

/// `None` and `"latest"` both ask for the newest release.
pub(crate) fn is_latest(requested: Option<&str>, case_insensitive: bool) -> bool {
    match requested {
        None => true,
        Some(value) if case_insensitive => value.eq_ignore_ascii_case("latest"),
        Some(value) => value == "latest",
    }
}
