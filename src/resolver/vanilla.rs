//! Mojang launcher manifest resolver.
//!
//! The manifest lists every published version with a link to a per-version
//! detail document; the detail document holds the server jar URL:
//!
//! ```json
//! { "latest": { "release": "1.20.2", "snapshot": "23w41a" },
//!   "versions": [ { "id": "1.20.2", "url": "https://.../1.20.2.json" } ] }
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::{DistributorResolver, MetadataClient, ResolutionError, VersionDescriptor, fetch_json, is_latest};
use crate::core::Fork;

#[derive(Debug, Deserialize)]
struct Manifest {
    latest: Latest,
    versions: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct Latest {
    release: String,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct VersionDetail {
    downloads: Downloads,
}

#[derive(Debug, Deserialize)]
struct Downloads {
    server: Option<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    url: String,
}

/// Resolves vanilla versions. Requests are matched case-insensitively.
#[derive(Clone)]
pub struct VanillaResolver {
    client: Arc<dyn MetadataClient>,
    manifest_url: String,
}

impl VanillaResolver {
    /// Creates a resolver reading the manifest at `manifest_url`.
    pub fn new(client: Arc<dyn MetadataClient>, manifest_url: impl Into<String>) -> Self {
        Self {
            client,
            manifest_url: manifest_url.into(),
        }
    }
}

#[async_trait]
impl DistributorResolver for VanillaResolver {
    fn fork(&self) -> Fork {
        Fork::Vanilla
    }

    async fn resolve(&self, requested: Option<&str>) -> Result<VersionDescriptor, ResolutionError> {
        let manifest: Manifest = fetch_json(self.client.as_ref(), &self.manifest_url).await?;

        let version = match requested {
            Some(requested) if !is_latest(Some(requested), true) => requested.to_lowercase(),
            _ => manifest.latest.release,
        };

        let entry = manifest.versions.iter().find(|entry| entry.id == version).ok_or_else(|| {
            ResolutionError::UnknownVersion {
                fork: Fork::Vanilla,
                version: version.clone(),
            }
        })?;

        let detail: VersionDetail = fetch_json(self.client.as_ref(), &entry.url).await?;
        let server = detail.downloads.server.ok_or_else(|| {
            ResolutionError::format_changed(&entry.url, format!("version {version} has no server download"))
        })?;
        debug!("Resolved vanilla {version} to {}", server.url);

        Ok(VersionDescriptor {
            jar_name: format!("minecraft-server-{version}.jar"),
            canonical_version: version,
            build: None,
            download_url: server.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FixtureClient, fixtures};

    const MANIFEST: &str = "http://meta.test/mc/game/version_manifest.json";

    fn resolver(client: FixtureClient) -> VanillaResolver {
        VanillaResolver::new(Arc::new(client), MANIFEST)
    }

    #[tokio::test]
    async fn test_latest_is_manifest_release_not_highest_id() {
        // latest.release points at 1.20.1 even though 1.20.2 is listed
        let client = fixtures::vanilla(MANIFEST, "1.20.1", &["1.20.2", "1.20.1", "1.19.4"]);
        let descriptor = resolver(client).resolve(None).await.unwrap();

        assert_eq!(descriptor.canonical_version, "1.20.1");
        assert_eq!(descriptor.build, None);
        assert_eq!(descriptor.jar_name, "minecraft-server-1.20.1.jar");
        assert_eq!(descriptor.download_url, "http://meta.test/server/1.20.1.jar");
    }

    #[tokio::test]
    async fn test_latest_keyword_is_case_insensitive() {
        let client = fixtures::vanilla(MANIFEST, "1.20.1", &["1.20.2", "1.20.1"]);
        let descriptor = resolver(client).resolve(Some("LaTeSt")).await.unwrap();
        assert_eq!(descriptor.canonical_version, "1.20.1");
    }

    #[tokio::test]
    async fn test_request_is_lowercased() {
        let client = fixtures::vanilla(MANIFEST, "1.20.1", &["1.20.1", "23w41a"]);
        let descriptor = resolver(client).resolve(Some("23W41A")).await.unwrap();
        assert_eq!(descriptor.canonical_version, "23w41a");
        assert_eq!(descriptor.label(), "23w41a");
    }

    #[tokio::test]
    async fn test_unknown_version() {
        let client = fixtures::vanilla(MANIFEST, "1.20.1", &["1.20.1"]);
        let err = resolver(client).resolve(Some("9.9.9")).await.unwrap_err();
        assert_eq!(
            err,
            ResolutionError::UnknownVersion {
                fork: Fork::Vanilla,
                version: "9.9.9".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_version_without_server_download() {
        let client = FixtureClient::new()
            .with(
                MANIFEST,
                r#"{"latest":{"release":"1.0"},"versions":[{"id":"1.0","url":"http://meta.test/1.0.json"}]}"#,
            )
            .with("http://meta.test/1.0.json", r#"{"downloads":{"client":{"url":"x"}}}"#);

        let err = resolver(client).resolve(None).await.unwrap_err();
        assert!(matches!(err, ResolutionError::UpstreamFormatChanged { .. }));
    }

    #[tokio::test]
    async fn test_manifest_unreachable() {
        let err = resolver(FixtureClient::new()).resolve(None).await.unwrap_err();
        assert!(matches!(err, ResolutionError::UpstreamUnavailable { .. }));
    }
}
