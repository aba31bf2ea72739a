//! Paper v1 build API resolver.
//!
//! - `GET {base}` lists versions, newest first
//! - `GET {base}/{version}` lists that version's builds and marks the latest
//! - `GET {base}/{version}/{build}/download` serves the jar
//!
//! Requests take the form `version` or `version-build`; the split happens on
//! the first `-`. Build numbers appear both as JSON strings and as numbers
//! upstream, so they are compared as strings.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::{DistributorResolver, MetadataClient, ResolutionError, VersionDescriptor, fetch_json, is_latest};
use crate::core::Fork;

#[derive(Debug, Deserialize)]
struct Project {
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VersionBuilds {
    builds: Builds,
}

#[derive(Debug, Deserialize)]
struct Builds {
    latest: BuildId,
    all: Vec<BuildId>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BuildId {
    Text(String),
    Number(u64),
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildId::Text(build) => f.write_str(build),
            BuildId::Number(build) => write!(f, "{build}"),
        }
    }
}

/// Resolves Paper versions and builds. Matching is exact.
#[derive(Clone)]
pub struct PaperResolver {
    client: Arc<dyn MetadataClient>,
    api_url: String,
}

impl PaperResolver {
    /// Creates a resolver against the project endpoint at `api_url`.
    pub fn new(client: Arc<dyn MetadataClient>, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DistributorResolver for PaperResolver {
    fn fork(&self) -> Fork {
        Fork::Paper
    }

    async fn resolve(&self, requested: Option<&str>) -> Result<VersionDescriptor, ResolutionError> {
        let project: Project = fetch_json(self.client.as_ref(), &self.api_url).await?;

        let (version, requested_build) = match requested {
            Some(request) if !is_latest(requested, false) => {
                let (version, build) = match request.split_once('-') {
                    Some((version, build)) => (version, Some(build)),
                    None => (request, None),
                };
                if !project.versions.iter().any(|v| v == version) {
                    return Err(ResolutionError::UnknownVersion {
                        fork: Fork::Paper,
                        version: version.to_string(),
                    });
                }
                (version.to_string(), build)
            }
            _ => {
                let newest = project.versions.first().ok_or_else(|| {
                    ResolutionError::format_changed(&self.api_url, "version list is empty")
                })?;
                (newest.clone(), None)
            }
        };

        let builds_url = format!("{}/{}", self.api_url, version);
        let builds: VersionBuilds = fetch_json(self.client.as_ref(), &builds_url).await?;

        let build = match requested_build {
            Some(build) => {
                if !builds.builds.all.iter().any(|b| b.to_string() == build) {
                    return Err(ResolutionError::UnknownBuild {
                        fork: Fork::Paper,
                        version,
                        build: build.to_string(),
                    });
                }
                build.to_string()
            }
            None => builds.builds.latest.to_string(),
        };
        debug!("Resolved paper {version} build {build}");

        Ok(VersionDescriptor {
            download_url: format!("{}/{}/{}/download", self.api_url, version, build),
            jar_name: format!("paper-{version}-{build}.jar"),
            canonical_version: version,
            build: Some(build),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FixtureClient, fixtures};

    const API: &str = "http://paper.test/api/v1/paper";

    fn resolver(client: FixtureClient) -> PaperResolver {
        PaperResolver::new(Arc::new(client), API)
    }

    #[tokio::test]
    async fn test_latest_is_first_listed_version_and_marked_build() {
        // 1.16.3 is listed first; 1.16.4 is higher but not upstream's latest
        let client = fixtures::paper(API, &["1.16.3", "1.16.4"], "1.16.3", "250", &["250", "251"]);
        let descriptor = resolver(client).resolve(None).await.unwrap();

        assert_eq!(descriptor.canonical_version, "1.16.3");
        assert_eq!(descriptor.build.as_deref(), Some("250"));
        assert_eq!(descriptor.label(), "1.16.3-250");
        assert_eq!(descriptor.jar_name, "paper-1.16.3-250.jar");
        assert_eq!(descriptor.download_url, format!("{API}/1.16.3/250/download"));
    }

    #[tokio::test]
    async fn test_explicit_version_uses_its_latest_build() {
        let client = fixtures::paper(API, &["1.16.4", "1.2.3"], "1.2.3", "80", &["77", "80"]);
        let descriptor = resolver(client).resolve(Some("1.2.3")).await.unwrap();
        assert_eq!(descriptor.label(), "1.2.3-80");
    }

    #[tokio::test]
    async fn test_explicit_build_must_be_published() {
        let client = fixtures::paper(API, &["1.2.3"], "1.2.3", "80", &["77", "80"]);
        let descriptor = resolver(client).resolve(Some("1.2.3-77")).await.unwrap();
        assert_eq!(descriptor.canonical_version, "1.2.3");
        assert_eq!(descriptor.build.as_deref(), Some("77"));

        let client = fixtures::paper(API, &["1.2.3"], "1.2.3", "80", &["80"]);
        let err = resolver(client).resolve(Some("1.2.3-77")).await.unwrap_err();
        assert_eq!(
            err,
            ResolutionError::UnknownBuild {
                fork: Fork::Paper,
                version: "1.2.3".to_string(),
                build: "77".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_numeric_builds_compare_as_strings() {
        let client = FixtureClient::new()
            .with(API, r#"{"project":"paper","versions":["1.16.4"]}"#)
            .with(
                &format!("{API}/1.16.4"),
                r#"{"project":"paper","version":"1.16.4","builds":{"latest":416,"all":[416,415]}}"#,
            );

        let descriptor = resolver(client.clone()).resolve(None).await.unwrap();
        assert_eq!(descriptor.label(), "1.16.4-416");

        let descriptor = resolver(client).resolve(Some("1.16.4-415")).await.unwrap();
        assert_eq!(descriptor.label(), "1.16.4-415");
    }

    #[tokio::test]
    async fn test_unknown_version_and_case_sensitive_latest() {
        let client = fixtures::paper(API, &["1.16.4"], "1.16.4", "416", &["416"]);
        let err = resolver(client.clone()).resolve(Some("1.8.8")).await.unwrap_err();
        assert!(matches!(err, ResolutionError::UnknownVersion { ref version, .. } if version == "1.8.8"));

        // only the exact keyword means latest
        let err = resolver(client).resolve(Some("LATEST")).await.unwrap_err();
        assert!(matches!(err, ResolutionError::UnknownVersion { .. }));
    }

    #[tokio::test]
    async fn test_empty_version_list_is_format_changed() {
        let client = FixtureClient::new().with(API, r#"{"versions":[]}"#);
        let err = resolver(client).resolve(None).await.unwrap_err();
        assert!(matches!(err, ResolutionError::UpstreamFormatChanged { .. }));
    }
}
