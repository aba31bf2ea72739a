//! Forge files index resolver.
//!
//! Forge publishes no metadata API, only HTML pages:
//!
//! - `{base}/` promotes the newest release
//! - `{base}/index_{version}.html` promotes one Minecraft version and lists
//!   every build of it
//!
//! Promoted artifacts sit in `<div class="download">` blocks (a "latest" and
//! sometimes a "recommended" one), each holding `<div class="link">`
//! entries. Their anchors go through an ad redirect that carries the real
//! file URL in its `url=` query parameter. Per-build links in the listing
//! are plain anchors titled "Direct Download".
//!
//! Markup that does not have this shape is reported as
//! [`ResolutionError::UpstreamFormatChanged`], never as a missing version.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use super::{DistributorResolver, MetadataClient, ResolutionError, VersionDescriptor, is_latest};
use crate::core::Fork;

static DOWNLOAD_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div\b[^>]*\bclass="download"[^>]*>"#).unwrap());
static DIV_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<div\b[^>]*>|</div\s*>").unwrap());
static LINK_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div\b[^>]*\bclass="link\b[^"]*"[^>]*>.*?<a\b[^>]*\bhref="([^"]*)""#).unwrap()
});
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<a\b([^>]*)>(.*?)</a\s*>").unwrap());
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"([\w-]+)="([^"]*)""#).unwrap());

const DIRECT_DOWNLOAD: &str = "Direct Download";

/// Resolves Forge versions by scraping the files index. Matching is exact.
#[derive(Clone)]
pub struct ForgeResolver {
    client: Arc<dyn MetadataClient>,
    files_url: String,
}

impl ForgeResolver {
    /// Creates a resolver scraping the index rooted at `files_url`.
    pub fn new(client: Arc<dyn MetadataClient>, files_url: impl Into<String>) -> Self {
        Self {
            client,
            files_url: files_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn page_url(&self, version: Option<&str>) -> String {
        match version {
            Some(version) => format!("{}/index_{}.html", self.files_url, version),
            None => format!("{}/", self.files_url),
        }
    }
}

#[async_trait]
impl DistributorResolver for ForgeResolver {
    fn fork(&self) -> Fork {
        Fork::Forge
    }

    async fn resolve(&self, requested: Option<&str>) -> Result<VersionDescriptor, ResolutionError> {
        let (version, build) = match requested {
            Some(request) if !is_latest(requested, false) => match request.split_once('-') {
                Some((version, build)) => (Some(version), Some(build)),
                None => (Some(request), None),
            },
            _ => (None, None),
        };

        let unknown_build = |build: &str| ResolutionError::UnknownBuild {
            fork: Fork::Forge,
            version: version.unwrap_or_default().to_string(),
            build: build.to_string(),
        };
        if let Some(build) = build
            && build.is_empty()
        {
            return Err(unknown_build(build));
        }

        let url = self.page_url(version);
        let page = self.client.get_text(&url).await?;

        let href = match (version, build) {
            (Some(version), Some(build)) => {
                find_build_link(&page, version, build).ok_or_else(|| unknown_build(build))?
            }
            _ => promoted_link(&page).ok_or_else(|| {
                ResolutionError::format_changed(&url, "no link in the download section")
            })?,
        };

        let artifact = unwrap_redirect(&href)
            .ok_or_else(|| ResolutionError::format_changed(&url, format!("unusable link '{href}'")))?;
        let descriptor = describe_artifact(&artifact).ok_or_else(|| {
            ResolutionError::format_changed(&url, format!("no '<version>-<build>' segment in {artifact}"))
        })?;
        debug!("Resolved forge {} from {}", descriptor.label(), url);
        Ok(descriptor)
    }
}

/// Byte ranges of every `<div class="download">` element, outermost tag to
/// its matching `</div>`.
fn download_sections(page: &str) -> Vec<&str> {
    DOWNLOAD_SECTION
        .find_iter(page)
        .filter_map(|open| {
            let mut depth = 0usize;
            for tag in DIV_TAG.find_iter(&page[open.start()..]) {
                if tag.as_str().starts_with("</") {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(&page[open.start()..open.start() + tag.end()]);
                    }
                } else {
                    depth += 1;
                }
            }
            None
        })
        .collect()
}

/// The last link of the promoted section; the second section wins when the
/// page promotes two (latest and recommended).
fn promoted_link(page: &str) -> Option<String> {
    let sections = download_sections(page);
    let section = sections.get(1).or_else(|| sections.first())?;
    LINK_ANCHOR
        .captures_iter(section)
        .last()
        .and_then(|captures| captures.get(1))
        .map(|href| decode_entities(href.as_str()))
}

/// The first "Direct Download" anchor to the universal jar of exactly
/// `version-build`.
fn find_build_link(page: &str, version: &str, build: &str) -> Option<String> {
    let segment = format!("/{version}-{build}/");
    ANCHOR.captures_iter(page).find_map(|anchor| {
        let attributes = anchor.get(1)?.as_str();
        let text = anchor.get(2)?.as_str();
        let mut href = None;
        let mut title = "";
        for attribute in ATTRIBUTE.captures_iter(attributes) {
            match (attribute.get(1)?.as_str(), attribute.get(2)?.as_str()) {
                ("href", value) => href = Some(decode_entities(value)),
                ("title", value) => title = value,
                _ => {}
            }
        }
        let href = href?;
        let direct = text.contains(DIRECT_DOWNLOAD) || title.contains(DIRECT_DOWNLOAD);
        (direct && href.contains("universal") && href.contains(&segment)).then_some(href)
    })
}

/// Follows the ad redirect's `url=` parameter; plain links pass through.
fn unwrap_redirect(href: &str) -> Option<Url> {
    let link = Url::parse(href).ok()?;
    match link.query_pairs().find(|(key, _)| key == "url") {
        Some((_, target)) => Url::parse(&target).ok(),
        None => Some(link),
    }
}

/// Reads `.../{version}-{build}/{file}` from the artifact URL.
fn describe_artifact(artifact: &Url) -> Option<VersionDescriptor> {
    let segments: Vec<&str> = artifact.path_segments()?.filter(|s| !s.is_empty()).collect();
    let [.., label, jar_name] = segments.as_slice() else {
        return None;
    };
    let (version, build) = label.split_once('-')?;
    Some(VersionDescriptor {
        canonical_version: version.to_string(),
        build: Some(build.to_string()),
        download_url: artifact.to_string(),
        jar_name: (*jar_name).to_string(),
    })
}

fn decode_entities(value: &str) -> String {
    value.replace("&amp;", "&")
}
