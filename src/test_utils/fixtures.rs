//! Upstream fixtures shaped like the real distributor responses.

use serde_json::json;

use super::FixtureClient;
use crate::config::UpstreamConfig;

/// Upstream URLs on hosts that never resolve.
pub fn upstream() -> UpstreamConfig {
    UpstreamConfig {
        vanilla_manifest_url: "http://launchermeta.test/mc/game/version_manifest.json".to_string(),
        paper_api_url: "http://papermc.test/api/v1/paper".to_string(),
        forge_files_url: "http://files.forge.test/net/minecraftforge/forge".to_string(),
    }
}

/// Scheme and host of `url`.
pub fn origin(url: &str) -> &str {
    let host_start = url.find("://").map_or(0, |i| i + 3);
    match url[host_start..].find('/') {
        Some(i) => &url[..host_start + i],
        None => url,
    }
}

/// A launcher manifest at `manifest_url` listing `ids` in the given order,
/// with `latest` as `latest.release`.
///
/// Detail documents live at `{origin}/versions/{id}.json` and server jars at
/// `{origin}/server/{id}.jar`; every listed version has a downloadable jar.
pub fn vanilla(manifest_url: &str, latest: &str, ids: &[&str]) -> FixtureClient {
    let origin = origin(manifest_url);
    let versions: Vec<_> = ids
        .iter()
        .map(|id| json!({ "id": id, "type": "release", "url": format!("{origin}/versions/{id}.json") }))
        .collect();
    let manifest = json!({
        "latest": { "release": latest, "snapshot": latest },
        "versions": versions,
    });

    let mut client = FixtureClient::new().with(manifest_url, &manifest.to_string());
    for id in ids {
        let server_url = format!("{origin}/server/{id}.jar");
        let detail = json!({
            "id": id,
            "downloads": {
                "client": { "url": format!("{origin}/client/{id}.jar") },
                "server": { "url": server_url },
            },
        });
        client = client
            .with(&format!("{origin}/versions/{id}.json"), &detail.to_string())
            .with_artifact(&server_url, format!("vanilla server {id}").as_bytes());
    }
    client
}

/// A Paper API at `api_url` listing `versions`, where `version` has the
/// builds `all` with `latest` marked. Every build of `version` is
/// downloadable.
pub fn paper(api_url: &str, versions: &[&str], version: &str, latest: &str, all: &[&str]) -> FixtureClient {
    let project = json!({ "project": "paper", "versions": versions });
    let builds = json!({
        "project": "paper",
        "version": version,
        "builds": { "latest": latest, "all": all },
    });

    let mut client = FixtureClient::new()
        .with(api_url, &project.to_string())
        .with(&format!("{api_url}/{version}"), &builds.to_string());
    for build in all {
        client = client.with_artifact(
            &format!("{api_url}/{version}/{build}/download"),
            format!("paper {version}-{build}").as_bytes(),
        );
    }
    client
}

/// A Forge index page promoting `labels` (`{version}-{build}`), one
/// `download` section each, with ad-wrapped installer and mdk links.
pub fn forge_promotions_page(maven_url: &str, labels: &[&str]) -> String {
    let sections: String = labels
        .iter()
        .map(|label| {
            let file = |kind: &str, ext: &str| {
                format!(
                    "https://adfoc.us/serve/sitelinks/?id=271228&amp;url={maven_url}/{label}/forge-{label}-{kind}.{ext}"
                )
            };
            format!(
                r#"
    <div class="download">
      <div class="title"><small>Download</small><br>{label}</div>
      <div class="links">
        <div class="link link-boosted">
          <a href="{mdk}" title="Mdk"><i class="fa classifier-mdk"></i><span class="promo-label">Mdk</span></a>
        </div>
        <div class="link link-boosted">
          <a href="{installer}" title="Installer"><i class="fa classifier-installer"></i><span class="promo-label">Installer</span></a>
        </div>
      </div>
    </div>"#,
                mdk = file("mdk", "zip"),
                installer = file("installer", "jar"),
            )
        })
        .collect();

    format!(
        r#"<html><body>
<div class="promos-wrapper">
  <div class="downloads">{sections}
  </div>
</div>
</body></html>"#
    )
}

/// A per-version Forge page whose build table links every build's
/// universal jar with a "Direct Download" title, plus decoy links.
pub fn forge_build_listing_page(maven_url: &str, version: &str, builds: &[&str]) -> String {
    let rows: String = builds
        .iter()
        .map(|build| {
            let label = format!("{version}-{build}");
            format!(
                r#"
  <tr>
    <td class="download-version">{build}</td>
    <td>
      <a href="https://adfoc.us/serve/sitelinks/?id=271228&amp;url={maven_url}/{label}/forge-{label}-universal.jar" title="Universal">Universal</a>
      <a href="{maven_url}/{label}/forge-{label}-installer.jar" title="Direct Download">(Direct Download)</a>
      <a href="{maven_url}/{label}/forge-{label}-universal.jar" title="Direct Download">(Direct Download)</a>
    </td>
  </tr>"#
            )
        })
        .collect();

    format!(r#"<html><body><table class="download-list">{rows}</table></body></html>"#)
}
