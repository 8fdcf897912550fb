use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{FeedKind, LatestVersions, VersionListing, VersionRecord};
use crate::errors::FeederResult;
use crate::sources::http::HttpFetcher;
use crate::sources::traits::VersionSource;

pub const DEFAULT_MINECRAFT_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest_v2.json";

#[derive(Debug, Deserialize)]
struct LauncherManifest {
    latest: Option<ManifestLatest>,
    versions: Vec<ManifestVersion>,
}

#[derive(Debug, Deserialize)]
struct ManifestLatest {
    release: Option<String>,
    snapshot: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestVersion {
    id: String,
    #[serde(rename = "type")]
    version_type: Option<String>,
    release_time: Option<String>,
}

/// Versions published in the Minecraft launcher manifest, newest first.
pub struct MinecraftSource {
    fetcher: HttpFetcher,
    url: String,
}

impl MinecraftSource {
    pub fn new(fetcher: HttpFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    fn parse_bytes(bytes: &[u8]) -> FeederResult<VersionListing> {
        let manifest: LauncherManifest = serde_json::from_slice(bytes)?;

        let records = manifest
            .versions
            .into_iter()
            .map(|version| {
                VersionRecord::new(version.id.clone(), version.id)
                    .with_kind(version.version_type)
                    .with_released(version.release_time)
            })
            .collect();

        let listing = VersionListing::new(records);

        Ok(match manifest.latest {
            Some(latest) => listing.with_latest(LatestVersions {
                release: latest.release,
                preview: latest.snapshot,
            }),
            None => listing,
        })
    }
}

#[async_trait]
impl VersionSource for MinecraftSource {
    fn kind(&self) -> FeedKind {
        FeedKind::Minecraft
    }

    async fn fetch(&self) -> FeederResult<VersionListing> {
        let bytes = self.fetcher.fetch(&self.url).await?;
        Self::parse_bytes(&bytes)
    }
}
