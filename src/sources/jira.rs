use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{FeedKind, LatestVersions, VersionListing, VersionRecord};
use crate::errors::FeederResult;
use crate::sources::http::HttpFetcher;
use crate::sources::traits::VersionSource;

pub const DEFAULT_JIRA_URL: &str = "https://bugs.mojang.com/rest/api/latest/project/MC/versions";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraVersion {
    name: String,
    #[serde(default)]
    released: bool,
    release_date: Option<String>,
}

/// Versions of the MC project on the Mojang issue tracker, oldest first.
///
/// A renamed Jira version keeps its id, so the name is the identifier: once
/// the "Future Version" entry is renamed it is picked up as a new version.
pub struct JiraSource {
    fetcher: HttpFetcher,
    url: String,
}

impl JiraSource {
    pub fn new(fetcher: HttpFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    fn parse_bytes(bytes: &[u8]) -> FeederResult<VersionListing> {
        let versions: Vec<JiraVersion> = serde_json::from_slice(bytes)?;

        let latest = LatestVersions {
            release: versions
                .iter()
                .rev()
                .find(|v| v.released)
                .map(|v| v.name.clone()),
            preview: versions
                .iter()
                .rev()
                .find(|v| !v.released && !FeedKind::Jira.is_placeholder_name(&v.name))
                .map(|v| v.name.clone()),
        };

        let records = versions
            .into_iter()
            .map(|version| {
                let kind = if version.released { "released" } else { "unreleased" };
                VersionRecord::new(version.name.clone(), version.name)
                    .with_kind(Some(kind.to_string()))
                    .with_released(version.release_date)
            })
            .collect();

        Ok(VersionListing::new(records).with_latest(latest))
    }
}

#[async_trait]
impl VersionSource for JiraSource {
    fn kind(&self) -> FeedKind {
        FeedKind::Jira
    }

    async fn fetch(&self) -> FeederResult<VersionListing> {
        let bytes = self.fetcher.fetch(&self.url).await?;
        Self::parse_bytes(&bytes)
    }
}
