use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::domain::{Announcement, FeedKind, LatestVersions, VersionListing};
use crate::errors::FeederResult;
use crate::services::notification_service::NotificationSink;
use crate::sources::VersionSource;
use crate::storage::SeenSet;

/// Outcome of one successful check of a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub fetched: usize,
    /// Ids newly added to the seen-set, in source order
    pub new_versions: Vec<String>,
    pub notified: usize,
    pub suppressed: usize,
}

/// Diffs a feed against its seen-set and announces what is new.
pub struct CheckService {
    source: Arc<dyn VersionSource>,
    sink: Arc<dyn NotificationSink>,
    latest: watch::Sender<Option<LatestVersions>>,
}

impl CheckService {
    pub fn new(source: Arc<dyn VersionSource>, sink: Arc<dyn NotificationSink>) -> Self {
        let (latest, _) = watch::channel(None);

        Self {
            source,
            sink,
            latest,
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.source.kind()
    }

    /// Latest versions advertised by the last successful fetch
    pub fn latest(&self) -> Option<LatestVersions> {
        self.latest.borrow().clone()
    }

    /// Build the initial seen-set from one full fetch. Nothing is announced.
    pub async fn seed(&self) -> FeederResult<SeenSet> {
        let listing = self.fetch().await?;

        let mut seen = SeenSet::new();
        seen.initialize(&listing.records);

        info!(feed = %self.kind(), versions = seen.len(), "Loaded initial versions");

        Ok(seen)
    }

    /// Fetch the feed and announce every record not yet in `seen`.
    ///
    /// A fetch or parse failure leaves `seen` untouched. Records are marked
    /// seen before they are announced, so when the sink fails the failing
    /// record stays marked and only the records after it are picked up again
    /// on the next check.
    pub async fn check(&self, seen: &mut SeenSet) -> FeederResult<CheckReport> {
        let kind = self.kind();
        let listing = self.fetch().await?;

        let mut report = CheckReport {
            fetched: listing.records.len(),
            ..CheckReport::default()
        };

        for record in &listing.records {
            if !seen.add(record.id.clone()) {
                continue;
            }
            report.new_versions.push(record.id.clone());

            if kind.is_placeholder(record) {
                debug!(feed = %kind, version = %record.name, "Tracking placeholder version silently");
                report.suppressed += 1;
                continue;
            }

            info!(feed = %kind, version = %record.id, "New version detected");

            let message = Announcement::from_record(kind, record).format();
            self.sink.notify(&message).await?;
            report.notified += 1;
        }

        debug!(
            feed = %kind,
            fetched = report.fetched,
            new = report.new_versions.len(),
            "Check complete"
        );

        Ok(report)
    }

    async fn fetch(&self) -> FeederResult<VersionListing> {
        let listing = self.source.fetch().await?;

        if let Some(latest) = &listing.latest {
            self.latest.send_replace(Some(latest.clone()));
        }

        Ok(listing)
    }
}
