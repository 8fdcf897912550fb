use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::{FeedKind, LatestVersions};
use crate::errors::{FeederError, FeederResult};
use crate::services::check_service::{CheckReport, CheckService};
use crate::services::notification_service::NotificationSink;
use crate::sources::VersionSource;
use crate::storage::SeenSet;

#[derive(Debug)]
pub enum CheckOutcome {
    Completed(CheckReport),
    Failed(FeederError),
    /// A previous check of the same feed was still running
    Skipped,
}

/// A polled feed together with the seen-set it owns.
pub struct TrackedFeed {
    service: CheckService,
    seen: Mutex<SeenSet>,
}

impl TrackedFeed {
    pub fn new(service: CheckService, seen: SeenSet) -> Self {
        Self {
            service,
            seen: Mutex::new(seen),
        }
    }

    /// Seed the feed from a full fetch of its source
    pub async fn setup(
        source: Arc<dyn VersionSource>,
        sink: Arc<dyn NotificationSink>,
    ) -> FeederResult<Self> {
        let service = CheckService::new(source, sink);
        let seen = service.seed().await?;
        Ok(Self::new(service, seen))
    }

    pub fn kind(&self) -> FeedKind {
        self.service.kind()
    }

    pub fn latest(&self) -> Option<LatestVersions> {
        self.service.latest()
    }

    pub async fn seen_count(&self) -> usize {
        self.seen.lock().await.len()
    }

    /// Run one check unless another one is already holding the seen-set
    pub async fn try_check(&self) -> CheckOutcome {
        let Ok(mut seen) = self.seen.try_lock() else {
            return CheckOutcome::Skipped;
        };

        match self.service.check(&mut seen).await {
            Ok(report) => CheckOutcome::Completed(report),
            Err(e) => CheckOutcome::Failed(e),
        }
    }

    /// Check the feed and log the outcome. Errors are not propagated: the
    /// next tick retries.
    pub async fn run_scheduled(&self) -> CheckOutcome {
        let feed = self.kind();
        let outcome = self.try_check().await;

        match &outcome {
            CheckOutcome::Completed(report) if report.new_versions.is_empty() => {}
            CheckOutcome::Completed(report) => {
                info!(
                    feed = %feed,
                    new = report.new_versions.len(),
                    notified = report.notified,
                    "Announced new versions"
                );
            }
            CheckOutcome::Failed(e) if e.is_fetch() => {
                warn!(feed = %feed, error = %e, "Failed to fetch versions");
            }
            CheckOutcome::Failed(e) => {
                warn!(feed = %feed, error = %e, "Failed to announce new version");
            }
            CheckOutcome::Skipped => {
                warn!(feed = %feed, "Previous check still running, skipping");
            }
        }

        outcome
    }
}

/// Seed every feed. Any failure aborts the whole setup.
pub async fn setup_feeds(
    feeds: Vec<(Arc<dyn VersionSource>, Arc<dyn NotificationSink>)>,
) -> FeederResult<Vec<TrackedFeed>> {
    let mut tracked = Vec::with_capacity(feeds.len());

    for (source, sink) in feeds {
        tracked.push(TrackedFeed::setup(source, sink).await?);
    }

    Ok(tracked)
}
