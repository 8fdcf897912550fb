//! Fixed-interval version checks.
//!
//! One ticker task fans out to a task per feed on every tick. A feed whose
//! previous check is still running is skipped for that tick rather than
//! queued, so checks of the same feed never overlap.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::domain::{FeedKind, LatestVersions};
use crate::services::feed_service::{CheckOutcome, TrackedFeed};

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30);

pub struct Scheduler {
    feeds: Vec<Arc<TrackedFeed>>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(feeds: Vec<TrackedFeed>, interval: Duration) -> Self {
        Self {
            feeds: feeds.into_iter().map(Arc::new).collect(),
            interval,
        }
    }

    /// Spawn the ticker. The first tick fires one interval from now since
    /// feeds are already seeded at setup.
    ///
    /// Panics if `interval` is zero.
    pub fn start(self) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let feeds = self.feeds.clone();
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                feeds = feeds.len(),
                interval_secs = period.as_secs(),
                "Version check scheduler started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        debug!("Running scheduled version check");
                        for feed in &feeds {
                            let feed = Arc::clone(feed);
                            tokio::spawn(async move {
                                feed.run_scheduled().await;
                            });
                        }
                    }
                }
            }

            info!("Version check scheduler stopped");
        });

        SchedulerHandle {
            feeds: self.feeds,
            stop_tx,
            task,
        }
    }
}

pub struct SchedulerHandle {
    feeds: Vec<Arc<TrackedFeed>>,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop future ticks. Checks already in flight run to completion.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Wait for the ticker task to exit after [`stop`](Self::stop)
    pub async fn join(self) {
        let _ = self.task.await;
    }

    /// Check every feed right away, outside the regular ticks. Feeds with a
    /// check already running are reported as skipped.
    pub async fn check_now(&self) -> Vec<(FeedKind, CheckOutcome)> {
        debug!("Version check requested");

        join_all(self.feeds.iter().map(|feed| async move {
            (feed.kind(), feed.run_scheduled().await)
        }))
        .await
    }

    pub fn latest(&self, kind: FeedKind) -> Option<LatestVersions> {
        self.feed(kind).and_then(|feed| feed.latest())
    }

    fn feed(&self, kind: FeedKind) -> Option<&TrackedFeed> {
        self.feeds
            .iter()
            .find(|feed| feed.kind() == kind)
            .map(|feed| feed.as_ref())
    }
}
