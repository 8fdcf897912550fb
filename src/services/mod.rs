pub mod check_service;
pub mod feed_service;
pub mod notification_service;
pub mod scheduler;

pub use check_service::{CheckReport, CheckService};
pub use feed_service::{setup_feeds, CheckOutcome, TrackedFeed};
pub use notification_service::{ChannelSink, LogSink, NotificationSink};
pub use scheduler::{Scheduler, SchedulerHandle, DEFAULT_CHECK_INTERVAL};
