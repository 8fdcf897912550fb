pub mod feed;
pub mod version;
pub mod notification;

pub use feed::FeedKind;
pub use version::{LatestVersions, VersionListing, VersionRecord};
pub use notification::Announcement;
