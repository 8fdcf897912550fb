use async_trait::async_trait;

use crate::domain::{FeedKind, VersionListing};
use crate::errors::FeederResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Identifies the feed this source produces
    fn kind(&self) -> FeedKind;

    /// Fetch the full current version list, in source order
    async fn fetch(&self) -> FeederResult<VersionListing>;
}
