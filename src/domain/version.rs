/// A single version entry as advertised by a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Identifier used for seen-set membership
    pub id: String,
    pub name: String,
    /// Release channel, e.g. `release` or `snapshot`
    pub kind: Option<String>,
    pub released: Option<String>,
}

impl VersionRecord {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            kind: None,
            released: None,
        }
    }

    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_released(mut self, released: Option<String>) -> Self {
        self.released = released;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestVersions {
    pub release: Option<String>,
    /// Latest snapshot, or the next unreleased version for trackers
    pub preview: Option<String>,
}

/// Everything one fetch of a feed returned, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionListing {
    pub records: Vec<VersionRecord>,
    pub latest: Option<LatestVersions>,
}

impl VersionListing {
    pub fn new(records: Vec<VersionRecord>) -> Self {
        Self {
            records,
            latest: None,
        }
    }

    pub fn with_latest(mut self, latest: LatestVersions) -> Self {
        self.latest = Some(latest);
        self
    }
}
