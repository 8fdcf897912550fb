use super::{FeedKind, VersionRecord};

#[derive(Debug, Clone)]
pub struct Announcement {
    pub feed: FeedKind,
    pub version_id: String,
    pub version_name: String,
    pub version_type: Option<String>,
}

impl Announcement {
    pub fn from_record(feed: FeedKind, record: &VersionRecord) -> Self {
        Self {
            feed,
            version_id: record.id.clone(),
            version_name: record.name.clone(),
            version_type: record.kind.clone(),
        }
    }

    pub fn format(&self) -> String {
        match self.feed {
            FeedKind::Minecraft => {
                let version_type = self.version_type.as_deref().unwrap_or("version");
                format!(
                    "A new Minecraft {} is out: {}",
                    version_type, self.version_id
                )
            }
            FeedKind::Jira => format!(
                "A new version ({}) has been added to the Minecraft issue tracker!",
                self.version_name
            ),
        }
    }
}
