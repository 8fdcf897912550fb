use super::VersionRecord;

/// Jira keeps a rolling "Future Version" entry for unscheduled fixes.
const JIRA_PLACEHOLDER: &str = "future version";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Minecraft,
    Jira,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Minecraft => "minecraft",
            FeedKind::Jira => "jira",
        }
    }

    /// Placeholder entries are tracked as seen but never announced
    pub fn is_placeholder(&self, record: &VersionRecord) -> bool {
        self.is_placeholder_name(&record.name)
    }

    pub(crate) fn is_placeholder_name(&self, name: &str) -> bool {
        match self {
            FeedKind::Minecraft => false,
            FeedKind::Jira => name.to_lowercase().contains(JIRA_PLACEHOLDER),
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
