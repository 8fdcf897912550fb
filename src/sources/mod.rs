pub mod traits;
pub mod http;
pub mod minecraft;
pub mod jira;

pub use traits::VersionSource;
pub use http::HttpFetcher;
pub use minecraft::{MinecraftSource, DEFAULT_MINECRAFT_URL};
pub use jira::{JiraSource, DEFAULT_JIRA_URL};
