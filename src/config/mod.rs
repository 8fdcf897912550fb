use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::domain::FeedKind;
use crate::errors::{FeederError, FeederResult};
use crate::services::DEFAULT_CHECK_INTERVAL;
use crate::sources::{DEFAULT_JIRA_URL, DEFAULT_MINECRAFT_URL};

/// Discord channel ids are numeric snowflakes
static CHANNEL_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,20}$").unwrap());

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: Option<String>,
    pub discord_api_url: String,
    pub minecraft_url: String,
    pub jira_url: String,
    pub check_interval: Duration,
    pub crosspost: bool,
}

/// Where announcements go. Presence of the Minecraft list enables the
/// version check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementChannels {
    pub minecraft: Vec<String>,
    pub jira: Vec<String>,
}

impl AnnouncementChannels {
    pub const MINECRAFT_VAR: &'static str = "DISCORD_MINECRAFT_CHANNELS";
    pub const JIRA_VAR: &'static str = "DISCORD_JIRA_CHANNELS";

    /// `Ok(None)` when the version check is not configured at all.
    pub fn from_env() -> FeederResult<Option<Self>> {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> FeederResult<Option<Self>> {
        let Some(minecraft) = get(Self::MINECRAFT_VAR) else {
            return Ok(None);
        };

        let jira = get(Self::JIRA_VAR)
            .ok_or_else(|| FeederError::MissingEnvVar(Self::JIRA_VAR.to_string()))?;

        Ok(Some(Self {
            minecraft: parse_channels(Self::MINECRAFT_VAR, &minecraft)?,
            jira: parse_channels(Self::JIRA_VAR, &jira)?,
        }))
    }

    pub fn for_feed(&self, kind: FeedKind) -> &[String] {
        match kind {
            FeedKind::Minecraft => &self.minecraft,
            FeedKind::Jira => &self.jira,
        }
    }
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Load `.env` files into the process environment
    pub fn load_dotenv() {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();
    }

    pub fn from_env() -> FeederResult<Self> {
        Self::load_dotenv();
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> FeederResult<Self> {
        let discord_api_url = get("DISCORD_API_URL")
            .unwrap_or_else(|| channels::DEFAULT_API_URL.to_string());
        let minecraft_url =
            get("MINECRAFT_MANIFEST_URL").unwrap_or_else(|| DEFAULT_MINECRAFT_URL.to_string());
        let jira_url = get("JIRA_VERSIONS_URL").unwrap_or_else(|| DEFAULT_JIRA_URL.to_string());

        for url in [&discord_api_url, &minecraft_url, &jira_url] {
            Url::parse(url).map_err(|e| FeederError::InvalidUrl(format!("{}: {}", url, e)))?;
        }

        let check_interval = match get("VERSION_CHECK_INTERVAL_SECS") {
            Some(value) => parse_interval(&value)?,
            None => DEFAULT_CHECK_INTERVAL,
        };

        let crosspost = match get("DISCORD_CROSSPOST") {
            Some(value) => parse_bool("DISCORD_CROSSPOST", &value)?,
            None => true,
        };

        Ok(Self {
            discord_token: get("DISCORD_TOKEN"),
            discord_api_url,
            minecraft_url,
            jira_url,
            check_interval,
            crosspost,
        })
    }

    pub fn require_token(&self) -> FeederResult<&str> {
        self.discord_token
            .as_deref()
            .ok_or_else(|| FeederError::MissingEnvVar("DISCORD_TOKEN".to_string()))
    }

    pub fn feed_url(&self, kind: FeedKind) -> &str {
        match kind {
            FeedKind::Minecraft => &self.minecraft_url,
            FeedKind::Jira => &self.jira_url,
        }
    }
}

/// Empty values count as unset
fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_channels(var: &str, value: &str) -> FeederResult<Vec<String>> {
    let channels: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if channels.is_empty() {
        return Err(FeederError::MissingEnvVar(var.to_string()));
    }

    if let Some(bad) = channels.iter().find(|c| !CHANNEL_ID.is_match(c)) {
        return Err(FeederError::Config(format!(
            "{} contains an invalid channel id: {}",
            var, bad
        )));
    }

    Ok(channels)
}

fn parse_interval(value: &str) -> FeederResult<Duration> {
    let secs: u64 = value.trim().parse().map_err(|_| {
        FeederError::Config(format!(
            "VERSION_CHECK_INTERVAL_SECS must be a number of seconds, got {}",
            value
        ))
    })?;

    if secs == 0 {
        return Err(FeederError::Config(
            "VERSION_CHECK_INTERVAL_SECS must be greater than zero".to_string(),
        ));
    }

    Ok(Duration::from_secs(secs))
}

fn parse_bool(var: &str, value: &str) -> FeederResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(FeederError::Config(format!(
            "{} must be true or false, got {}",
            var, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert!(config.discord_token.is_none());
        assert_eq!(config.discord_api_url, "https://discord.com/api/v10");
        assert_eq!(config.feed_url(FeedKind::Minecraft), DEFAULT_MINECRAFT_URL);
        assert_eq!(config.feed_url(FeedKind::Jira), DEFAULT_JIRA_URL);
        assert_eq!(config.check_interval, Duration::from_secs(30));
        assert!(config.crosspost);
        assert!(matches!(
            config.require_token(),
            Err(FeederError::MissingEnvVar(var)) if var == "DISCORD_TOKEN"
        ));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("JIRA_VERSIONS_URL", "http://localhost:8080/jira"),
            ("VERSION_CHECK_INTERVAL_SECS", "5"),
            ("DISCORD_CROSSPOST", "false"),
        ]))
        .unwrap();

        assert_eq!(config.require_token().unwrap(), "abc");
        assert_eq!(config.jira_url, "http://localhost:8080/jira");
        assert_eq!(config.check_interval, Duration::from_secs(5));
        assert!(!config.crosspost);
    }

    #[test]
    fn test_invalid_values() {
        for vars in [
            [("VERSION_CHECK_INTERVAL_SECS", "0")],
            [("VERSION_CHECK_INTERVAL_SECS", "soon")],
            [("DISCORD_CROSSPOST", "maybe")],
        ] {
            assert!(matches!(
                Config::from_lookup(lookup(&vars)),
                Err(FeederError::Config(_))
            ));
        }

        assert!(matches!(
            Config::from_lookup(lookup(&[("MINECRAFT_MANIFEST_URL", "not a url")])),
            Err(FeederError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_channels_absent_disables_version_check() {
        let channels = AnnouncementChannels::from_lookup(lookup(&[(
            "DISCORD_JIRA_CHANNELS",
            "123",
        )]))
        .unwrap();

        assert!(channels.is_none());
    }

    #[test]
    fn test_channels_require_jira_list() {
        let result =
            AnnouncementChannels::from_lookup(lookup(&[("DISCORD_MINECRAFT_CHANNELS", "123")]));

        assert!(matches!(
            result,
            Err(FeederError::MissingEnvVar(var)) if var == "DISCORD_JIRA_CHANNELS"
        ));
    }

    #[test]
    fn test_channel_lists_are_trimmed() {
        let channels = AnnouncementChannels::from_lookup(lookup(&[
            ("DISCORD_MINECRAFT_CHANNELS", " 111 , 222,,"),
            ("DISCORD_JIRA_CHANNELS", "333"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(channels.for_feed(FeedKind::Minecraft), ["111", "222"]);
        assert_eq!(channels.for_feed(FeedKind::Jira), ["333"]);
    }

    #[test]
    fn test_channel_list_rejects_names() {
        let result = AnnouncementChannels::from_lookup(lookup(&[
            ("DISCORD_MINECRAFT_CHANNELS", "111,#announcements"),
            ("DISCORD_JIRA_CHANNELS", "333"),
        ]));

        assert!(matches!(result, Err(FeederError::Config(msg)) if msg.contains("#announcements")));

        let result = AnnouncementChannels::from_lookup(lookup(&[
            ("DISCORD_MINECRAFT_CHANNELS", " , "),
            ("DISCORD_JIRA_CHANNELS", "333"),
        ]));

        assert!(matches!(result, Err(FeederError::MissingEnvVar(_))));
    }
}
