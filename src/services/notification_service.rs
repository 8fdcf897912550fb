use std::sync::Arc;

use async_trait::async_trait;
use channels::ChannelClient;
use tracing::warn;

use crate::domain::FeedKind;
use crate::errors::{FeederError, FeederResult};

/// Destination for announcement messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, message: &str) -> FeederResult<()>;
}

/// Posts announcements to every configured chat channel.
pub struct ChannelSink {
    client: Arc<ChannelClient>,
    channels: Vec<String>,
    crosspost: bool,
}

impl ChannelSink {
    pub fn new(client: Arc<ChannelClient>, channels: Vec<String>, crosspost: bool) -> Self {
        Self {
            client,
            channels,
            crosspost,
        }
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    /// Every channel is attempted; the call fails if any post failed.
    /// Crossposting only works in announcement channels, so its failures are
    /// logged and otherwise ignored.
    async fn notify(&self, message: &str) -> FeederResult<()> {
        let mut failures = Vec::new();

        for channel in &self.channels {
            match self.client.send_message(channel, message).await {
                Ok(posted) => {
                    if self.crosspost {
                        if let Err(e) = self.client.crosspost(channel, &posted.id).await {
                            warn!(channel = %channel, error = %e, "Failed to crosspost announcement");
                        }
                    }
                }
                Err(e) => {
                    warn!(channel = %channel, error = %e, "Failed to post announcement");
                    failures.push(format!("{}: {}", channel, e));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(FeederError::Notification(failures.join("; ")))
        }
    }
}

/// Logs announcements instead of posting them (dry run).
pub struct LogSink {
    feed: FeedKind,
}

impl LogSink {
    pub fn new(feed: FeedKind) -> Self {
        Self { feed }
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, message: &str) -> FeederResult<()> {
        println!("[DRY RUN] {}: {}", self.feed, message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn posted(channel: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "700",
            "channel_id": channel,
            "content": "A new Minecraft release is out: 1.16.2"
        }))
    }

    fn client(server: &MockServer) -> Arc<ChannelClient> {
        Arc::new(ChannelClient::new(&server.uri(), "token").unwrap())
    }

    #[tokio::test]
    async fn test_posts_and_crossposts_to_every_channel() {
        let server = MockServer::start().await;

        for channel in ["111", "222"] {
            Mock::given(method("POST"))
                .and(path(format!("/channels/{}/messages", channel)))
                .respond_with(posted(channel))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path(format!("/channels/{}/messages/700/crosspost", channel)))
                .respond_with(posted(channel))
                .expect(1)
                .mount(&server)
                .await;
        }

        let sink = ChannelSink::new(
            client(&server),
            vec!["111".to_string(), "222".to_string()],
            true,
        );

        sink.notify("A new Minecraft release is out: 1.16.2")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_crosspost_disabled() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/channels/111/messages"))
            .respond_with(posted("111"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/channels/111/messages/700/crosspost"))
            .respond_with(posted("111"))
            .expect(0)
            .mount(&server)
            .await;

        let sink = ChannelSink::new(client(&server), vec!["111".to_string()], false);

        sink.notify("hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_crosspost_failure_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/channels/111/messages"))
            .respond_with(posted("111"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/channels/111/messages/700/crosspost"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let sink = ChannelSink::new(client(&server), vec!["111".to_string()], true);

        assert!(sink.notify("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_channel_still_tries_the_rest() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/channels/111/messages"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/channels/222/messages"))
            .respond_with(posted("222"))
            .expect(1)
            .mount(&server)
            .await;

        let sink = ChannelSink::new(
            client(&server),
            vec!["111".to_string(), "222".to_string()],
            false,
        );

        let err = sink.notify("hello").await.unwrap_err();
        match err {
            FeederError::Notification(msg) => {
                assert!(msg.starts_with("111:"));
                assert!(!msg.contains("222"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_log_sink_never_fails() {
        let sink = LogSink::new(FeedKind::Jira);
        assert!(sink.notify("hello").await.is_ok());
    }
}
