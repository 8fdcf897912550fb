//! Chat channel messaging bindings for Rust
//! Posts messages to channels by id over the Discord REST API and publishes
//! them to followers of announcement channels

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),
    #[error("Invalid header value")]
    InvalidHeader,
    #[error("Payload too large")]
    PayloadTooLarge,
    #[error("Missing permissions for channel {0}")]
    Forbidden(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    content: &'a str,
}

pub struct ChannelClient {
    url: String,
    client: Client,
}

impl ChannelClient {
    pub fn new(url: &str, token: &str) -> Result<Self, ChannelError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bot {}", token))
                .map_err(|_| ChannelError::InvalidHeader)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Send a message to a channel
    pub async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<Message, ChannelError> {
        let response = self
            .client
            .post(format!("{}/channels/{}/messages", self.url, channel_id))
            .json(&SendMessagePayload { content })
            .send()
            .await?;

        let response = check_status(response, channel_id)?;
        let message: Message = response.json().await?;
        debug!(channel = %channel_id, message = %message.id, "Message sent");

        Ok(message)
    }

    /// Publish a message posted in an announcement channel to every
    /// channel following it
    pub async fn crosspost(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<Message, ChannelError> {
        let response = self
            .client
            .post(format!(
                "{}/channels/{}/messages/{}/crosspost",
                self.url, channel_id, message_id
            ))
            .send()
            .await?;

        let response = check_status(response, channel_id)?;
        Ok(response.json().await?)
    }
}

fn check_status(
    response: reqwest::Response,
    channel_id: &str,
) -> Result<reqwest::Response, ChannelError> {
    match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => Err(ChannelError::PayloadTooLarge),
        StatusCode::NOT_FOUND => Err(ChannelError::ChannelNotFound(channel_id.to_string())),
        StatusCode::FORBIDDEN => Err(ChannelError::Forbidden(channel_id.to_string())),
        _ => Ok(response.error_for_status()?),
    }
}

/// Create a new channel client
pub fn create_client(url: &str, token: &str) -> Result<ChannelClient, ChannelError> {
    ChannelClient::new(url, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message_json(id: &str, channel_id: &str, content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "channel_id": channel_id,
            "content": content,
            "type": 0
        })
    }

    #[tokio::test]
    async fn test_send_message_posts_content_with_bot_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/channels/123/messages"))
            .and(header("authorization", "Bot secret"))
            .and(body_json(serde_json::json!({ "content": "hello" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(message_json("999", "123", "hello")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ChannelClient::new(&server.uri(), "secret").unwrap();
        let message = client.send_message("123", "hello").await.unwrap();

        assert_eq!(message.id, "999");
        assert_eq!(message.channel_id, "123");
        assert_eq!(message.content, "hello");
    }

    #[tokio::test]
    async fn test_crosspost_targets_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/channels/123/messages/999/crosspost"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(message_json("999", "123", "hello")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ChannelClient::new(&format!("{}/", server.uri()), "secret").unwrap();
        let message = client.crosspost("123", "999").await.unwrap();

        assert_eq!(message.id, "999");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/channels/404/messages"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/channels/403/messages"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/channels/500/messages"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ChannelClient::new(&server.uri(), "secret").unwrap();

        assert!(matches!(
            client.send_message("404", "x").await,
            Err(ChannelError::ChannelNotFound(id)) if id == "404"
        ));
        assert!(matches!(
            client.send_message("403", "x").await,
            Err(ChannelError::Forbidden(_))
        ));
        assert!(matches!(
            client.send_message("500", "x").await,
            Err(ChannelError::RequestError(_))
        ));
    }

    #[test]
    fn test_invalid_token_header() {
        let result = ChannelClient::new(DEFAULT_API_URL, "bad\ntoken");
        assert!(matches!(result, Err(ChannelError::InvalidHeader)));
    }
}
