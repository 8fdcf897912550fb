use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::errors::{FeederError, FeederResult};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Plain GET client shared by every version source.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(FETCH_TIMEOUT)
                .user_agent(concat!("versionbot/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// GET `url` and return the raw body. Timeouts, transport failures and
    /// non-success statuses are all errors.
    pub async fn fetch(&self, url: &str) -> FeederResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeederError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!(url = %url, bytes = bytes.len(), "Fetched version list");

        Ok(bytes.to_vec())
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}
