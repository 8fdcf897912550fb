use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeederError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    // Parsing errors
    #[error("Version list parsing failed: {0}")]
    Parse(String),

    // Notification errors
    #[error("Notification failed: {0}")]
    Notification(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Channel errors from the channels library
    #[error("Channel error: {0}")]
    Channel(String),
}

impl From<channels::ChannelError> for FeederError {
    fn from(err: channels::ChannelError) -> Self {
        FeederError::Channel(err.to_string())
    }
}

impl From<serde_json::Error> for FeederError {
    fn from(err: serde_json::Error) -> Self {
        FeederError::Parse(err.to_string())
    }
}

impl FeederError {
    /// Whether the error came from fetching or decoding a version list
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            FeederError::Http(_) | FeederError::Status { .. } | FeederError::Parse(_)
        )
    }
}

pub type FeederResult<T> = Result<T, FeederError>;
