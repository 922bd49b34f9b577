use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Everything that can go wrong between matching a message and rendering a reply.
///
/// None of these reach the end user verbatim: the action turns them into an
/// apology line before emitting anything.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} is not available")]
    ServiceUnavailable(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Failed to fetch from {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Callback failed: {0}")]
    Callback(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl ApiError {
    pub fn service_unavailable(what: impl Into<String>) -> Self {
        Self::ServiceUnavailable(what.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
