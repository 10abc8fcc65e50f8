//! Errors raised while sending a request or reading its response.

/// Everything that can go wrong between building a request and mapping its body.
///
/// Failed outcomes carry one of these inside a published event, hence `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Any other `reqwest` failure.
    #[error("HTTP request error: {0}")]
    Request(String),
    /// The target could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Request timed out")]
    Timeout,
    /// DNS, TCP or TLS failure.
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// The body did not map to the expected type.
    #[error("JSON error: {0}")]
    Json(String),
    /// The body could not be read.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
    /// HTTP error status (3xx after redirects, 4xx or 5xx).
    #[error("HTTP {status}{}", status_suffix(.message))]
    HttpStatus {
        status: u16,
        /// Response body, when non-empty.
        message: Option<String>,
    },
    #[error("Too many redirects")]
    TooManyRedirects,
    /// The configured proxy URL was rejected.
    #[error("Proxy error: {0}")]
    Proxy(String),
    /// The spawned request task stopped before finishing.
    #[error("Request task aborted: {0}")]
    Aborted(String),
}

impl NetworkError {
    /// Whether the error came from mapping the response body.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_decode() || err.is_body() {
            Self::InvalidBody(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for NetworkError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for NetworkError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<tokio::task::JoinError> for NetworkError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Aborted(err.to_string())
    }
}

fn status_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, NetworkError>;
