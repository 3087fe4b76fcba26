use async_trait::async_trait;
use thiserror::Error;

use super::types::{LoadDirection, Page, PageCursor};

/// Errors a feed fetch can fail with.
///
/// Network-class failures (`Network`, `Timeout`) and server responses
/// (`Server`) are surfaced per direction as a load error. `Cancelled` is
/// never shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("Server error: status {0}")]
    Server(u16),
    /// Body could not be decoded as the expected JSON entity
    #[error("Invalid response: {0}")]
    Decode(String),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// The fetch was superseded or its owner went away
    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// HTTP status, for `Server` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server(status) => Some(*status),
            _ => None,
        }
    }

    /// Short label for inline error rows.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Network(_) | Self::Timeout => "Could not reach the server",
            Self::Server(status) if *status == 401 || *status == 403 => "Not authorized",
            Self::Server(status) if *status == 429 => "Rate limited",
            Self::Server(_) => "The server returned an error",
            Self::Decode(_) | Self::ResponseTooLarge => "Unexpected response",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// A remote paginated list.
///
/// Stateless: every call is independent and nothing is retried internally.
/// `cursor` is `None` for [`LoadDirection::Refresh`] and always set for the
/// other directions.
#[async_trait]
pub trait FeedSource: Send + Sync {
    type Item: Send + 'static;

    async fn fetch(
        &self,
        cursor: Option<PageCursor>,
        direction: LoadDirection,
    ) -> Result<Page<Self::Item>, FetchError>;
}
