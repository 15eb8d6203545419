use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Failures raised while retrieving a page body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request itself failed (DNS, connect, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {status}")]
    Status {
        /// The status code the server returned
        status: u16,
    },

    /// The response body could not be read to completion.
    #[error("error reading response body: {0}")]
    Read(String),

    /// Fetch failures that do not map onto a transport or status error.
    #[error("fetch failed: {0}")]
    Other(String),
}
