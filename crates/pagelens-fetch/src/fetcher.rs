use crate::error::{FetchError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{Stream, TryStreamExt};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::pin::Pin;
use std::time::Duration;

/// A chunked page body. Read errors surface as items so a transfer that
/// dies mid-body is distinguishable from one that never started.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Narrow capability for retrieving a page body by URL.
///
/// The analysis engine and the liveness workers both go through this
/// trait; handing in a different implementation is how scans are tested
/// without touching the network.
#[async_trait]
pub trait BodyFetcher: Send + Sync {
    /// Fetch the body of `url` as a byte stream.
    ///
    /// A non-success HTTP status is an error: callers only ever see a
    /// stream for a page that actually answered.
    async fn fetch_body(&self, url: &str) -> Result<BodyStream>;
}

/// Production fetcher backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given per-request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BodyFetcher for HttpFetcher {
    async fn fetch_body(&self, url: &str) -> Result<BodyStream> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "fetch rejected by status");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let stream = response
            .bytes_stream()
            .map_err(FetchError::Transport);
        Ok(Box::pin(stream))
    }
}
