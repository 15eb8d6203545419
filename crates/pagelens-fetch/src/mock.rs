//! Test double for the fetch capability.
//!
//! Fetch-time and read-time failures can be forced independently, and
//! every requested URL is recorded so tests can assert which probes ran.

use crate::error::{FetchError, Result};
use crate::fetcher::{BodyFetcher, BodyStream};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex, PoisonError};

/// Canned [`BodyFetcher`] for tests.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    body: String,
    force_fetch_err: bool,
    force_read_err: bool,
    fail_urls: Vec<String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// A fetcher that serves `body` for every URL.
    #[must_use]
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Fail at fetch time: `fetch_body` returns an error and no stream.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            force_fetch_err: true,
            ..Self::default()
        }
    }

    /// Fail at read time: the fetch succeeds but the body stream dies
    /// after yielding whatever body was configured.
    #[must_use]
    pub fn failing_read(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            force_read_err: true,
            ..Self::default()
        }
    }

    /// Additionally fail any fetch whose URL contains one of `fragments`.
    #[must_use]
    pub fn with_failing_urls(mut self, fragments: Vec<String>) -> Self {
        self.fail_urls = fragments;
        self
    }

    /// Every URL this fetcher has been asked for, in request order.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl BodyFetcher for MockFetcher {
    async fn fetch_body(&self, url: &str) -> Result<BodyStream> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        if self.force_fetch_err {
            return Err(FetchError::Other("forced fetch error".to_string()));
        }
        if self.fail_urls.iter().any(|fragment| url.contains(fragment)) {
            return Err(FetchError::Status { status: 404 });
        }

        let mut chunks: Vec<Result<Bytes>> = Vec::new();
        if !self.body.is_empty() {
            chunks.push(Ok(Bytes::from(self.body.clone())));
        }
        if self.force_read_err {
            chunks.push(Err(FetchError::Read("simulated read error".to_string())));
        }
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
