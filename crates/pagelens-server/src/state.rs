//! Shared application state handed to every request handler.

use crate::cache::ResponseCache;
use pagelens_analyzer::PageAnalyzer;
use std::sync::Arc;

/// State injected into routes via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The scan entry point, wired to the production fetcher at startup.
    pub analyzer: Arc<PageAnalyzer>,
    /// TTL cache of final results keyed by URL.
    pub cache: Arc<ResponseCache>,
}
