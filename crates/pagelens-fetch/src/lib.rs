//! HTTP fetch capability for the pagelens analysis engine.
//!
//! Exposes page bodies to the engine as a narrow "fetch body by URL"
//! trait so scans can be driven by the real HTTP client or by a test
//! double with forced failures.

pub mod error;
pub mod fetcher;
pub mod mock;

pub use error::{FetchError, Result};
pub use fetcher::{BodyFetcher, BodyStream, HttpFetcher};
pub use mock::MockFetcher;
