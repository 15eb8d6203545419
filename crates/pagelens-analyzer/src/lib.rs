//! Pagelens Analyzer - Streaming page analysis engine.
//!
//! This crate implements a single pass over an HTML token stream that
//! determines facts about a page (doctype version, title, heading counts,
//! internal/external links, login-form presence) and emits an aggregate
//! snapshot the moment each fact is known. Discovered links are probed for
//! liveness by a bounded worker pool that runs concurrently with the scan.
//!
//! # Example
//!
//! ```rust,ignore
//! use pagelens_analyzer::PageAnalyzer;
//! use pagelens_core::TargetUrl;
//! use pagelens_fetch::HttpFetcher;
//! use std::sync::Arc;
//!
//! let fetcher = Arc::new(HttpFetcher::new(timeout, user_agent)?);
//! let analyzer = PageAnalyzer::new(fetcher, 4);
//! let mut session = analyzer.start(TargetUrl::parse("https://lucytech.se/")?);
//!
//! while let Some(snapshot) = session.snapshots.recv().await {
//!     println!("{}", serde_json::to_string(&snapshot)?);
//! }
//! session.outcome.await??;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
#[allow(missing_docs)]
pub mod extract;
#[allow(missing_docs)]
pub mod links;
pub mod liveness;
#[allow(missing_docs)]
pub mod login;
pub mod orchestrator;
pub mod report;
pub mod source;
pub mod token;

// Re-export commonly used types
pub use error::{ScanError, ScanOutcome};
pub use orchestrator::{PageAnalyzer, ScanSession};
pub use report::{LinkSet, PageSnapshot, ScanState};
pub use source::{HtmlTokenSource, TokenSource};
pub use token::{Tag, Token, TokenStream, TokenizeError};
