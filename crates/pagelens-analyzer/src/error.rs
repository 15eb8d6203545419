//! Terminal scan failures.
//!
//! Only the two terminal failure classes live here. A failed liveness
//! probe is not an error at this level: the worker that hit it records
//! the link as inactive and moves on.

use crate::token::TokenizeError;
use pagelens_fetch::FetchError;
use thiserror::Error;

/// A failure that ends the scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The initial page could not be retrieved. No snapshots precede this.
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] FetchError),

    /// The token stream failed mid-scan. Snapshots already emitted stand.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

impl ScanError {
    /// HTTP status the boundary reports for this failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Fetch(_) => 502,
            Self::Tokenize(_) => 500,
        }
    }
}

/// Final outcome of one scan, reported exactly once at stream end.
pub type ScanOutcome = Result<(), ScanError>;
