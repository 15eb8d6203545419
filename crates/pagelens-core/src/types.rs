//! Shared types used across the pagelens service.

use crate::error::UrlError;
use std::fmt;
use url::Url;

/// Newtype for a validated scan target.
///
/// A `TargetUrl` is guaranteed to carry an `http`/`https` scheme, a host,
/// and a dot-separated domain component, so the analysis engine never has
/// to re-validate the page URL it was handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    raw: String,
    parsed: Url,
}

impl TargetUrl {
    /// Parse and validate a target URL.
    ///
    /// # Errors
    /// Returns [`UrlError`] if the input is empty, lacks an `http`/`https`
    /// scheme, lacks a host, or has a host without a domain component
    /// (`http://hello` and `http://www.hello` are both rejected).
    pub fn parse(input: impl Into<String>) -> Result<Self, UrlError> {
        let raw = input.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UrlError::Empty);
        }

        let parsed = Url::parse(trimmed).map_err(|_| UrlError::MissingScheme)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(UrlError::MissingScheme);
        }

        let host = parsed.host_str().ok_or(UrlError::MissingHost)?;
        let domain = host.strip_prefix("www.").unwrap_or(host);
        if !domain.contains('.') {
            return Err(UrlError::MissingDomain);
        }

        Ok(Self {
            raw: trimmed.to_string(),
            parsed,
        })
    }

    /// The URL exactly as the caller supplied it (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed form of the URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.parsed
    }

    /// The host component of the URL.
    #[must_use]
    pub fn host(&self) -> &str {
        // Validation guarantees a host is present.
        self.parsed.host_str().unwrap_or_default()
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
