//! Core error types for the pagelens service.

use thiserror::Error;

/// Errors raised while validating a scan target URL.
///
/// These never reach the analysis engine: a URL that fails validation is
/// rejected at the boundary before a scan is started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    /// The input was empty or whitespace-only.
    #[error("url must not be empty")]
    Empty,

    /// The URL does not carry an `http` or `https` scheme.
    #[error("url scheme not found")]
    MissingScheme,

    /// The URL has no host component.
    #[error("url host not found")]
    MissingHost,

    /// The host has no dot-separated domain component.
    #[error("url domain not found")]
    MissingDomain,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_error_display() {
        assert_eq!(UrlError::MissingScheme.to_string(), "url scheme not found");
        assert_eq!(UrlError::MissingHost.to_string(), "url host not found");
        assert_eq!(UrlError::MissingDomain.to_string(), "url domain not found");
    }
}
