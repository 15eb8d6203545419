//! Pagelens Core - Foundation crate for the pagelens analysis service.
//!
//! This crate provides the shared types, error handling, and configuration
//! management that the other pagelens crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with environment overrides
//! - [`types`] - Shared newtypes (`TargetUrl`)
//!
//! # Example
//!
//! ```rust
//! use pagelens_core::{AppConfig, TargetUrl};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let url = TargetUrl::parse("https://lucytech.se/")?;
//! assert_eq!(url.host(), "lucytech.se");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, CacheConfig, ScanningConfig, ServerConfig};
pub use error::{ConfigError, ConfigResult, UrlError};
pub use types::TargetUrl;
