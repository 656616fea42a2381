//! Error types for scanner construction and configuration.
//!
//! The filters themselves never fail; only turning header text or
//! configuration strings into scanner settings can.

use thiserror::Error;

/// Errors that can occur while configuring a filter.
#[derive(Debug, Error)]
pub enum Error {
    /// MIME header value could not be parsed.
    #[error("MIME error: {0}")]
    Mime(#[from] plainscan_mime::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
