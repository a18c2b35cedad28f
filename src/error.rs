// src/error.rs

//! Unified error handling for the ratings aggregator.

use std::fmt;

use thiserror::Error;

use crate::models::RatingSource;

/// Result type alias for aggregator operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Regular expression failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network failure, timeout, non-200 status or API-level error
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// Poll board topic enumeration failed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// A poll answer label matched no known sentiment
    #[error("Unparseable poll label '{label}'")]
    UnparseableLabel { label: String },

    /// Names and ratings extracted from a rating page do not line up
    #[error("Unexpected layout on page {page}: {message}")]
    PageLayout { page: u32, message: String },

    /// A source finished without a single usable rating
    #[error("No ratings obtained from {0}")]
    EmptyResult(RatingSource),

    /// Neither source produced ratings
    #[error("Both rating sources failed")]
    BothSourcesFailed,
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a transport error for the given endpoint.
    pub fn transport(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a discovery error.
    pub fn discovery(message: impl fmt::Display) -> Self {
        Self::Discovery(message.to_string())
    }

    /// Create a page layout error.
    pub fn page_layout(page: u32, message: impl Into<String>) -> Self {
        Self::PageLayout {
            page,
            message: message.into(),
        }
    }
}
