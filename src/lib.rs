//! Link-Warden: a sitemap-driven website health checker
//!
//! This crate discovers the pages of a website through its sitemap files,
//! extracts every link and embedded resource from those pages, and files each
//! distinct resolved URL as working, redirected, or broken.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Link-Warden operations
///
/// Per-link and per-page failures never surface here; they are recorded in
/// the classification cache. Only conditions that halt a run are errors.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Root URL {url} could not be reached ({status})")]
    RootUnreachable { url: String, status: String },

    #[error("Sub-sitemap {url} listed in sitemap-index.xml could not be found")]
    SubSitemapMissing { url: String },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit cancelled")]
    Cancelled,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Transport-level failures of a single fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("Too many redirects starting at {url}")]
    TooManyRedirects { url: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Violations of the classification cache's claim discipline
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("{url} is already present in the cache")]
    AlreadyPresent { url: String },

    #[error("{url} was filed without an outstanding claim")]
    NotClaimed { url: String },
}

/// Result type alias for Link-Warden operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use cache::{Bucket, ClassificationCache, LinkRecord, LinkStatus};
pub use config::Config;
pub use crawler::{Auditor, AuditReport};
pub use crate::url::{normalize_root_url, resolve, LinkCategory, Resolution, ResolvedTarget};
