//! Podcast Crawler: feed ingestion for a podcast search index
//!
//! This crate fetches a podcast's RSS or Atom feed, normalizes the fields that
//! vary between feed providers, and writes the result into a record store,
//! isolating each podcast's failures so a batch over many feeds never halts.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Any failure inside a single crawl operation
///
/// [`CrawlError::kind`] gives the stable class name written to the
/// diagnostic stream when a crawl is aborted.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    DurationFormat(#[from] DurationFormatError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] storage::StorageError),
}

impl CrawlError {
    /// The error class name used in diagnostic reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "FetchError",
            Self::Parse(_) => "ParseError",
            Self::DurationFormat(_) => "DurationFormatError",
            Self::Persistence(_) => "PersistenceError",
        }
    }
}

/// Feed retrieval errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid feed URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Feed document errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed feed XML: {0}")]
    Xml(String),

    #[error("Unsupported feed format: {0}")]
    UnsupportedFormat(String),

    #[error("Feed entry {index} has no identifier")]
    MissingGuid { index: usize },
}

/// Duration strings that are neither seconds nor `[[H:]MM:]SS`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationFormatError {
    #[error("Empty duration")]
    Empty,

    #[error("Invalid duration segment '{segment}' in '{value}'")]
    InvalidSegment { value: String, segment: String },

    #[error("Too many duration segments in '{value}'")]
    TooManySegments { value: String },

    #[error("Duration out of range: '{value}'")]
    Overflow { value: String },
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlRunner, FeedFetcher, IngestSummary, ParsedEntry, ParsedFeed};
pub use model::{Episode, EpisodeAttributes, Podcast, PodcastAttributes};
pub use storage::{RecordStore, SqliteStorage, StorageError};
