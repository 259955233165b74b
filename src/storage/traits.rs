//! Record store trait and error types
//!
//! This module defines the interface the crawler writes through. The
//! relational store behind it belongs to the wider application; the crawler
//! only needs full-field podcast updates and per-entry episode creation.

use crate::model::{Episode, EpisodeAttributes, Podcast, PodcastAttributes};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Podcast not found: {0}")]
    PodcastNotFound(i64),

    #[error("Episode not found: {0}")]
    EpisodeNotFound(i64),

    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for record store implementations
pub trait RecordStore {
    // ===== Podcasts =====

    /// Registers a podcast by title and feed URL, returning its ID
    fn insert_podcast(&mut self, title: &str, rss: &str) -> StorageResult<i64>;

    /// Gets a podcast by ID
    fn get_podcast(&self, podcast_id: i64) -> StorageResult<Podcast>;

    /// Lists every registered podcast, ordered by ID
    fn list_podcasts(&self) -> StorageResult<Vec<Podcast>>;

    /// Writes every metadata field of a podcast in a single update
    ///
    /// Absent attributes are written as NULL; there is no partial patch.
    fn update_podcast(&mut self, podcast_id: i64, attrs: &PodcastAttributes)
        -> StorageResult<()>;

    // ===== Episodes =====

    /// Creates a new episode under a podcast, returning its ID
    fn create_episode(&mut self, podcast_id: i64, attrs: &EpisodeAttributes)
        -> StorageResult<i64>;

    /// Finds the first episode of a podcast with the given guid
    fn find_episode_by_guid(&self, podcast_id: i64, guid: &str) -> StorageResult<Option<i64>>;

    /// Overwrites an existing episode's attributes
    fn update_episode(&mut self, episode_id: i64, attrs: &EpisodeAttributes)
        -> StorageResult<()>;

    /// Lists the episodes of a podcast in insertion order
    fn list_episodes(&self, podcast_id: i64) -> StorageResult<Vec<Episode>>;

    // ===== Statistics =====

    /// Gets total podcast count
    fn count_podcasts(&self) -> StorageResult<u64>;

    /// Gets total episode count across all podcasts
    fn count_episodes(&self) -> StorageResult<u64>;
}
