//! Episode entity and the attributes the crawler derives from a feed entry

use chrono::{DateTime, Utc};

/// An episode row, always owned by exactly one podcast
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub id: i64,
    pub podcast_id: i64,
    pub attributes: EpisodeAttributes,
}

/// Attributes of one episode, normalized from a feed entry
///
/// `guid` is never empty-handed: entries without an identifier are rejected
/// before a record is built. `itunes_duration` is whole seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeAttributes {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link_to_website: Option<String>,
    pub guid: String,
    pub publication_date: Option<DateTime<Utc>>,
    pub enclosure_url: Option<String>,
    pub enclosure_length: Option<String>,
    pub enclosure_type: Option<String>,
    pub itunes_explicit: Option<bool>,
    pub itunes_duration: Option<u64>,
}
