//! Field normalization for parsed feeds
//!
//! Feed providers fill the same information into different optional slots and
//! formats. Everything here is a pure function from parsed feed data to the
//! shapes the record store expects.

use crate::crawler::parser::{ParsedEntry, PodcastMetadata};
use crate::model::{EpisodeAttributes, PodcastAttributes};
use crate::{CrawlError, DurationFormatError, ParseError};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Picks the episode description from the first exposed slot
///
/// Priority is `itunes:summary`, then content, then summary. An exposed but
/// empty slot still wins its turn, so the result can be `None` even when a
/// lower-priority slot has text.
pub fn resolve_description(entry: &ParsedEntry) -> Option<String> {
    [&entry.itunes_summary, &entry.content, &entry.summary]
        .into_iter()
        .find_map(|slot| slot.exposed())
        .flatten()
        .map(str::to_string)
}

/// Converts a duration to whole seconds
///
/// Accepts plain seconds (`"1752"`) or colon-separated `[[H:]MM:]SS`
/// (`"01:42:13"`, `"28:33"`). Segments are not range-checked, so `"90:00"`
/// is 5400 seconds.
///
/// # Example
///
/// ```
/// use podcast_crawler::crawler::parse_duration;
///
/// assert_eq!(parse_duration("01:42:13"), Ok(6133));
/// assert_eq!(parse_duration("1752"), Ok(1752));
/// ```
pub fn parse_duration(raw: &str) -> Result<u64, DurationFormatError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DurationFormatError::Empty);
    }

    let segments: Vec<&str> = value.split(':').collect();
    if segments.len() > 3 {
        return Err(DurationFormatError::TooManySegments {
            value: value.to_string(),
        });
    }

    // Rightmost segment is seconds, then minutes, then hours
    let mut total: u64 = 0;
    for (segment, unit) in segments.iter().rev().zip([1u64, 60, 3600]) {
        let segment = segment.trim();
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DurationFormatError::InvalidSegment {
                value: value.to_string(),
                segment: segment.to_string(),
            });
        }

        let amount: u64 = segment.parse().map_err(|_| DurationFormatError::Overflow {
            value: value.to_string(),
        })?;
        total = amount
            .checked_mul(unit)
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or_else(|| DurationFormatError::Overflow {
                value: value.to_string(),
            })?;
    }

    Ok(total)
}

/// Normalizes an optional duration; a missing duration stays missing
pub fn resolve_duration(raw: Option<&str>) -> Result<Option<u64>, DurationFormatError> {
    raw.map(parse_duration).transpose()
}

/// Parses a feed timestamp into a UTC instant
///
/// RSS uses RFC 2822 and Atom RFC 3339; a bare `YYYY-MM-DD HH:MM:SS UTC` form
/// is also seen in the wild. Anything else is logged and dropped rather than
/// failing the entry.
pub fn resolve_publication_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }
    for suffix in [" UTC", " GMT"] {
        if let Some(naive) = value.strip_suffix(suffix) {
            if let Ok(dt) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S") {
                return Some(dt.and_utc());
            }
        }
    }

    tracing::warn!("Unparseable publication date '{}'", value);
    None
}

/// The entry identifier, required for every created episode
pub fn resolve_guid(entry: &ParsedEntry, index: usize) -> Result<String, ParseError> {
    entry
        .entry_id
        .clone()
        .ok_or(ParseError::MissingGuid { index })
}

/// Builds the full episode record for one entry
///
/// Description and duration are normalized; the explicit flag, enclosure and
/// link fields pass through unchanged.
pub fn episode_attributes(
    entry: &ParsedEntry,
    index: usize,
) -> Result<EpisodeAttributes, CrawlError> {
    Ok(EpisodeAttributes {
        title: entry.title.clone(),
        description: resolve_description(entry),
        link_to_website: entry.url.clone(),
        guid: resolve_guid(entry, index)?,
        publication_date: resolve_publication_date(entry.published.as_deref()),
        enclosure_url: entry.enclosure_url.clone(),
        enclosure_length: entry.enclosure_length.clone(),
        enclosure_type: entry.enclosure_type.clone(),
        itunes_explicit: entry.itunes_explicit,
        itunes_duration: resolve_duration(entry.itunes_duration.as_deref())?,
    })
}

/// Builds the full podcast record from feed-level metadata
///
/// The iTunes image and author fall back to the dialect's own image and
/// author elements when the iTunes ones are missing.
pub fn podcast_attributes(metadata: &PodcastMetadata) -> PodcastAttributes {
    PodcastAttributes {
        title: metadata.title.clone(),
        description: metadata.description.clone(),
        language: metadata.language.clone(),
        website: metadata.link.clone(),
        itunes_owner_name: metadata.itunes_owner_name.clone(),
        itunes_owner_email: metadata.itunes_owner_email.clone(),
        itunes_explicit: metadata.itunes_explicit,
        itunes_subtitle: metadata.itunes_subtitle.clone(),
        itunes_summary: metadata.itunes_summary.clone(),
        itunes_author: metadata
            .itunes_author
            .clone()
            .or_else(|| metadata.author.clone()),
        itunes_image: metadata
            .itunes_image
            .clone()
            .or_else(|| metadata.image_url.clone()),
    }
}
