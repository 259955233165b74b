//! Episode ingestion
//!
//! Each entry becomes one episode write, in feed order. How repeated guids
//! and bad entries are treated is decided by [`IngestConfig`].

use crate::config::{EntryFailurePolicy, IngestConfig, IngestMode};
use crate::crawler::parser::ParsedEntry;
use crate::crawler::resolver::episode_attributes;
use crate::model::Podcast;
use crate::storage::RecordStore;
use crate::CrawlError;

/// Counts of what an ingestion pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl IngestSummary {
    pub fn written(&self) -> usize {
        self.created + self.updated
    }
}

enum Written {
    Created,
    Updated,
}

/// Ingests every entry of a feed under `podcast`
///
/// With the default configuration a feed of N entries yields exactly N
/// creation requests, and the first failing entry fails the whole call.
/// Entries written before the failure stay written.
pub fn ingest_episodes<S: RecordStore + ?Sized>(
    podcast: &Podcast,
    entries: &[ParsedEntry],
    store: &mut S,
    config: IngestConfig,
) -> Result<IngestSummary, CrawlError> {
    let mut summary = IngestSummary::default();

    for (index, entry) in entries.iter().enumerate() {
        match ingest_entry(podcast, entry, index, store, config.mode) {
            Ok(Written::Created) => summary.created += 1,
            Ok(Written::Updated) => summary.updated += 1,
            Err(e) => match config.entry_failure {
                EntryFailurePolicy::Abort => return Err(e),
                EntryFailurePolicy::Skip => {
                    tracing::warn!(
                        "Skipping entry {} of podcast {} ({}): {}",
                        index,
                        podcast.id,
                        e.kind(),
                        e
                    );
                    summary.skipped += 1;
                }
            },
        }
    }

    Ok(summary)
}

fn ingest_entry<S: RecordStore + ?Sized>(
    podcast: &Podcast,
    entry: &ParsedEntry,
    index: usize,
    store: &mut S,
    mode: IngestMode,
) -> Result<Written, CrawlError> {
    let attrs = episode_attributes(entry, index)?;

    if mode == IngestMode::UpsertByGuid {
        if let Some(episode_id) = store.find_episode_by_guid(podcast.id, &attrs.guid)? {
            store.update_episode(episode_id, &attrs)?;
            tracing::debug!("Updated episode {} ({})", episode_id, attrs.guid);
            return Ok(Written::Updated);
        }
    }

    let episode_id = store.create_episode(podcast.id, &attrs)?;
    tracing::debug!("Created episode {} ({})", episode_id, attrs.guid);
    Ok(Written::Created)
}
