//! Podcast metadata synchronization
//!
//! Every field is recomputed from the freshly parsed feed and written in one
//! update, whether or not it changed.

use crate::crawler::parser::PodcastMetadata;
use crate::crawler::resolver::podcast_attributes;
use crate::model::Podcast;
use crate::storage::RecordStore;
use crate::CrawlError;

/// Writes the feed's podcast metadata onto `podcast`
///
/// The record store is updated first; the in-memory podcast only changes
/// once the write has been accepted.
pub fn sync_podcast<S: RecordStore + ?Sized>(
    podcast: &mut Podcast,
    metadata: &PodcastMetadata,
    store: &mut S,
) -> Result<(), CrawlError> {
    let attrs = podcast_attributes(metadata);
    store.update_podcast(podcast.id, &attrs)?;
    podcast.apply(&attrs);

    tracing::debug!(
        "Updated podcast {} metadata (explicit: {:?})",
        podcast.id,
        podcast.itunes_explicit
    );
    Ok(())
}
