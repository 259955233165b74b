//! Statistics from the record store
//!
//! Backs the `--stats` mode of the command-line driver.

use crate::storage::{RecordStore, StorageResult};

/// Store-wide podcast and episode counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Total number of registered podcasts
    pub total_podcasts: u64,

    /// Total number of ingested episodes
    pub total_episodes: u64,

    /// (podcast ID, title, episode count), ordered by podcast ID
    pub episodes_by_podcast: Vec<(i64, String, usize)>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The record store to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn RecordStore) -> StorageResult<CrawlStatistics> {
    let total_podcasts = storage.count_podcasts()?;
    let total_episodes = storage.count_episodes()?;

    let mut episodes_by_podcast = Vec::new();
    for podcast in storage.list_podcasts()? {
        let count = storage.list_episodes(podcast.id)?.len();
        episodes_by_podcast.push((podcast.id, podcast.display_title().to_string(), count));
    }

    Ok(CrawlStatistics {
        total_podcasts,
        total_episodes,
        episodes_by_podcast,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Podcasts: {}", stats.total_podcasts);
    println!("  Episodes: {}", stats.total_episodes);
    println!();

    if stats.episodes_by_podcast.is_empty() {
        return;
    }

    println!("Episodes by Podcast:");
    for (id, title, count) in &stats.episodes_by_podcast {
        println!("  [{}] {}: {}", id, title, count);
    }
}
