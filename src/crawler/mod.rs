//! Crawler module for podcast feed ingestion
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of feed documents
//! - RSS/Atom parsing into a dialect-independent shape
//! - Field normalization (description fallback, durations, dates)
//! - Podcast metadata synchronization and episode ingestion
//! - The per-podcast runner and a sequential batch driver

mod fetcher;
mod ingest;
mod parser;
mod resolver;
mod runner;
mod sync;

pub use fetcher::{build_http_client, user_agent_string, FeedFetcher};
pub use ingest::{ingest_episodes, IngestSummary};
pub use parser::{
    parse_explicit, parse_feed, EntryField, FeedDialect, ParsedEntry, ParsedFeed,
    PodcastMetadata,
};
pub use resolver::{
    episode_attributes, parse_duration, podcast_attributes, resolve_description,
    resolve_duration, resolve_guid, resolve_publication_date,
};
pub use runner::CrawlRunner;
pub use sync::sync_podcast;

use crate::config::{Config, IngestConfig};
use crate::storage::{open_storage, RecordStore};
use crate::CrawlError;
use std::io::Write;
use std::path::Path;

/// Which podcasts a batch covers and which operations it runs
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Podcast IDs to crawl; empty means every registered podcast
    pub podcast_ids: Vec<i64>,
    pub update_info: bool,
    pub update_episodes: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            podcast_ids: Vec::new(),
            update_info: true,
            update_episodes: true,
        }
    }
}

/// Outcome of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Podcasts visited
    pub podcasts: usize,
    /// Operations that failed and were reported
    pub failures: usize,
}

/// Runs a batch crawl with the configured store and HTTP client
///
/// Failure reports go to stdout. Only setup failures (opening the store,
/// building the client, listing podcasts) are returned as errors.
pub async fn crawl_podcasts(
    config: &Config,
    options: &BatchOptions,
) -> Result<BatchReport, CrawlError> {
    let mut storage = open_storage(Path::new(&config.storage.database_path))?;
    let fetcher = FeedFetcher::new(&config.fetcher, &config.user_agent)?;
    let mut stdout = std::io::stdout();

    run_batch(&mut storage, &fetcher, config.ingest, options, &mut stdout).await
}

/// Crawls podcasts one after another, one runner per podcast
///
/// A failing podcast is reported and the batch moves on to the next one.
pub async fn run_batch<S: RecordStore + ?Sized, W: Write>(
    store: &mut S,
    fetcher: &FeedFetcher,
    ingest: IngestConfig,
    options: &BatchOptions,
    diagnostics: &mut W,
) -> Result<BatchReport, CrawlError> {
    let podcasts = if options.podcast_ids.is_empty() {
        store.list_podcasts()?
    } else {
        options
            .podcast_ids
            .iter()
            .map(|id| store.get_podcast(*id))
            .collect::<Result<Vec<_>, _>>()?
    };

    tracing::info!("Crawling {} podcasts", podcasts.len());
    let mut report = BatchReport::default();

    for podcast in podcasts {
        let mut runner = CrawlRunner::new(podcast, fetcher, &mut *store)
            .with_ingest_config(ingest)
            .with_diagnostics(&mut *diagnostics);

        if options.update_info {
            runner.update_podcast_info().await;
        }
        if options.update_episodes {
            runner.update_podcast_episodes_info().await;
        }

        report.podcasts += 1;
        report.failures += runner.failure_count();
    }

    tracing::info!(
        "Batch complete: {} podcasts, {} failed operations",
        report.podcasts,
        report.failures
    );
    Ok(report)
}
