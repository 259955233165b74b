//! Per-podcast crawl runner
//!
//! A [`CrawlRunner`] is bound to one podcast and exposes the two crawl
//! operations. Each one fetches and parses the feed itself; nothing is cached
//! between them.
//!
//! The `try_` operations return the failure. The plain operations are the
//! isolation boundary: they log the failure, write the diagnostic report and
//! return normally, so a batch over many podcasts keeps going.

use crate::config::IngestConfig;
use crate::crawler::fetcher::FeedFetcher;
use crate::crawler::ingest::{ingest_episodes, IngestSummary};
use crate::crawler::parser::{parse_feed, ParsedFeed};
use crate::crawler::sync::sync_podcast;
use crate::model::Podcast;
use crate::output::write_failure_report;
use crate::storage::RecordStore;
use crate::CrawlError;
use std::io::{self, Stdout, Write};

/// Crawls one podcast's feed into the record store
pub struct CrawlRunner<'a, S: RecordStore + ?Sized, W: Write = Stdout> {
    podcast: Podcast,
    fetcher: &'a FeedFetcher,
    store: &'a mut S,
    ingest: IngestConfig,
    diagnostics: W,
    failures: usize,
}

impl<'a, S: RecordStore + ?Sized> CrawlRunner<'a, S, Stdout> {
    /// Creates a runner that reports failures on stdout
    pub fn new(podcast: Podcast, fetcher: &'a FeedFetcher, store: &'a mut S) -> Self {
        Self {
            podcast,
            fetcher,
            store,
            ingest: IngestConfig::default(),
            diagnostics: io::stdout(),
            failures: 0,
        }
    }
}

impl<'a, S: RecordStore + ?Sized, W: Write> CrawlRunner<'a, S, W> {
    /// Sends failure reports to `diagnostics` instead
    pub fn with_diagnostics<W2: Write>(self, diagnostics: W2) -> CrawlRunner<'a, S, W2> {
        CrawlRunner {
            podcast: self.podcast,
            fetcher: self.fetcher,
            store: self.store,
            ingest: self.ingest,
            diagnostics,
            failures: self.failures,
        }
    }

    pub fn with_ingest_config(mut self, ingest: IngestConfig) -> Self {
        self.ingest = ingest;
        self
    }

    /// The bound podcast, reflecting any metadata written so far
    pub fn podcast(&self) -> &Podcast {
        &self.podcast
    }

    pub fn diagnostics(&self) -> &W {
        &self.diagnostics
    }

    /// Number of operations that failed and were reported
    pub fn failure_count(&self) -> usize {
        self.failures
    }

    pub fn into_podcast(self) -> Podcast {
        self.podcast
    }

    /// Refreshes the podcast's metadata from its feed, never failing
    pub async fn update_podcast_info(&mut self) {
        if let Err(e) = self.try_update_podcast_info().await {
            self.report(&e);
        }
    }

    /// Ingests every feed entry as an episode, never failing
    pub async fn update_podcast_episodes_info(&mut self) {
        if let Err(e) = self.try_update_podcast_episodes_info().await {
            self.report(&e);
        }
    }

    /// Fetch, parse, then write all podcast metadata in one update
    pub async fn try_update_podcast_info(&mut self) -> Result<(), CrawlError> {
        tracing::info!("Updating podcast info for {} ({})", self.podcast.id, self.podcast.rss);

        let feed = self.load_feed().await?;
        sync_podcast(&mut self.podcast, &feed.podcast, &mut *self.store)?;

        tracing::info!("Podcast {} info updated", self.podcast.id);
        Ok(())
    }

    /// Fetch, parse, then write one episode per feed entry
    pub async fn try_update_podcast_episodes_info(&mut self) -> Result<IngestSummary, CrawlError> {
        tracing::info!("Updating episodes for {} ({})", self.podcast.id, self.podcast.rss);

        let feed = self.load_feed().await?;
        let summary = ingest_episodes(&self.podcast, &feed.entries, &mut *self.store, self.ingest)?;

        tracing::info!(
            "Podcast {}: {} entries, {} created, {} updated, {} skipped",
            self.podcast.id,
            feed.entries.len(),
            summary.created,
            summary.updated,
            summary.skipped
        );
        Ok(summary)
    }

    async fn load_feed(&self) -> Result<ParsedFeed, CrawlError> {
        let body = self.fetcher.fetch(&self.podcast.rss).await?;
        let feed = parse_feed(&body)?;
        tracing::debug!(
            "Parsed {:?} feed with {} entries for podcast {}",
            feed.dialect,
            feed.entries.len(),
            self.podcast.id
        );
        Ok(feed)
    }

    fn report(&mut self, error: &CrawlError) {
        self.failures += 1;
        tracing::error!(
            "Crawl of podcast {} ({}) failed: {}",
            self.podcast.id,
            self.podcast.display_title(),
            error
        );

        if let Err(io_error) =
            write_failure_report(&mut self.diagnostics, error, self.podcast.display_title())
        {
            tracing::warn!("Could not write failure report: {}", io_error);
        }
    }
}
