//! Podcast crawler main entry point
//!
//! This is the command-line interface for the podcast feed crawler.

use anyhow::Context;
use clap::Parser;
use podcast_crawler::config::{load_config_with_hash, validate_feed_url, Config};
use podcast_crawler::crawler::{crawl_podcasts, BatchOptions};
use podcast_crawler::storage::{open_storage, RecordStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Podcast crawler: keeps a podcast index in sync with its feeds
///
/// Fetches each registered podcast's RSS or Atom feed, refreshes the
/// podcast's metadata and ingests its episodes. A failing podcast is
/// reported on stdout and the crawl moves on to the next one.
#[derive(Parser, Debug)]
#[command(name = "podcast-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Podcast RSS/Atom feed crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl only this podcast (repeatable); defaults to every podcast
    #[arg(long = "podcast", value_name = "ID")]
    podcasts: Vec<i64>,

    /// Only refresh podcast metadata
    #[arg(long, conflicts_with = "episodes_only")]
    info_only: bool,

    /// Only ingest episodes
    #[arg(long, conflicts_with = "info_only")]
    episodes_only: bool,

    /// Register a new podcast feed and exit
    #[arg(long, value_name = "URL", requires = "title", conflicts_with_all = ["stats", "dry_run"])]
    add_feed: Option<String>,

    /// Title for the feed registered with --add-feed
    #[arg(long, requires = "add_feed")]
    title: Option<String>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(url) = &cli.add_feed {
        let title = cli.title.as_deref().unwrap_or_default();
        handle_add_feed(&config, url, title)
    } else if cli.dry_run {
        handle_dry_run(&config, &cli.podcasts)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        let options = BatchOptions {
            podcast_ids: cli.podcasts.clone(),
            update_info: !cli.episodes_only,
            update_episodes: !cli.info_only,
        };
        handle_crawl(&config, &options).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only failure reports and command output.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("podcast_crawler=info,warn"),
            1 => EnvFilter::new("podcast_crawler=debug,info"),
            2 => EnvFilter::new("podcast_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --add-feed: registers a podcast by title and feed URL
fn handle_add_feed(config: &Config, url: &str, title: &str) -> anyhow::Result<()> {
    let url = validate_feed_url(url)?;
    let mut storage = open_storage(Path::new(&config.storage.database_path))?;

    let id = storage.insert_podcast(title, url.as_str())?;
    println!("✓ Registered podcast {} ({}) as ID {}", title, url, id);

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, podcast_ids: &[i64]) -> anyhow::Result<()> {
    println!("=== Podcast Crawler Dry Run ===\n");

    println!("Fetcher Configuration:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);
    println!("  HTTPS only: {}", config.fetcher.https_only);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nIngest:");
    println!("  Mode: {:?}", config.ingest.mode);
    println!("  Entry failure: {:?}", config.ingest.entry_failure);

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\n✓ Configuration is valid");

    let database = Path::new(&config.storage.database_path);
    if !database.exists() {
        println!("✓ Database does not exist yet; nothing would be crawled");
        return Ok(());
    }

    let storage = open_storage(database)?;
    let podcasts = if podcast_ids.is_empty() {
        storage.list_podcasts()?
    } else {
        podcast_ids
            .iter()
            .map(|id| storage.get_podcast(*id))
            .collect::<Result<Vec<_>, _>>()?
    };

    println!("✓ Would crawl {} podcasts", podcasts.len());
    for podcast in &podcasts {
        println!("    * [{}] {} ({})", podcast.id, podcast.display_title(), podcast.rss);
    }

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use podcast_crawler::output::{load_statistics, print_statistics};

    println!("Database: {}\n", config.storage.database_path);

    let storage = open_storage(Path::new(&config.storage.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, options: &BatchOptions) -> anyhow::Result<()> {
    if options.podcast_ids.is_empty() {
        tracing::info!("Starting crawl of all registered podcasts");
    } else {
        tracing::info!("Starting crawl of podcasts {:?}", options.podcast_ids);
    }

    let report = crawl_podcasts(config, options)
        .await
        .context("Crawl could not start")?;

    if report.failures > 0 {
        tracing::warn!(
            "Crawl finished with {} failed operations across {} podcasts",
            report.failures,
            report.podcasts
        );
    } else {
        tracing::info!("Crawl completed successfully ({} podcasts)", report.podcasts);
    }

    Ok(())
}
