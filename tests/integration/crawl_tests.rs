//! Integration tests for the crawler
//!
//! These tests use wiremock to serve feeds from mock HTTP servers and run
//! the full fetch, parse, normalize and persist cycle end-to-end.

use podcast_crawler::config::{
    EntryFailurePolicy, FetcherConfig, IngestConfig, IngestMode, UserAgentConfig,
};
use podcast_crawler::crawler::{run_batch, BatchOptions, CrawlRunner, FeedFetcher};
use podcast_crawler::model::{Episode, EpisodeAttributes, Podcast, PodcastAttributes};
use podcast_crawler::storage::{RecordStore, SqliteStorage, StorageError, StorageResult};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const THE_DAILY: &str = include_str!("../fixtures/the_daily.xml");

const MINIMAL_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Renamed Show</title>
  </channel>
</rss>"#;

const ATOM_FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xml:lang="de">
  <title>Atom Cast</title>
  <subtitle>Weekly talk</subtitle>
  <link href="https://atom.example.com/"/>
  <link rel="self" href="https://atom.example.com/feed.atom"/>
  <logo>https://atom.example.com/logo.png</logo>
  <author><name>Jane Host</name></author>
  <id>urn:uuid:feed</id>
  <entry>
    <title>First</title>
    <id>urn:uuid:entry-1</id>
    <link rel="alternate" href="https://atom.example.com/1"/>
    <link rel="enclosure" href="https://atom.example.com/1.mp3" length="1000" type="audio/mpeg"/>
    <published>2019-10-25T09:52:10Z</published>
    <summary>Short</summary>
    <content type="html">Long form notes</content>
  </entry>
  <entry>
    <title>Second</title>
    <id>urn:uuid:entry-2</id>
    <updated>2019-10-26T10:00:00+02:00</updated>
    <summary>Only a summary</summary>
  </entry>
  <entry>
    <title>Third</title>
    <id>urn:uuid:entry-3</id>
    <summary>Plain summary</summary>
    <content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><p>Rich notes</p></div></content>
  </entry>
</feed>"#;

/// Creates a fetcher with short timeouts for the mock server
fn create_test_fetcher() -> FeedFetcher {
    let fetcher = FetcherConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        https_only: false,
    };
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    FeedFetcher::new(&fetcher, &user_agent).expect("Failed to build fetcher")
}

/// Serves `body` at `route` on the mock server
async fn serve_feed(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Registers a podcast and reads it back the way the driver does
fn register(storage: &mut SqliteStorage, title: &str, rss: &str) -> Podcast {
    let id = storage
        .insert_podcast(title, rss)
        .expect("Failed to insert podcast");
    storage.get_podcast(id).expect("Failed to load podcast")
}

fn diagnostics_text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).expect("Diagnostics are not UTF-8")
}

/// Record store whose writes always fail
struct RejectingStore {
    inner: SqliteStorage,
}

impl RecordStore for RejectingStore {
    fn insert_podcast(&mut self, title: &str, rss: &str) -> StorageResult<i64> {
        self.inner.insert_podcast(title, rss)
    }

    fn get_podcast(&self, podcast_id: i64) -> StorageResult<Podcast> {
        self.inner.get_podcast(podcast_id)
    }

    fn list_podcasts(&self) -> StorageResult<Vec<Podcast>> {
        self.inner.list_podcasts()
    }

    fn update_podcast(&mut self, _podcast_id: i64, _attrs: &PodcastAttributes) -> StorageResult<()> {
        Err(StorageError::Rejected("read-only replica".to_string()))
    }

    fn create_episode(&mut self, _podcast_id: i64, _attrs: &EpisodeAttributes) -> StorageResult<i64> {
        Err(StorageError::Rejected("read-only replica".to_string()))
    }

    fn find_episode_by_guid(&self, podcast_id: i64, guid: &str) -> StorageResult<Option<i64>> {
        self.inner.find_episode_by_guid(podcast_id, guid)
    }

    fn update_episode(&mut self, _episode_id: i64, _attrs: &EpisodeAttributes) -> StorageResult<()> {
        Err(StorageError::Rejected("read-only replica".to_string()))
    }

    fn list_episodes(&self, podcast_id: i64) -> StorageResult<Vec<Episode>> {
        self.inner.list_episodes(podcast_id)
    }

    fn count_podcasts(&self) -> StorageResult<u64> {
        self.inner.count_podcasts()
    }

    fn count_episodes(&self) -> StorageResult<u64> {
        self.inner.count_episodes()
    }
}

#[tokio::test]
async fn test_update_podcast_info_writes_all_fields() {
    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/the-daily", THE_DAILY).await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let rss = format!("{}/the-daily", mock_server.uri());
    let podcast = register(&mut storage, "Placeholder", &rss);
    let id = podcast.id;
    let fetcher = create_test_fetcher();

    let podcast = {
        let mut runner =
            CrawlRunner::new(podcast, &fetcher, &mut storage).with_diagnostics(Vec::new());
        runner.update_podcast_info().await;

        assert_eq!(runner.failure_count(), 0);
        assert!(runner.diagnostics().is_empty());
        runner.into_podcast()
    };

    let stored = storage.get_podcast(id).unwrap();
    assert_eq!(stored, podcast);
    assert_eq!(stored.rss, rss);
    assert_eq!(stored.title.as_deref(), Some("The Daily"));
    assert_eq!(
        stored.description.as_deref(),
        Some("This is what the news should sound like.")
    );
    assert_eq!(stored.language.as_deref(), Some("en"));
    assert_eq!(
        stored.website.as_deref(),
        Some("https://www.nytimes.com/the-daily")
    );
    assert_eq!(
        stored.itunes_owner_name.as_deref(),
        Some("The New York Times")
    );
    assert_eq!(
        stored.itunes_owner_email.as_deref(),
        Some("thedaily@nytimes.com")
    );
    assert_eq!(stored.itunes_explicit, Some(true));
    assert_eq!(
        stored.itunes_subtitle.as_deref(),
        Some("The biggest stories of our time.")
    );
    assert_eq!(
        stored.itunes_summary.as_deref(),
        Some("<p>Twenty minutes a day, five days a week.</p>")
    );
    assert_eq!(stored.itunes_author.as_deref(), Some("The New York Times"));
    assert_eq!(
        stored.itunes_image.as_deref(),
        Some("https://images.example.com/the-daily.jpeg")
    );

    // Episodes are untouched by a metadata refresh
    assert!(storage.list_episodes(id).unwrap().is_empty());
}

#[tokio::test]
async fn test_update_podcast_info_clears_missing_fields() {
    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/full", THE_DAILY).await;
    serve_feed(&mock_server, "/minimal", MINIMAL_RSS).await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let fetcher = create_test_fetcher();

    // Populate every field from the full feed first
    let podcast = register(&mut storage, "Show", &format!("{}/full", mock_server.uri()));
    let id = podcast.id;
    CrawlRunner::new(podcast, &fetcher, &mut storage)
        .with_diagnostics(Vec::new())
        .update_podcast_info()
        .await;

    // Then point the same row at a feed that only has a title
    let mut podcast = storage.get_podcast(id).unwrap();
    podcast.rss = format!("{}/minimal", mock_server.uri());
    let mut runner = CrawlRunner::new(podcast, &fetcher, &mut storage).with_diagnostics(Vec::new());
    runner.try_update_podcast_info().await.unwrap();
    drop(runner);

    let stored = storage.get_podcast(id).unwrap();
    assert_eq!(stored.title.as_deref(), Some("Renamed Show"));
    assert_eq!(stored.description, None);
    assert_eq!(stored.language, None);
    assert_eq!(stored.website, None);
    assert_eq!(stored.itunes_owner_name, None);
    assert_eq!(stored.itunes_owner_email, None);
    assert_eq!(stored.itunes_explicit, None);
    assert_eq!(stored.itunes_subtitle, None);
    assert_eq!(stored.itunes_summary, None);
    assert_eq!(stored.itunes_author, None);
    assert_eq!(stored.itunes_image, None);
}

#[tokio::test]
async fn test_update_episodes_creates_one_episode_per_entry() {
    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/the-daily", THE_DAILY).await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let podcast = register(
        &mut storage,
        "The Daily",
        &format!("{}/the-daily", mock_server.uri()),
    );
    let id = podcast.id;
    let fetcher = create_test_fetcher();

    let mut runner = CrawlRunner::new(podcast, &fetcher, &mut storage).with_diagnostics(Vec::new());
    let summary = runner.try_update_podcast_episodes_info().await.unwrap();
    drop(runner);

    assert_eq!(summary.created, 3);
    assert_eq!(summary.updated, 0);

    let episodes = storage.list_episodes(id).unwrap();
    assert_eq!(episodes.len(), 3);
    assert!(episodes.iter().all(|e| e.podcast_id == id));

    let first = episodes
        .iter()
        .find(|e| e.attributes.guid == "gid://art19-episode-locator/V0/ep-1")
        .expect("First episode missing");
    assert_eq!(
        first.attributes.title.as_deref(),
        Some("\u{2018}A Prophet\u{2019}: The Zeal of Supporters")
    );
    assert_eq!(
        first.attributes.description.as_deref(),
        Some("<p>Episode notes</p>")
    );
    assert_eq!(
        first.attributes.link_to_website.as_deref(),
        Some("https://www.nytimes.com/the-daily/a-prophet")
    );
    assert_eq!(
        first.attributes.publication_date.map(|d| d.to_rfc3339()),
        Some("2019-10-25T09:52:10+00:00".to_string())
    );
    assert_eq!(
        first.attributes.enclosure_url.as_deref(),
        Some("https://media.example.com/ep1.mp3")
    );
    assert_eq!(first.attributes.enclosure_length.as_deref(), Some("28046315"));
    assert_eq!(first.attributes.enclosure_type.as_deref(), Some("audio/mpeg"));
    assert_eq!(first.attributes.itunes_explicit, Some(false));
    assert_eq!(first.attributes.itunes_duration, Some(1752));

    let second = episodes
        .iter()
        .find(|e| e.attributes.guid == "gid://art19-episode-locator/V0/ep-2")
        .expect("Second episode missing");
    assert_eq!(second.attributes.itunes_duration, Some(6133));
    assert_eq!(second.attributes.itunes_explicit, None);
    // The feed declares the iTunes namespace, so an empty itunes:summary slot wins
    assert_eq!(second.attributes.description, None);

    let third = episodes
        .iter()
        .find(|e| e.attributes.guid == "gid://art19-episode-locator/V0/ep-3")
        .expect("Third episode missing");
    assert_eq!(third.attributes.itunes_duration, Some(1713));
    assert_eq!(third.attributes.itunes_explicit, Some(true));
    assert_eq!(third.attributes.enclosure_url, None);

    // The podcast row itself is not touched by episode ingestion
    assert_eq!(
        storage.get_podcast(id).unwrap().title.as_deref(),
        Some("The Daily")
    );
}

#[tokio::test]
async fn test_atom_feed_end_to_end() {
    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/feed.atom", ATOM_FEED).await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let podcast = register(
        &mut storage,
        "Atom",
        &format!("{}/feed.atom", mock_server.uri()),
    );
    let id = podcast.id;
    let fetcher = create_test_fetcher();

    let mut runner = CrawlRunner::new(podcast, &fetcher, &mut storage).with_diagnostics(Vec::new());
    runner.try_update_podcast_info().await.unwrap();
    runner.try_update_podcast_episodes_info().await.unwrap();
    drop(runner);

    let stored = storage.get_podcast(id).unwrap();
    assert_eq!(stored.title.as_deref(), Some("Atom Cast"));
    assert_eq!(stored.description.as_deref(), Some("Weekly talk"));
    assert_eq!(stored.language.as_deref(), Some("de"));
    assert_eq!(stored.website.as_deref(), Some("https://atom.example.com/"));
    assert_eq!(stored.itunes_author.as_deref(), Some("Jane Host"));
    assert_eq!(
        stored.itunes_image.as_deref(),
        Some("https://atom.example.com/logo.png")
    );

    let episodes = storage.list_episodes(id).unwrap();
    assert_eq!(episodes.len(), 3);

    let first = episodes
        .iter()
        .find(|e| e.attributes.guid == "urn:uuid:entry-1")
        .unwrap();
    assert_eq!(first.attributes.description.as_deref(), Some("Long form notes"));
    assert_eq!(
        first.attributes.link_to_website.as_deref(),
        Some("https://atom.example.com/1")
    );
    assert_eq!(
        first.attributes.enclosure_url.as_deref(),
        Some("https://atom.example.com/1.mp3")
    );
    assert_eq!(first.attributes.itunes_duration, None);

    let second = episodes
        .iter()
        .find(|e| e.attributes.guid == "urn:uuid:entry-2")
        .unwrap();
    assert_eq!(second.attributes.description.as_deref(), Some("Only a summary"));
    assert_eq!(
        second.attributes.publication_date.map(|d| d.to_rfc3339()),
        Some("2019-10-26T08:00:00+00:00".to_string())
    );

    let third = episodes
        .iter()
        .find(|e| e.attributes.guid == "urn:uuid:entry-3")
        .unwrap();
    assert_eq!(
        third.attributes.description.as_deref(),
        Some("<div xmlns=\"http://www.w3.org/1999/xhtml\"><p>Rich notes</p></div>")
    );
}

#[tokio::test]
async fn test_fetch_failure_is_reported_not_raised() {
    // Nothing mounted: every request is a 404
    let mock_server = MockServer::start().await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let podcast = register(
        &mut storage,
        "The Joe Rogan Experience",
        &format!("{}/missing", mock_server.uri()),
    );
    let id = podcast.id;
    let fetcher = create_test_fetcher();

    let mut runner = CrawlRunner::new(podcast, &fetcher, &mut storage).with_diagnostics(Vec::new());
    runner.update_podcast_info().await;
    runner.update_podcast_episodes_info().await;

    assert_eq!(runner.failure_count(), 2);
    assert_eq!(
        diagnostics_text(runner.diagnostics()),
        "FetchError\nThe Joe Rogan Experience\nFetchError\nThe Joe Rogan Experience\n"
    );
    drop(runner);

    // No partial podcast update
    let stored = storage.get_podcast(id).unwrap();
    assert_eq!(stored.title.as_deref(), Some("The Joe Rogan Experience"));
    assert_eq!(stored.description, None);
    assert!(storage.list_episodes(id).unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_feed_is_a_parse_error() {
    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/broken", "<rss><channel><title>Cut off").await;
    serve_feed(&mock_server, "/html", "<html><body>Not a feed</body></html>").await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let fetcher = create_test_fetcher();

    for route in ["/broken", "/html"] {
        let podcast = register(
            &mut storage,
            "Broken Feed",
            &format!("{}{}", mock_server.uri(), route),
        );
        let mut runner =
            CrawlRunner::new(podcast, &fetcher, &mut storage).with_diagnostics(Vec::new());
        runner.update_podcast_episodes_info().await;

        assert_eq!(
            diagnostics_text(runner.diagnostics()),
            "ParseError\nBroken Feed\n",
            "route {}",
            route
        );
    }

    assert_eq!(storage.count_episodes().unwrap(), 0);
}

#[tokio::test]
async fn test_bad_duration_aborts_after_earlier_entries() {
    let feed = r#"<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Odd Durations</title>
    <item><guid>ok-1</guid><itunes:duration>28:33</itunes:duration></item>
    <item><guid>bad</guid><itunes:duration>1:2:3:4</itunes:duration></item>
    <item><guid>ok-2</guid><itunes:duration>60</itunes:duration></item>
  </channel>
</rss>"#;

    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/odd", feed).await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let podcast = register(
        &mut storage,
        "Odd Durations",
        &format!("{}/odd", mock_server.uri()),
    );
    let id = podcast.id;
    let fetcher = create_test_fetcher();

    let mut runner = CrawlRunner::new(podcast, &fetcher, &mut storage).with_diagnostics(Vec::new());
    runner.update_podcast_episodes_info().await;
    assert_eq!(
        diagnostics_text(runner.diagnostics()),
        "DurationFormatError\nOdd Durations\n"
    );
    drop(runner);

    let episodes = storage.list_episodes(id).unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].attributes.guid, "ok-1");
    assert_eq!(episodes[0].attributes.itunes_duration, Some(1713));
}

#[tokio::test]
async fn test_skip_policy_keeps_good_entries() {
    let feed = r#"<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Odd Durations</title>
    <item><guid>ok-1</guid><itunes:duration>28:33</itunes:duration></item>
    <item><guid>bad</guid><itunes:duration>forever</itunes:duration></item>
    <item><title>No guid</title></item>
    <item><guid>ok-2</guid><itunes:duration>60</itunes:duration></item>
  </channel>
</rss>"#;

    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/odd", feed).await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let podcast = register(
        &mut storage,
        "Odd Durations",
        &format!("{}/odd", mock_server.uri()),
    );
    let id = podcast.id;
    let fetcher = create_test_fetcher();
    let ingest = IngestConfig {
        mode: IngestMode::Append,
        entry_failure: EntryFailurePolicy::Skip,
    };

    let mut runner = CrawlRunner::new(podcast, &fetcher, &mut storage)
        .with_ingest_config(ingest)
        .with_diagnostics(Vec::new());
    let summary = runner.try_update_podcast_episodes_info().await.unwrap();
    assert!(runner.diagnostics().is_empty());
    drop(runner);

    assert_eq!(summary.created, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(storage.list_episodes(id).unwrap().len(), 2);
}

#[tokio::test]
async fn test_repeated_crawls_append_or_upsert() {
    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/the-daily", THE_DAILY).await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let rss = format!("{}/the-daily", mock_server.uri());
    let appended = register(&mut storage, "Append", &rss);
    let upserted = register(&mut storage, "Upsert", &rss);
    let (append_id, upsert_id) = (appended.id, upserted.id);
    let fetcher = create_test_fetcher();

    let upsert = IngestConfig {
        mode: IngestMode::UpsertByGuid,
        entry_failure: EntryFailurePolicy::Abort,
    };

    for _ in 0..2 {
        let podcast = storage.get_podcast(append_id).unwrap();
        CrawlRunner::new(podcast, &fetcher, &mut storage)
            .with_diagnostics(Vec::new())
            .update_podcast_episodes_info()
            .await;

        let podcast = storage.get_podcast(upsert_id).unwrap();
        CrawlRunner::new(podcast, &fetcher, &mut storage)
            .with_ingest_config(upsert)
            .with_diagnostics(Vec::new())
            .update_podcast_episodes_info()
            .await;
    }

    // Append mode writes every entry on every crawl
    assert_eq!(storage.list_episodes(append_id).unwrap().len(), 6);
    assert_eq!(storage.list_episodes(upsert_id).unwrap().len(), 3);
}

#[tokio::test]
async fn test_store_failure_is_reported_with_podcast_title() {
    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/the-daily", THE_DAILY).await;

    let mut store = RejectingStore {
        inner: SqliteStorage::new_in_memory().unwrap(),
    };
    let id = store
        .insert_podcast(
            "The Daily",
            &format!("{}/the-daily", mock_server.uri()),
        )
        .unwrap();
    let podcast = store.get_podcast(id).unwrap();
    let fetcher = create_test_fetcher();

    let mut runner = CrawlRunner::new(podcast, &fetcher, &mut store).with_diagnostics(Vec::new());

    runner.update_podcast_info().await;
    assert_eq!(
        diagnostics_text(runner.diagnostics()),
        "PersistenceError\nThe Daily\n"
    );
    // The in-memory podcast is only changed once the store accepted the write
    assert_eq!(runner.podcast().description, None);

    runner.update_podcast_episodes_info().await;
    assert_eq!(
        diagnostics_text(runner.diagnostics()),
        "PersistenceError\nThe Daily\nPersistenceError\nThe Daily\n"
    );
    assert_eq!(runner.failure_count(), 2);
}

#[tokio::test]
async fn test_batch_continues_past_failing_podcast() {
    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/the-daily", THE_DAILY).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let broken = register(&mut storage, "Broken", &format!("{}/gone", mock_server.uri()));
    let working = register(
        &mut storage,
        "Placeholder",
        &format!("{}/the-daily", mock_server.uri()),
    );
    let fetcher = create_test_fetcher();
    let mut diagnostics = Vec::new();

    let report = run_batch(
        &mut storage,
        &fetcher,
        IngestConfig::default(),
        &BatchOptions::default(),
        &mut diagnostics,
    )
    .await
    .unwrap();

    assert_eq!(report.podcasts, 2);
    assert_eq!(report.failures, 2);
    assert_eq!(
        diagnostics_text(&diagnostics),
        "FetchError\nBroken\nFetchError\nBroken\n"
    );

    assert!(storage.list_episodes(broken.id).unwrap().is_empty());
    assert_eq!(storage.list_episodes(working.id).unwrap().len(), 3);
    assert_eq!(
        storage.get_podcast(working.id).unwrap().title.as_deref(),
        Some("The Daily")
    );
}

#[tokio::test]
async fn test_batch_with_selected_podcasts_and_info_only() {
    let mock_server = MockServer::start().await;
    serve_feed(&mock_server, "/the-daily", THE_DAILY).await;

    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let rss = format!("{}/the-daily", mock_server.uri());
    let skipped = register(&mut storage, "Not Selected", &rss);
    let selected = register(&mut storage, "Selected", &rss);
    let fetcher = create_test_fetcher();
    let mut diagnostics = Vec::new();

    let options = BatchOptions {
        podcast_ids: vec![selected.id],
        update_info: true,
        update_episodes: false,
    };
    let report = run_batch(
        &mut storage,
        &fetcher,
        IngestConfig::default(),
        &options,
        &mut diagnostics,
    )
    .await
    .unwrap();

    assert_eq!(report, podcast_crawler::crawler::BatchReport { podcasts: 1, failures: 0 });
    assert!(diagnostics.is_empty());
    assert_eq!(
        storage.get_podcast(selected.id).unwrap().title.as_deref(),
        Some("The Daily")
    );
    assert_eq!(
        storage.get_podcast(skipped.id).unwrap().title.as_deref(),
        Some("Not Selected")
    );
    assert_eq!(storage.count_episodes().unwrap(), 0);
}

#[tokio::test]
async fn test_batch_unknown_podcast_id_is_a_setup_error() {
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let fetcher = create_test_fetcher();
    let mut diagnostics = Vec::new();

    let options = BatchOptions {
        podcast_ids: vec![42],
        ..BatchOptions::default()
    };
    let result = run_batch(
        &mut storage,
        &fetcher,
        IngestConfig::default(),
        &options,
        &mut diagnostics,
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), "PersistenceError");
    assert!(diagnostics.is_empty());
}
