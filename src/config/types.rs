use serde::Deserialize;

/// Main configuration structure for the podcast crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Refuse plain-HTTP feed URLs
    #[serde(rename = "https-only", default)]
    pub https_only: bool,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Record store location
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Episode ingestion policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub mode: IngestMode,

    #[serde(rename = "entry-failure", default)]
    pub entry_failure: EntryFailurePolicy,
}

/// What to do with an entry whose guid already exists for the podcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IngestMode {
    /// Create a new episode for every entry, every crawl
    #[default]
    Append,
    /// Overwrite the existing episode with the same guid, create otherwise
    UpsertByGuid,
}

/// What to do when a single entry cannot be normalized or stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryFailurePolicy {
    /// Fail the whole episodes crawl at the first bad entry
    #[default]
    Abort,
    /// Log the entry and continue with the next one
    Skip,
}
