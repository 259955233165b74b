//! Database schema definitions
//!
//! This module contains the SQL schema for the podcast record store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Podcasts registered for crawling
CREATE TABLE IF NOT EXISTS podcasts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    rss TEXT NOT NULL,
    title TEXT,
    description TEXT,
    language TEXT,
    website TEXT,
    itunes_owner_name TEXT,
    itunes_owner_email TEXT,
    itunes_explicit INTEGER,
    itunes_subtitle TEXT,
    itunes_summary TEXT,
    itunes_author TEXT,
    itunes_image TEXT,
    updated_at TEXT
);

-- Episodes ingested from feed entries; guid is deliberately not unique
CREATE TABLE IF NOT EXISTS episodes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    podcast_id INTEGER NOT NULL REFERENCES podcasts(id) ON DELETE CASCADE,
    title TEXT,
    description TEXT,
    link_to_website TEXT,
    guid TEXT NOT NULL,
    publication_date TEXT,
    enclosure_url TEXT,
    enclosure_length TEXT,
    enclosure_type TEXT,
    itunes_explicit INTEGER,
    itunes_duration INTEGER,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_episodes_podcast ON episodes(podcast_id);
CREATE INDEX IF NOT EXISTS idx_episodes_guid ON episodes(podcast_id, guid);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
