//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.

use crate::model::{Episode, EpisodeAttributes, Podcast, PodcastAttributes};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const PODCAST_COLUMNS: &str = "id, rss, title, description, language, website, itunes_owner_name,
     itunes_owner_email, itunes_explicit, itunes_subtitle, itunes_summary, itunes_author,
     itunes_image";

const EPISODE_COLUMNS: &str = "id, podcast_id, title, description, link_to_website, guid,
     publication_date, enclosure_url, enclosure_length, enclosure_type, itunes_explicit,
     itunes_duration";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn podcast_from_row(row: &Row<'_>) -> rusqlite::Result<Podcast> {
    Ok(Podcast {
        id: row.get(0)?,
        rss: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        language: row.get(4)?,
        website: row.get(5)?,
        itunes_owner_name: row.get(6)?,
        itunes_owner_email: row.get(7)?,
        itunes_explicit: row.get(8)?,
        itunes_subtitle: row.get(9)?,
        itunes_summary: row.get(10)?,
        itunes_author: row.get(11)?,
        itunes_image: row.get(12)?,
    })
}

fn episode_from_row(row: &Row<'_>) -> rusqlite::Result<Episode> {
    let publication_date = row
        .get::<_, Option<String>>(6)?
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(Episode {
        id: row.get(0)?,
        podcast_id: row.get(1)?,
        attributes: EpisodeAttributes {
            title: row.get(2)?,
            description: row.get(3)?,
            link_to_website: row.get(4)?,
            guid: row.get(5)?,
            publication_date,
            enclosure_url: row.get(7)?,
            enclosure_length: row.get(8)?,
            enclosure_type: row.get(9)?,
            itunes_explicit: row.get(10)?,
            itunes_duration: row.get::<_, Option<i64>>(11)?.map(|d| d.max(0) as u64),
        },
    })
}

fn duration_to_db(duration: Option<u64>) -> StorageResult<Option<i64>> {
    duration
        .map(|d| {
            i64::try_from(d).map_err(|_| {
                StorageError::ConstraintViolation(format!("itunes_duration out of range: {}", d))
            })
        })
        .transpose()
}

impl RecordStore for SqliteStorage {
    // ===== Podcasts =====

    fn insert_podcast(&mut self, title: &str, rss: &str) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO podcasts (title, rss) VALUES (?1, ?2)",
            params![title, rss],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_podcast(&self, podcast_id: i64) -> StorageResult<Podcast> {
        let sql = format!("SELECT {} FROM podcasts WHERE id = ?1", PODCAST_COLUMNS);
        self.conn
            .query_row(&sql, params![podcast_id], podcast_from_row)
            .optional()?
            .ok_or(StorageError::PodcastNotFound(podcast_id))
    }

    fn list_podcasts(&self) -> StorageResult<Vec<Podcast>> {
        let sql = format!("SELECT {} FROM podcasts ORDER BY id", PODCAST_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let podcasts = stmt
            .query_map([], podcast_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(podcasts)
    }

    fn update_podcast(
        &mut self,
        podcast_id: i64,
        attrs: &PodcastAttributes,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE podcasts SET title = ?1, description = ?2, language = ?3, website = ?4,
             itunes_owner_name = ?5, itunes_owner_email = ?6, itunes_explicit = ?7,
             itunes_subtitle = ?8, itunes_summary = ?9, itunes_author = ?10,
             itunes_image = ?11, updated_at = ?12 WHERE id = ?13",
            params![
                attrs.title,
                attrs.description,
                attrs.language,
                attrs.website,
                attrs.itunes_owner_name,
                attrs.itunes_owner_email,
                attrs.itunes_explicit,
                attrs.itunes_subtitle,
                attrs.itunes_summary,
                attrs.itunes_author,
                attrs.itunes_image,
                now,
                podcast_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::PodcastNotFound(podcast_id));
        }
        Ok(())
    }

    // ===== Episodes =====

    fn create_episode(
        &mut self,
        podcast_id: i64,
        attrs: &EpisodeAttributes,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO episodes (podcast_id, title, description, link_to_website, guid,
             publication_date, enclosure_url, enclosure_length, enclosure_type,
             itunes_explicit, itunes_duration, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                podcast_id,
                attrs.title,
                attrs.description,
                attrs.link_to_website,
                attrs.guid,
                attrs.publication_date.map(|d| d.to_rfc3339()),
                attrs.enclosure_url,
                attrs.enclosure_length,
                attrs.enclosure_type,
                attrs.itunes_explicit,
                duration_to_db(attrs.itunes_duration)?,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_episode_by_guid(&self, podcast_id: i64, guid: &str) -> StorageResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM episodes WHERE podcast_id = ?1 AND guid = ?2 ORDER BY id LIMIT 1",
                params![podcast_id, guid],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn update_episode(&mut self, episode_id: i64, attrs: &EpisodeAttributes) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE episodes SET title = ?1, description = ?2, link_to_website = ?3, guid = ?4,
             publication_date = ?5, enclosure_url = ?6, enclosure_length = ?7,
             enclosure_type = ?8, itunes_explicit = ?9, itunes_duration = ?10
             WHERE id = ?11",
            params![
                attrs.title,
                attrs.description,
                attrs.link_to_website,
                attrs.guid,
                attrs.publication_date.map(|d| d.to_rfc3339()),
                attrs.enclosure_url,
                attrs.enclosure_length,
                attrs.enclosure_type,
                attrs.itunes_explicit,
                duration_to_db(attrs.itunes_duration)?,
                episode_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::EpisodeNotFound(episode_id));
        }
        Ok(())
    }

    fn list_episodes(&self, podcast_id: i64) -> StorageResult<Vec<Episode>> {
        let sql = format!(
            "SELECT {} FROM episodes WHERE podcast_id = ?1 ORDER BY id",
            EPISODE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let episodes = stmt
            .query_map(params![podcast_id], episode_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(episodes)
    }

    // ===== Statistics =====

    fn count_podcasts(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM podcasts", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_episodes(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM episodes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
