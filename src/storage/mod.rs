//! Storage module for the podcast record store
//!
//! The crawler talks to persistence only through [`RecordStore`]. The SQLite
//! implementation here backs the command-line driver and the tests.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{RecordStore, StorageError, StorageResult};

use std::path::Path;

/// Opens (creating if needed) the SQLite record store at `path`
///
/// Missing parent directories are created first.
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    SqliteStorage::new(path)
}
