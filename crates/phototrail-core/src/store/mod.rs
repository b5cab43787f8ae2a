//! Persistence of photo records.
//!
//! The ingestion pipeline only talks to the [`RecordStore`] trait; the
//! SQLite implementation is the one shipped with the CLI.

mod schema;
pub mod sqlite;

use std::collections::HashSet;
use std::path::Path;

use crate::error::StoreResult;
use crate::types::{NewPhotoRecord, PhotoRecord};

pub use schema::SCHEMA;
pub use sqlite::SqliteStore;

/// Queries and mutations the pipeline needs from a record store.
///
/// Implementations enforce uniqueness on `file_path` and on non-null
/// `content_hash`, reporting violations as [`crate::StoreError::Conflict`].
pub trait RecordStore: Send + Sync {
    /// Record with this content hash, if any.
    fn find_by_content_hash(&self, hash: &str) -> StoreResult<Option<PhotoRecord>>;

    /// Record stored at exactly this path, if any.
    fn find_by_file_path(&self, path: &Path) -> StoreResult<Option<PhotoRecord>>;

    /// Base names of every stored file.
    fn stored_file_names(&self) -> StoreResult<HashSet<String>>;

    /// Persist a new record and return it with its assigned id.
    fn insert(&self, record: &NewPhotoRecord) -> StoreResult<PhotoRecord>;

    /// All records, oldest first.
    fn list(&self) -> StoreResult<Vec<PhotoRecord>>;

    fn count(&self) -> StoreResult<usize>;

    /// Delete every record, returning what was deleted.
    fn delete_all(&self) -> StoreResult<Vec<PhotoRecord>>;
}
