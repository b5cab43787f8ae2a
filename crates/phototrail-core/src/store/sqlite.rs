//! SQLite record store.

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::schema::SCHEMA;
use super::RecordStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{GeoPoint, NewPhotoRecord, PhotoRecord};

const COLUMNS: &str = "id, file_path, content_hash, latitude, longitude, taken_at, description";

/// Record store backed by a single SQLite connection.
///
/// The handle is opened, initialized and closed explicitly by its owner;
/// nothing in the crate holds a global connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating its directory if needed.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Location {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!("Opened record store at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    /// Enable foreign keys and create the tables if they don't exist.
    pub fn initialize(&self) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Close the connection, reporting any error SQLite raises on the way.
    pub fn close(self) -> StoreResult<()> {
        let conn = self.conn.into_inner().map_err(|_| StoreError::Poisoned)?;
        conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
        tracing::debug!("Closed record store");
        Ok(())
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn row_to_record(row: &Row) -> rusqlite::Result<PhotoRecord> {
    let latitude: Option<f64> = row.get(3)?;
    let longitude: Option<f64> = row.get(4)?;
    Ok(PhotoRecord {
        id: row.get(0)?,
        file_path: PathBuf::from(row.get::<_, String>(1)?),
        content_hash: row.get(2)?,
        location: latitude
            .zip(longitude)
            .map(|(lat, lon)| GeoPoint::new(lat, lon)),
        taken_at: row.get(5)?,
        description: row.get(6)?,
        people: Vec::new(),
    })
}

fn load_people(conn: &Connection, photo_id: i64) -> rusqlite::Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT name FROM photo_people WHERE photo_id = ? ORDER BY position")?;
    let names = stmt
        .query_map([photo_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

fn find_one(conn: &Connection, column: &str, value: &str) -> StoreResult<Option<PhotoRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM photos WHERE {column} = ?");
    let record = conn.query_row(&sql, [value], row_to_record).optional()?;
    match record {
        Some(mut record) => {
            record.people = load_people(conn, record.id)?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

fn list_all(conn: &Connection) -> StoreResult<Vec<PhotoRecord>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM photos ORDER BY id"))?;
    let mut records = stmt
        .query_map([], row_to_record)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt =
        conn.prepare("SELECT photo_id, name FROM photo_people ORDER BY photo_id, position")?;
    let mut people: HashMap<i64, Vec<String>> = HashMap::new();
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
    for row in rows {
        let (photo_id, name) = row?;
        people.entry(photo_id).or_default().push(name);
    }

    for record in &mut records {
        record.people = people.remove(&record.id).unwrap_or_default();
    }
    Ok(records)
}

/// Map uniqueness violations to `Conflict`, everything else to `Sqlite`.
fn classify(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(err, message)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Conflict(message.clone().unwrap_or_else(|| err.to_string()))
        }
        _ => StoreError::Sqlite(e),
    }
}

impl RecordStore for SqliteStore {
    fn find_by_content_hash(&self, hash: &str) -> StoreResult<Option<PhotoRecord>> {
        let conn = self.conn()?;
        find_one(&conn, "content_hash", hash)
    }

    fn find_by_file_path(&self, path: &Path) -> StoreResult<Option<PhotoRecord>> {
        // Non-UTF-8 paths are never stored
        let Some(path) = path.to_str() else {
            return Ok(None);
        };
        let conn = self.conn()?;
        find_one(&conn, "file_path", path)
    }

    fn stored_file_names(&self) -> StoreResult<HashSet<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT file_path FROM photos")?;
        let paths = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(paths
            .iter()
            .filter_map(|p| Path::new(p).file_name()?.to_str())
            .map(str::to_owned)
            .collect())
    }

    fn insert(&self, record: &NewPhotoRecord) -> StoreResult<PhotoRecord> {
        let file_path = record
            .file_path
            .to_str()
            .ok_or_else(|| StoreError::NonUtf8Path(record.file_path.clone()))?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO photos (file_path, content_hash, latitude, longitude, taken_at, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                file_path,
                record.content_hash,
                record.location.map(|l| l.latitude),
                record.location.map(|l| l.longitude),
                record.taken_at,
                record.description,
            ],
        )
        .map_err(classify)?;
        let id = tx.last_insert_rowid();

        for (position, name) in record.people.iter().enumerate() {
            tx.execute(
                "INSERT INTO photo_people (photo_id, position, name) VALUES (?, ?, ?)",
                params![id, position as i64, name],
            )?;
        }
        tx.commit()?;

        Ok(PhotoRecord {
            id,
            file_path: record.file_path.clone(),
            content_hash: record.content_hash.clone(),
            location: record.location,
            taken_at: record.taken_at,
            description: record.description.clone(),
            people: record.people.clone(),
        })
    }

    fn list(&self) -> StoreResult<Vec<PhotoRecord>> {
        let conn = self.conn()?;
        list_all(&conn)
    }

    fn count(&self) -> StoreResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn delete_all(&self) -> StoreResult<Vec<PhotoRecord>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let records = list_all(&tx)?;
        tx.execute("DELETE FROM photos", [])?;
        tx.commit()?;
        tracing::debug!("Deleted {} records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    fn new_record(path: &str, hash: Option<&str>) -> NewPhotoRecord {
        NewPhotoRecord {
            file_path: PathBuf::from(path),
            content_hash: hash.map(String::from),
            ..NewPhotoRecord::default()
        }
    }

    #[test]
    fn test_insert_and_find_round_trip() {
        let store = store();
        let taken = NaiveDate::from_ymd_opt(2023, 7, 14)
            .unwrap()
            .and_hms_opt(18, 2, 9)
            .unwrap();
        let inserted = store
            .insert(&NewPhotoRecord {
                file_path: PathBuf::from("/photos/pier.jpg"),
                content_hash: Some("h1".into()),
                location: Some(GeoPoint::new(40.5, -74.0)),
                taken_at: Some(taken),
                description: Some("A pier.".into()),
                people: vec!["Hopper, Grace".into(), "Ada".into()],
            })
            .unwrap();
        assert!(inserted.id > 0);

        let by_hash = store.find_by_content_hash("h1").unwrap().unwrap();
        assert_eq!(by_hash, inserted);
        let by_path = store
            .find_by_file_path(Path::new("/photos/pier.jpg"))
            .unwrap()
            .unwrap();
        assert_eq!(by_path.people, vec!["Hopper, Grace", "Ada"]);
        assert_eq!(by_path.taken_at, Some(taken));
    }

    #[test]
    fn test_missing_lookups_return_none() {
        let store = store();
        assert!(store.find_by_content_hash("nope").unwrap().is_none());
        assert!(store
            .find_by_file_path(Path::new("/nope.jpg"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_duplicate_hash_is_conflict() {
        let store = store();
        store.insert(&new_record("/p/a.jpg", Some("same"))).unwrap();
        let err = store
            .insert(&new_record("/p/b.jpg", Some("same")))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_path_is_conflict() {
        let store = store();
        store.insert(&new_record("/p/a.jpg", Some("one"))).unwrap();
        let err = store
            .insert(&new_record("/p/a.jpg", Some("two")))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_null_hashes_do_not_collide() {
        let store = store();
        store.insert(&new_record("/p/a.jpg", None)).unwrap();
        store.insert(&new_record("/p/b.jpg", None)).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_stored_file_names_are_base_names() {
        let store = store();
        store.insert(&new_record("/p/a.jpg", Some("1"))).unwrap();
        store.insert(&new_record("/q/b_1.png", Some("2"))).unwrap();
        let names = store.stored_file_names().unwrap();
        assert_eq!(
            names,
            HashSet::from(["a.jpg".to_string(), "b_1.png".to_string()])
        );
    }

    #[test]
    fn test_list_orders_by_id_with_people() {
        let store = store();
        let mut first = new_record("/p/a.jpg", Some("1"));
        first.people = vec!["Ada".into()];
        store.insert(&first).unwrap();
        store.insert(&new_record("/p/b.jpg", Some("2"))).unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_path, PathBuf::from("/p/a.jpg"));
        assert_eq!(records[0].people, vec!["Ada"]);
        assert!(records[1].people.is_empty());
    }

    #[test]
    fn test_delete_all_returns_records_and_cascades() {
        let store = store();
        let mut record = new_record("/p/a.jpg", Some("1"));
        record.people = vec!["Ada".into(), "Grace".into()];
        store.insert(&record).unwrap();
        store.insert(&new_record("/p/b.jpg", Some("2"))).unwrap();

        let deleted = store.delete_all().unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(deleted[0].people.len(), 2);
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.list().unwrap().is_empty());

        let orphans: i64 = store
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM photo_people", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("photos.db");

        let store = SqliteStore::open(&db_path).unwrap();
        store.initialize().unwrap();
        store.insert(&new_record("/p/a.jpg", Some("1"))).unwrap();
        store.close().unwrap();

        let store = SqliteStore::open(&db_path).unwrap();
        store.initialize().unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.find_by_content_hash("1").unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let store = store();
        let path = Path::new("/photos").join(OsStr::from_bytes(b"caf\xe9.jpg"));
        let record = NewPhotoRecord {
            file_path: path.clone(),
            content_hash: Some("h1".into()),
            ..NewPhotoRecord::default()
        };
        let err = store.insert(&record).unwrap_err();
        assert!(matches!(err, StoreError::NonUtf8Path(p) if p == path));
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.find_by_file_path(&path).unwrap().is_none());
    }
}
