pub const SCHEMA: &str = r#"
-- One row per ingested photo
CREATE TABLE IF NOT EXISTS photos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_path TEXT NOT NULL UNIQUE,
    content_hash TEXT UNIQUE,
    latitude REAL,
    longitude REAL,
    taken_at TEXT,
    description TEXT,
    ingested_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,

    CHECK ((latitude IS NULL) = (longitude IS NULL))
);

-- Recognized people, ordered per photo
CREATE TABLE IF NOT EXISTS photo_people (
    photo_id INTEGER NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (photo_id, position)
);
"#;
