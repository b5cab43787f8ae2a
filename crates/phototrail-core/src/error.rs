//! Error types for the Photo Trail ingestion pipeline.
//!
//! Errors are organized by concern. Only some of them are fatal for a file:
//! `IngestError` stops the file being ingested, while `HashError` and
//! `EnrichmentError` are degraded into warnings by the ingestor.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Photo Trail operations.
#[derive(Error, Debug)]
pub enum TrailError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Ingestion errors
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Enrichment setup errors
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors that stop a single file from being ingested.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The source file does not exist or is not a regular file
    #[error("Source not found: {0}")]
    SourceMissing(PathBuf),

    /// The stored path would not be valid UTF-8 and could not be recorded
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    /// The source cannot be opened as an image at all
    #[error("Unreadable image {path}: {message}")]
    UnreadableImage { path: PathBuf, message: String },

    /// The file could not be placed into the photo directory
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The record store rejected or failed the operation
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures while placing a file into the managed photo directory.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Destination directory could not be created
    #[error("Cannot create photo directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source has no usable file name
    #[error("Source has no file name: {0}")]
    NoFileName(PathBuf),

    /// Every numbered variant of the name is already taken
    #[error("No free name left for {name} in {dir}")]
    NamesExhausted { name: String, dir: PathBuf },

    /// Copying the bytes failed (disk full, permissions, ...)
    #[error("Cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The file could not be read for hashing.
#[derive(Error, Debug)]
#[error("Cannot hash {path}: {source}")]
pub struct HashError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// An optional enrichment call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentError {
    /// Provider is not configured or reachable (e.g. missing credentials)
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The call was made but failed
    #[error("Call failed: {0}")]
    Failed(String),

    /// The call exceeded its time budget
    #[error("Timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Configured provider name is not known
    #[error("Unknown enrichment provider: {0}")]
    UnknownProvider(String),
}

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A uniqueness constraint (file path or content hash) was violated
    #[error("Record conflicts with an existing one: {0}")]
    Conflict(String),

    /// Database directory could not be created
    #[error("Cannot prepare database location {path}: {source}")]
    Location {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File paths are stored as text and must be valid UTF-8
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    /// A previous holder of the connection panicked
    #[error("Database connection lock poisoned")]
    Poisoned,
}

/// Convenience type alias for Photo Trail results.
pub type Result<T> = std::result::Result<T, TrailError>;

/// Convenience type alias for per-file ingestion results.
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Convenience type alias for record store results.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
