//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Flat directory holding the stored originals
    pub photo_dir: PathBuf,

    /// SQLite database file
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            photo_dir: PathBuf::from("~/.phototrail/photos"),
            database: PathBuf::from("~/.phototrail/photos.db"),
        }
    }
}

/// Default flags applied to every ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Ask the enrichment provider for a description
    pub describe: bool,

    /// Ask the enrichment provider to identify people
    pub identify: bool,

    /// Ask the enrichment provider for a location when GPS tags are missing
    pub geo_fallback: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            describe: false,
            identify: false,
            geo_fallback: true,
        }
    }
}

/// Enrichment collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Provider name ("offline")
    pub provider: String,

    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            provider: "offline".to_string(),
            timeout_ms: 60_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
