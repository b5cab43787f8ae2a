//! Core data types for the Photo Trail ingestion pipeline.
//!
//! These types describe what a photo looks like once it has been ingested,
//! what the metadata extractor can recover from a file, and how the outcome
//! of one or many ingestions is reported back to the caller.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::EnrichmentError;

/// One ingested photo, as persisted in the record store.
///
/// Records are never updated in place; they are created once per distinct
/// content hash and only removed by clearing the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Surrogate identifier assigned by the store
    pub id: i64,

    /// Path of the stored copy on disk (unique)
    pub file_path: PathBuf,

    /// BLAKE3 hex digest of the original bytes (unique when present)
    pub content_hash: Option<String>,

    /// Latitude/longitude, both present or both absent
    #[serde(flatten, with = "nullable_location")]
    pub location: Option<GeoPoint>,

    /// Capture time from embedded metadata
    pub taken_at: Option<NaiveDateTime>,

    /// Enrichment-provided description
    pub description: Option<String>,

    /// Recognized people, in the order the provider returned them
    pub people: Vec<String>,
}

/// Writes a location as `latitude`/`longitude` keys that are `null` when
/// the position is unknown, so every listed record has the same shape.
mod nullable_location {
    use super::GeoPoint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct LatLon {
        latitude: Option<f64>,
        longitude: Option<f64>,
    }

    pub fn serialize<S: Serializer>(
        location: &Option<GeoPoint>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        LatLon {
            latitude: location.map(|l| l.latitude),
            longitude: location.map(|l| l.longitude),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<GeoPoint>, D::Error> {
        let LatLon {
            latitude,
            longitude,
        } = LatLon::deserialize(deserializer)?;
        Ok(latitude
            .zip(longitude)
            .map(|(lat, lon)| GeoPoint::new(lat, lon)))
    }
}

/// A photo that is about to be persisted (no id yet).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewPhotoRecord {
    pub file_path: PathBuf,
    pub content_hash: Option<String>,
    pub location: Option<GeoPoint>,
    pub taken_at: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub people: Vec<String>,
}

/// A geographic position in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Positive north, negative south
    pub latitude: f64,
    /// Positive east, negative west
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Metadata recovered from a readable image.
///
/// Every field is optional: a valid image without EXIF yields the default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhotoMetadata {
    pub location: Option<GeoPoint>,
    pub taken_at: Option<NaiveDateTime>,
}

/// Whether an ingestion created a new record or matched an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStatus {
    /// A new record was persisted
    Created,
    /// The content (or stored path) was already known; nothing was written
    Duplicate,
}

/// The optional enrichment calls made during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentCall {
    Describe,
    IdentifyPeople,
    GeoLocate,
}

impl std::fmt::Display for EnrichmentCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentCall::Describe => write!(f, "describe"),
            EnrichmentCall::IdentifyPeople => write!(f, "identify_people"),
            EnrichmentCall::GeoLocate => write!(f, "geo_locate"),
        }
    }
}

/// A soft failure that degraded an ingestion without stopping it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum IngestWarning {
    /// Hashing failed, so the duplicate check was skipped
    #[error("content hash unavailable, duplicate check skipped: {0}")]
    HashUnavailable(String),

    /// An enrichment call failed and its field was left empty
    #[error("{call} failed: {error}")]
    Enrichment {
        call: EnrichmentCall,
        error: EnrichmentError,
    },
}

/// Result of ingesting a single file.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub record: PhotoRecord,
    pub status: IngestStatus,
    pub warnings: Vec<IngestWarning>,
}

impl IngestOutcome {
    pub fn is_created(&self) -> bool {
        self.status == IngestStatus::Created
    }
}

/// A file that could not be ingested during a batch.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub message: String,
}

/// A warning raised while ingesting one file of a batch.
#[derive(Debug, Clone)]
pub struct BatchWarning {
    pub path: PathBuf,
    pub warning: IngestWarning,
}

/// Per-file tally of a batch ingestion.
///
/// `created` holds only records persisted by this run. Content duplicates of
/// existing records are listed in `duplicates` and never counted as created.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Records created by this run
    pub created: Vec<PhotoRecord>,

    /// Existing records matched by content or stored path
    pub duplicates: Vec<PhotoRecord>,

    /// Entries skipped because their name is already in the store
    pub skipped: Vec<PathBuf>,

    /// Entries that could not be ingested
    pub failures: Vec<BatchFailure>,

    /// Soft failures, per file
    pub warnings: Vec<BatchWarning>,
}

impl BatchReport {
    /// Total number of entries the batch looked at.
    pub fn total(&self) -> usize {
        self.created.len() + self.duplicates.len() + self.skipped.len() + self.failures.len()
    }

    /// Fold a single ingestion result into the report.
    pub(crate) fn record(
        &mut self,
        path: &Path,
        result: crate::error::IngestResult<IngestOutcome>,
    ) {
        match result {
            Ok(outcome) => {
                self.warnings
                    .extend(outcome.warnings.into_iter().map(|warning| BatchWarning {
                        path: path.to_path_buf(),
                        warning,
                    }));
                match outcome.status {
                    IngestStatus::Created => self.created.push(outcome.record),
                    IngestStatus::Duplicate => self.duplicates.push(outcome.record),
                }
            }
            Err(e) => self.failures.push(BatchFailure {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Human-readable log lines: one per failure, then one per warning.
    pub fn messages(&self) -> Vec<String> {
        let failures = self
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.path.display(), f.message));
        let warnings = self
            .warnings
            .iter()
            .map(|w| format!("{}: warning: {}", w.path.display(), w.warning));
        failures.chain(warnings).collect()
    }
}

/// Result of clearing the whole collection.
#[derive(Debug, Clone, Default)]
pub struct ClearReport {
    /// Number of records deleted from the store
    pub records_deleted: usize,

    /// Number of backing files unlinked
    pub files_removed: usize,

    /// Files that could not be removed, with the reason
    pub failures: Vec<BatchFailure>,
}
