//! Ingestion coordinator - wires together the per-file stages.
//!
//! hash → duplicate check → metadata → enrichment → placement → persist

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::enrichment::{EnrichRequest, Enricher};
use crate::error::{IngestError, IngestResult, StoreError, StoreResult};
use crate::store::RecordStore;
use crate::types::{IngestOutcome, IngestStatus, IngestWarning, NewPhotoRecord, PhotoRecord};

use super::hash::Hasher;
use super::metadata::MetadataExtractor;
use super::placement::{Placement, StoragePlacer};

/// Options for a single ingestion.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Directory the stored copy is placed in
    pub data_dir: PathBuf,
    /// Ask the enrichment provider for a description
    pub describe: bool,
    /// Ask the enrichment provider to identify people
    pub identify: bool,
    /// Ask the enrichment provider for a location when GPS tags are missing
    pub geo_fallback: bool,
}

impl IngestOptions {
    /// Options with enrichment disabled apart from the geo fallback.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            describe: false,
            identify: false,
            geo_fallback: true,
        }
    }
}

/// Runs one file at a time through the ingestion stages.
pub struct Ingestor {
    store: Arc<dyn RecordStore>,
    enricher: Enricher,
}

impl Ingestor {
    pub fn new(store: Arc<dyn RecordStore>, enricher: Enricher) -> Self {
        Self { store, enricher }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Ingest a single file.
    ///
    /// Identical content always resolves to the record that already holds
    /// it: nothing is copied and no row is added. Hash and enrichment
    /// failures are soft and come back as warnings on the outcome; an
    /// unreadable image, a failed copy or a store failure is an error and
    /// leaves neither a record nor a stored copy behind.
    pub async fn ingest_one(
        &self,
        source: &Path,
        options: &IngestOptions,
    ) -> IngestResult<IngestOutcome> {
        let start = Instant::now();
        tracing::debug!("Ingesting: {:?}", source);

        if !source.is_file() {
            return Err(IngestError::SourceMissing(source.to_path_buf()));
        }
        if !is_recordable(source, &options.data_dir) {
            return Err(IngestError::NonUtf8Path(source.to_path_buf()));
        }

        let mut warnings = Vec::new();

        let content_hash = match Hasher::content_hash(source) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!("{}; ingesting without duplicate protection", e);
                warnings.push(IngestWarning::HashUnavailable(e.to_string()));
                None
            }
        };
        tracing::trace!("  Hash: {:?}", start.elapsed());

        if let Some(hash) = &content_hash {
            if let Some(existing) = self.store.find_by_content_hash(hash)? {
                tracing::debug!(
                    "{:?} duplicates record #{} ({:?})",
                    source,
                    existing.id,
                    existing.file_path
                );
                return Ok(duplicate(existing, warnings));
            }
        }

        let metadata = MetadataExtractor::extract(source)?;
        tracing::trace!("  Metadata: {:?}", start.elapsed());

        let request = EnrichRequest {
            describe: options.describe,
            identify: options.identify,
            locate: options.geo_fallback && metadata.location.is_none(),
        };
        let enrichment = self.enricher.enrich(source, request).await;
        warnings.extend(enrichment.warnings);
        tracing::trace!("  Enrichment: {:?}", start.elapsed());

        let placement = StoragePlacer::place(source, &options.data_dir)?;
        tracing::trace!("  Placement: {:?}", start.elapsed());

        if let Placement::InPlace(path) = &placement {
            if let Some(existing) = self.store.find_by_file_path(path)? {
                tracing::debug!("{:?} is already recorded as #{}", path, existing.id);
                return Ok(duplicate(existing, warnings));
            }
        }

        let new_record = NewPhotoRecord {
            file_path: placement.path().to_path_buf(),
            content_hash,
            location: metadata.location.or(enrichment.location),
            taken_at: metadata.taken_at,
            description: enrichment.description,
            people: enrichment.people,
        };

        match self.store.insert(&new_record) {
            Ok(record) => {
                tracing::info!(
                    "Ingested {:?} as #{} in {:?}",
                    record.file_path,
                    record.id,
                    start.elapsed()
                );
                Ok(IngestOutcome {
                    record,
                    status: IngestStatus::Created,
                    warnings,
                })
            }
            Err(StoreError::Conflict(message)) => {
                let existing = self.find_conflicting(&new_record);
                discard_copy(&placement);
                match existing? {
                    Some(existing) => {
                        tracing::debug!(
                            "{:?} conflicted with record #{}, using it",
                            source,
                            existing.id
                        );
                        Ok(duplicate(existing, warnings))
                    }
                    None => Err(StoreError::Conflict(message).into()),
                }
            }
            Err(e) => {
                discard_copy(&placement);
                Err(e.into())
            }
        }
    }

    /// The record that made an insert violate a uniqueness constraint.
    fn find_conflicting(&self, record: &NewPhotoRecord) -> StoreResult<Option<PhotoRecord>> {
        if let Some(hash) = &record.content_hash {
            if let Some(existing) = self.store.find_by_content_hash(hash)? {
                return Ok(Some(existing));
            }
        }
        self.store.find_by_file_path(&record.file_path)
    }
}

/// Whether the stored path for `source` can be recorded as text: the
/// file name and the destination directory must both be UTF-8.
fn is_recordable(source: &Path, data_dir: &Path) -> bool {
    let name_ok = source.file_name().is_some_and(|n| n.to_str().is_some());
    name_ok && data_dir.to_str().is_some()
}

fn duplicate(record: PhotoRecord, warnings: Vec<IngestWarning>) -> IngestOutcome {
    IngestOutcome {
        record,
        status: IngestStatus::Duplicate,
        warnings,
    }
}

/// Remove a copy made for a record that was not persisted.
fn discard_copy(placement: &Placement) {
    if let Placement::Copied(path) = placement {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Could not remove unused copy {:?}: {}", path, e);
        }
    }
}
