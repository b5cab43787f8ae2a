//! Photo Trail Core - photo ingestion library.
//!
//! Photo Trail ingests photo files into a flat managed directory, recovering
//! GPS position and capture time from EXIF, deduplicating by content hash,
//! and recording each distinct photo exactly once in a SQLite store.
//!
//! # Architecture
//!
//! ```text
//! File → Hash → Duplicate check → Metadata → Enrichment → Placement → Record store
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use phototrail_core::{Config, PhotoTrail};
//!
//! #[tokio::main]
//! async fn main() -> phototrail_core::Result<()> {
//!     let trail = PhotoTrail::open(Config::load()?)?;
//!     let options = trail.ingest_options();
//!     let report = trail.ingest(&["./beach.jpg".into()], &options).await;
//!     println!("Created: {}", report.created.len());
//!     trail.close()
//! }
//! ```

// Module declarations
pub mod config;
pub mod enrichment;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use enrichment::{EnrichmentProvider, EnrichmentProviderFactory};
pub use error::{
    ConfigError, EnrichmentError, IngestError, IngestResult, Result, StorageError, StoreError,
    TrailError,
};
pub use output::{OutputFormat, RecordWriter};
pub use pipeline::{BatchEvent, IngestOptions, Ingestor};
pub use store::{RecordStore, SqliteStore};
pub use types::{
    BatchReport, ClearReport, GeoPoint, IngestOutcome, IngestStatus, IngestWarning, PhotoRecord,
};

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use enrichment::Enricher;
use types::BatchFailure;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Photo Trail handle - the main entry point for ingestion and management.
///
/// Owns the record store for its whole lifetime; call [`PhotoTrail::close`]
/// to release it explicitly.
pub struct PhotoTrail {
    config: Config,
    store: Arc<SqliteStore>,
    ingestor: Ingestor,
}

impl PhotoTrail {
    /// Open the configured database and enrichment provider.
    pub fn open(config: Config) -> Result<Self> {
        tracing::debug!("Initializing Photo Trail v{}", VERSION);
        let store = SqliteStore::open(&config.database_path())?;
        Self::with_store(config, store)
    }

    /// Build a handle around an already opened store.
    pub fn with_store(config: Config, store: SqliteStore) -> Result<Self> {
        store.initialize()?;
        let provider = EnrichmentProviderFactory::create(&config.enrichment)?;
        let enricher = Enricher::new(provider, config.enrichment.timeout_ms);
        tracing::debug!("Enrichment provider: {}", enricher.provider_name());

        let store = Arc::new(store);
        let ingestor = Ingestor::new(store.clone(), enricher);
        Ok(Self {
            config,
            store,
            ingestor,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ingestion options from the `[ingest]` defaults, targeting the photo directory.
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            data_dir: self.config.photo_dir(),
            describe: self.config.ingest.describe,
            identify: self.config.ingest.identify,
            geo_fallback: self.config.ingest.geo_fallback,
        }
    }

    /// Ingest explicit files.
    pub async fn ingest(&self, paths: &[PathBuf], options: &IngestOptions) -> BatchReport {
        self.ingestor.ingest_files(paths, options).await
    }

    pub async fn ingest_with<F>(
        &self,
        paths: &[PathBuf],
        options: &IngestOptions,
        on_event: F,
    ) -> BatchReport
    where
        F: FnMut(BatchEvent<'_>),
    {
        self.ingestor.ingest_files_with(paths, options, on_event).await
    }

    /// Sweep a directory, the photo directory when `dir` is `None`.
    pub async fn import(&self, dir: Option<&Path>, options: &IngestOptions) -> Result<BatchReport> {
        self.import_with(dir, options, |_| {}).await
    }

    pub async fn import_with<F>(
        &self,
        dir: Option<&Path>,
        options: &IngestOptions,
        on_event: F,
    ) -> Result<BatchReport>
    where
        F: FnMut(BatchEvent<'_>),
    {
        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.photo_dir());
        Ok(self
            .ingestor
            .ingest_directory_with(&dir, options, on_event)
            .await?)
    }

    /// All records, oldest first.
    pub fn photos(&self) -> Result<Vec<PhotoRecord>> {
        Ok(self.store.list()?)
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.store.count()?)
    }

    /// Delete every record and unlink its stored file.
    ///
    /// Files that are already gone are not an error; any other failure to
    /// unlink is listed in the report.
    pub fn clear(&self) -> Result<ClearReport> {
        let deleted = self.store.delete_all()?;
        let mut report = ClearReport {
            records_deleted: deleted.len(),
            ..ClearReport::default()
        };

        for record in &deleted {
            match std::fs::remove_file(&record.file_path) {
                Ok(()) => report.files_removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!("{:?} was already gone", record.file_path);
                }
                Err(e) => {
                    tracing::warn!("Could not remove {:?}: {}", record.file_path, e);
                    report.failures.push(BatchFailure {
                        path: record.file_path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Cleared {} records, removed {} files",
            report.records_deleted,
            report.files_removed
        );
        Ok(report)
    }

    /// Close the record store.
    pub fn close(self) -> Result<()> {
        let Self {
            store, ingestor, ..
        } = self;
        drop(ingestor);
        match Arc::try_unwrap(store) {
            Ok(store) => Ok(store.close()?),
            Err(_) => {
                tracing::warn!("Record store still in use; it will close when released");
                Ok(())
            }
        }
    }
}
