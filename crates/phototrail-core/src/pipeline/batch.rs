//! Batch ingestion: explicit file lists and idempotent directory sweeps.

use std::path::{Path, PathBuf};

use crate::error::{IngestResult, StorageError};
use crate::types::BatchReport;

use super::discovery::FileDiscovery;
use super::ingestor::{IngestOptions, Ingestor};

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, Copy)]
pub enum BatchEvent<'a> {
    /// Number of entries about to be looked at
    Started { total: usize },
    /// Entry skipped because its name is already stored
    Skipped { path: &'a Path },
    /// Entry went through the ingestor (successfully or not)
    Processed { path: &'a Path },
}

impl Ingestor {
    /// Ingest each path in order. A failing file is recorded in the report
    /// and never stops the rest of the batch.
    pub async fn ingest_files(&self, paths: &[PathBuf], options: &IngestOptions) -> BatchReport {
        self.ingest_files_with(paths, options, |_| {}).await
    }

    pub async fn ingest_files_with<F>(
        &self,
        paths: &[PathBuf],
        options: &IngestOptions,
        mut on_event: F,
    ) -> BatchReport
    where
        F: FnMut(BatchEvent<'_>),
    {
        let mut report = BatchReport::default();
        on_event(BatchEvent::Started { total: paths.len() });

        for path in paths {
            let result = self.ingest_one(path, options).await;
            if let Err(e) = &result {
                tracing::warn!("Failed to ingest {:?}: {}", path, e);
            }
            report.record(path, result);
            on_event(BatchEvent::Processed { path });
        }

        report
    }

    /// Sweep the files directly inside `dir`, storing them in place.
    ///
    /// Entries whose base name is already stored are skipped without being
    /// read. Everything else goes through [`Ingestor::ingest_one`] with
    /// `data_dir = dir`, so a renamed copy of known content is still caught
    /// by its content hash and reported as a duplicate. Running the sweep
    /// again over an unchanged directory creates nothing.
    pub async fn ingest_directory(
        &self,
        dir: &Path,
        options: &IngestOptions,
    ) -> IngestResult<BatchReport> {
        self.ingest_directory_with(dir, options, |_| {}).await
    }

    pub async fn ingest_directory_with<F>(
        &self,
        dir: &Path,
        options: &IngestOptions,
        mut on_event: F,
    ) -> IngestResult<BatchReport>
    where
        F: FnMut(BatchEvent<'_>),
    {
        std::fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let files = FileDiscovery::discover(dir);
        let known = self.store().stored_file_names()?;
        tracing::debug!(
            "Found {} files in {:?} ({} names already stored)",
            files.len(),
            dir,
            known.len()
        );

        let options = IngestOptions {
            data_dir: dir.to_path_buf(),
            ..options.clone()
        };

        let mut report = BatchReport::default();
        on_event(BatchEvent::Started { total: files.len() });

        for file in &files {
            if known.contains(&file.file_name()) {
                tracing::trace!("Skipping known name {:?}", file.path);
                report.skipped.push(file.path.clone());
                on_event(BatchEvent::Skipped { path: &file.path });
                continue;
            }

            let result = self.ingest_one(&file.path, &options).await;
            if let Err(e) = &result {
                tracing::warn!("Failed to ingest {:?}: {}", file.path, e);
            }
            report.record(&file.path, result);
            on_event(BatchEvent::Processed { path: &file.path });
        }

        tracing::info!(
            "Imported {:?}: {} created, {} duplicates, {} skipped, {} failed",
            dir,
            report.created.len(),
            report.duplicates.len(),
            report.skipped.len(),
            report.failures.len()
        );
        Ok(report)
    }
}
