//! Photo ingestion pipeline components.
//!
//! - **hash**: Content fingerprints for duplicate detection
//! - **metadata**: GPS and capture time from EXIF
//! - **placement**: Collision-safe copies into the photo directory
//! - **discovery**: Find files in a directory
//! - **ingestor**: Orchestrates the per-file stages
//! - **batch**: File lists and idempotent directory sweeps

pub mod batch;
pub mod discovery;
pub mod hash;
pub mod ingestor;
pub mod metadata;
pub mod placement;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-exports for convenient access
pub use batch::BatchEvent;
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use hash::Hasher;
pub use ingestor::{IngestOptions, Ingestor};
pub use metadata::{DmsComponent, MetadataExtractor};
pub use placement::{Placement, StoragePlacer};
