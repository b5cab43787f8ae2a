//! Optional enrichment of ingested photos.
//!
//! Provides a provider abstraction for description, people identification
//! and fallback geolocation, and an enricher that applies timeouts and turns
//! failures into warnings.

pub(crate) mod enricher;
pub(crate) mod provider;

pub use enricher::{EnrichRequest, Enricher, Enrichment};
pub use provider::{EnrichmentProvider, EnrichmentProviderFactory, OfflineProvider};
