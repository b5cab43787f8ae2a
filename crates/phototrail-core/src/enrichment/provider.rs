//! Enrichment provider trait and factory.
//!
//! Defines the interface every enrichment backend implements, plus the
//! factory that creates the configured one.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::config::EnrichmentConfig;
use crate::error::EnrichmentError;
use crate::types::GeoPoint;

/// Trait that all enrichment providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn EnrichmentProvider>` for dynamic dispatch).
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Short free-text description of the image, if the provider has one.
    async fn describe(&self, image: &Path) -> Result<Option<String>, EnrichmentError>;

    /// Names of recognized people, in provider order.
    async fn identify_people(&self, image: &Path) -> Result<Vec<String>, EnrichmentError>;

    /// Estimated capture location for images without GPS tags.
    async fn geo_locate(&self, image: &Path) -> Result<Option<GeoPoint>, EnrichmentError>;
}

/// Placeholder provider that never knows anything.
///
/// Every call succeeds with the empty value, so ingestion behaves exactly as
/// if enrichment were disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

#[async_trait]
impl EnrichmentProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn describe(&self, _image: &Path) -> Result<Option<String>, EnrichmentError> {
        Ok(None)
    }

    async fn identify_people(&self, _image: &Path) -> Result<Vec<String>, EnrichmentError> {
        Ok(Vec::new())
    }

    async fn geo_locate(&self, _image: &Path) -> Result<Option<GeoPoint>, EnrichmentError> {
        Ok(None)
    }
}

/// Provider names accepted in `[enrichment] provider`.
const KNOWN_PROVIDERS: &[&str] = &["offline"];

/// Factory that creates the provider named in config.
pub struct EnrichmentProviderFactory;

impl EnrichmentProviderFactory {
    pub fn create(config: &EnrichmentConfig) -> Result<Arc<dyn EnrichmentProvider>, EnrichmentError> {
        match config.provider.as_str() {
            "offline" => Ok(Arc::new(OfflineProvider)),
            other => Err(EnrichmentError::UnknownProvider(other.to_string())),
        }
    }

    /// Whether `name` can be passed to [`Self::create`].
    pub fn is_known(name: &str) -> bool {
        KNOWN_PROVIDERS.contains(&name)
    }
}
