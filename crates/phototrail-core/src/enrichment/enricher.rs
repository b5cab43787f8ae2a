//! Enrichment engine: runs the optional provider calls for one image.
//!
//! Each call is bounded by a timeout. A failed or timed-out call never aborts
//! ingestion; it leaves its field empty and is reported as a warning.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::provider::EnrichmentProvider;
use crate::error::EnrichmentError;
use crate::types::{EnrichmentCall, GeoPoint, IngestWarning};

/// Which enrichment calls to make for an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichRequest {
    pub describe: bool,
    pub identify: bool,
    /// Ask for a location; set only when embedded GPS is absent
    pub locate: bool,
}

impl EnrichRequest {
    pub fn is_empty(&self) -> bool {
        !(self.describe || self.identify || self.locate)
    }
}

/// Values gathered for one image, with the warnings raised on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub description: Option<String>,
    pub people: Vec<String>,
    pub location: Option<GeoPoint>,
    pub warnings: Vec<IngestWarning>,
}

/// Provider wrapper enforcing a per-call timeout.
pub struct Enricher {
    provider: Arc<dyn EnrichmentProvider>,
    timeout_ms: u64,
}

impl Enricher {
    pub fn new(provider: Arc<dyn EnrichmentProvider>, timeout_ms: u64) -> Self {
        Self {
            provider,
            timeout_ms,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run the requested calls in order: describe, identify, locate.
    pub async fn enrich(&self, image: &Path, request: EnrichRequest) -> Enrichment {
        let mut out = Enrichment::default();
        if request.is_empty() {
            return out;
        }
        tracing::debug!(
            "Enriching {:?} with {} ({:?})",
            image,
            self.provider_name(),
            request
        );

        if request.describe {
            match self
                .call(EnrichmentCall::Describe, self.provider.describe(image))
                .await
            {
                Ok(description) => out.description = description,
                Err(w) => out.warnings.push(w),
            }
        }

        if request.identify {
            match self
                .call(
                    EnrichmentCall::IdentifyPeople,
                    self.provider.identify_people(image),
                )
                .await
            {
                Ok(people) => out.people = people,
                Err(w) => out.warnings.push(w),
            }
        }

        if request.locate {
            match self
                .call(EnrichmentCall::GeoLocate, self.provider.geo_locate(image))
                .await
            {
                Ok(location) => out.location = location,
                Err(w) => out.warnings.push(w),
            }
        }

        out
    }

    /// Await one provider call under the timeout, turning failure into a warning.
    async fn call<T, F>(&self, call: EnrichmentCall, fut: F) -> Result<T, IngestWarning>
    where
        F: Future<Output = Result<T, EnrichmentError>>,
    {
        let result = match tokio::time::timeout(Duration::from_millis(self.timeout_ms), fut).await {
            Ok(result) => result,
            Err(_) => Err(EnrichmentError::Timeout {
                timeout_ms: self.timeout_ms,
            }),
        };

        result.map_err(|error| {
            tracing::warn!("Enrichment {} failed: {}", call, error);
            IngestWarning::Enrichment { call, error }
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// A configurable mock provider for exercising enrichment behavior.
    pub(crate) struct MockProvider {
        pub description: Result<Option<String>, EnrichmentError>,
        pub people: Result<Vec<String>, EnrichmentError>,
        pub location: Result<Option<GeoPoint>, EnrichmentError>,
        /// Optional delay before every call returns
        pub delay: Option<Duration>,
        /// Number of calls made (shared for post-hoc assertions)
        pub calls: Arc<AtomicU32>,
    }

    impl MockProvider {
        pub(crate) fn answering(description: &str, people: &[&str]) -> Self {
            Self {
                description: Ok(Some(description.to_string())),
                people: Ok(people.iter().map(|p| p.to_string()).collect()),
                location: Ok(None),
                delay: None,
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            let err = EnrichmentError::Failed(message.to_string());
            Self {
                description: Err(err.clone()),
                people: Err(err.clone()),
                location: Err(err),
                delay: None,
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        pub(crate) fn with_location(mut self, location: GeoPoint) -> Self {
            self.location = Ok(Some(location));
            self
        }

        pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        async fn respond<T: Clone>(
            &self,
            value: &Result<T, EnrichmentError>,
        ) -> Result<T, EnrichmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            value.clone()
        }
    }

    #[async_trait]
    impl EnrichmentProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn describe(&self, _image: &Path) -> Result<Option<String>, EnrichmentError> {
            self.respond(&self.description).await
        }

        async fn identify_people(&self, _image: &Path) -> Result<Vec<String>, EnrichmentError> {
            self.respond(&self.people).await
        }

        async fn geo_locate(&self, _image: &Path) -> Result<Option<GeoPoint>, EnrichmentError> {
            self.respond(&self.location).await
        }
    }

    fn all_calls() -> EnrichRequest {
        EnrichRequest {
            describe: true,
            identify: true,
            locate: true,
        }
    }

    #[tokio::test]
    async fn test_enrich_collects_provider_values() {
        let provider =
            MockProvider::answering("A harbour at dusk.", &["Ada", "Grace"])
                .with_location(GeoPoint::new(51.5, -0.1));
        let enricher = Enricher::new(Arc::new(provider), 5_000);

        let out = enricher.enrich(Path::new("x.jpg"), all_calls()).await;
        assert_eq!(out.description.as_deref(), Some("A harbour at dusk."));
        assert_eq!(out.people, vec!["Ada", "Grace"]);
        assert_eq!(out.location, Some(GeoPoint::new(51.5, -0.1)));
        assert!(out.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_empty_request_makes_no_calls() {
        let provider = MockProvider::answering("unused", &[]);
        let calls = provider.calls.clone();
        let enricher = Enricher::new(Arc::new(provider), 5_000);

        let out = enricher
            .enrich(Path::new("x.jpg"), EnrichRequest::default())
            .await;
        assert_eq!(out, Enrichment::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failures_become_warnings_with_empty_fields() {
        let enricher = Enricher::new(Arc::new(MockProvider::failing("quota exceeded")), 5_000);

        let out = enricher.enrich(Path::new("x.jpg"), all_calls()).await;
        assert!(out.description.is_none());
        assert!(out.people.is_empty());
        assert!(out.location.is_none());
        assert_eq!(out.warnings.len(), 3);
        assert!(out.warnings[0].to_string().starts_with("describe failed"));
        assert!(out.warnings[1].to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let provider = MockProvider::answering("too slow", &["Ada"])
            .with_delay(Duration::from_secs(5));
        let enricher = Enricher::new(Arc::new(provider), 20);

        let request = EnrichRequest {
            describe: true,
            ..EnrichRequest::default()
        };
        let out = enricher.enrich(Path::new("x.jpg"), request).await;
        assert!(out.description.is_none());
        assert_eq!(
            out.warnings,
            vec![IngestWarning::Enrichment {
                call: EnrichmentCall::Describe,
                error: EnrichmentError::Timeout { timeout_ms: 20 },
            }]
        );
    }
}
