//! Configuration validation.

use crate::enrichment::EnrichmentProviderFactory;
use crate::error::ConfigError;

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.photo_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.photo_dir must not be empty".into(),
            ));
        }
        if self.storage.database.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.database must not be empty".into(),
            ));
        }
        if self.enrichment.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "enrichment.timeout_ms must be > 0".into(),
            ));
        }
        if !EnrichmentProviderFactory::is_known(&self.enrichment.provider) {
            return Err(ConfigError::ValidationError(format!(
                "enrichment.provider '{}' is not known",
                self.enrichment.provider
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
