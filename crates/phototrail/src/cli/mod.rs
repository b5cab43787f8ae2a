//! Command implementations.

pub mod clear;
pub mod config;
pub mod import;
pub mod ingest;
pub mod list;
mod summary;
mod theme;

use phototrail_core::{Config, ConfigError};
use std::path::Path;

/// Load the config from `path`, or from the default location when unset.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
