//! The `phototrail ingest` command.

use clap::Args;
use phototrail_core::{Config, IngestOptions, PhotoTrail};
use std::path::PathBuf;
use std::time::Instant;

use super::summary;

/// Arguments for the `ingest` command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Photo files to ingest
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Ask the enrichment provider for a description
    #[arg(long)]
    pub describe: bool,

    /// Ask the enrichment provider to identify people
    #[arg(long)]
    pub identify: bool,

    /// Store copies here instead of the configured photo directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Don't ask the enrichment provider for a location when GPS tags are missing
    #[arg(long)]
    pub no_geo_fallback: bool,
}

impl IngestArgs {
    /// Apply the flags on top of the configured defaults.
    fn apply(&self, mut options: IngestOptions) -> IngestOptions {
        options.describe |= self.describe;
        options.identify |= self.identify;
        if self.no_geo_fallback {
            options.geo_fallback = false;
        }
        if let Some(dir) = &self.data_dir {
            options.data_dir = dir.clone();
        }
        options
    }
}

/// Execute the ingest command.
pub async fn execute(args: IngestArgs, config: Config) -> anyhow::Result<()> {
    let trail = PhotoTrail::open(config)?;
    let options = args.apply(trail.ingest_options());
    tracing::debug!("Ingesting {} files into {:?}", args.files.len(), options.data_dir);

    let progress = summary::create_progress_bar();
    let start = Instant::now();
    let report = trail
        .ingest_with(&args.files, &options, |event| {
            summary::track(&progress, event)
        })
        .await;
    progress.finish_and_clear();
    summary::print_report(&report, start.elapsed());
    trail.close()?;

    if report.created.is_empty() && report.duplicates.is_empty() && !report.failures.is_empty() {
        anyhow::bail!("No files were ingested");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(describe: bool, data_dir: Option<&str>, no_geo_fallback: bool) -> IngestArgs {
        IngestArgs {
            files: vec![PathBuf::from("a.jpg")],
            describe,
            identify: false,
            data_dir: data_dir.map(PathBuf::from),
            no_geo_fallback,
        }
    }

    #[test]
    fn test_flags_extend_configured_defaults() {
        let mut defaults = IngestOptions::new("/configured");
        defaults.identify = true;

        let options = args(true, None, false).apply(defaults);
        assert!(options.describe);
        // A config default is not switched off by an absent flag
        assert!(options.identify);
        assert!(options.geo_fallback);
        assert_eq!(options.data_dir, PathBuf::from("/configured"));
    }

    #[test]
    fn test_data_dir_and_geo_override() {
        let options = args(false, Some("/elsewhere"), true).apply(IngestOptions::new("/configured"));
        assert_eq!(options.data_dir, PathBuf::from("/elsewhere"));
        assert!(!options.geo_fallback);
    }
}
