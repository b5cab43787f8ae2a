//! The `phototrail import` command for idempotent directory sweeps.

use clap::Args;
use phototrail_core::{Config, PhotoTrail};
use std::path::PathBuf;
use std::time::Instant;

use super::summary;

/// Arguments for the `import` command.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Directory to sweep (defaults to the configured photo directory)
    pub dir: Option<PathBuf>,

    /// Ask the enrichment provider for a description
    #[arg(long)]
    pub describe: bool,

    /// Ask the enrichment provider to identify people
    #[arg(long)]
    pub identify: bool,
}

/// Execute the import command.
pub async fn execute(args: ImportArgs, config: Config) -> anyhow::Result<()> {
    let trail = PhotoTrail::open(config)?;
    let mut options = trail.ingest_options();
    options.describe |= args.describe;
    options.identify |= args.identify;

    let progress = summary::create_progress_bar();
    let start = Instant::now();
    let report = trail
        .import_with(args.dir.as_deref(), &options, |event| {
            summary::track(&progress, event)
        })
        .await;
    progress.finish_and_clear();

    let report = report?;
    summary::print_report(&report, start.elapsed());
    trail.close()?;
    Ok(())
}
