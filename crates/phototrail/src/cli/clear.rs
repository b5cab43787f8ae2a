//! The `phototrail clear` command.

use clap::Args;
use console::style;
use dialoguer::Confirm;
use phototrail_core::{Config, PhotoTrail};

use super::theme::trail_theme;

/// Arguments for the `clear` command.
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the clear command.
pub fn execute(args: ClearArgs, config: Config) -> anyhow::Result<()> {
    let trail = PhotoTrail::open(config)?;
    let count = trail.count()?;
    if count == 0 {
        eprintln!("  Nothing to clear.");
        return trail.close().map_err(Into::into);
    }

    if !args.yes {
        let confirm = Confirm::with_theme(&trail_theme())
            .with_prompt(format!(
                "Delete {count} records and their stored files from {}?",
                trail.config().photo_dir().display()
            ))
            .default(false)
            .interact_opt()
            .map_err(|e| anyhow::anyhow!("Cannot ask for confirmation ({e}); pass --yes"))?;

        if !matches!(confirm, Some(true)) {
            eprintln!("  Aborted.");
            return trail.close().map_err(Into::into);
        }
    }

    let report = trail.clear()?;
    eprintln!(
        "  {} Deleted {} records, removed {} files",
        style("✓").for_stderr().green(),
        report.records_deleted,
        report.files_removed
    );
    for failure in &report.failures {
        eprintln!(
            "  {} {}: {}",
            style("✗").for_stderr().red(),
            failure.path.display(),
            failure.message
        );
    }

    trail.close()?;
    Ok(())
}
