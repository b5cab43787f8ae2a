//! The `phototrail list` command.

use clap::{Args, ValueEnum};
use phototrail_core::{Config, OutputFormat as CoreOutputFormat, PhotoTrail, RecordWriter};
use std::io::BufWriter;

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Execute the list command.
pub fn execute(args: ListArgs, config: Config) -> anyhow::Result<()> {
    let trail = PhotoTrail::open(config)?;
    let photos = trail.photos()?;
    tracing::debug!("Listing {} photos", photos.len());

    let stdout = std::io::stdout();
    let mut writer = RecordWriter::new(BufWriter::new(stdout.lock()), args.format.into(), args.pretty);
    writer.write_records(&photos)?;

    trail.close()?;
    Ok(())
}
