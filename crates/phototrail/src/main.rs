//! Photo Trail CLI - ingest, deduplicate and browse a trail of geotagged photos.
//!
//! Photos are copied into a flat managed directory, their GPS position and
//! capture time are read from EXIF, and each distinct photo is recorded once
//! in a SQLite database.
//!
//! # Usage
//!
//! ```bash
//! # Ingest individual photos
//! phototrail ingest beach.jpg harbour.jpg --describe
//!
//! # Sweep the photo directory for files dropped in by hand
//! phototrail import
//!
//! # List the collection as JSON Lines
//! phototrail list --format jsonl
//!
//! # Start over
//! phototrail clear --yes
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Photo Trail - ingest, deduplicate and browse a trail of geotagged photos.
#[derive(Parser, Debug)]
#[command(name = "phototrail")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "PHOTOTRAIL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest photo files into the collection
    Ingest(cli::ingest::IngestArgs),

    /// Ingest every new file found directly in a directory
    Import(cli::import::ImportArgs),

    /// List every recorded photo
    List(cli::list::ListArgs),

    /// Delete every record and its stored file
    Clear(cli::clear::ClearArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `phototrail config path`."
            );
            phototrail_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Photo Trail v{}", phototrail_core::VERSION);

    match cli.command {
        Commands::Ingest(args) => cli::ingest::execute(args, config).await,
        Commands::Import(args) => cli::import::execute(args, config).await,
        Commands::List(args) => cli::list::execute(args, config),
        Commands::Clear(args) => cli::clear::execute(args, config),
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingest() {
        let cli = Cli::try_parse_from([
            "phototrail",
            "ingest",
            "a.jpg",
            "b.jpg",
            "--describe",
            "--data-dir",
            "/tmp/photos",
        ])
        .unwrap();
        match cli.command {
            Commands::Ingest(args) => {
                assert_eq!(args.files.len(), 2);
                assert!(args.describe);
                assert!(!args.identify);
                assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/photos")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ingest_requires_files() {
        assert!(Cli::try_parse_from(["phototrail", "ingest"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["phototrail", "list", "--format", "jsonl", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_import_directory_is_optional() {
        let cli = Cli::try_parse_from(["phototrail", "import"]).unwrap();
        match cli.command {
            Commands::Import(args) => assert!(args.dir.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
