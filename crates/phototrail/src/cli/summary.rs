//! Progress bar and end-of-run summary for ingestion commands.

use indicatif::{ProgressBar, ProgressStyle};
use phototrail_core::{BatchEvent, BatchReport};
use std::time::Duration;

/// Create a progress bar for an ingestion batch. The length is set once the
/// batch size is known.
pub fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("scanning...");
    pb
}

/// Advance the progress bar for one batch event.
pub fn track(progress: &ProgressBar, event: BatchEvent<'_>) {
    match event {
        BatchEvent::Started { total } => {
            progress.set_length(total as u64);
            progress.set_message("ingesting...");
        }
        BatchEvent::Skipped { .. } => progress.inc(1),
        BatchEvent::Processed { path } => {
            progress.inc(1);
            if let Some(name) = path.file_name() {
                progress.set_message(name.to_string_lossy().into_owned());
            }
        }
    }
}

/// Format the summary table for a finished batch.
pub fn summary_lines(report: &BatchReport, elapsed: Duration) -> Vec<String> {
    let mut lines = vec![
        "  ====================================".to_string(),
        "               Summary".to_string(),
        "  ====================================".to_string(),
        format!("    Created:      {:>8}", report.created.len()),
    ];
    if !report.duplicates.is_empty() {
        lines.push(format!("    Duplicates:   {:>8}", report.duplicates.len()));
    }
    if !report.skipped.is_empty() {
        lines.push(format!("    Skipped:      {:>8}", report.skipped.len()));
    }
    if !report.failures.is_empty() {
        lines.push(format!("    Failed:       {:>8}", report.failures.len()));
    }
    if !report.warnings.is_empty() {
        lines.push(format!("    Warnings:     {:>8}", report.warnings.len()));
    }
    lines.push("  ------------------------------------".to_string());
    lines.push(format!("    Total:        {:>8}", report.total()));
    lines.push(format!("    Duration:     {:>7.1}s", elapsed.as_secs_f64()));
    lines.push("  ====================================".to_string());
    lines
}

/// Print the per-file messages, then the summary table, to stderr.
pub fn print_report(report: &BatchReport, elapsed: Duration) {
    let messages = report.messages();
    if !messages.is_empty() {
        eprintln!();
        for message in &messages {
            eprintln!("  {}", message);
        }
    }
    eprintln!();
    for line in summary_lines(report, elapsed) {
        eprintln!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phototrail_core::PhotoRecord;
    use std::path::{Path, PathBuf};

    fn record(id: i64) -> PhotoRecord {
        PhotoRecord {
            id,
            file_path: PathBuf::from(format!("/photos/{id}.jpg")),
            content_hash: None,
            location: None,
            taken_at: None,
            description: None,
            people: vec![],
        }
    }

    #[test]
    fn test_summary_omits_empty_rows() {
        let report = BatchReport {
            created: vec![record(1), record(2)],
            ..BatchReport::default()
        };
        let lines = summary_lines(&report, Duration::from_millis(1500));
        let text = lines.join("\n");
        assert!(text.contains("Created:             2"));
        assert!(text.contains("Total:               2"));
        assert!(text.contains("1.5s"));
        assert!(!text.contains("Failed"));
        assert!(!text.contains("Skipped"));
    }

    #[test]
    fn test_summary_counts_every_outcome() {
        let report = BatchReport {
            created: vec![record(1)],
            duplicates: vec![record(2)],
            skipped: vec![PathBuf::from("a.jpg")],
            ..BatchReport::default()
        };
        let text = summary_lines(&report, Duration::ZERO).join("\n");
        assert!(text.contains("Duplicates:          1"));
        assert!(text.contains("Skipped:             1"));
        assert!(text.contains("Total:               3"));
    }

    #[test]
    fn test_track_follows_batch_events() {
        let progress = ProgressBar::hidden();
        track(&progress, BatchEvent::Started { total: 3 });
        track(&progress, BatchEvent::Skipped { path: Path::new("a.jpg") });
        track(&progress, BatchEvent::Processed { path: Path::new("/in/b.jpg") });

        assert_eq!(progress.length(), Some(3));
        assert_eq!(progress.position(), 2);
        assert_eq!(progress.message(), "b.jpg");
    }
}
