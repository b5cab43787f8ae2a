//! File discovery for bulk import.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds candidate files directly inside a directory.
pub struct FileDiscovery;

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
}

impl DiscoveredFile {
    /// Base name as a lossy string, used for the name pre-filter.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl FileDiscovery {
    /// List the regular files directly in `dir`.
    ///
    /// Subdirectories are not descended into and hidden entries (leading
    /// dot) are skipped. No extension filter is applied: anything that isn't
    /// a readable image is rejected later by metadata extraction. Results
    /// are sorted by path for deterministic ordering.
    pub fn discover(dir: &Path) -> Vec<DiscoveredFile> {
        let mut files: Vec<DiscoveredFile> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| !Self::is_hidden(entry.path()))
            .map(|entry| DiscoveredFile {
                path: entry.into_path(),
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovers_direct_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"b").unwrap();
        std::fs::write(dir.path().join("a.png"), b"aa").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ccc").unwrap();
        std::fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("deep.jpg"), b"d").unwrap();

        let files = FileDiscovery::discover(dir.path());
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a.png", "b.jpg", "notes.txt"]);
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let files = FileDiscovery::discover(Path::new("/nonexistent/photos"));
        assert!(files.is_empty());
    }
}
