//! Collision-safe placement of ingested files into the photo directory.

use std::ffi::{OsStr, OsString};
use std::fs::{File, OpenOptions};
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Where an ingested file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The source already lives in the photo directory and was reused as-is
    InPlace(PathBuf),
    /// The source was copied to a fresh name in the photo directory
    Copied(PathBuf),
}

impl Placement {
    /// Final stored path.
    pub fn path(&self) -> &Path {
        match self {
            Placement::InPlace(p) | Placement::Copied(p) => p,
        }
    }

    pub fn is_copy(&self) -> bool {
        matches!(self, Placement::Copied(_))
    }
}

/// Places files into a flat directory without ever overwriting one.
pub struct StoragePlacer;

impl StoragePlacer {
    /// Place `source` into `dest_dir`.
    ///
    /// If `source` already sits directly in `dest_dir` it is reused without a
    /// copy. Otherwise the base name is kept, with `_1`, `_2`, ... inserted
    /// before the extension until a free name is found. The name is claimed
    /// with `create_new` before any byte is written, so two placements can
    /// never end up sharing a file.
    pub fn place(source: &Path, dest_dir: &Path) -> Result<Placement, StorageError> {
        std::fs::create_dir_all(dest_dir).map_err(|source| StorageError::CreateDir {
            path: dest_dir.to_path_buf(),
            source,
        })?;

        if Self::is_in_dir(source, dest_dir) {
            tracing::debug!("Reusing {:?} in place", source);
            return Ok(Placement::InPlace(source.to_path_buf()));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| StorageError::NoFileName(source.to_path_buf()))?;

        let (dest, mut dest_file) = Self::claim_free_name(file_name, dest_dir, 0..=u32::MAX)?;
        if let Err(e) = Self::copy_contents(source, &mut dest_file) {
            drop(dest_file);
            let _ = std::fs::remove_file(&dest);
            return Err(StorageError::Copy {
                from: source.to_path_buf(),
                to: dest,
                source: e,
            });
        }

        tracing::debug!("Copied {:?} -> {:?}", source, dest);
        Ok(Placement::Copied(dest))
    }

    /// Whether the file's parent directory is `dir`.
    fn is_in_dir(path: &Path, dir: &Path) -> bool {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        match (parent.canonicalize(), dir.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => parent == dir,
        }
    }

    /// Create the first unused `name`, `name_1`, `name_2`, ... in `dir`,
    /// trying each suffix in `suffixes` (0 is the bare name).
    fn claim_free_name(
        file_name: &OsStr,
        dir: &Path,
        suffixes: RangeInclusive<u32>,
    ) -> Result<(PathBuf, File), StorageError> {
        for n in suffixes {
            let candidate = dir.join(numbered_name(file_name, n));
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::Copy {
                        from: PathBuf::from(file_name),
                        to: candidate,
                        source: e,
                    })
                }
            }
        }
        Err(StorageError::NamesExhausted {
            name: file_name.to_string_lossy().into_owned(),
            dir: dir.to_path_buf(),
        })
    }

    /// Copy bytes, then carry over permissions and modification time.
    fn copy_contents(source: &Path, dest: &mut File) -> io::Result<()> {
        let mut src = File::open(source)?;
        let meta = src.metadata()?;
        io::copy(&mut src, dest)?;

        if let Err(e) = dest.set_permissions(meta.permissions()) {
            tracing::debug!("Could not copy permissions to stored file: {}", e);
        }
        match meta.modified() {
            Ok(mtime) => dest.set_modified(mtime)?,
            Err(e) => tracing::debug!("Source has no modification time: {}", e),
        }
        Ok(())
    }
}

/// `photo.jpg` for 0, `photo_1.jpg` for 1, `README_2` when there is no extension.
fn numbered_name(file_name: &OsStr, n: u32) -> OsString {
    if n == 0 {
        return file_name.to_os_string();
    }
    let path = Path::new(file_name);
    let stem = path.file_stem().unwrap_or(file_name);
    let mut name = stem.to_os_string();
    name.push(format!("_{}", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}
