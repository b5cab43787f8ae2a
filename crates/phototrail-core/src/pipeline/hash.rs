//! Content hashing for exact-duplicate detection.

use blake3::Hasher as Blake3Hasher;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::HashError;

/// Read buffer size; bounds memory use regardless of file size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Computes content-addressed fingerprints of files.
pub struct Hasher;

impl Hasher {
    /// Generate a BLAKE3 hash of file contents as a lowercase hex string.
    ///
    /// The file is streamed in fixed-size chunks, so large files are never
    /// loaded into memory at once.
    pub fn content_hash(path: &Path) -> Result<String, HashError> {
        let wrap = |source| HashError {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(wrap)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Blake3Hasher::new();

        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let bytes_read = reader.read(&mut buffer).map_err(wrap)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(hasher.finalize().to_hex().to_string())
    }
}
