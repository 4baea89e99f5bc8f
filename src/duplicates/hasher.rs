use md5::{Digest, Md5};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Chunk size for streaming file reads
pub const CHUNK_SIZE: usize = 4096;

/// Hard cap on how much of a file will be hashed (100 MiB).
/// Larger files are never considered for duplicate grouping.
pub const MAX_HASH_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// 128-bit content digest used as an equality key for duplicate grouping.
///
/// Not cryptographically secure; collisions are astronomically unlikely
/// and accepted as a known limitation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; 16]);

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self)
    }
}

impl serde::Serialize for ContentDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of hashing one file. Files that cannot be hashed are excluded
/// from grouping rather than reported as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashOutcome {
    Hashed(ContentDigest),
    /// File exceeds the size cutoff
    TooLarge,
    /// Permission or I/O error while reading
    Unreadable,
}

impl HashOutcome {
    pub fn digest(self) -> Option<ContentDigest> {
        match self {
            HashOutcome::Hashed(d) => Some(d),
            _ => None,
        }
    }
}

/// Hash a file's content in fixed-size chunks with the default size cutoff
pub fn hash_file(path: &Path) -> HashOutcome {
    hash_file_with_limit(path, MAX_HASH_FILE_SIZE)
}

/// Hash a file's content with an explicit size cutoff.
///
/// The cutoff is checked once against the file metadata before reading
/// and re-checked as bytes accumulate, so a file that grows between the
/// metadata check and the read still comes back as `TooLarge`.
pub fn hash_file_with_limit(path: &Path, max_size: u64) -> HashOutcome {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(_) => return HashOutcome::Unreadable,
    };
    if metadata.len() > max_size {
        return HashOutcome::TooLarge;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return HashOutcome::Unreadable,
    };
    let mut reader = BufReader::new(file);
    let mut hasher = Md5::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut bytes_read: u64 = 0;

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                bytes_read += n as u64;
                if bytes_read > max_size {
                    return HashOutcome::TooLarge;
                }
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => return HashOutcome::Unreadable,
        }
    }

    HashOutcome::Hashed(ContentDigest(hasher.finalize().into()))
}
