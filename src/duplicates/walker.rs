use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

use super::hasher::MAX_HASH_FILE_SIZE;
use super::resolver::KeepPolicy;
use crate::common::safety;

/// Hard ceiling on files considered per scan. Hitting it ends the walk
/// early and saturates the reported totals at this value.
pub const MAX_SCAN_FILES: usize = 10_000;

/// Progress is reported every this many processed files
pub const PROGRESS_CADENCE: usize = 5;

/// Immutable snapshot of a file captured at scan time. Not re-validated
/// until deletion time; may go stale if the filesystem changes underneath.
#[derive(Debug, Clone, Serialize)]
pub struct FileDescriptor {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub created: Option<SystemTime>,
}

impl FileDescriptor {
    fn capture(path: &Path) -> Option<Self> {
        let metadata = std::fs::metadata(path).ok()?;
        Some(FileDescriptor {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
            accessed: metadata.accessed().ok(),
            created: metadata.created().ok(),
        })
    }
}

/// Options for a duplicate scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Lowercase extensions (without dot) to restrict the scan to
    pub extensions: Option<HashSet<String>>,
    /// Minimum file size in bytes
    pub min_size: u64,
    /// Ordering policy within each duplicate group
    pub keep_policy: KeepPolicy,
    /// Ceiling on candidate files counted in the pre-pass
    pub max_candidates: usize,
    /// Ceiling on files scanned and hashed
    pub max_scanned: usize,
    /// Size cutoff above which files are never hashed
    pub max_hash_size: u64,
    /// Path substrings excluded from the scan
    pub exclude_paths: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: None,
            min_size: 1024,
            keep_policy: KeepPolicy::default(),
            max_candidates: MAX_SCAN_FILES,
            max_scanned: MAX_SCAN_FILES,
            max_hash_size: MAX_HASH_FILE_SIZE,
            exclude_paths: Vec::new(),
        }
    }
}

impl ScanOptions {
    /// Normalize a raw extension list ("JPG", ".png") into the allow-set form
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self.extensions = if set.is_empty() { None } else { Some(set) };
        self
    }

    fn matches_extension(&self, path: &Path) -> bool {
        match &self.extensions {
            None => true,
            Some(allowed) => path
                .extension()
                .map(|e| allowed.contains(&e.to_string_lossy().to_lowercase()))
                .unwrap_or(false),
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude_paths.is_empty() {
            return false;
        }
        let path_str = path.display().to_string();
        self.exclude_paths.iter().any(|p| path_str.contains(p))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Directory pruning: denylisted directories are excluded from descent
/// entirely, not merely filtered out. The scan root itself is exempt so
/// that scanning e.g. a temp directory directly still works.
fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if is_hidden(entry) {
        return false;
    }
    if entry.file_type().is_dir() {
        return !safety::is_denylisted_dir(&entry.file_name().to_string_lossy());
    }
    true
}

/// Lazily walk `root`, yielding descriptors for candidate files: not
/// hidden, not inside a denylisted system directory, at least `min_size`
/// bytes, and matching the extension allow-set when one is given.
///
/// The caller applies the scanned-file ceiling; this iterator has none.
pub fn candidates<'a>(
    root: &Path,
    options: &'a ScanOptions,
) -> impl Iterator<Item = FileDescriptor> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(keep_entry)
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| FileDescriptor::capture(entry.path()))
        .filter(move |fd| {
            fd.size >= options.min_size
                && options.matches_extension(&fd.path)
                && !options.is_excluded(&fd.path)
        })
}

/// Count candidate files under `root`, saturating at the candidate
/// ceiling. A deliberate approximation: once the ceiling is hit the
/// count is reported as exactly the ceiling value.
pub fn count_candidates(root: &Path, options: &ScanOptions) -> usize {
    candidates(root, options).take(options.max_candidates).count()
}

/// Named extension presets for scan filtering
pub fn preset_extensions(kind: &str) -> Option<HashSet<String>> {
    let list: &[&str] = match kind {
        "images" => &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", "ico", "svg"],
        "videos" => &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "3gp"],
        "audio" => &["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a", "opus"],
        "documents" => &[
            "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "rtf", "odt",
        ],
        "archives" => &["zip", "rar", "7z", "tar", "gz", "bz2", "xz"],
        _ => return None,
    };
    Some(list.iter().map(|s| s.to_string()).collect())
}
