use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

use crate::common::safety;

/// Delete attempts per locked file
pub const DELETE_RETRIES: u32 = 3;

/// Base delay between retries; grows linearly per attempt
const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// Default minimum file age before cleanup will touch it
pub const DEFAULT_MIN_AGE: Duration = Duration::from_secs(3600);

/// Inventory of temp files found without deleting anything
#[derive(Debug, Serialize)]
pub struct TempScanReport {
    pub file_count: usize,
    pub total_bytes: u64,
}

/// Statistics from a temp cleanup run.
///
/// Skipped covers both policy skips (too recent, protected) and files
/// still locked after all retries; hard failures land in the error
/// counters and the capped `errors` list.
#[derive(Debug, Default, Serialize)]
pub struct TempCleanReport {
    pub freed_bytes: u64,
    pub files_deleted: usize,
    pub skipped_files: usize,
    pub permission_errors: usize,
    pub in_use_errors: usize,
    pub errors: Vec<String>,
}

impl TempCleanReport {
    fn merge(mut self, other: TempCleanReport) -> TempCleanReport {
        self.freed_bytes += other.freed_bytes;
        self.files_deleted += other.files_deleted;
        self.skipped_files += other.skipped_files;
        self.permission_errors += other.permission_errors;
        self.in_use_errors += other.in_use_errors;
        self.errors.extend(other.errors);
        self
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        if self.files_deleted == 0 {
            if self.skipped_files > 0 {
                return format!(
                    "No files cleaned. {} files were skipped (too recent or protected).",
                    self.skipped_files
                );
            }
            return "No temporary files found to clean.".to_string();
        }

        let mut summary = format!(
            "Successfully cleaned {} files, freed {:.1} MB.",
            self.files_deleted,
            self.freed_bytes as f64 / (1024.0 * 1024.0)
        );
        if self.skipped_files > 0 {
            summary.push_str(&format!(" {} files skipped.", self.skipped_files));
        }
        if self.in_use_errors > 0 {
            summary.push_str(&format!(
                " {} files were in use by other processes.",
                self.in_use_errors
            ));
        }
        summary
    }
}

/// Cleans well-known OS temp and cache directories.
///
/// Files are only deleted when older than the minimum age and not
/// matching the system-critical denylist; locked files get a bounded
/// retry and count as skipped when the lock persists.
#[derive(Debug, Clone)]
pub struct TempCleaner {
    roots: Vec<PathBuf>,
    min_age: Duration,
}

impl TempCleaner {
    /// Cleaner over the platform's default temp/cache roots
    pub fn new(min_age: Duration) -> Self {
        TempCleaner {
            roots: default_roots(),
            min_age,
        }
    }

    /// Cleaner over explicit roots (used by tests)
    pub fn with_roots(roots: Vec<PathBuf>, min_age: Duration) -> Self {
        TempCleaner { roots, min_age }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Tally temp files across all roots without deleting
    pub fn scan(&self) -> TempScanReport {
        let (file_count, total_bytes) = self
            .roots
            .par_iter()
            .map(|root| {
                let mut count = 0usize;
                let mut bytes = 0u64;
                for entry in WalkDir::new(root)
                    .follow_links(false)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                {
                    count += 1;
                    bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
                }
                (count, bytes)
            })
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

        TempScanReport {
            file_count,
            total_bytes,
        }
    }

    /// Clean all roots, merging per-root statistics
    pub fn clean(&self) -> TempCleanReport {
        self.roots
            .par_iter()
            .map(|root| self.clean_root(root))
            .reduce(TempCleanReport::default, TempCleanReport::merge)
    }

    fn clean_root(&self, root: &Path) -> TempCleanReport {
        let mut report = TempCleanReport::default();

        // contents_first yields files before their parent directories,
        // so emptied directories can be pruned in the same pass
        for entry in WalkDir::new(root)
            .follow_links(false)
            .contents_first(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if entry.file_type().is_dir() {
                if path != root && safety::is_temp_like(path) {
                    // Only succeeds once the directory is empty
                    let _ = std::fs::remove_dir(path);
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                // Vanished mid-walk
                Err(_) => continue,
            };

            if !self.old_enough(&metadata) {
                report.skipped_files += 1;
                continue;
            }
            if safety::is_system_critical(path) {
                report.skipped_files += 1;
                continue;
            }

            let size = metadata.len();
            match delete_with_retry(path) {
                Ok(DeleteOutcome::Deleted) => {
                    report.freed_bytes += size;
                    report.files_deleted += 1;
                }
                Ok(DeleteOutcome::Vanished) => {}
                Ok(DeleteOutcome::StillLocked) => {
                    report.skipped_files += 1;
                    report.in_use_errors += 1;
                }
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        report.permission_errors += 1;
                    }
                    // Cap the error list to avoid spamming the caller
                    if report.errors.len() < 5 {
                        report
                            .errors
                            .push(format!("cannot delete '{}': {}", path.display(), e));
                    }
                }
            }
        }

        report
    }

    fn old_enough(&self, metadata: &std::fs::Metadata) -> bool {
        let Ok(modified) = metadata.modified() else {
            return false;
        };
        match SystemTime::now().duration_since(modified) {
            Ok(age) => age > self.min_age,
            // Modified in the future: treat as fresh
            Err(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteOutcome {
    Deleted,
    /// Removed by someone else between walk and delete
    Vanished,
    /// Lock persisted through every retry; counted as skipped
    StillLocked,
}

fn delete_with_retry(path: &Path) -> Result<DeleteOutcome, std::io::Error> {
    for attempt in 1..=DELETE_RETRIES {
        clear_readonly(path);

        match std::fs::remove_file(path) {
            Ok(()) => return Ok(DeleteOutcome::Deleted),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(DeleteOutcome::Vanished)
            }
            Err(e) if is_in_use_error(&e) => {
                if attempt == DELETE_RETRIES {
                    return Ok(DeleteOutcome::StillLocked);
                }
                tracing::debug!(
                    "'{}' in use, retrying (attempt {}/{})",
                    path.display(),
                    attempt,
                    DELETE_RETRIES
                );
                std::thread::sleep(RETRY_BASE_DELAY * attempt);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(DeleteOutcome::StillLocked)
}

/// Best-effort removal of the read-only attribute before deletion
#[cfg(windows)]
fn clear_readonly(path: &Path) {
    if let Ok(metadata) = std::fs::metadata(path) {
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            permissions.set_readonly(false);
            let _ = std::fs::set_permissions(path, permissions);
        }
    }
}

#[cfg(not(windows))]
fn clear_readonly(_path: &Path) {}

/// Sharing-violation / file-busy errors that merit a retry
fn is_in_use_error(e: &std::io::Error) -> bool {
    match e.raw_os_error() {
        // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
        Some(32) | Some(33) if cfg!(windows) => true,
        // ETXTBSY
        Some(26) if cfg!(unix) => true,
        _ => false,
    }
}

/// Well-known temp/cache roots for the current platform, filtered to
/// those that exist
fn default_roots() -> Vec<PathBuf> {
    let mut roots = vec![std::env::temp_dir()];

    #[cfg(target_os = "windows")]
    {
        if let Some(home) = dirs::home_dir() {
            let local = home.join("AppData").join("Local");
            roots.push(local.join("Temp"));
            roots.push(
                local
                    .join("Microsoft")
                    .join("Windows")
                    .join("INetCache"),
            );
        }
        roots.push(PathBuf::from("C:\\Windows\\Temp"));
        roots.push(PathBuf::from("C:\\Windows\\Prefetch"));
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join("Library").join("Caches"));
        }
        roots.push(PathBuf::from("/tmp"));
        roots.push(PathBuf::from("/var/tmp"));
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(cache) = dirs::cache_dir() {
            roots.push(cache);
        }
        roots.push(PathBuf::from("/tmp"));
        roots.push(PathBuf::from("/var/tmp"));
    }

    let mut seen = std::collections::HashSet::new();
    roots
        .into_iter()
        .filter(|r| r.exists() && seen.insert(r.clone()))
        .collect()
}
