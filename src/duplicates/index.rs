use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use super::hasher::{self, ContentDigest, HashOutcome};
use super::walker::{self, FileDescriptor, ScanOptions, PROGRESS_CADENCE};
use crate::common::errors::CleanupError;

/// A set of two or more files sharing one content digest. Members are
/// ordered by the scan's keep policy: the first element is the suggested
/// keeper, the remainder are duplicate candidates.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub digest: ContentDigest,
    pub members: Vec<FileDescriptor>,
}

impl DuplicateGroup {
    /// The suggested file to keep
    pub fn keep(&self) -> &FileDescriptor {
        &self.members[0]
    }

    /// Members offered for deletion (everything but the keeper)
    pub fn duplicates(&self) -> &[FileDescriptor] {
        &self.members[1..]
    }

    /// Bytes reclaimable by deleting the non-keeper members
    pub fn wasted_bytes(&self) -> u64 {
        self.members.iter().skip(1).map(|m| m.size).sum()
    }
}

/// Transient state owned by a single scan invocation. Constructed fresh
/// per call and consumed into the report, so concurrent or repeated
/// scans can never observe each other's counters.
#[derive(Debug, Default)]
struct ScanSession {
    buckets: HashMap<ContentDigest, Vec<FileDescriptor>>,
    scanned_files: usize,
    total_files: usize,
    duplicate_bytes: u64,
}

/// Result of a duplicate scan
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Duplicate groups, largest reclaimable size first. Every group has
    /// at least two members sharing an identical digest.
    pub groups: Vec<DuplicateGroup>,
    /// Files actually scanned (saturates at the scan ceiling)
    pub scanned_files: usize,
    /// Candidate files found in the pre-pass (saturates at the ceiling)
    pub total_files: usize,
    /// True when a ceiling ended the walk early, making counts approximate
    pub truncated: bool,
    /// Total bytes reclaimable across all groups
    pub duplicate_bytes: u64,
}

/// Summary of a scan's results
#[derive(Debug, Serialize)]
pub struct DupSummary {
    pub total_duplicates: usize,
    pub duplicate_groups: usize,
    pub potential_savings_mb: f64,
    pub potential_savings_gb: f64,
    pub scanned_files: usize,
}

impl ScanReport {
    fn empty(total_files: usize) -> Self {
        ScanReport {
            groups: Vec::new(),
            scanned_files: 0,
            total_files,
            truncated: false,
            duplicate_bytes: 0,
        }
    }

    pub fn summary(&self) -> DupSummary {
        if self.groups.is_empty() {
            return DupSummary {
                total_duplicates: 0,
                duplicate_groups: 0,
                potential_savings_mb: 0.0,
                potential_savings_gb: 0.0,
                scanned_files: self.scanned_files,
            };
        }

        DupSummary {
            total_duplicates: self.groups.iter().map(|g| g.members.len() - 1).sum(),
            duplicate_groups: self.groups.len(),
            potential_savings_mb: self.duplicate_bytes as f64 / (1024.0 * 1024.0),
            potential_savings_gb: self.duplicate_bytes as f64 / (1024.0 * 1024.0 * 1024.0),
            scanned_files: self.scanned_files,
        }
    }

    /// Look up a group by its digest
    pub fn group(&self, digest: &ContentDigest) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|g| g.digest == *digest)
    }
}

/// Scan `root` for duplicate files.
///
/// Counts candidates first (ceiling-capped), then walks and hashes each
/// candidate, reporting progress every few files as a percentage of the
/// capped total plus the current path. Unhashable files (oversized or
/// unreadable) are excluded from grouping without surfacing an error.
pub fn scan(
    root: &Path,
    options: &ScanOptions,
    mut on_progress: impl FnMut(u8, &Path),
) -> ScanReport {
    let mut session = ScanSession::default();
    session.total_files = walker::count_candidates(root, options);

    if session.total_files == 0 {
        tracing::debug!("no files matching criteria under {}", root.display());
        return ScanReport::empty(0);
    }

    let denominator = session.total_files.min(options.max_scanned).max(1);

    for fd in walker::candidates(root, options).take(options.max_scanned) {
        let current = fd.path.clone();
        match hasher::hash_file_with_limit(&fd.path, options.max_hash_size) {
            HashOutcome::Hashed(digest) => {
                session.buckets.entry(digest).or_default().push(fd);
            }
            HashOutcome::TooLarge => {
                tracing::debug!("skipping oversized file {}", current.display());
            }
            HashOutcome::Unreadable => {
                tracing::debug!("skipping unreadable file {}", current.display());
            }
        }

        session.scanned_files += 1;
        if session.scanned_files % PROGRESS_CADENCE == 0 {
            let percent = (session.scanned_files * 100 / denominator).min(100) as u8;
            on_progress(percent, &current);
        }
    }

    // Partition buckets into groups of 2+, ordered per the keep policy
    let mut groups = Vec::new();
    for (digest, mut members) in session.buckets.drain() {
        if members.len() < 2 {
            continue;
        }
        options.keep_policy.order(&mut members);
        let group = DuplicateGroup { digest, members };
        session.duplicate_bytes += group.wasted_bytes();
        groups.push(group);
    }

    // Largest reclaimable size first
    groups.sort_by(|a, b| b.wasted_bytes().cmp(&a.wasted_bytes()));

    let truncated = session.scanned_files >= options.max_scanned
        || session.total_files >= options.max_candidates;

    ScanReport {
        groups,
        scanned_files: session.scanned_files,
        total_files: session.total_files,
        truncated,
        duplicate_bytes: session.duplicate_bytes,
    }
}

/// Result of a batch deletion
#[derive(Debug, Serialize)]
pub struct DeleteReport {
    pub deleted_files: usize,
    pub freed_bytes: u64,
    pub errors: Vec<String>,
}

/// Best-effort deletion of an explicit, caller-chosen file list.
///
/// Paths that no longer exist are silently skipped (the scan snapshot may
/// be stale). Per-file errors are collected and never abort the batch.
/// Nothing outside the supplied list is ever touched.
pub fn delete_files<P: AsRef<Path>>(paths: &[P]) -> DeleteReport {
    let mut report = DeleteReport {
        deleted_files: 0,
        freed_bytes: 0,
        errors: Vec::new(),
    };

    for path in paths {
        let path = path.as_ref();
        let size = match std::fs::metadata(path) {
            Ok(m) => m.len(),
            // Vanished since the scan: no-op, not an error
            Err(_) => continue,
        };
        match std::fs::remove_file(path) {
            Ok(()) => {
                report.deleted_files += 1;
                report.freed_bytes += size;
            }
            Err(e) => {
                report.errors.push(CleanupError::io(path, e).to_string());
            }
        }
    }

    report
}
