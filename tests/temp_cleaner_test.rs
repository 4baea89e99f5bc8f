use std::fs::OpenOptions;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use tidypc::cleaner::TempCleaner;

fn age_file(path: &Path, age: Duration) {
    let file = OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

const HOUR: Duration = Duration::from_secs(3600);

fn cleaner_for(dir: &TempDir) -> TempCleaner {
    TempCleaner::with_roots(vec![dir.path().to_path_buf()], HOUR)
}

#[test]
fn test_old_file_deleted_critical_file_skipped() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("leftover.log");
    let critical = dir.path().join("desktop.ini");
    std::fs::write(&old, "stale data").unwrap();
    std::fs::write(&critical, "protected").unwrap();
    age_file(&old, 2 * HOUR);
    age_file(&critical, 2 * HOUR);

    let report = cleaner_for(&dir).clean();

    assert_eq!(report.files_deleted, 1);
    assert_eq!(report.skipped_files, 1);
    assert!(report.errors.is_empty());
    assert!(!old.exists());
    assert!(critical.exists(), "Denylisted file must survive");
}

#[test]
fn test_young_file_never_deleted() {
    let dir = TempDir::new().unwrap();
    let young = dir.path().join("in_progress.dat");
    std::fs::write(&young, "still being written").unwrap();

    let report = cleaner_for(&dir).clean();

    assert_eq!(report.files_deleted, 0);
    assert_eq!(report.skipped_files, 1);
    assert!(
        young.exists(),
        "A file younger than the minimum age must never be deleted"
    );
}

#[test]
fn test_age_boundary_respects_configured_minimum() {
    let dir = TempDir::new().unwrap();
    let just_under = dir.path().join("under.tmp");
    let just_over = dir.path().join("over.tmp");
    std::fs::write(&just_under, "a").unwrap();
    std::fs::write(&just_over, "b").unwrap();
    age_file(&just_under, HOUR / 2);
    age_file(&just_over, 3 * HOUR);

    let report = cleaner_for(&dir).clean();

    assert_eq!(report.files_deleted, 1);
    assert_eq!(report.skipped_files, 1);
    assert!(just_under.exists());
    assert!(!just_over.exists());
}

#[test]
fn test_emptied_subdirectories_pruned() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("session_cache");
    std::fs::create_dir(&sub).unwrap();
    let inner = sub.join("chunk.bin");
    std::fs::write(&inner, "old").unwrap();
    age_file(&inner, 2 * HOUR);

    let report = cleaner_for(&dir).clean();

    assert_eq!(report.files_deleted, 1);
    assert!(
        !sub.exists(),
        "Emptied temp-like subdirectory should be pruned"
    );
}

#[test]
fn test_subdirectory_with_survivors_kept() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("tmp_work");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("fresh.dat"), "new").unwrap();

    let report = cleaner_for(&dir).clean();

    assert_eq!(report.files_deleted, 0);
    assert!(sub.exists(), "Directory with remaining files must survive");
}

#[test]
fn test_scan_counts_without_deleting() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.tmp"), "12345").unwrap();
    std::fs::write(dir.path().join("b.tmp"), "123").unwrap();

    let cleaner = cleaner_for(&dir);
    let report = cleaner.scan();

    assert_eq!(report.file_count, 2);
    assert_eq!(report.total_bytes, 8);
    assert!(dir.path().join("a.tmp").exists());
    assert!(dir.path().join("b.tmp").exists());
}

#[test]
fn test_summary_mentions_skips() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("fresh.dat"), "x").unwrap();

    let report = cleaner_for(&dir).clean();
    let summary = report.summary();
    assert!(summary.contains("skipped"), "summary was: {}", summary);
}

#[test]
fn test_summary_reports_deletions() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.dat");
    std::fs::write(&old, "x".repeat(2048)).unwrap();
    age_file(&old, 2 * HOUR);

    let report = cleaner_for(&dir).clean();
    let summary = report.summary();
    assert!(summary.contains("cleaned 1 files"), "summary was: {}", summary);
}

#[test]
fn test_empty_root_reports_nothing_to_clean() {
    let dir = TempDir::new().unwrap();
    let report = cleaner_for(&dir).clean();
    assert_eq!(report.files_deleted, 0);
    assert_eq!(report.skipped_files, 0);
    assert_eq!(report.summary(), "No temporary files found to clean.");
}
