use std::fs::OpenOptions;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use tidypc::duplicates::{self, KeepPolicy, ScanEvent, ScanOptions};

fn set_mtime(path: &Path, time: SystemTime) {
    let file = OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}

fn years_ago(years: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(years * 365 * 24 * 3600)
}

fn options() -> ScanOptions {
    ScanOptions {
        min_size: 0,
        ..Default::default()
    }
}

#[test]
fn test_two_identical_files_form_one_group() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let c = dir.path().join("c.txt");
    std::fs::write(&a, "X").unwrap();
    std::fs::write(&b, "X").unwrap();
    std::fs::write(&c, "Y").unwrap();
    set_mtime(&a, years_ago(6));
    set_mtime(&b, years_ago(3));

    let report = duplicates::scan(dir.path(), &options(), |_, _| {});

    assert_eq!(report.groups.len(), 1, "Exactly one duplicate group expected");
    let group = &report.groups[0];
    assert_eq!(group.members.len(), 2);
    assert_eq!(group.keep().path, b, "Newest file should be the keeper");
    assert_eq!(group.duplicates()[0].path, a);
    assert_eq!(report.duplicate_bytes, 1, "Reclaimable bytes = size of the older copy");

    let summary = report.summary();
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.total_duplicates, 1);
}

#[test]
fn test_groups_have_two_plus_members_sharing_digest() {
    let dir = TempDir::new().unwrap();
    for i in 0..3 {
        std::fs::write(dir.path().join(format!("copy{}.bin", i)), "same bytes").unwrap();
    }
    std::fs::write(dir.path().join("unique.bin"), "different").unwrap();

    let report = duplicates::scan(dir.path(), &options(), |_, _| {});

    assert_eq!(report.groups.len(), 1);
    for group in &report.groups {
        assert!(group.members.len() >= 2);
        // All members share the group digest by construction; verify via lookup
        assert!(report.group(&group.digest).is_some());
    }
}

#[test]
fn test_members_ordered_newest_first() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..4)
        .map(|i| {
            let p = dir.path().join(format!("f{}.dat", i));
            std::fs::write(&p, "identical content").unwrap();
            p
        })
        .collect();
    set_mtime(&paths[0], years_ago(4));
    set_mtime(&paths[1], years_ago(1));
    set_mtime(&paths[2], years_ago(3));
    set_mtime(&paths[3], years_ago(2));

    let report = duplicates::scan(dir.path(), &options(), |_, _| {});

    let members = &report.groups[0].members;
    for pair in members.windows(2) {
        assert!(
            pair[0].modified >= pair[1].modified,
            "Group members must be ordered by modification time descending"
        );
    }
    assert_eq!(members[0].path, paths[1]);
}

#[test]
fn test_oldest_first_policy() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    std::fs::write(&a, "X").unwrap();
    std::fs::write(&b, "X").unwrap();
    set_mtime(&a, years_ago(6));
    set_mtime(&b, years_ago(3));

    let opts = ScanOptions {
        min_size: 0,
        keep_policy: KeepPolicy::OldestFirst,
        ..Default::default()
    };
    let report = duplicates::scan(dir.path(), &opts, |_, _| {});
    assert_eq!(report.groups[0].keep().path, a);
}

#[test]
fn test_delete_then_rescan_is_idempotent() {
    let dir = TempDir::new().unwrap();
    for i in 0..3 {
        std::fs::write(dir.path().join(format!("dup{}.txt", i)), "payload").unwrap();
    }

    let report = duplicates::scan(dir.path(), &options(), |_, _| {});
    assert_eq!(report.groups.len(), 1);

    let doomed: Vec<_> = report.groups[0]
        .duplicates()
        .iter()
        .map(|m| m.path.clone())
        .collect();
    let delete_report = duplicates::delete_files(&doomed);
    assert_eq!(delete_report.deleted_files, 2);
    assert!(delete_report.errors.is_empty());

    let rescan = duplicates::scan(dir.path(), &options(), |_, _| {});
    assert!(
        rescan.groups.is_empty(),
        "Deleting duplicates then re-scanning must not reproduce the group"
    );
}

#[test]
fn test_oversized_files_never_grouped() {
    let dir = TempDir::new().unwrap();
    let payload = vec![7u8; 256];
    std::fs::write(dir.path().join("big1.bin"), &payload).unwrap();
    std::fs::write(dir.path().join("big2.bin"), &payload).unwrap();

    let opts = ScanOptions {
        min_size: 0,
        max_hash_size: 64,
        ..Default::default()
    };
    let report = duplicates::scan(dir.path(), &opts, |_, _| {});
    assert!(
        report.groups.is_empty(),
        "Files above the hash cutoff must never appear in a group"
    );
    // They still count as scanned
    assert_eq!(report.scanned_files, 2);
}

#[test]
fn test_scan_ceiling_saturates() {
    let dir = TempDir::new().unwrap();
    for i in 0..30 {
        std::fs::write(dir.path().join(format!("f{:03}.txt", i)), format!("{}", i)).unwrap();
    }

    let opts = ScanOptions {
        min_size: 0,
        max_candidates: 20,
        max_scanned: 20,
        ..Default::default()
    };
    let report = duplicates::scan(dir.path(), &opts, |_, _| {});

    assert_eq!(report.scanned_files, 20, "Scan must stop at the ceiling");
    assert_eq!(report.total_files, 20, "Total saturates at the ceiling value");
    assert!(report.truncated);
}

#[test]
fn test_progress_reported_with_current_path() {
    let dir = TempDir::new().unwrap();
    for i in 0..10 {
        std::fs::write(dir.path().join(format!("f{}.txt", i)), format!("{}", i)).unwrap();
    }

    let mut updates = Vec::new();
    duplicates::scan(dir.path(), &options(), |percent, path| {
        updates.push((percent, path.to_path_buf()));
    });

    assert_eq!(updates.len(), 2, "10 files at a cadence of 5 gives 2 updates");
    assert!(updates.iter().all(|(p, _)| *p <= 100));
    assert_eq!(updates.last().unwrap().0, 100);
    assert!(updates.iter().all(|(_, path)| path.starts_with(dir.path())));
}

#[test]
fn test_hidden_and_denylisted_entries_skipped() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".hidden"), "X").unwrap();
    std::fs::write(dir.path().join("visible.txt"), "X").unwrap();

    let denylisted = dir.path().join("Windows");
    std::fs::create_dir(&denylisted).unwrap();
    std::fs::write(denylisted.join("inner.txt"), "X").unwrap();

    let report = duplicates::scan(dir.path(), &options(), |_, _| {});
    assert!(
        report.groups.is_empty(),
        "Hidden files and denylisted directories must not contribute members"
    );
    assert_eq!(report.scanned_files, 1);
}

#[test]
fn test_extension_filter() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.jpg"), "pixels").unwrap();
    std::fs::write(dir.path().join("b.JPG"), "pixels").unwrap();
    std::fs::write(dir.path().join("c.txt"), "pixels").unwrap();

    let opts = ScanOptions {
        min_size: 0,
        ..Default::default()
    }
    .with_extensions(["jpg"]);

    let report = duplicates::scan(dir.path(), &opts, |_, _| {});
    assert_eq!(report.groups.len(), 1);
    assert_eq!(
        report.groups[0].members.len(),
        2,
        "Extension match must be case-insensitive and exclude other extensions"
    );
}

#[test]
fn test_min_size_filter() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("small1.txt"), "ab").unwrap();
    std::fs::write(dir.path().join("small2.txt"), "ab").unwrap();

    let opts = ScanOptions {
        min_size: 10,
        ..Default::default()
    };
    let report = duplicates::scan(dir.path(), &opts, |_, _| {});
    assert!(report.groups.is_empty());
    assert_eq!(report.scanned_files, 0);
}

#[test]
fn test_exclude_paths() {
    let dir = TempDir::new().unwrap();
    let kept = dir.path().join("kept");
    let ignored = dir.path().join("ignored");
    std::fs::create_dir_all(&kept).unwrap();
    std::fs::create_dir_all(&ignored).unwrap();
    std::fs::write(kept.join("a.txt"), "Z").unwrap();
    std::fs::write(kept.join("b.txt"), "Z").unwrap();
    std::fs::write(ignored.join("c.txt"), "Z").unwrap();

    let opts = ScanOptions {
        min_size: 0,
        exclude_paths: vec!["ignored".to_string()],
        ..Default::default()
    };
    let report = duplicates::scan(dir.path(), &opts, |_, _| {});
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].members.len(), 2);
}

#[test]
fn test_delete_files_skips_missing_paths() {
    let dir = TempDir::new().unwrap();
    let present = dir.path().join("present.txt");
    std::fs::write(&present, "data").unwrap();
    let missing = dir.path().join("missing.txt");

    let report = duplicates::delete_files(&[present.clone(), missing]);
    assert_eq!(report.deleted_files, 1);
    assert_eq!(report.freed_bytes, 4);
    assert!(report.errors.is_empty(), "A vanished path is a no-op, not an error");
    assert!(!present.exists());
}

#[test]
fn test_background_scan_emits_progress_then_report() {
    let dir = TempDir::new().unwrap();
    for i in 0..10 {
        std::fs::write(dir.path().join(format!("f{}.txt", i)), "same").unwrap();
    }

    let handle = duplicates::spawn_scan(dir.path().to_path_buf(), options());

    let mut saw_progress = false;
    let mut report = None;
    for event in handle.events() {
        match event {
            ScanEvent::Progress { percent, .. } => {
                assert!(percent <= 100);
                saw_progress = true;
            }
            ScanEvent::Done(r) => report = Some(r),
        }
    }

    assert!(saw_progress, "Worker must emit progress events");
    let report = report.expect("Worker must emit a terminal report");
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].members.len(), 10);
}

#[test]
fn test_background_scan_wait() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), "xyz").unwrap();
    std::fs::write(dir.path().join("b.txt"), "xyz").unwrap();

    let handle = duplicates::spawn_scan(dir.path().to_path_buf(), options());
    let report = handle.wait().expect("scan should complete");
    assert_eq!(report.groups.len(), 1);
}
