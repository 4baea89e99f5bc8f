use tempfile::TempDir;

use tidypc::duplicates::hasher::{self, HashOutcome, CHUNK_SIZE};

#[test]
fn test_identical_files_share_digest() {
    let dir = TempDir::new().unwrap();
    let content = b"Hello, tidypc! This is test content for hashing.";

    let file1 = dir.path().join("file1.txt");
    let file2 = dir.path().join("file2.txt");
    std::fs::write(&file1, content).unwrap();
    std::fs::write(&file2, content).unwrap();

    let digest1 = hasher::hash_file(&file1).digest().unwrap();
    let digest2 = hasher::hash_file(&file2).digest().unwrap();

    assert_eq!(digest1, digest2, "Identical files should produce identical digests");
}

#[test]
fn test_different_files_differ() {
    let dir = TempDir::new().unwrap();

    let file1 = dir.path().join("file1.txt");
    let file2 = dir.path().join("file2.txt");
    std::fs::write(&file1, b"Content A").unwrap();
    std::fs::write(&file2, b"Content B").unwrap();

    let digest1 = hasher::hash_file(&file1).digest().unwrap();
    let digest2 = hasher::hash_file(&file2).digest().unwrap();

    assert_ne!(digest1, digest2, "Different files should produce different digests");
}

#[test]
fn test_difference_after_first_chunk_detected() {
    let dir = TempDir::new().unwrap();

    // Same first chunk, different after
    let mut content1 = vec![0u8; CHUNK_SIZE * 2];
    let mut content2 = vec![0u8; CHUNK_SIZE * 2];
    content1[CHUNK_SIZE + 100] = 0xFF;
    content2[CHUNK_SIZE + 100] = 0x00;

    let file1 = dir.path().join("file1.bin");
    let file2 = dir.path().join("file2.bin");
    std::fs::write(&file1, &content1).unwrap();
    std::fs::write(&file2, &content2).unwrap();

    let digest1 = hasher::hash_file(&file1).digest().unwrap();
    let digest2 = hasher::hash_file(&file2).digest().unwrap();
    assert_ne!(digest1, digest2, "Content differing after the first chunk must differ");
}

#[test]
fn test_oversized_file_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("big.bin");
    std::fs::write(&file, vec![0u8; 64]).unwrap();

    assert_eq!(
        hasher::hash_file_with_limit(&file, 16),
        HashOutcome::TooLarge
    );
}

#[test]
fn test_file_at_limit_is_hashed() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("exact.bin");
    std::fs::write(&file, vec![0u8; 16]).unwrap();

    assert!(matches!(
        hasher::hash_file_with_limit(&file, 16),
        HashOutcome::Hashed(_)
    ));
}

#[test]
fn test_missing_file_is_unreadable() {
    let result = hasher::hash_file(std::path::Path::new("/nonexistent/file.txt"));
    assert_eq!(result, HashOutcome::Unreadable);
}

#[test]
fn test_empty_file_hashes() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("empty.txt");
    std::fs::write(&file, b"").unwrap();

    let outcome = hasher::hash_file(&file);
    assert!(matches!(outcome, HashOutcome::Hashed(_)));
}

#[test]
fn test_digest_displays_as_hex() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("x.txt");
    std::fs::write(&file, b"x").unwrap();

    let digest = hasher::hash_file(&file).digest().unwrap();
    let hex = digest.to_string();
    assert_eq!(hex.len(), 32, "128-bit digest should render as 32 hex chars");
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
}
