use std::path::Path;

/// Directory names that duplicate scans never descend into.
/// Matched case-insensitively against each directory component name.
pub const SCAN_DENYLIST_DIRS: &[&str] = &[
    "system volume information",
    "$recycle.bin",
    "windows",
    "program files",
    "program files (x86)",
    "temp",
];

/// Filename fragments of files whose deletion could destabilize the OS.
const CRITICAL_FILE_PATTERNS: &[&str] = &[
    "desktop.ini",
    "thumbs.db",
    ".sys",
    ".dll",
    ".exe",
    "hiberfil.sys",
    "pagefile.sys",
    "swapfile.sys",
];

/// Path fragments of system directories that must never be cleaned.
const CRITICAL_DIR_FRAGMENTS: &[&str] = &[
    "system32",
    "syswow64",
    "windows/system",
    "windows\\system",
    "program files",
];

/// Substrings that mark a directory as disposable. Empty-directory
/// pruning is restricted to paths containing one of these.
pub const TEMP_INDICATORS: &[&str] = &["temp", "tmp", "cache"];

/// Check whether a directory name is on the scan denylist
pub fn is_denylisted_dir(name: &str) -> bool {
    let lower = name.to_lowercase();
    SCAN_DENYLIST_DIRS.iter().any(|d| lower == *d)
}

/// Check whether a file is system critical and must not be deleted
pub fn is_system_critical(path: &Path) -> bool {
    if let Some(name) = path.file_name() {
        let name = name.to_string_lossy().to_lowercase();
        if CRITICAL_FILE_PATTERNS.iter().any(|p| name.contains(p)) {
            return true;
        }
    }

    let path_lower = path.to_string_lossy().to_lowercase();
    CRITICAL_DIR_FRAGMENTS
        .iter()
        .any(|d| path_lower.contains(d))
}

/// Check whether a path looks like temp/cache storage
pub fn is_temp_like(path: &Path) -> bool {
    let path_lower = path.to_string_lossy().to_lowercase();
    TEMP_INDICATORS.iter().any(|t| path_lower.contains(t))
}
