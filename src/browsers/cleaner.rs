use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

use super::locator::{BrowserProfile, DataCategory};
use super::store;
use crate::common::safety;

/// Report from cleaning one browser's data.
///
/// Partial success is the norm: `success` reflects only that the browser
/// was found; individual failures are enumerated in `errors`.
#[derive(Debug, Serialize)]
pub struct BrowserCleanReport {
    pub browser: String,
    pub success: bool,
    pub cleaned_categories: Vec<DataCategory>,
    pub freed_bytes: u64,
    pub files_deleted: usize,
    pub errors: Vec<String>,
}

/// Aggregate report across several browsers
#[derive(Debug, Serialize)]
pub struct AllBrowsersReport {
    pub browsers_cleaned: usize,
    pub freed_bytes: u64,
    pub files_deleted: usize,
    pub reports: Vec<BrowserCleanReport>,
    pub errors: Vec<String>,
}

/// Clean the requested data categories for one detected browser.
///
/// SQLite-backed categories go through the structured-store mutator;
/// everything else is deleted as plain files (recursively for
/// directories, pruning now-empty subdirectories bottom-up).
pub fn clean_browser(profile: &BrowserProfile, categories: &[DataCategory]) -> BrowserCleanReport {
    let mut report = BrowserCleanReport {
        browser: profile.browser.to_string(),
        success: true,
        cleaned_categories: Vec::new(),
        freed_bytes: 0,
        files_deleted: 0,
        errors: Vec::new(),
    };

    for &category in categories {
        let Some(path) = profile.path(category) else {
            continue;
        };
        if !path.exists() {
            continue;
        }

        // Deletion of browser data never touches system-critical paths
        if safety::is_system_critical(path) {
            report.errors.push(format!(
                "refusing to clean protected path '{}'",
                path.display()
            ));
            continue;
        }

        let cleaned = if store::is_structured_store(path) {
            clean_store(path, category, &mut report)
        } else if path.is_dir() {
            clean_directory(path, &mut report);
            true
        } else {
            clean_file(path, &mut report)
        };

        if cleaned {
            report.cleaned_categories.push(category);
        }
    }

    report
}

fn clean_store(path: &Path, category: DataCategory, report: &mut BrowserCleanReport) -> bool {
    let Some(store_category) = store::store_category(category) else {
        // Structured store holding a non-row category: treat as a plain file
        return clean_file(path, report);
    };

    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    match store::clear_store(path, store_category) {
        Ok(()) => {
            report.freed_bytes += size;
            report.files_deleted += 1;
            true
        }
        Err(e) => {
            let message = format!("error cleaning {} {}: {}", report.browser, category, e);
            report.errors.push(message);
            false
        }
    }
}

fn clean_file(path: &Path, report: &mut BrowserCleanReport) -> bool {
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    match std::fs::remove_file(path) {
        Ok(()) => {
            report.freed_bytes += size;
            report.files_deleted += 1;
            true
        }
        Err(e) => {
            report
                .errors
                .push(format!("cannot delete '{}': {}", path.display(), e));
            false
        }
    }
}

/// Delete every file under `dir`, then prune emptied subdirectories.
/// `contents_first` yields children before their parent, so each
/// directory is seen only after its contents were handled.
fn clean_directory(dir: &Path, report: &mut BrowserCleanReport) {
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_file() {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            match std::fs::remove_file(path) {
                Ok(()) => {
                    report.freed_bytes += size;
                    report.files_deleted += 1;
                }
                Err(e) => {
                    report
                        .errors
                        .push(format!("cannot delete '{}': {}", path.display(), e));
                }
            }
        } else if entry.file_type().is_dir() && path != dir {
            // Only succeeds for directories emptied above
            let _ = std::fs::remove_dir(path);
        }
    }
}

/// Clean the requested categories from every supplied browser
pub fn clean_all_browsers(
    profiles: &[BrowserProfile],
    categories: &[DataCategory],
) -> AllBrowsersReport {
    let mut aggregate = AllBrowsersReport {
        browsers_cleaned: 0,
        freed_bytes: 0,
        files_deleted: 0,
        reports: Vec::new(),
        errors: Vec::new(),
    };

    for profile in profiles {
        let report = clean_browser(profile, categories);
        aggregate.browsers_cleaned += 1;
        aggregate.freed_bytes += report.freed_bytes;
        aggregate.files_deleted += report.files_deleted;
        aggregate.errors.extend(report.errors.iter().cloned());
        aggregate.reports.push(report);
    }

    aggregate
}
