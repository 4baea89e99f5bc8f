use colored::*;
use std::io::Write;

use crate::browsers::{AllBrowsersReport, BrowserCleanReport, BrowserKind, BrowserProfile, DataCategory};
use crate::cleaner::{TempCleanReport, TempScanReport};
use crate::common::format;
use crate::duplicates::{DeleteReport, ScanReport};

// ─── Duplicates ───────────────────────────────────────────────────────────────

pub fn print_dup_results(report: &ScanReport, detailed: bool) {
    let summary = report.summary();

    format::print_header("Duplicate Scan Results");
    format::print_kv("Files scanned", &summary.scanned_files.to_string());
    format::print_kv("Duplicate groups", &summary.duplicate_groups.to_string());
    format::print_kv("Duplicate files", &summary.total_duplicates.to_string());
    format::print_kv(
        "Reclaimable",
        &format::format_size(report.duplicate_bytes),
    );
    if report.truncated {
        println!(
            "  {}",
            "Scan hit the file ceiling; results are partial.".yellow()
        );
    }

    if report.groups.is_empty() {
        println!("\n{}", "No duplicates found.".green());
        return;
    }

    if detailed {
        for (i, group) in report.groups.iter().enumerate() {
            println!(
                "\n{} {} ({} wasted)",
                format!("Group {}", i + 1).bold(),
                group.digest.to_string().dimmed(),
                format::format_size_colored(group.wasted_bytes())
            );
            for (j, member) in group.members.iter().enumerate() {
                let marker = if j == 0 {
                    "keep".green().bold()
                } else {
                    "dup ".red()
                };
                println!(
                    "  [{}] {}  {}  {}",
                    marker,
                    format::format_path(&member.path),
                    format::format_size(member.size).dimmed(),
                    format::format_mtime(member.modified).dimmed()
                );
            }
        }
    } else {
        println!(
            "\nRun with {} to list every group member.",
            "--detailed".bold()
        );
    }
}

pub fn print_dup_json(report: &ScanReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("JSON encoding failed: {}", e),
    }
}

pub fn print_delete_report(report: &DeleteReport) {
    format::print_header("Deletion Results");
    format::print_kv("Files deleted", &report.deleted_files.to_string());
    format::print_kv("Space freed", &format::format_size(report.freed_bytes));
    print_errors(&report.errors);
}

// ─── Browsers ─────────────────────────────────────────────────────────────────

pub fn print_browser_list(profiles: &[BrowserProfile]) {
    if profiles.is_empty() {
        println!("{}", "No browsers detected.".yellow());
        return;
    }

    format::print_header("Detected Browsers");
    for profile in profiles {
        println!(
            "  {} {}",
            profile.browser.to_string().bold(),
            format::format_path(&profile.profile_dir).dimmed()
        );
    }
}

pub fn print_browser_sizes(sizes: &[(BrowserKind, std::collections::HashMap<DataCategory, u64>, u64)]) {
    if sizes.is_empty() {
        println!("{}", "No browsers detected.".yellow());
        return;
    }

    format::print_header("Browser Data Sizes");
    for (browser, by_category, total) in sizes {
        println!(
            "  {} — {}",
            browser.to_string().bold(),
            format::format_size_colored(*total)
        );
        for category in DataCategory::ALL {
            let size = by_category.get(category).copied().unwrap_or(0);
            println!(
                "    {:<14} {}",
                category.to_string(),
                format::format_size(size).dimmed()
            );
        }
    }
}

pub fn print_browser_clean(report: &BrowserCleanReport) {
    format::print_header(&format!("Cleaned {}", report.browser));
    let cleaned: Vec<String> = report
        .cleaned_categories
        .iter()
        .map(|c| c.to_string())
        .collect();
    format::print_kv("Categories", &cleaned.join(", "));
    format::print_kv("Files removed", &report.files_deleted.to_string());
    format::print_kv("Space freed", &format::format_size(report.freed_bytes));
    print_errors(&report.errors);
}

pub fn print_all_browsers_clean(report: &AllBrowsersReport) {
    format::print_header("Browser Cleanup Results");
    format::print_kv("Browsers cleaned", &report.browsers_cleaned.to_string());
    format::print_kv("Files removed", &report.files_deleted.to_string());
    format::print_kv("Space freed", &format::format_size(report.freed_bytes));
    print_errors(&report.errors);
}

// ─── Temp ─────────────────────────────────────────────────────────────────────

pub fn print_temp_scan(report: &TempScanReport) {
    format::print_header("Temp File Inventory");
    format::print_kv("Files", &report.file_count.to_string());
    format::print_kv("Total size", &format::format_size(report.total_bytes));
}

pub fn print_temp_clean(report: &TempCleanReport) {
    format::print_header("Temp Cleanup Results");
    format::print_kv("Files deleted", &report.files_deleted.to_string());
    format::print_kv("Space freed", &format::format_size(report.freed_bytes));
    format::print_kv("Skipped", &report.skipped_files.to_string());
    format::print_kv(
        "Permission errors",
        &report.permission_errors.to_string(),
    );
    format::print_kv("In-use errors", &report.in_use_errors.to_string());
    println!("\n{}", report.summary());
    print_errors(&report.errors);
}

// ─── Shared ───────────────────────────────────────────────────────────────────

pub fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("JSON encoding failed: {}", e),
    }
}

fn print_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    println!("\n{}", format!("{} errors:", errors.len()).red().bold());
    for error in errors {
        println!("  {}", error.red());
    }
}

/// Ask for confirmation on stdin; any answer other than y/yes declines
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
