//! # tidypc
//!
//! A privacy-first disposable-state inventory and cleanup utility.
//!
//! tidypc finds and removes categories of disposable filesystem state:
//!
//! - **Duplicate Detection**: content hashing over a bounded walk,
//!   grouped by digest with a configurable keep policy
//! - **Browser Data Cleaning**: cache, cookie, history and download
//!   stores for Chrome, Edge and Firefox, with backup-before-mutate
//!   protection for SQLite-backed stores
//! - **Temp Cleanup**: OS temp/cache directories with age filtering,
//!   a system-critical denylist and lock-aware retries
//! - **Safety-First**: batch operations collect per-file errors instead
//!   of aborting; structured stores are never left partially modified
//! - **CLI as Unix Citizen**: JSON output, pipe-friendly, cron-schedulable
//! - **100% Offline**: zero telemetry, no accounts, no cloud

pub mod browsers;
pub mod cleaner;
pub mod cli;
pub mod common;
pub mod duplicates;
