use rusqlite::Connection;
use std::path::{Path, PathBuf};

use super::locator::DataCategory;
use crate::common::errors::CleanupError;

/// Logical row categories that can be cleared from a structured store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCategory {
    Cookies,
    History,
    Downloads,
}

impl StoreCategory {
    /// Fixed schema tables holding each category's rows
    fn tables(self) -> &'static [&'static str] {
        match self {
            StoreCategory::Cookies => &["cookies"],
            StoreCategory::History => &["urls", "visits"],
            StoreCategory::Downloads => &["downloads"],
        }
    }
}

/// Map a browser data category onto its structured-store counterpart.
/// Cache and local-storage data are plain files, not store rows.
pub fn store_category(category: DataCategory) -> Option<StoreCategory> {
    match category {
        DataCategory::Cookies => Some(StoreCategory::Cookies),
        DataCategory::History => Some(StoreCategory::History),
        DataCategory::Downloads => Some(StoreCategory::Downloads),
        DataCategory::Cache | DataCategory::LocalStorage => None,
    }
}

/// Whether a path is a structured store to mutate rather than a plain
/// file to delete
pub fn is_structured_store(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "sqlite")
}

/// Scoped backup of a file about to be mutated.
///
/// `begin` copies the file to a `.backup` sibling. Unless `commit` is
/// called, dropping the transaction renames the backup over the original,
/// discarding any partial mutation. The store file is therefore never
/// left in a partially modified state.
#[derive(Debug)]
pub struct FileTransaction {
    original: PathBuf,
    backup: PathBuf,
    committed: bool,
}

impl FileTransaction {
    /// Copy `path` aside and arm the rollback
    pub fn begin(path: &Path) -> Result<Self, CleanupError> {
        let mut backup = path.as_os_str().to_os_string();
        backup.push(".backup");
        let backup = PathBuf::from(backup);

        std::fs::copy(path, &backup).map_err(|source| CleanupError::StoreBackup {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(FileTransaction {
            original: path.to_path_buf(),
            backup,
            committed: false,
        })
    }

    /// Mutation succeeded: discard the backup
    pub fn commit(mut self) {
        self.committed = true;
        if let Err(e) = std::fs::remove_file(&self.backup) {
            tracing::warn!(
                "could not remove backup '{}': {}",
                self.backup.display(),
                e
            );
        }
    }
}

impl Drop for FileTransaction {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        tracing::warn!(
            "restoring '{}' from backup after failed mutation",
            self.original.display()
        );
        if let Err(e) = std::fs::rename(&self.backup, &self.original) {
            tracing::error!(
                "failed to restore '{}' from '{}': {}",
                self.original.display(),
                self.backup.display(),
                e
            );
        }
    }
}

/// Delete all rows of `category` from the store at `path`.
///
/// Protocol, strictly ordered: back the file up, run the category's
/// DELETE statements in one transaction, commit, then drop the backup.
/// Any failure after the backup restores the original file before the
/// error is propagated. A store locked by a running browser is not
/// retried; the lock error is surfaced for the caller to decide.
pub fn clear_store(path: &Path, category: StoreCategory) -> Result<(), CleanupError> {
    let txn = FileTransaction::begin(path)?;

    match delete_rows(path, category) {
        Ok(()) => {
            txn.commit();
            Ok(())
        }
        // txn drops here, restoring the original file
        Err(source) => Err(CleanupError::StoreMutation {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn delete_rows(path: &Path, category: StoreCategory) -> Result<(), rusqlite::Error> {
    let mut conn = Connection::open(path)?;
    let tx = conn.transaction()?;
    for table in category.tables() {
        tx.execute(&format!("DELETE FROM {}", table), [])?;
    }
    tx.commit()?;
    Ok(())
}
