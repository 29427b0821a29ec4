//! Durable [`KvStore`] backed by a single redb table.

use crate::error::{Result, WamError};
use crate::store::KvStore;
use redb::{Database, ReadableTable, TableDefinition};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const RECORDS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

/// redb-backed store. Each batch call runs in one redb transaction.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Opens the database at `path`, creating it (and the records table) if needed.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the file can't be opened, e.g. because another
    /// process holds it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path)
            .map_err(|e| WamError::Storage(format!("failed to open {}: {}", path.display(), e)))?;

        // Create the table up front so read transactions never see it missing.
        let write_txn = db.begin_write().map_err(WamError::storage)?;
        write_txn
            .open_table(RECORDS_TABLE)
            .map_err(WamError::storage)?;
        write_txn.commit().map_err(WamError::storage)?;

        Ok(Self { db, path })
    }

    /// Returns the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for RedbStore {
    fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Vec<u8>>> {
        let read_txn = self.db.begin_read().map_err(WamError::storage)?;
        let table = read_txn
            .open_table(RECORDS_TABLE)
            .map_err(WamError::storage)?;

        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = table.get(key.as_str()).map_err(WamError::storage)? {
                found.insert(key.clone(), value.value().to_vec());
            }
        }
        Ok(found)
    }

    fn set_many(&self, entries: Vec<(String, Vec<u8>)>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let write_txn = self.db.begin_write().map_err(WamError::storage)?;
        {
            let mut table = write_txn
                .open_table(RECORDS_TABLE)
                .map_err(WamError::storage)?;
            for (key, value) in &entries {
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(WamError::storage)?;
            }
        }
        write_txn.commit().map_err(WamError::storage)
    }

    fn delete_many(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let write_txn = self.db.begin_write().map_err(WamError::storage)?;
        {
            let mut table = write_txn
                .open_table(RECORDS_TABLE)
                .map_err(WamError::storage)?;
            for key in keys {
                table.remove(key.as_str()).map_err(WamError::storage)?;
            }
        }
        write_txn.commit().map_err(WamError::storage)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let read_txn = self.db.begin_read().map_err(WamError::storage)?;
        let table = read_txn
            .open_table(RECORDS_TABLE)
            .map_err(WamError::storage)?;

        let mut keys = Vec::new();
        for entry in table.iter().map_err(WamError::storage)? {
            let (key, _) = entry.map_err(WamError::storage)?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}
