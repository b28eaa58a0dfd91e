use std::sync::Arc;

use redb::Database;

use quire_core::{KeyValueStore, PersistenceError};

use crate::tables::KV_TABLE;

/// redb implementation of KeyValueStore.
pub struct RedbKeyValueStore {
    db: Arc<Database>,
}

impl RedbKeyValueStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Initialize the database tables.
    pub fn init_tables(db: &Database) -> Result<(), PersistenceError> {
        let write_txn = db
            .begin_write()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        {
            let _ = write_txn
                .open_table(KV_TABLE)
                .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStore for RedbKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let read_err = |e: &dyn std::fmt::Display| PersistenceError::Read {
            key: key.to_string(),
            reason: e.to_string(),
        };

        let read_txn = self.db.begin_read().map_err(|e| read_err(&e))?;
        let table = read_txn.open_table(KV_TABLE).map_err(|e| read_err(&e))?;

        let value = table
            .get(key)
            .map_err(|e| read_err(&e))?
            .map(|v| v.value().to_vec());

        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
        let write_err = |e: &dyn std::fmt::Display| PersistenceError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        };

        let write_txn = self.db.begin_write().map_err(|e| write_err(&e))?;
        {
            let mut table = write_txn.open_table(KV_TABLE).map_err(|e| write_err(&e))?;
            table.insert(key, value).map_err(|e| write_err(&e))?;
        }
        write_txn.commit().map_err(|e| write_err(&e))?;

        tracing::trace!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, PersistenceError> {
        let write_err = |e: &dyn std::fmt::Display| PersistenceError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        };

        let write_txn = self.db.begin_write().map_err(|e| write_err(&e))?;
        let removed = {
            let mut table = write_txn.open_table(KV_TABLE).map_err(|e| write_err(&e))?;
            let removed = table.remove(key).map_err(|e| write_err(&e))?.is_some();
            removed
        };
        write_txn.commit().map_err(|e| write_err(&e))?;

        Ok(removed)
    }
}
