//! Quire Storage - redb implementation of the durable key-value store.

pub mod kv_store;
pub mod tables;

pub use kv_store::RedbKeyValueStore;

use std::path::Path;
use std::sync::Arc;

use redb::Database;

use quire_core::PersistenceError;

/// Open (or create) a database file with all required tables.
pub fn init_database(path: impl AsRef<Path>) -> Result<Arc<Database>, PersistenceError> {
    let db =
        Database::create(path.as_ref()).map_err(|e| PersistenceError::Unavailable(e.to_string()))?;

    RedbKeyValueStore::init_tables(&db)?;

    Ok(Arc::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::KeyValueStore;
    use tempfile::tempdir;

    #[test]
    fn test_init_database() {
        let dir = tempdir().unwrap();
        let db = init_database(dir.path().join("test.redb")).unwrap();

        let store = RedbKeyValueStore::new(db);
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.redb");

        {
            let store = RedbKeyValueStore::new(init_database(&path).unwrap());
            store.set("token", b"abc").unwrap();
        }

        let store = RedbKeyValueStore::new(init_database(&path).unwrap());
        assert_eq!(store.get("token").unwrap(), Some(b"abc".to_vec()));
    }

    #[test]
    fn test_init_database_bad_path() {
        let dir = tempdir().unwrap();
        let result = init_database(dir.path().join("missing-dir").join("test.redb"));
        assert!(matches!(result, Err(PersistenceError::Unavailable(_))));
    }
}
