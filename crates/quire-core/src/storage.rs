use crate::error::PersistenceError;

/// Storage key holding the persisted bearer token.
pub const TOKEN_KEY: &str = "token";

/// Durable client-side key-value storage.
///
/// This is the seam where a browser's local storage would sit; values are
/// opaque bytes and the caller owns their encoding.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Returns Ok(None) if the key was never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Write a value, replacing any previous value for the key.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError>;

    /// Remove a value.
    /// Returns Ok(true) if a value was removed, Ok(false) if there was none.
    fn remove(&self, key: &str) -> Result<bool, PersistenceError>;
}

// In-memory implementations for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::RwLock;

    /// In-memory key-value store for testing.
    #[derive(Default)]
    pub struct InMemoryKeyValueStore {
        values: RwLock<HashMap<String, Vec<u8>>>,
    }

    impl InMemoryKeyValueStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Write raw bytes, bypassing any encoding. Used to plant corrupt data.
        pub fn put_raw(&self, key: &str, value: &[u8]) {
            self.values
                .write()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
        }

        pub fn contains(&self, key: &str) -> bool {
            self.values.read().unwrap().contains_key(key)
        }

        pub fn len(&self) -> usize {
            self.values.read().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
            Ok(self.values.read().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
            self.values
                .write()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<bool, PersistenceError> {
            Ok(self.values.write().unwrap().remove(key).is_some())
        }
    }

    /// Store whose writes fail, standing in for a full or disabled storage.
    /// Reads succeed against whatever was written before `fail_writes` was set.
    #[derive(Default)]
    pub struct FailingKeyValueStore {
        inner: InMemoryKeyValueStore,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
    }

    impl FailingKeyValueStore {
        pub fn new() -> Self {
            let store = Self::default();
            store.fail_writes.store(true, Ordering::SeqCst);
            store
        }

        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }
    }

    impl KeyValueStore for FailingKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(PersistenceError::Read {
                    key: key.to_string(),
                    reason: "storage disabled".to_string(),
                });
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PersistenceError::Write {
                    key: key.to_string(),
                    reason: "quota exceeded".to_string(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<bool, PersistenceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PersistenceError::Write {
                    key: key.to_string(),
                    reason: "storage disabled".to_string(),
                });
            }
            self.inner.remove(key)
        }
    }

}
