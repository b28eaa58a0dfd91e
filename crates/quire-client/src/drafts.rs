use std::sync::Arc;

use quire_core::{BlogInput, Draft, DraftEnvelope, DraftKey, KeyValueStore, PersistenceError};

/// Autosaved editor content, one slot per draft key.
pub struct DraftStore<K: KeyValueStore> {
    storage: Arc<K>,
}

impl<K: KeyValueStore> DraftStore<K> {
    pub fn new(storage: Arc<K>) -> Self {
        Self { storage }
    }

    /// Write the editor content under `key`, replacing any earlier draft.
    pub fn save_draft(&self, key: &DraftKey, input: &BlogInput) -> Result<Draft, PersistenceError> {
        let draft = Draft::new(key.clone(), input.clone());
        let bytes = DraftEnvelope::wrap(draft.clone()).encode()?;
        self.storage.set(&key.storage_key(), &bytes)?;

        tracing::debug!(draft = %key, "Saved draft");
        Ok(draft)
    }

    /// Read the draft under `key`.
    ///
    /// A stored value that cannot be read back (corrupt, from an unknown
    /// schema version, or belonging to another key) is removed and reported
    /// as absent.
    pub fn load_draft(&self, key: &DraftKey) -> Result<Option<Draft>, PersistenceError> {
        let storage_key = key.storage_key();
        let Some(bytes) = self.storage.get(&storage_key)? else {
            return Ok(None);
        };

        match DraftEnvelope::decode(&bytes, key) {
            Some(draft) => Ok(Some(draft)),
            None => {
                tracing::warn!(draft = %key, "Discarding unreadable draft");
                self.storage.remove(&storage_key)?;
                Ok(None)
            }
        }
    }

    /// Remove the draft under `key`. Clearing an absent draft is not an error.
    pub fn clear_draft(&self, key: &DraftKey) -> Result<(), PersistenceError> {
        if self.storage.remove(&key.storage_key())? {
            tracing::debug!(draft = %key, "Cleared draft");
        }
        Ok(())
    }
}
