use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use lvl_types::LevelId;

use crate::error::{StoreError, StoreResult};
use crate::traits::LevelStore;

/// In-memory, HashMap-based level store.
///
/// Intended for tests and embedding. Content is cloned on read and write.
pub struct InMemoryLevelStore {
    levels: RwLock<HashMap<LevelId, Vec<u8>>>,
}

impl InMemoryLevelStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            levels: RwLock::new(HashMap::new()),
        }
    }

    /// Number of levels currently stored.
    pub fn len(&self) -> usize {
        self.levels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryLevelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelStore for InMemoryLevelStore {
    fn exists(&self, id: &LevelId) -> StoreResult<bool> {
        let map = self.levels.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.contains_key(id))
    }

    fn read(&self, id: &LevelId) -> StoreResult<Vec<u8>> {
        let map = self.levels.read().unwrap_or_else(PoisonError::into_inner);
        map.get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn create(&self, id: &LevelId, content: &[u8]) -> StoreResult<()> {
        let mut map = self.levels.write().unwrap_or_else(PoisonError::into_inner);
        match map.entry(id.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(content.to_vec());
                Ok(())
            }
        }
    }

    /// Ids in sorted order.
    fn list(&self) -> StoreResult<Vec<LevelId>> {
        let map = self.levels.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<LevelId> = map.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for InMemoryLevelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLevelStore")
            .field("level_count", &self.len())
            .finish()
    }
}
