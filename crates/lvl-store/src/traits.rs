use lvl_types::LevelId;

use crate::error::StoreResult;

/// Storage for level content keyed by [`LevelId`].
///
/// All implementations must satisfy these invariants:
/// - A level is immutable once created; there is no update or delete.
/// - `create` is create-if-absent and atomic per id. Of two concurrent
///   creates for the same id exactly one succeeds and the other gets
///   [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists).
/// - Readers never observe partially written content.
pub trait LevelStore: Send + Sync {
    /// Check whether a level is stored under `id`.
    fn exists(&self, id: &LevelId) -> StoreResult<bool>;

    /// Read the full content of a level.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if the
    /// level does not exist.
    fn read(&self, id: &LevelId) -> StoreResult<Vec<u8>>;

    /// Store `content` under `id` if nothing is stored there yet.
    fn create(&self, id: &LevelId, content: &[u8]) -> StoreResult<()>;

    /// Enumerate every stored level id.
    ///
    /// Order is implementation-defined.
    fn list(&self) -> StoreResult<Vec<LevelId>>;
}
