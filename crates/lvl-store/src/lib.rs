//! Level file storage for levelhub.
//!
//! Each published level is one immutable file whose name is its
//! [`LevelId`](lvl_types::LevelId). The store never interprets the content.
//!
//! # Storage Backends
//!
//! All backends implement the [`LevelStore`] trait:
//!
//! - [`FileLevelStore`] -- one file per level in a storage directory
//! - [`InMemoryLevelStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Levels are immutable once written; a second create for the same id fails.
//! 2. Creation is atomic: readers never observe a partially written level.
//! 3. Two racing creates for one id produce exactly one winner.
//! 4. Paths are derived from ids by safe join, never by string concatenation.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileLevelStore;
pub use memory::InMemoryLevelStore;
pub use traits::LevelStore;
