//! Foundation types for levelhub.
//!
//! Every level published to the service is keyed by a [`LevelId`], a
//! composite `name-author` string. The same string is used as the storage
//! key, the on-disk filename and the ledger key, so it is validated once at
//! the edge and carried as a typed value from then on.
//!
//! # Key Types
//!
//! - [`LevelId`] — validated `name-author` identifier
//! - [`IdError`] — the rule an identifier violated

pub mod error;
pub mod id;

pub use error::IdError;
pub use id::{LevelId, MAX_AUTHOR_LEN, MAX_NAME_LEN};
