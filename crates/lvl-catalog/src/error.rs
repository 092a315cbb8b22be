use lvl_ledger::LedgerError;
use lvl_store::StoreError;
use lvl_types::{IdError, LevelId};
use thiserror::Error;

/// Errors from catalog operations.
///
/// The first four variants are expected request outcomes; `Store` and
/// `Ledger` are faults of the local filesystem.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid level id: {0}")]
    InvalidId(#[from] IdError),

    #[error("level not found: {0}")]
    NotFound(LevelId),

    #[error("level already exists: {0}")]
    AlreadyExists(LevelId),

    #[error("upload carried no level data")]
    MissingContent,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl CatalogError {
    /// `true` for request outcomes, `false` for storage faults.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::Ledger(_))
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
