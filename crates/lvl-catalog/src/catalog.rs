use std::sync::Arc;

use lvl_ledger::MetadataLedger;
use lvl_store::{LevelStore, StoreError};
use lvl_types::LevelId;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};

/// One row of the catalog listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: LevelId,
    pub view_count: u64,
    /// Unix epoch seconds.
    pub created_at: i64,
}

/// The level catalog: store contents joined with ledger metadata.
///
/// Cheap to clone; clones share the same store and ledger.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn LevelStore>,
    ledger: Arc<MetadataLedger>,
}

impl Catalog {
    pub fn new(store: Arc<dyn LevelStore>, ledger: Arc<MetadataLedger>) -> Self {
        Self { store, ledger }
    }

    pub fn store(&self) -> &Arc<dyn LevelStore> {
        &self.store
    }

    pub fn ledger(&self) -> &Arc<MetadataLedger> {
        &self.ledger
    }

    /// Every stored level with its metadata, in store enumeration order.
    ///
    /// Levels found on disk without a ledger entry get one here.
    pub fn list(&self) -> CatalogResult<Vec<CatalogEntry>> {
        self.store
            .list()?
            .into_iter()
            .map(|id| {
                let entry = self.ledger.get_or_init(&id)?;
                Ok(CatalogEntry {
                    id,
                    view_count: entry.view_count,
                    created_at: entry.created_at,
                })
            })
            .collect()
    }

    /// Fetch a level's content and count the view.
    pub fn fetch(&self, raw_id: &str) -> CatalogResult<Vec<u8>> {
        let id = LevelId::parse(raw_id)?;
        if !self.store.exists(&id)? {
            return Err(CatalogError::NotFound(id));
        }

        self.ledger.get_or_init(&id)?;
        let content = match self.store.read(&id) {
            Ok(content) => content,
            Err(StoreError::NotFound(id)) => return Err(CatalogError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };
        let entry = self.ledger.record_view(&id)?;

        debug!(level = %id, views = entry.view_count, bytes = content.len(), "level fetched");
        Ok(content)
    }

    /// Publish a new level.
    ///
    /// `content` is `None` when the caller supplied no level data at all; an
    /// empty string is a valid (if dull) level.
    pub fn upload(&self, raw_id: &str, content: Option<&str>) -> CatalogResult<()> {
        let id = LevelId::parse(raw_id)?;
        if self.store.exists(&id)? {
            return Err(CatalogError::AlreadyExists(id));
        }
        let content = content.ok_or(CatalogError::MissingContent)?;

        match self.store.create(&id, content.as_bytes()) {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(id)) => return Err(CatalogError::AlreadyExists(id)),
            Err(e) => return Err(e.into()),
        }
        self.ledger.record_upload(&id)?;

        info!(level = %id, author = id.author(), bytes = content.len(), "level uploaded");
        Ok(())
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}
