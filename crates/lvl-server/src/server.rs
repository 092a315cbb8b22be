use std::sync::Arc;

use lvl_catalog::Catalog;
use lvl_ledger::MetadataLedger;
use lvl_store::FileLevelStore;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// levelhub HTTP server.
pub struct LevelServer {
    config: ServerConfig,
    catalog: Catalog,
}

impl LevelServer {
    /// Open the level directory and ledger named by `config`.
    ///
    /// Both are created if absent.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = FileLevelStore::open(config.levels_path())?;
        let ledger = MetadataLedger::open(config.ledger_path())?;
        let catalog = Catalog::new(Arc::new(store), Arc::new(ledger));
        Ok(Self { config, catalog })
    }

    /// Serve an existing catalog instead of opening one from `config`.
    pub fn with_catalog(config: ServerConfig, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn router(&self) -> axum::Router {
        build_router(self.catalog.clone(), &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            levels = %self.config.levels_path().display(),
            ledger = %self.config.ledger_path().display(),
            "levelhub server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
