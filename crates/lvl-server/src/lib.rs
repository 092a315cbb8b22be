//! HTTP server for levelhub.
//!
//! Thin plain-text transport over [`lvl_catalog::Catalog`]: list levels,
//! download a level, upload a level. Response bodies follow the fixed
//! strings in [`wire`].

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod wire;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::LevelServer;
