//! Level catalog for levelhub.
//!
//! Joins the level store with the metadata ledger and exposes the three
//! operations the service offers: list every level with its metadata, fetch
//! a level (counting the view), and upload a new level.

pub mod catalog;
pub mod error;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{CatalogError, CatalogResult};
