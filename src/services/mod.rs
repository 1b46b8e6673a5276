//! External collaborator adapters
//!
//! Each adapter is a thin client over one remote service, behind a
//! trait so handlers can be exercised against in-memory fakes.

pub mod catalog_client;
pub mod inventory_store;
pub mod ledger_mirror;

pub use catalog_client::{CatalogClient, CatalogError, CatalogRelease, DiscogsClient};
pub use inventory_store::{FirebaseStore, InventoryStore, StoreError};
pub use ledger_mirror::{LedgerError, LedgerMirror, SheetsLedger};
