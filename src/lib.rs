//! vinylscan library - barcode-driven vinyl inventory service
//!
//! Thin orchestration over three external collaborators: the Discogs
//! catalog, a Firebase Realtime Database inventory store, and a Google
//! Sheets ledger mirror. Handlers are stateless across requests; the
//! store is authoritative and the ledger is a best-effort backup.

use axum::Router;
use std::sync::Arc;

use crate::services::{CatalogClient, InventoryStore, LedgerMirror};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

/// Application state shared across HTTP handlers
///
/// Client handles are constructed once at startup and injected here;
/// handlers hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub catalog: Arc<dyn CatalogClient>,
    pub ledger: Arc<dyn LedgerMirror>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        catalog: Arc<dyn CatalogClient>,
        ledger: Arc<dyn LedgerMirror>,
    ) -> Self {
        Self {
            store,
            catalog,
            ledger,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/inventory", get(api::inventory_page))
        .route("/lookup", post(api::lookup))
        .route("/save", post(api::save))
        .route("/delete", post(api::delete))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
