//! HTTP API handlers for vinylscan

pub mod handlers;
pub mod health;
pub mod inventory;
pub mod ui;

pub use handlers::{delete, lookup, save};
pub use health::health_routes;
pub use inventory::inventory_page;
pub use ui::serve_index;
