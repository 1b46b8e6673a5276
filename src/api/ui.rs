//! Scanner page serving
//!
//! The barcode capture UI is a single static page: camera capture via
//! Quagga in the browser, with a manual-entry fallback.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../ui/index.html");

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
