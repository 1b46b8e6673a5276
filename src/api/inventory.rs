//! Inventory listing page
//!
//! Enumerates every record in the store and renders a Bootstrap table.

use axum::{extract::State, response::Html};
use std::collections::BTreeMap;

use crate::error::ApiResult;
use crate::models::ReleaseRecord;
use crate::AppState;

/// GET /inventory
pub async fn inventory_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let inventory = state.store.list_all().await?;
    Ok(Html(render_inventory(&inventory)))
}

/// The store holds at most one record per barcode, so the units column
/// is always 1.
fn render_inventory(inventory: &BTreeMap<String, ReleaseRecord>) -> String {
    let rows: String = inventory
        .iter()
        .map(|(barcode, record)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>${}</td><td>{}</td></tr>",
                escape_html(barcode),
                escape_html(&record.title),
                escape_html(&record.artist),
                escape_html(&record.year),
                record.price,
                1,
            )
        })
        .collect();

    format!(
        r#"<!doctype html>
<html>
<head>
  <title>Inventory</title>
  <link href='https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css' rel='stylesheet'>
</head>
<body class="bg-light">
  <div class="container py-5">
    <h2 class="mb-4">&#128230; Current Vinyl Inventory</h2>
    <a href="/" class="btn btn-secondary mb-3">Back to Scanner</a>
    <div class="table-responsive">
      <table class="table table-bordered table-striped">
        <thead class="table-dark">
          <tr><th>Barcode</th><th>Title</th><th>Artist</th><th>Year</th><th>Price</th><th>Units</th></tr>
        </thead>
        <tbody>
          {rows}
        </tbody>
      </table>
    </div>
  </div>
</body>
</html>"#
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
