//! Lookup / save / delete endpoints
//!
//! Each request runs its store, catalog, and ledger calls sequentially.
//! The store is the primary backend: its failures surface to the
//! client. The ledger mirror is best-effort; its failures are logged
//! and the success response is preserved.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::models::{LedgerRow, ReleaseRecord};
use crate::AppState;

/// Request body for /lookup and /delete
#[derive(Debug, Deserialize)]
pub struct BarcodeRequest {
    pub barcode: String,
}

/// Request body for /save
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub barcode: String,
    pub title: String,
    pub artist: String,
    #[serde(
        default = "crate::models::unknown_year",
        deserialize_with = "crate::models::string_or_number"
    )]
    pub year: String,
    /// JSON number or numeric string; coerced to f64 before the store
    /// write.
    pub price: serde_json::Value,
    #[serde(default)]
    pub thumb: Option<String>,
}

/// Successful lookup payload. `price` is only present for store hits.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub exists: bool,
    pub barcode: String,
    pub title: String,
    pub artist: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub thumb: Option<String>,
}

/// Lookup outcome: a release, or the user-visible not-found payload
/// (HTTP 200 either way).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LookupOutcome {
    Found(LookupResponse),
    NotFound { error: String },
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /lookup
///
/// Store hit: respond with the stored record plus a freshly fetched
/// catalog thumbnail (catalog failure tolerated). Store miss: fall
/// through to a catalog search.
pub async fn lookup(
    State(state): State<AppState>,
    Json(req): Json<BarcodeRequest>,
) -> ApiResult<Json<LookupOutcome>> {
    let barcode = validate_barcode(&req.barcode)?;

    if let Some(record) = state.store.get(barcode).await? {
        // The stored thumb is ignored; the response carries whatever
        // the catalog reports right now, or nothing.
        let thumb = match state.catalog.search_release(barcode).await {
            Ok(found) => found.and_then(|release| release.thumb),
            Err(e) => {
                warn!(barcode, error = %e, "Catalog thumbnail refresh failed");
                None
            }
        };

        return Ok(Json(LookupOutcome::Found(LookupResponse {
            exists: true,
            barcode: barcode.to_string(),
            title: record.title,
            artist: record.artist,
            year: record.year,
            price: Some(record.price),
            thumb,
        })));
    }

    match state.catalog.search_release(barcode).await? {
        Some(release) => Ok(Json(LookupOutcome::Found(LookupResponse {
            exists: false,
            barcode: barcode.to_string(),
            title: release.title,
            artist: release.artist,
            year: release.year,
            price: None,
            thumb: release.thumb,
        }))),
        None => Ok(Json(LookupOutcome::NotFound {
            error: "Album not found.".to_string(),
        })),
    }
}

/// POST /save
///
/// Writes the record to the inventory store, then mirrors a ledger row.
/// The store write is already durable when the mirror runs and is never
/// rolled back on a mirror failure.
pub async fn save(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let barcode = validate_barcode(&req.barcode)?;
    let price = parse_price(&req.price)?;

    let record = ReleaseRecord {
        title: req.title,
        artist: req.artist,
        year: req.year,
        price,
        thumb: req.thumb,
    };

    state.store.set(barcode, &record).await?;
    info!(barcode, title = %record.title, price, "Saved release to inventory");

    let row = LedgerRow {
        barcode: barcode.to_string(),
        title: record.title.clone(),
        artist: record.artist.clone(),
        year: record.year.clone(),
        price,
    };
    match state.ledger.append_row(&row).await {
        Ok(()) => info!(barcode, "Ledger mirror appended"),
        Err(e) => warn!(barcode, error = %e, "Ledger mirror append failed, store write kept"),
    }

    Ok(Json(MessageResponse {
        message: "Album saved to cloud inventory!".to_string(),
    }))
}

/// POST /delete
///
/// Marks a release as sold: unconditional store delete (absent barcode
/// is a silent no-op), then best-effort removal of the first matching
/// ledger row.
pub async fn delete(
    State(state): State<AppState>,
    Json(req): Json<BarcodeRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let barcode = validate_barcode(&req.barcode)?;

    state.store.delete(barcode).await?;
    info!(barcode, "Removed release from inventory");

    match state.ledger.delete_first_match(barcode).await {
        Ok(true) => info!(barcode, "Ledger mirror row removed"),
        Ok(false) => info!(barcode, "No matching ledger mirror row"),
        Err(e) => warn!(barcode, error = %e, "Ledger mirror delete failed"),
    }

    Ok(Json(MessageResponse {
        message: "Album marked as sold and removed.".to_string(),
    }))
}

/// Barcodes become store keys, so reject empty input and the characters
/// the store reserves for paths.
fn validate_barcode(barcode: &str) -> Result<&str, ApiError> {
    let trimmed = barcode.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest("Missing barcode".to_string()));
    }
    if trimmed.len() > 64
        || trimmed
            .chars()
            .any(|c| matches!(c, '.' | '$' | '#' | '[' | ']' | '/') || c.is_control())
    {
        return Err(ApiError::BadRequest(format!("Invalid barcode: {}", trimmed)));
    }
    Ok(trimmed)
}

/// Coerce the submitted price to f64. The scanner UI posts it as a
/// string.
fn parse_price(value: &serde_json::Value) -> Result<f64, ApiError> {
    let price = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match price {
        Some(p) if p.is_finite() => Ok(p),
        _ => Err(ApiError::BadRequest(format!("Invalid price: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_barcode_accepts_ean() {
        assert_eq!(validate_barcode("5099902988313").unwrap(), "5099902988313");
    }

    #[test]
    fn test_validate_barcode_trims_whitespace() {
        assert_eq!(validate_barcode(" 5099902988313 ").unwrap(), "5099902988313");
    }

    #[test]
    fn test_validate_barcode_rejects_empty() {
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("   ").is_err());
    }

    #[test]
    fn test_validate_barcode_rejects_path_characters() {
        for bad in ["a/b", "a.b", "a#b", "a$b", "a[b", "a]b"] {
            assert!(validate_barcode(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_parse_price_number() {
        assert_eq!(parse_price(&json!(25.5)).unwrap(), 25.5);
        assert_eq!(parse_price(&json!(25)).unwrap(), 25.0);
    }

    #[test]
    fn test_parse_price_numeric_string() {
        assert_eq!(parse_price(&json!("12.50")).unwrap(), 12.5);
        assert_eq!(parse_price(&json!(" 12.50 ")).unwrap(), 12.5);
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert!(parse_price(&json!("cheap")).is_err());
        assert!(parse_price(&json!(null)).is_err());
        assert!(parse_price(&json!([25.0])).is_err());
        assert!(parse_price(&json!("inf")).is_err());
    }

    #[test]
    fn test_lookup_outcome_serialization() {
        let found = LookupOutcome::Found(LookupResponse {
            exists: false,
            barcode: "111".to_string(),
            title: "Pink Floyd - The Wall".to_string(),
            artist: "Pink Floyd".to_string(),
            year: "1979".to_string(),
            price: None,
            thumb: None,
        });
        let value = serde_json::to_value(&found).unwrap();
        assert_eq!(value["exists"], false);
        assert!(value.get("price").is_none());
        assert_eq!(value["thumb"], serde_json::Value::Null);

        let not_found = LookupOutcome::NotFound {
            error: "Album not found.".to_string(),
        };
        let value = serde_json::to_value(&not_found).unwrap();
        assert_eq!(value["error"], "Album not found.");
    }
}
