//! Core data types for the inventory service

use serde::{Deserialize, Deserializer, Serialize};

/// A release held in inventory, keyed by barcode in the store.
///
/// One record represents exactly one owned physical copy currently for
/// sale. Selling deletes the record outright; no sold history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub title: String,
    pub artist: String,
    /// Release year as reported by the catalog, `"Unknown"` when absent.
    #[serde(default = "unknown_year", deserialize_with = "string_or_number")]
    pub year: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// One mirrored ledger row: `[barcode, title, artist, year, price]`.
///
/// The ledger sheet is header-less and ordered; rows are appended on
/// save and removed (first match only) on delete.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub barcode: String,
    pub title: String,
    pub artist: String,
    pub year: String,
    pub price: f64,
}

impl LedgerRow {
    /// Cell values in sheet column order.
    pub fn cells(&self) -> Vec<serde_json::Value> {
        vec![
            serde_json::Value::from(self.barcode.as_str()),
            serde_json::Value::from(self.title.as_str()),
            serde_json::Value::from(self.artist.as_str()),
            serde_json::Value::from(self.year.as_str()),
            serde_json::Value::from(self.price),
        ]
    }
}

pub(crate) fn unknown_year() -> String {
    "Unknown".to_string()
}

/// Accept a year given as either a JSON string or a number.
///
/// The catalog reports year inconsistently across releases, and the
/// scanner UI echoes whatever it was given back on save.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.is_empty() => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => unknown_year(),
    })
}
