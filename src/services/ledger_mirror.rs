//! Ledger mirror adapter (Google Sheets v4 REST)
//!
//! Human-readable backup of inventory transactions. Appends one row per
//! save and removes the first matching row per delete. There is no
//! transactional link to the inventory store; callers treat every
//! ledger operation as best-effort.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::models::LedgerRow;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
const USER_AGENT: &str = concat!("vinylscan/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Ledger mirror errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Sheets API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Append/delete operations against the spreadsheet mirror.
#[async_trait]
pub trait LedgerMirror: Send + Sync {
    async fn append_row(&self, row: &LedgerRow) -> Result<(), LedgerError>;

    /// Delete the first row whose first cell equals `barcode`. Returns
    /// whether a row was removed. Later duplicates are left in place.
    async fn delete_first_match(&self, barcode: &str) -> Result<bool, LedgerError>;
}

/// Sheet values as returned by `GET .../values/{range}`
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Linear scan for the first row whose first cell equals the barcode.
fn first_match_index(rows: &[Vec<serde_json::Value>], barcode: &str) -> Option<usize> {
    rows.iter().position(|row| {
        row.first()
            .and_then(|cell| cell.as_str())
            .map(|cell| cell == barcode)
            .unwrap_or(false)
    })
}

/// Google Sheets API adapter
pub struct SheetsLedger {
    http_client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    sheet_title: String,
    /// Numeric sheet id (gid) required by the row-deletion request.
    sheet_id: i64,
    access_token: String,
}

impl SheetsLedger {
    pub fn new(
        spreadsheet_id: String,
        sheet_title: String,
        sheet_id: i64,
        access_token: String,
    ) -> Result<Self, LedgerError> {
        Self::with_base_url(
            SHEETS_BASE_URL.to_string(),
            spreadsheet_id,
            sheet_title,
            sheet_id,
            access_token,
        )
    }

    pub fn with_base_url(
        base_url: String,
        spreadsheet_id: String,
        sheet_title: String,
        sheet_id: i64,
        access_token: String,
    ) -> Result<Self, LedgerError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| LedgerError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
            sheet_title,
            sheet_id,
            access_token,
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LedgerError> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LedgerError::Api(status.as_u16(), error_text));
        }
        Ok(response)
    }

    async fn fetch_all_rows(&self) -> Result<Vec<Vec<serde_json::Value>>, LedgerError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, self.sheet_title
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| LedgerError::Network(e.to_string()))?;

        let range: ValueRange = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| LedgerError::Parse(e.to_string()))?;

        Ok(range.values)
    }

    async fn delete_row_at(&self, row_index: usize) -> Result<(), LedgerError> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, self.spreadsheet_id
        );

        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": self.sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row_index,
                        "endIndex": row_index + 1,
                    }
                }
            }]
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerMirror for SheetsLedger {
    async fn append_row(&self, row: &LedgerRow) -> Result<(), LedgerError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!A1:append?valueInputOption=USER_ENTERED",
            self.base_url, self.spreadsheet_id, self.sheet_title
        );

        let body = json!({ "values": [row.cells()] });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        tracing::debug!(barcode = %row.barcode, "Ledger row appended");
        Ok(())
    }

    async fn delete_first_match(&self, barcode: &str) -> Result<bool, LedgerError> {
        let rows = self.fetch_all_rows().await?;

        match first_match_index(&rows, barcode) {
            Some(index) => {
                self.delete_row_at(index).await?;
                tracing::debug!(barcode, row = index, "Ledger row removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
