//! Inventory store adapter (Firebase Realtime Database REST)
//!
//! Thin key/value operations under the top-level `inventory` node. The
//! backend guarantees atomicity per single-key write only; there are no
//! transactions and no optimistic concurrency.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::ReleaseRecord;

const USER_AGENT: &str = concat!("vinylscan/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Inventory store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Store API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Key/value operations against the remote inventory store.
///
/// One key per barcode. Deleting an absent key is a silent no-op.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn get(&self, barcode: &str) -> Result<Option<ReleaseRecord>, StoreError>;
    async fn set(&self, barcode: &str, record: &ReleaseRecord) -> Result<(), StoreError>;
    async fn delete(&self, barcode: &str) -> Result<(), StoreError>;
    async fn list_all(&self) -> Result<BTreeMap<String, ReleaseRecord>, StoreError>;
}

/// Firebase Realtime Database REST adapter
pub struct FirebaseStore {
    http_client: reqwest::Client,
    database_url: String,
    auth_token: Option<String>,
}

impl FirebaseStore {
    pub fn new(database_url: String, auth_token: Option<String>) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            database_url: database_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    /// RTDB node URL: `{db_url}/{path}.json`, with `?auth=` appended
    /// when a database secret is configured.
    fn node_url(&self, path: &str) -> String {
        match &self.auth_token {
            Some(token) => format!("{}/{}.json?auth={}", self.database_url, path, token),
            None => format!("{}/{}.json", self.database_url, path),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(status.as_u16(), error_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl InventoryStore for FirebaseStore {
    async fn get(&self, barcode: &str) -> Result<Option<ReleaseRecord>, StoreError> {
        let url = self.node_url(&format!("inventory/{}", barcode));

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let body = Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        // RTDB answers the literal `null` for an absent key
        serde_json::from_str::<Option<ReleaseRecord>>(&body)
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn set(&self, barcode: &str, record: &ReleaseRecord) -> Result<(), StoreError> {
        let url = self.node_url(&format!("inventory/{}", barcode));

        let response = self
            .http_client
            .put(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        tracing::debug!(barcode, "Store write ok");
        Ok(())
    }

    async fn delete(&self, barcode: &str) -> Result<(), StoreError> {
        let url = self.node_url(&format!("inventory/{}", barcode));

        // RTDB returns success for absent keys too, which gives delete
        // its idempotent no-op behavior for free
        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        tracing::debug!(barcode, "Store delete ok");
        Ok(())
    }

    async fn list_all(&self) -> Result<BTreeMap<String, ReleaseRecord>, StoreError> {
        let url = self.node_url("inventory");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let body = Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        // `null` when the inventory node does not exist yet
        let records = serde_json::from_str::<Option<BTreeMap<String, ReleaseRecord>>>(&body)
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        Ok(records.unwrap_or_default())
    }
}
