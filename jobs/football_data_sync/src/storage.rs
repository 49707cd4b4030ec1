use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{debug, error};

use crate::{config::HttpConfig, error::SyncError};

const REST_PATH: &str = "/rest/v1";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates";

pub const TEAMS_TABLE: &str = "teams";
pub const TEAMS_CONFLICT: &str = "id";

/// Write side of the relational store: one bulk insert-or-merge per call.
#[async_trait]
pub trait StorageWriter: Send + Sync {
    /// `rows` is a JSON array of row objects; `on_conflict` is the
    /// comma-separated conflict key.
    async fn upsert(&self, table: &str, on_conflict: &str, rows: &Value) -> Result<(), SyncError>;
}

#[async_trait]
impl<T: StorageWriter + ?Sized> StorageWriter for Arc<T> {
    async fn upsert(&self, table: &str, on_conflict: &str, rows: &Value) -> Result<(), SyncError> {
        (**self).upsert(table, on_conflict, rows).await
    }
}

pub struct RestStorage {
    client: Client,
    base_url: String,
    key: String,
}

impl RestStorage {
    pub fn new(base_url: &str, key: &str, http: &HttpConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .user_agent(&http.user_agent)
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl StorageWriter for RestStorage {
    async fn upsert(&self, table: &str, on_conflict: &str, rows: &Value) -> Result<(), SyncError> {
        let url = format!("{}{}/{}", self.base_url, REST_PATH, table);
        debug!("POST {} on_conflict={}", url, on_conflict);

        let response = self
            .client
            .post(&url)
            .query(&[("on_conflict", on_conflict)])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", MERGE_DUPLICATES)
            .json(rows)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            // An unreadable body still reports as a storage failure.
            let body = response.text().await.unwrap_or_default();
            error!("Upsert into {} failed with {}: {}", table, status, body);
            return Err(SyncError::StorageWrite {
                table: table.to_string(),
                body,
            });
        }

        Ok(())
    }
}
