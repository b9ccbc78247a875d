use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::mood::{Emotion, MoodLogEntry, Quadrant};
use crate::profile::Archetype;

/// Wire shape of one check-in as mirrored to the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub id: Uuid,
    pub user_id: String,
    pub date: DateTime<FixedOffset>,
    pub archetype: Archetype,
    pub emotion: Emotion,
    pub quadrant: Quadrant,
    pub intensity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    pub tokens: u64,
    pub self_led_streak: u32,
}

impl CheckInRecord {
    pub fn from_entry(
        user_id: &str,
        entry: &MoodLogEntry,
        archetype: Archetype,
        tokens: u64,
        self_led_streak: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            date: entry.timestamp,
            archetype,
            emotion: entry.emotion,
            quadrant: entry.quadrant,
            intensity: entry.intensity.value(),
            reflection: entry.note.clone(),
            tokens,
            self_led_streak,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReceipt {
    pub id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReceipt {
    pub count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest<'a> {
    check_ins: &'a [CheckInRecord],
}

/// Remote mirror of local check-ins. Failures are the caller's to log;
/// nothing here retries.
#[async_trait]
pub trait RemoteSync: Send + Sync {
    async fn post_check_in(&self, record: &CheckInRecord) -> Result<CheckInReceipt>;
    async fn sync_batch(&self, records: &[CheckInRecord]) -> Result<BatchReceipt>;
}

#[derive(Clone)]
pub struct HttpSyncClient {
    client: Client,
    base_url: String,
}

impl HttpSyncClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeout())
    }
}

#[async_trait]
impl RemoteSync for HttpSyncClient {
    async fn post_check_in(&self, record: &CheckInRecord) -> Result<CheckInReceipt> {
        info!(user_id = %record.user_id, archetype = %record.archetype, "Starting check-in sync");

        let response = self
            .client
            .post(format!("{}/ifs/checkin", self.base_url))
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            error!(
                user_id = %record.user_id,
                status = %response.status(),
                "Check-in sync rejected"
            );
            return Err(anyhow!("Sync Server Error: {}", response.status()));
        }

        let receipt: CheckInReceipt = response.json().await?;
        info!(id = %receipt.id, created_at = %receipt.created_at, "Check-in sync successful");
        Ok(receipt)
    }

    async fn sync_batch(&self, records: &[CheckInRecord]) -> Result<BatchReceipt> {
        info!(item_count = records.len(), "Starting batch sync");

        let response = self
            .client
            .post(format!("{}/ifs/sync", self.base_url))
            .json(&BatchRequest { check_ins: records })
            .send()
            .await?;

        if !response.status().is_success() {
            error!(item_count = records.len(), status = %response.status(), "Batch sync rejected");
            return Err(anyhow!("Sync Server Error: {}", response.status()));
        }

        let receipt: BatchReceipt = response.json().await?;
        info!(synced = receipt.count, total = records.len(), "Batch sync successful");
        Ok(receipt)
    }
}
