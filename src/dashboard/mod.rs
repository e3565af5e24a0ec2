//! Records dashboard: an explicitly owned records cache plus local selection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::{
    core::errors::{AppError, AppResult},
    notices::{Notice, NoticeLevel, NoticeQueue},
    providers::records::{Record, RecordsClient},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardStatus {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
struct CacheSlot {
    status: DashboardStatus,
    records: Option<Vec<Record>>,
    last_error: Option<String>,
}

/// Created once at startup and handed to whoever needs records.
#[derive(Debug)]
pub struct RecordsCache {
    client: RecordsClient,
    notices: Arc<NoticeQueue>,
    slot: RwLock<CacheSlot>,
}

impl RecordsCache {
    pub fn new(client: RecordsClient, notices: Arc<NoticeQueue>) -> Self {
        Self {
            client,
            notices,
            slot: RwLock::new(CacheSlot {
                status: DashboardStatus::Loading,
                records: None,
                last_error: None,
            }),
        }
    }

    /// Returns cached records unless `refresh` is set or nothing is cached yet.
    /// A failed fetch raises an error notice here, in the data layer, and only
    /// marks the dashboard failed when there is no earlier list to show.
    pub async fn records(&self, refresh: bool) -> AppResult<Vec<Record>> {
        if !refresh {
            if let Some(records) = self.slot.read().await.records.clone() {
                return Ok(records);
            }
        }

        {
            let mut slot = self.slot.write().await;
            if slot.records.is_none() {
                slot.status = DashboardStatus::Loading;
            }
        }
        match self.client.fetch().await {
            Ok(records) => {
                info!(count = records.len(), "records loaded");
                let mut slot = self.slot.write().await;
                slot.status = DashboardStatus::Ready;
                slot.records = Some(records.clone());
                slot.last_error = None;
                Ok(records)
            }
            Err(err) => {
                error!(error = %err, "failed to fetch records");
                self.notices.push(Notice::new(
                    NoticeLevel::Error,
                    "Error",
                    "Failed to fetch records",
                ));
                let mut slot = self.slot.write().await;
                slot.status = if slot.records.is_some() {
                    DashboardStatus::Ready
                } else {
                    DashboardStatus::Failed
                };
                slot.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn status(&self) -> DashboardStatus {
        self.slot.read().await.status
    }

    pub async fn cached(&self) -> Option<Vec<Record>> {
        self.slot.read().await.records.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.slot.read().await.last_error.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created: String,
    pub updated: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub status: DashboardStatus,
    pub placeholder: Option<String>,
    pub records: Vec<RecordCard>,
}

impl DashboardView {
    pub fn build(status: DashboardStatus, records: &[Record], selected: Option<&str>) -> Self {
        let placeholder = match status {
            DashboardStatus::Loading => Some("Loading...".to_string()),
            DashboardStatus::Failed => Some("Error loading records".to_string()),
            DashboardStatus::Ready => None,
        };
        let records = if status == DashboardStatus::Ready {
            records
                .iter()
                .map(|record| RecordCard {
                    id: record.id.clone(),
                    title: record.title.clone(),
                    description: record.description.clone(),
                    created: display_date(record.created_on(), &record.created_at),
                    updated: display_date(record.updated_on(), &record.updated_at),
                    selected: selected == Some(record.id.as_str()),
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            status,
            placeholder,
            records,
        }
    }
}

fn display_date(parsed: Option<chrono::NaiveDate>, raw: &str) -> String {
    parsed
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Which record is highlighted. Purely visual; nothing else reacts to it.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    selected: Option<String>,
}

impl DashboardState {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, records: &[Record], id: &str) -> AppResult<()> {
        if !records.iter().any(|record| record.id == id) {
            return Err(AppError::NotFound(format!("record {id}")));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }
}
