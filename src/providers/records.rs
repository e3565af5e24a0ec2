use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Record {
    pub fn created_on(&self) -> Option<NaiveDate> {
        parse_record_date(&self.created_at)
    }

    pub fn updated_on(&self) -> Option<NaiveDate> {
        parse_record_date(&self.updated_at)
    }
}

/// Accepts plain `YYYY-MM-DD` dates as well as full RFC 3339 timestamps.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.date_naive()))
}

#[derive(Debug, Clone)]
enum RecordsSource {
    Remote { http: reqwest::Client, url: String },
    Builtin,
}

#[derive(Debug, Clone)]
pub struct RecordsClient {
    source: RecordsSource,
}

impl RecordsClient {
    pub fn remote(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Network(err.to_string()))?;
        Ok(Self {
            source: RecordsSource::Remote {
                http,
                url: url.into(),
            },
        })
    }

    /// Serves the fixed sample set instead of calling out.
    pub fn builtin() -> Self {
        Self {
            source: RecordsSource::Builtin,
        }
    }

    pub async fn fetch(&self) -> AppResult<Vec<Record>> {
        match &self.source {
            RecordsSource::Builtin => Ok(builtin_records()),
            RecordsSource::Remote { http, url } => {
                debug!(%url, "fetching records");
                let response = http
                    .get(url)
                    .send()
                    .await
                    .map_err(|err| AppError::RecordsUnavailable(err.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AppError::RecordsUnavailable(format!("status {status}")));
                }
                response
                    .json::<Vec<Record>>()
                    .await
                    .map_err(|err| AppError::RecordsUnavailable(format!("invalid body: {err}")))
            }
        }
    }
}

fn builtin_records() -> Vec<Record> {
    (1..=3)
        .map(|n| Record {
            id: n.to_string(),
            title: format!("Record {n}"),
            description: format!("Description {n}"),
            created_at: "2021-01-01".to_string(),
            updated_at: "2021-01-01".to_string(),
        })
        .collect()
}
