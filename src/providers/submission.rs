use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::core::errors::{AppError, AppResult};

/// Everything one submission sends. Built by the upload controller from its
/// state at submit time so the controller lock is not held across the request.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub submission_id: Uuid,
    pub steps_json: String,
    pub scribe: Option<ScribeAttachment>,
    pub metadata_json: String,
}

#[derive(Debug, Clone)]
pub struct ScribeAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub status: u16,
}

#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SubmissionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Network(err.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn submit(&self, payload: &SubmissionPayload) -> AppResult<SubmissionReceipt> {
        let mut form = Form::new().text("steps", payload.steps_json.clone());
        if let Some(scribe) = &payload.scribe {
            let part = Part::bytes(scribe.bytes.clone())
                .file_name(scribe.file_name.clone())
                .mime_str("application/pdf")
                .map_err(|err| AppError::Internal(err.to_string()))?;
            form = form.part("scribe", part);
        }
        form = form.text("metadata", payload.metadata_json.clone());

        info!(
            submission_id = %payload.submission_id,
            endpoint = %self.endpoint,
            has_scribe = payload.scribe.is_some(),
            "sending submission"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    AppError::Network(format!("submission timed out: {err}"))
                } else {
                    AppError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                submission_id = %payload.submission_id,
                status = status.as_u16(),
                body = %body,
                "submission rejected"
            );
            return Err(AppError::SubmissionRejected {
                status: status.as_u16(),
            });
        }

        Ok(SubmissionReceipt {
            submission_id: payload.submission_id,
            status: status.as_u16(),
        })
    }
}
