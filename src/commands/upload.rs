use std::path::PathBuf;

use tracing::{error, info};

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{SelectFileResponse, SubmitResponse, UploadStateResponse},
    },
    notices::{Notice, NoticeLevel},
    upload::files::{FileSlot, IncomingFile},
    AppState,
};

fn surface(state: &AppState, title: &str, err: AppError) -> AppError {
    state
        .notices
        .push(Notice::new(NoticeLevel::Error, title, err.to_string()));
    err
}

/// Handles both the file picker and drop targets; both hand over a local path.
pub async fn select_file(
    state: &AppState,
    slot: FileSlot,
    file_path: String,
    mime_type: Option<String>,
    display_name: Option<String>,
) -> AppResult<SelectFileResponse> {
    let path = PathBuf::from(&file_path);
    let bytes = tokio::fs::read(&path).await.map_err(|err| {
        let err = if err.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(format!("file {file_path}"))
        } else {
            AppError::Io(err.to_string())
        };
        surface(state, "File not readable", err)
    })?;
    let name = display_name.unwrap_or_else(|| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.clone())
    });

    let mut upload = state.upload.lock().await;
    let file = upload
        .accept_file(slot, IncomingFile::new(name, mime_type, bytes))
        .map_err(|err| surface(state, "File not accepted", err))?;
    Ok(SelectFileResponse {
        file,
        upload: upload.view(),
    })
}

pub async fn upload_state(state: &AppState) -> AppResult<UploadStateResponse> {
    let upload = state.upload.lock().await;
    Ok(UploadStateResponse {
        upload: upload.view(),
    })
}

pub async fn advance(state: &AppState) -> AppResult<UploadStateResponse> {
    let mut upload = state.upload.lock().await;
    upload.advance()?;
    Ok(UploadStateResponse {
        upload: upload.view(),
    })
}

pub async fn reset(state: &AppState) -> AppResult<UploadStateResponse> {
    let mut upload = state.upload.lock().await;
    upload.reset();
    Ok(UploadStateResponse {
        upload: upload.view(),
    })
}

/// Sends the document, optional PDF and annotations. The controller lock is
/// released while the request is on the wire.
pub async fn submit(state: &AppState) -> AppResult<SubmitResponse> {
    let payload = {
        let mut upload = state.upload.lock().await;
        upload
            .begin_submit()
            .map_err(|err| surface(state, "Cannot submit", err))?
    };
    info!(submission_id = %payload.submission_id, "submission started");

    let result = state.submission.submit(&payload).await;

    let mut upload = state.upload.lock().await;
    upload.finish_submit(payload.submission_id, result.is_ok());
    match result {
        Ok(receipt) => {
            info!(
                submission_id = %receipt.submission_id,
                status = receipt.status,
                "submission accepted"
            );
            state.notices.push(Notice::new(
                NoticeLevel::Success,
                "Submitted",
                "Submission successful!",
            ));
            Ok(SubmitResponse {
                submission_id: receipt.submission_id,
                status: receipt.status,
                upload: upload.view(),
            })
        }
        Err(err) => {
            error!(submission_id = %payload.submission_id, error = %err, "submission failed");
            state.notices.push(Notice::new(
                NoticeLevel::Error,
                "Submission failed",
                "Failed to submit. Please try again.",
            ));
            Err(err)
        }
    }
}
