use crate::{
    annotations::dialog::DialogEdit,
    core::{
        errors::AppResult,
        types::{
            DialogStateResponse, GetMetadataResponse, GetTreeResponse, SaveAnnotationResponse,
            ToggleNodeResponse,
        },
    },
    tree::path::NodePath,
    upload::ClickOutcome,
    AppState,
};

pub async fn get_tree(state: &AppState) -> AppResult<GetTreeResponse> {
    let upload = state.upload.lock().await;
    let rows = upload.tree_rows()?;
    Ok(GetTreeResponse {
        rows,
        annotated_count: upload.metadata().len(),
    })
}

pub async fn toggle_node(state: &AppState, path: String) -> AppResult<ToggleNodeResponse> {
    let mut upload = state.upload.lock().await;
    let expanded = upload.toggle(&NodePath::from(path.as_str()))?;
    Ok(ToggleNodeResponse { path, expanded })
}

pub async fn click_node(state: &AppState, path: String) -> AppResult<ClickOutcome> {
    let mut upload = state.upload.lock().await;
    upload.click(&NodePath::from(path))
}

pub async fn dialog_state(state: &AppState) -> AppResult<DialogStateResponse> {
    let upload = state.upload.lock().await;
    Ok(DialogStateResponse {
        dialog: upload.dialog().map(|dialog| dialog.view()),
    })
}

pub async fn edit_dialog(state: &AppState, edit: DialogEdit) -> AppResult<DialogStateResponse> {
    let mut upload = state.upload.lock().await;
    let view = upload.edit_dialog(edit)?;
    Ok(DialogStateResponse { dialog: Some(view) })
}

pub async fn save_annotation(state: &AppState) -> AppResult<SaveAnnotationResponse> {
    let mut upload = state.upload.lock().await;
    let (path, annotation) = upload.save_dialog()?;
    Ok(SaveAnnotationResponse {
        path: path.to_string(),
        annotation,
    })
}

pub async fn close_dialog(state: &AppState) -> AppResult<DialogStateResponse> {
    let mut upload = state.upload.lock().await;
    upload.close_dialog();
    Ok(DialogStateResponse { dialog: None })
}

pub async fn get_metadata(state: &AppState) -> AppResult<GetMetadataResponse> {
    let upload = state.upload.lock().await;
    Ok(GetMetadataResponse {
        metadata: upload.metadata().clone(),
    })
}
