use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    annotations::{
        dialog::DialogView,
        store::{Annotation, MetadataStore},
    },
    dashboard::DashboardView,
    notices::Notice,
    tree::render::TreeRow,
    upload::{files::FileSummary, UploadView},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFileResponse {
    pub file: FileSummary,
    pub upload: UploadView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStateResponse {
    pub upload: UploadView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTreeResponse {
    pub rows: Vec<TreeRow>,
    pub annotated_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleNodeResponse {
    pub path: String,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogStateResponse {
    pub dialog: Option<DialogView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnnotationResponse {
    pub path: String,
    pub annotation: Annotation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMetadataResponse {
    pub metadata: MetadataStore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub submission_id: Uuid,
    pub status: u16,
    pub upload: UploadView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsResponse {
    pub dashboard: DashboardView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainNoticesResponse {
    pub notices: Vec<Notice>,
}
