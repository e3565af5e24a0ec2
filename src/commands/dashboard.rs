use crate::{
    core::{
        errors::AppResult,
        types::{DrainNoticesResponse, ListRecordsResponse},
    },
    dashboard::{DashboardStatus, DashboardView},
    AppState,
};

pub async fn list_records(state: &AppState, refresh: bool) -> AppResult<ListRecordsResponse> {
    let records = state.records.records(refresh).await?;
    let selection = state.dashboard.lock().await;
    Ok(ListRecordsResponse {
        dashboard: DashboardView::build(DashboardStatus::Ready, &records, selection.selected()),
    })
}

/// Snapshot of the dashboard without triggering a fetch.
pub async fn dashboard_state(state: &AppState) -> AppResult<ListRecordsResponse> {
    let status = state.records.status().await;
    let records = state.records.cached().await.unwrap_or_default();
    let selection = state.dashboard.lock().await;
    Ok(ListRecordsResponse {
        dashboard: DashboardView::build(status, &records, selection.selected()),
    })
}

pub async fn select_record(state: &AppState, id: String) -> AppResult<ListRecordsResponse> {
    let records = state.records.records(false).await?;
    let mut selection = state.dashboard.lock().await;
    selection.select(&records, &id)?;
    Ok(ListRecordsResponse {
        dashboard: DashboardView::build(DashboardStatus::Ready, &records, selection.selected()),
    })
}

pub async fn drain_notices(state: &AppState) -> AppResult<DrainNoticesResponse> {
    Ok(DrainNoticesResponse {
        notices: state.notices.drain(),
    })
}
