mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use stepscribe_lib::{commands, dashboard::DashboardStatus, notices::NoticeLevel};

use common::{spawn_records_server, state_with_records};

fn sample_records() -> Value {
    json!([
        {
            "id": "r1",
            "title": "Intake checklist",
            "description": "First pass",
            "createdAt": "2024-05-06T23:10:00+00:00",
            "updatedAt": "2024-05-07"
        },
        {
            "id": "r2",
            "title": "Release steps",
            "description": "Second pass",
            "createdAt": "2023-01-02",
            "updatedAt": "2023-02-03"
        }
    ])
}

#[tokio::test]
async fn remote_records_are_fetched_and_cached() {
    let server = spawn_records_server(sample_records()).await;
    let state = state_with_records(&server.url);

    let listed = commands::dashboard::list_records(&state, false)
        .await
        .expect("list records");
    let dashboard = listed.dashboard;
    assert_eq!(dashboard.status, DashboardStatus::Ready);
    assert!(dashboard.placeholder.is_none());
    assert_eq!(dashboard.records.len(), 2);
    assert_eq!(dashboard.records[0].id, "r1");
    assert_eq!(dashboard.records[0].title, "Intake checklist");
    assert_eq!(dashboard.records[0].created, "2024-05-06");
    assert_eq!(dashboard.records[1].updated, "2023-02-03");
    assert_eq!(server.hits(), 1);

    commands::dashboard::list_records(&state, false)
        .await
        .expect("cached list");
    assert_eq!(server.hits(), 1);

    commands::dashboard::list_records(&state, true)
        .await
        .expect("refreshed list");
    assert_eq!(server.hits(), 2);

    let notices = commands::dashboard::drain_notices(&state).await.expect("notices");
    assert!(notices.notices.is_empty());
}

#[tokio::test]
async fn error_status_is_reported_as_records_unavailable() {
    let server = spawn_records_server(sample_records()).await;
    server.set_status(StatusCode::SERVICE_UNAVAILABLE);
    let state = state_with_records(&server.url);

    let err = commands::dashboard::list_records(&state, false)
        .await
        .expect_err("503 must fail");
    assert_eq!(err.code(), "RECORDS_UNAVAILABLE");
    assert!(err.retryable());
    assert!(err.to_string().contains("503"));

    let snapshot = commands::dashboard::dashboard_state(&state)
        .await
        .expect("dashboard state");
    assert_eq!(snapshot.dashboard.status, DashboardStatus::Failed);
    assert_eq!(
        snapshot.dashboard.placeholder.as_deref(),
        Some("Error loading records")
    );
    assert!(snapshot.dashboard.records.is_empty());

    let notices = commands::dashboard::drain_notices(&state).await.expect("notices");
    assert_eq!(notices.notices.len(), 1);
    assert_eq!(notices.notices[0].level, NoticeLevel::Error);
    assert_eq!(notices.notices[0].message, "Failed to fetch records");
}

#[tokio::test]
async fn failed_refresh_keeps_serving_the_cached_list() {
    let server = spawn_records_server(sample_records()).await;
    let state = state_with_records(&server.url);

    commands::dashboard::list_records(&state, false)
        .await
        .expect("first load");
    commands::dashboard::select_record(&state, "r2".to_string())
        .await
        .expect("select r2");

    server.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    let err = commands::dashboard::list_records(&state, true)
        .await
        .expect_err("refresh fails");
    assert_eq!(err.code(), "RECORDS_UNAVAILABLE");

    let snapshot = commands::dashboard::dashboard_state(&state)
        .await
        .expect("dashboard state");
    assert_eq!(snapshot.dashboard.status, DashboardStatus::Ready);
    assert!(snapshot.dashboard.placeholder.is_none());
    assert_eq!(snapshot.dashboard.records.len(), 2);
    assert!(snapshot.dashboard.records[1].selected);

    let selected = commands::dashboard::select_record(&state, "r1".to_string())
        .await
        .expect("select from cache");
    assert_eq!(selected.dashboard.status, DashboardStatus::Ready);
    assert!(selected.dashboard.records[0].selected);
    assert_eq!(server.hits(), 2);

    let notices = commands::dashboard::drain_notices(&state).await.expect("notices");
    assert_eq!(notices.notices.len(), 1);
}
