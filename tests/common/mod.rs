#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU16, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use stepscribe_lib::{core::config::AppConfig, AppState};

#[derive(Debug, Clone)]
pub struct CapturedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl CapturedField {
    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.clone()).expect("field should be UTF-8")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes).expect("field should be JSON")
    }
}

pub type CapturedRequests = Arc<Mutex<Vec<Vec<CapturedField>>>>;

#[derive(Clone)]
struct CaptureState {
    requests: CapturedRequests,
    status: StatusCode,
}

async fn capture(State(state): State<CaptureState>, mut multipart: Multipart) -> StatusCode {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = field
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .unwrap_or_default();
        fields.push(CapturedField {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    state.requests.lock().expect("requests lock").push(fields);
    state.status
}

/// Starts a local `/api/submit` endpoint answering every request with `status`.
pub async fn spawn_submit_server(status: StatusCode) -> (String, CapturedRequests) {
    let requests: CapturedRequests = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/api/submit", post(capture))
        .with_state(CaptureState {
            requests: Arc::clone(&requests),
            status,
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    (format!("http://{addr}"), requests)
}

#[derive(Clone)]
struct RecordsState {
    body: Value,
    status: Arc<AtomicU16>,
    hits: Arc<AtomicUsize>,
}

async fn records(State(state): State<RecordsState>) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let status = StatusCode::from_u16(state.status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_success() {
        (status, Json(state.body))
    } else {
        (status, Json(serde_json::json!({"error": "unavailable"})))
    }
}

/// Handle on a local `/api/records` endpoint whose status can change mid-test.
pub struct RecordsServer {
    pub url: String,
    status: Arc<AtomicU16>,
    hits: Arc<AtomicUsize>,
}

impl RecordsServer {
    pub fn set_status(&self, status: StatusCode) {
        self.status.store(status.as_u16(), Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub async fn spawn_records_server(body: Value) -> RecordsServer {
    let status = Arc::new(AtomicU16::new(StatusCode::OK.as_u16()));
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/api/records", get(records))
        .with_state(RecordsState {
            body,
            status: Arc::clone(&status),
            hits: Arc::clone(&hits),
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    RecordsServer {
        url: format!("http://{addr}/api/records"),
        status,
        hits,
    }
}

pub fn state_with_records(records_url: &str) -> AppState {
    let config = AppConfig {
        records_url: Some(records_url.to_string()),
        ..AppConfig::default()
    };
    AppState::new(config).expect("app state")
}

pub fn state_for(api_base: &str) -> AppState {
    let config = AppConfig {
        api_base: api_base.to_string(),
        ..AppConfig::default()
    };
    AppState::new(config).expect("app state")
}

pub fn write_fixture(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
