pub mod annotations;
pub mod commands;
pub mod core;
pub mod dashboard;
pub mod ipc;
pub mod notices;
pub mod providers;
pub mod tree;
pub mod upload;

use std::sync::Arc;

use tokio::{io::BufReader, sync::Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::core::{config::AppConfig, errors::AppResult};
use dashboard::{DashboardState, RecordsCache};
use notices::NoticeQueue;
use providers::{records::RecordsClient, submission::SubmissionClient};
use upload::UploadController;

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the invoke channel, so logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub upload: Arc<Mutex<UploadController>>,
    pub dashboard: Arc<Mutex<DashboardState>>,
    pub records: Arc<RecordsCache>,
    pub submission: SubmissionClient,
    pub notices: Arc<NoticeQueue>,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let notices = Arc::new(NoticeQueue::new());
        let records_client = match &config.records_url {
            Some(url) => RecordsClient::remote(url.clone(), config.http_timeout)?,
            None => RecordsClient::builtin(),
        };
        let submission = SubmissionClient::new(config.submit_url(), config.http_timeout)?;
        Ok(Self {
            upload: Arc::new(Mutex::new(UploadController::new())),
            dashboard: Arc::new(Mutex::new(DashboardState::default())),
            records: Arc::new(RecordsCache::new(records_client, Arc::clone(&notices))),
            submission,
            notices,
            config,
        })
    }
}

pub fn run() {
    let config = AppConfig::from_env();
    init_tracing(&config.log_filter);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to start async runtime");

    let result = runtime.block_on(async move {
        let state = AppState::new(config)?;
        info!(
            submit_url = %state.submission.endpoint(),
            records = state.config.records_url.as_deref().unwrap_or("builtin"),
            "stepscribe ready"
        );
        ipc::serve(state, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
    });

    if let Err(err) = result {
        error!(error = %err, "stepscribe stopped");
        std::process::exit(1);
    }
}
