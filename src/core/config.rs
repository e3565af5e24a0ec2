use std::time::Duration;

use tracing::warn;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080";
pub const SUBMIT_PATH: &str = "/api/submit";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_filter: String,
    pub api_base: String,
    pub records_url: Option<String>,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            records_url: None,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let log_filter = lookup("STEPSCRIBE_LOG")
            .map(|raw| log_filter_from_raw(&raw))
            .unwrap_or(defaults.log_filter);

        let api_base = lookup("STEPSCRIBE_API_BASE")
            .map(|raw| raw.trim().trim_end_matches('/').to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.api_base);

        let records_url = lookup("STEPSCRIBE_RECORDS_URL")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());

        let http_timeout = match lookup("STEPSCRIBE_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "ignoring invalid STEPSCRIBE_HTTP_TIMEOUT_SECS");
                    defaults.http_timeout
                }
            },
            None => defaults.http_timeout,
        };

        Self {
            log_filter,
            api_base,
            records_url,
            http_timeout,
        }
    }

    pub fn submit_url(&self) -> String {
        format!("{}{}", self.api_base, SUBMIT_PATH)
    }
}

fn log_filter_from_raw(raw: &str) -> String {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => normalized,
        "" => "info".to_string(),
        // Anything else is handed to EnvFilter as a directive, e.g. `stepscribe_lib=debug`.
        _ => raw.trim().to_string(),
    }
}
