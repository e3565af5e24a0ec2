use serde::ser::SerializeStruct;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unsupported file type for {slot}: expected {expected}, got {actual}")]
    UnsupportedFileType {
        slot: String,
        expected: String,
        actual: String,
    },
    #[error("malformed JSON in {file}: {reason}")]
    MalformedJson { file: String, reason: String },
    #[error("please upload a JSON file first")]
    MissingSteps,
    #[error("io error: {0}")]
    Io(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("submission rejected with status {status}")]
    SubmissionRejected { status: u16 },
    #[error("records unavailable: {0}")]
    RecordsUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AppError", 3)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("retryable", &self.retryable())?;
        state.end()
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            Self::MalformedJson { .. } => "MALFORMED_JSON",
            Self::MissingSteps => "MISSING_STEPS",
            Self::Io(_) => "IO_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::SubmissionRejected { .. } => "SUBMISSION_REJECTED",
            Self::RecordsUnavailable(_) => "RECORDS_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RecordsUnavailable(_) => true,
            Self::SubmissionRejected { status } => *status >= 500,
            _ => false,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
