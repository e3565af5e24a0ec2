use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::core::errors::{AppError, AppResult};

pub const JSON_MIME: &str = "application/json";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSlot {
    Steps,
    Scribe,
}

impl FileSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::Scribe => "scribe",
        }
    }

    pub fn expected_mime(self) -> &'static str {
        match self {
            Self::Steps => JSON_MIME,
            Self::Scribe => PDF_MIME,
        }
    }
}

/// A file handed over by the picker or a drop target.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    /// The declared content type without parameters, or a guess from the extension.
    pub fn content_type(&self) -> String {
        self.mime
            .as_deref()
            .map(|raw| raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .filter(|mime| !mime.is_empty())
            .unwrap_or_else(|| mime_from_extension(&self.name).to_string())
    }
}

pub fn mime_from_extension(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "json" => JSON_MIME,
        "pdf" => PDF_MIME,
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}

pub fn checksum_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub(crate) fn ensure_type(slot: FileSlot, file: &IncomingFile) -> AppResult<()> {
    let actual = file.content_type();
    if actual != slot.expected_mime() {
        return Err(AppError::UnsupportedFileType {
            slot: slot.as_str().to_string(),
            expected: slot.expected_mime().to_string(),
            actual,
        });
    }
    Ok(())
}

pub(crate) fn parse_steps(file: &IncomingFile) -> AppResult<Value> {
    let text = std::str::from_utf8(&file.bytes).map_err(|err| AppError::MalformedJson {
        file: file.name.clone(),
        reason: format!("not UTF-8: {err}"),
    })?;
    serde_json::from_str(text).map_err(|err| AppError::MalformedJson {
        file: file.name.clone(),
        reason: err.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct StepsDocument {
    pub file_name: String,
    pub checksum: String,
    pub size: usize,
    pub content: Value,
}

#[derive(Debug, Clone)]
pub struct ScribeFile {
    pub file_name: String,
    pub checksum: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub slot: FileSlot,
    pub name: String,
    pub mime: String,
    pub size: usize,
    pub checksum: String,
}

impl StepsDocument {
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            slot: FileSlot::Steps,
            name: self.file_name.clone(),
            mime: JSON_MIME.to_string(),
            size: self.size,
            checksum: self.checksum.clone(),
        }
    }
}

impl ScribeFile {
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            slot: FileSlot::Scribe,
            name: self.file_name.clone(),
            mime: PDF_MIME.to_string(),
            size: self.bytes.len(),
            checksum: self.checksum.clone(),
        }
    }
}
