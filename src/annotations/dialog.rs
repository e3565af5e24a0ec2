use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    restriction::{Restriction, RestrictionKind},
    store::Annotation,
};
use crate::{
    core::errors::{AppError, AppResult},
    tree::path::NodePath,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogTab {
    #[default]
    Instructions,
    Restrictions,
}

/// A single edit coming from the dialog's inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum DialogEdit {
    Tab(DialogTab),
    Instructions(String),
    Kind(RestrictionKind),
    Min(String),
    Max(String),
    ValidValues(String),
}

/// What a save hands back to the store. Only the active tab is committed.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogCommit {
    Instructions(String),
    Restrictions(Restriction),
}

/// Text buffers behind the restriction editor. Kept as raw input until save so
/// a half-typed number is never rejected mid-edit.
#[derive(Debug, Clone, PartialEq)]
pub struct RestrictionDraft {
    pub kind: RestrictionKind,
    pub min: String,
    pub max: String,
    pub valid_values: String,
}

impl RestrictionDraft {
    pub fn from_restriction(restriction: &Restriction) -> Self {
        let mut draft = Self {
            kind: restriction.kind(),
            min: String::new(),
            max: String::new(),
            valid_values: String::new(),
        };
        match restriction {
            Restriction::Number { min, max } => {
                draft.min = min.map(|v| v.to_string()).unwrap_or_default();
                draft.max = max.map(|v| v.to_string()).unwrap_or_default();
            }
            Restriction::String {
                min_length,
                max_length,
            } => {
                draft.min = min_length.map(|v| v.to_string()).unwrap_or_default();
                draft.max = max_length.map(|v| v.to_string()).unwrap_or_default();
            }
            Restriction::Enum { valid_values } => {
                draft.valid_values = valid_values.join(", ");
            }
            Restriction::Boolean | Restriction::Date => {}
        }
        draft
    }

    /// Switching kind drops the inputs that belonged to the previous kind.
    pub fn set_kind(&mut self, kind: RestrictionKind) {
        if kind != self.kind {
            *self = Self::from_restriction(&Restriction::empty(kind));
        }
    }

    pub fn build(&self) -> AppResult<Restriction> {
        let restriction = match self.kind {
            RestrictionKind::Number => Restriction::Number {
                min: parse_number(&self.min, "min")?,
                max: parse_number(&self.max, "max")?,
            },
            RestrictionKind::String => Restriction::String {
                min_length: parse_length(&self.min, "min")?,
                max_length: parse_length(&self.max, "max")?,
            },
            RestrictionKind::Enum => Restriction::Enum {
                valid_values: split_values(&self.valid_values),
            },
            RestrictionKind::Boolean => Restriction::Boolean,
            RestrictionKind::Date => Restriction::Date,
        };
        restriction.validate()?;
        Ok(restriction)
    }
}

fn parse_number(raw: &str, field: &str) -> AppResult<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(AppError::InvalidInput(format!(
            "{field} must be a number, got `{trimmed}`"
        ))),
    }
}

fn parse_length(raw: &str, field: &str) -> AppResult<Option<u64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<u64>().map(Some).map_err(|_| {
        AppError::InvalidInput(format!(
            "{field} length must be a non-negative integer, got `{trimmed}`"
        ))
    })
}

fn split_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Default restriction kind for a leaf that has none yet.
pub fn infer_kind(value: &Value) -> RestrictionKind {
    match value {
        Value::Number(_) => RestrictionKind::Number,
        Value::Bool(_) => RestrictionKind::Boolean,
        Value::String(text) if is_date_like(text) => RestrictionKind::Date,
        _ => RestrictionKind::String,
    }
}

fn is_date_like(text: &str) -> bool {
    let trimmed = text.trim();
    DateTime::parse_from_rfc3339(trimmed).is_ok()
        || NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
}

#[derive(Debug, Clone)]
pub struct AnnotationDialog {
    path: NodePath,
    value: Value,
    tab: DialogTab,
    instructions: String,
    restriction: RestrictionDraft,
}

impl AnnotationDialog {
    /// Builds fresh drafts for `path`; nothing carries over from a previous dialog.
    pub fn open(path: NodePath, value: Value, existing: Option<&Annotation>) -> Self {
        let instructions = existing
            .and_then(|note| note.instructions.clone())
            .unwrap_or_default();
        let restriction = match existing.and_then(|note| note.restrictions.as_ref()) {
            Some(saved) => RestrictionDraft::from_restriction(saved),
            None => RestrictionDraft::from_restriction(&Restriction::empty(infer_kind(&value))),
        };
        Self {
            path,
            value,
            tab: DialogTab::default(),
            instructions,
            restriction,
        }
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn tab(&self) -> DialogTab {
        self.tab
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn restriction(&self) -> &RestrictionDraft {
        &self.restriction
    }

    pub fn apply(&mut self, edit: DialogEdit) {
        match edit {
            DialogEdit::Tab(tab) => self.tab = tab,
            DialogEdit::Instructions(text) => self.instructions = text,
            DialogEdit::Kind(kind) => self.restriction.set_kind(kind),
            DialogEdit::Min(raw) => self.restriction.min = raw,
            DialogEdit::Max(raw) => self.restriction.max = raw,
            DialogEdit::ValidValues(raw) => self.restriction.valid_values = raw,
        }
    }

    pub fn commit(&self) -> AppResult<DialogCommit> {
        match self.tab {
            DialogTab::Instructions => Ok(DialogCommit::Instructions(self.instructions.clone())),
            DialogTab::Restrictions => Ok(DialogCommit::Restrictions(self.restriction.build()?)),
        }
    }

    pub fn view(&self) -> DialogView {
        let kind = self.restriction.kind;
        DialogView {
            path: self.path.to_string(),
            value: self.value.clone(),
            active_tab: self.tab,
            instructions: self.instructions.clone(),
            kind,
            available_kinds: RestrictionKind::ALL.to_vec(),
            show_bounds: kind.has_bounds(),
            show_valid_values: kind == RestrictionKind::Enum,
            min: self.restriction.min.clone(),
            max: self.restriction.max.clone(),
            valid_values: self.restriction.valid_values.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogView {
    pub path: String,
    pub value: Value,
    pub active_tab: DialogTab,
    pub instructions: String,
    pub kind: RestrictionKind,
    pub available_kinds: Vec<RestrictionKind>,
    pub show_bounds: bool,
    pub show_valid_values: bool,
    pub min: String,
    pub max: String,
    pub valid_values: String,
}
