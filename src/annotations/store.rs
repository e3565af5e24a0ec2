use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::restriction::Restriction;
use crate::{core::errors::AppResult, tree::path::NodePath};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restriction>,
}

/// Path → annotation mapping collected from the dialog. Serializes as a plain
/// JSON object keyed by path, which is exactly the submitted `metadata` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataStore {
    entries: BTreeMap<String, Annotation>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &NodePath) -> Option<&Annotation> {
        self.entries.get(path.as_str())
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.entries.contains_key(path.as_str())
    }

    /// Replaces the instructions for `path`, leaving its restriction untouched.
    pub fn set_instructions(&mut self, path: &NodePath, instructions: String) {
        self.entries
            .entry(path.to_string())
            .or_default()
            .instructions = Some(instructions);
    }

    /// Replaces the restriction for `path`, leaving its instructions untouched.
    pub fn set_restrictions(&mut self, path: &NodePath, restriction: Restriction) {
        self.entries
            .entry(path.to_string())
            .or_default()
            .restrictions = Some(restriction);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
