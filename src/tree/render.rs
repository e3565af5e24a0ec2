use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    path::NodePath,
    walk::{walk, ContainerKind, NodeVisit, TreeVisitor},
};
use crate::annotations::store::MetadataStore;

/// Which containers are folded. Everything starts expanded; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    collapsed: HashSet<NodePath>,
}

impl ExpansionState {
    pub fn is_expanded(&self, path: &NodePath) -> bool {
        !self.collapsed.contains(path)
    }

    /// Flips one container and returns its new expanded state.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        if self.collapsed.remove(path) {
            true
        } else {
            self.collapsed.insert(path.clone());
            false
        }
    }

    pub fn reset(&mut self) {
        self.collapsed.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RowNode {
    #[serde(rename_all = "camelCase")]
    Container {
        is_array: bool,
        child_count: usize,
        summary: String,
        expanded: bool,
    },
    #[serde(rename_all = "camelCase")]
    Leaf { display: String, annotated: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRow {
    pub path: String,
    pub label: Option<String>,
    pub depth: usize,
    #[serde(flatten)]
    pub node: RowNode,
}

struct RowBuilder<'a> {
    metadata: &'a MetadataStore,
    expansion: &'a ExpansionState,
    rows: Vec<TreeRow>,
}

impl TreeVisitor for RowBuilder<'_> {
    fn container(&mut self, visit: NodeVisit<'_>, kind: ContainerKind, len: usize) -> bool {
        let expanded = self.expansion.is_expanded(visit.path);
        let summary = match kind {
            ContainerKind::Array => format!("[{len} items]"),
            ContainerKind::Object => "{...}".to_string(),
        };
        self.rows.push(TreeRow {
            path: visit.path.to_string(),
            label: visit.label.map(ToString::to_string),
            depth: visit.depth,
            node: RowNode::Container {
                is_array: kind == ContainerKind::Array,
                child_count: len,
                summary,
                expanded,
            },
        });
        expanded
    }

    fn leaf(&mut self, visit: NodeVisit<'_>, value: &Value) {
        self.rows.push(TreeRow {
            path: visit.path.to_string(),
            label: visit.label.map(ToString::to_string),
            depth: visit.depth,
            node: RowNode::Leaf {
                display: display_scalar(value),
                annotated: self.metadata.contains(visit.path),
            },
        });
    }
}

/// Flattens the document into display rows, skipping children of folded containers.
pub fn render(
    document: &Value,
    metadata: &MetadataStore,
    expansion: &ExpansionState,
) -> Vec<TreeRow> {
    let mut builder = RowBuilder {
        metadata,
        expansion,
        rows: Vec::new(),
    };
    walk(document, &mut builder);
    builder.rows
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{text}\""),
        other => other.to_string(),
    }
}
