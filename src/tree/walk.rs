use serde_json::Value;

use super::path::NodePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    Array,
}

/// One step of a depth-first walk. `label` is the object key or array index the
/// node sits under, and is `None` only for the root.
#[derive(Debug, Clone, Copy)]
pub struct NodeVisit<'a> {
    pub path: &'a NodePath,
    pub label: Option<&'a str>,
    pub depth: usize,
}

pub trait TreeVisitor {
    /// Called once per object or array. Returning `false` skips its children.
    fn container(&mut self, visit: NodeVisit<'_>, kind: ContainerKind, len: usize) -> bool;

    /// Called once per scalar (string, number, bool, null).
    fn leaf(&mut self, visit: NodeVisit<'_>, value: &Value);
}

pub fn walk<V: TreeVisitor>(value: &Value, visitor: &mut V) {
    walk_node(value, &NodePath::root(), None, 0, visitor);
}

fn walk_node<V: TreeVisitor>(
    value: &Value,
    path: &NodePath,
    label: Option<&str>,
    depth: usize,
    visitor: &mut V,
) {
    let visit = NodeVisit { path, label, depth };
    match value {
        Value::Object(map) => {
            if visitor.container(visit, ContainerKind::Object, map.len()) {
                for (key, child) in map {
                    walk_node(child, &path.key(key), Some(key.as_str()), depth + 1, visitor);
                }
            }
        }
        Value::Array(items) => {
            if visitor.container(visit, ContainerKind::Array, items.len()) {
                for (idx, child) in items.iter().enumerate() {
                    let index_label = idx.to_string();
                    walk_node(
                        child,
                        &path.index(idx),
                        Some(index_label.as_str()),
                        depth + 1,
                        visitor,
                    );
                }
            }
        }
        scalar => visitor.leaf(visit, scalar),
    }
}

/// What a path points at inside a document.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeTarget {
    Container(ContainerKind),
    Leaf(Value),
}

pub fn resolve(document: &Value, path: &NodePath) -> Option<NodeTarget> {
    struct Finder<'p> {
        wanted: &'p NodePath,
        found: Option<NodeTarget>,
    }

    impl TreeVisitor for Finder<'_> {
        fn container(&mut self, visit: NodeVisit<'_>, kind: ContainerKind, _len: usize) -> bool {
            if self.found.is_some() {
                return false;
            }
            if visit.path == self.wanted {
                self.found = Some(NodeTarget::Container(kind));
                return false;
            }
            true
        }

        fn leaf(&mut self, visit: NodeVisit<'_>, value: &Value) {
            if self.found.is_none() && visit.path == self.wanted {
                self.found = Some(NodeTarget::Leaf(value.clone()));
            }
        }
    }

    let mut finder = Finder {
        wanted: path,
        found: None,
    };
    walk(document, &mut finder);
    finder.found
}
