//! Hierarchical field recording.

use std::collections::BTreeSet;
use std::fmt;

use protocol::Identifier;

use crate::error::CodecError;

/// A decoded scalar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldValue {
    Bool(bool),
    UInt(u64),
    Int(i64),
    Float(f32),
    Str(String),
    Identifier(Identifier),
    Vector3 { x: f32, y: f32, z: f32 },
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value:?}"),
            Self::Identifier(value) => write!(f, "{value}"),
            Self::Vector3 { x, y, z } => write!(f, "({x}, {y}, {z})"),
        }
    }
}

/// Order-preserving recorder that decoding procedures write to.
///
/// Indices qualify a field inside nested repeated groups, outermost first.
/// Every [`begin_list`](Self::begin_list) is matched by exactly one
/// [`end_list`](Self::end_list).
pub trait StructuredSink {
    /// Records a scalar.
    fn record(&mut self, name: &'static str, value: FieldValue, indices: &[usize]);

    /// Opens a nested repeated region.
    fn begin_list(&mut self, name: &'static str, indices: &[usize]);

    /// Closes the innermost open region.
    fn end_list(&mut self);

    /// Flags everything recorded for the current message as partial.
    fn mark_incomplete(&mut self, _error: &CodecError) {}
}

/// One recorded node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum RecordNode {
    Field {
        name: &'static str,
        indices: Vec<usize>,
        value: FieldValue,
    },
    List {
        name: &'static str,
        indices: Vec<usize>,
        children: Vec<RecordNode>,
    },
}

impl RecordNode {
    /// Returns the node's field or list name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Field { name, .. } | Self::List { name, .. } => *name,
        }
    }

    /// Returns the node's list indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        match self {
            Self::Field { indices, .. } | Self::List { indices, .. } => indices,
        }
    }

    /// Returns the children of a list node.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Field { .. } => &[],
            Self::List { children, .. } => children,
        }
    }

    /// Returns the number of entries in a list node: the distinct indices its
    /// children carry at the list's own depth.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        let Self::List {
            indices, children, ..
        } = self
        else {
            return 0;
        };
        let depth = indices.len();
        children
            .iter()
            .filter_map(|child| child.indices().get(depth).copied())
            .collect::<BTreeSet<_>>()
            .len()
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a Self>) {
        out.push(self);
        for child in self.children() {
            child.visit(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct OpenList {
    name: &'static str,
    indices: Vec<usize>,
    children: Vec<RecordNode>,
}

/// In-memory [`StructuredSink`] building a tree of [`RecordNode`]s.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecordTree {
    nodes: Vec<RecordNode>,
    #[cfg_attr(feature = "serde", serde(skip))]
    open: Vec<OpenList>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    incomplete: Option<String>,
}

impl RecordTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the top-level nodes.
    #[must_use]
    pub fn nodes(&self) -> &[RecordNode] {
        &self.nodes
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.open.is_empty()
    }

    /// Returns `true` if every opened list has been closed.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.open.is_empty()
    }

    /// Returns `true` if the decode that produced this tree was aborted.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        self.incomplete.is_some()
    }

    /// Returns the abort reason, if any.
    #[must_use]
    pub fn incomplete_reason(&self) -> Option<&str> {
        self.incomplete.as_deref()
    }

    /// Returns every node in depth-first order.
    #[must_use]
    pub fn walk(&self) -> Vec<&RecordNode> {
        let mut out = Vec::new();
        for node in &self.nodes {
            node.visit(&mut out);
        }
        out
    }

    /// Returns the first list named `name`.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&RecordNode> {
        self.lists(name).into_iter().next()
    }

    /// Returns every list named `name`, in recording order.
    #[must_use]
    pub fn lists(&self, name: &str) -> Vec<&RecordNode> {
        self.walk()
            .into_iter()
            .filter(|node| matches!(node, RecordNode::List { .. }) && node.name() == name)
            .collect()
    }

    /// Returns the value of the first field named `name` with exactly
    /// `indices`.
    #[must_use]
    pub fn field(&self, name: &str, indices: &[usize]) -> Option<&FieldValue> {
        self.walk().into_iter().find_map(|node| match node {
            RecordNode::Field {
                name: n,
                indices: i,
                value,
            } if *n == name && i.as_slice() == indices => Some(value),
            _ => None,
        })
    }

    /// Returns the number of fields recorded anywhere in the tree.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.walk()
            .into_iter()
            .filter(|node| matches!(node, RecordNode::Field { .. }))
            .count()
    }

    fn push(&mut self, node: RecordNode) {
        match self.open.last_mut() {
            Some(list) => list.children.push(node),
            None => self.nodes.push(node),
        }
    }
}

impl StructuredSink for RecordTree {
    fn record(&mut self, name: &'static str, value: FieldValue, indices: &[usize]) {
        self.push(RecordNode::Field {
            name,
            indices: indices.to_vec(),
            value,
        });
    }

    fn begin_list(&mut self, name: &'static str, indices: &[usize]) {
        self.open.push(OpenList {
            name,
            indices: indices.to_vec(),
            children: Vec::new(),
        });
    }

    fn end_list(&mut self) {
        debug_assert!(!self.open.is_empty(), "end_list without begin_list");
        if let Some(list) = self.open.pop() {
            self.push(RecordNode::List {
                name: list.name,
                indices: list.indices,
                children: list.children,
            });
        }
    }

    fn mark_incomplete(&mut self, error: &CodecError) {
        self.incomplete = Some(error.to_string());
    }
}
