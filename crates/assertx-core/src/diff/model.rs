//! Diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq` so
//! tooling can consume reports as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The explanation of why two values are not equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffReport {
    /// Rendered type name of the compared values
    pub type_name: String,
    pub body: DiffBody,
}

impl DiffReport {
    /// The structural changes, empty unless the body is a change list.
    pub fn changes(&self) -> &[Change] {
        match &self.body {
            DiffBody::Changes { changes } => changes,
            _ => &[],
        }
    }
}

/// How a report explains the difference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffBody {
    /// Both sides rendered by their custom debug-string capability
    DebugStrings { got: String, want: String },
    /// Per-leaf structural changes
    Changes { changes: Vec<Change> },
    /// Line diff of multi-line renderings
    Text { lines: Vec<DiffLine> },
    /// Truncated renderings of both sides
    Fallback { got: String, want: String },
}

/// One differing leaf.
///
/// `from` is the got side, `to` the want side. A value present only in want
/// is a [`ChangeKind::Create`], one present only in got a
/// [`ChangeKind::Delete`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Change {
    pub kind: ChangeKind,
    /// Display path such as `items[2].price` or `labels["env"]`
    pub path: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeKind::Create => "create",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        })
    }
}

/// A line of a text diff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "side", content = "text", rename_all = "snake_case")]
pub enum DiffLine {
    Same(String),
    /// Only in the want rendering
    Want(String),
    /// Only in the got rendering
    Got(String),
}
