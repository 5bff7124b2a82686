//! Nodes: labeled goals carrying a commit value and outgoing weighted links.

use std::collections::BTreeMap;
use std::fmt;

/// Color assigned to nodes that have never been recolored.
pub const DEFAULT_COLOR: &str = "#000000";

/// Opaque unique identifier for a node, stable for the node's lifetime.
///
/// Ids are caller-assigned strings (the board layer mints `node_{millis}`
/// style ids). The graph only ever compares them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct NodeId(String);

impl NodeId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A trackable goal on the board.
///
/// `commit` is the user-edited effort value; `activation` is derived, fully
/// recomputed by the propagation engine on every run. `links` holds this
/// node's **outgoing** edges only - the graph is the union of all nodes'
/// link maps.
///
/// Serde defaults on the later-added fields (`activation`, `color`,
/// `starred`, `acute`) let nodes persisted by older versions load cleanly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Display label.
    pub name: String,
    /// User-edited effort value. Non-negative by convention; the engine
    /// tolerates anything.
    #[cfg_attr(feature = "serde", serde(default))]
    pub commit: f64,
    /// Derived value, overwritten by each propagation run.
    #[cfg_attr(feature = "serde", serde(default))]
    pub activation: f64,
    /// Board position.
    #[cfg_attr(feature = "serde", serde(default))]
    pub x: f64,
    /// Board position.
    #[cfg_attr(feature = "serde", serde(default))]
    pub y: f64,
    /// Display color as a hex string.
    #[cfg_attr(feature = "serde", serde(default = "default_color"))]
    pub color: String,
    /// Pinned by the user.
    #[cfg_attr(feature = "serde", serde(default))]
    pub starred: bool,
    /// Shown on the commit-history panel.
    #[cfg_attr(feature = "serde", serde(default))]
    pub acute: bool,
    /// Outgoing edges: target id -> positive weight.
    #[cfg_attr(feature = "serde", serde(default))]
    pub links: BTreeMap<NodeId, u32>,
}

#[cfg(feature = "serde")]
fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Node {
    /// Create a node with zero commit, no links, and default styling.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            commit: 0.0,
            activation: 0.0,
            x: 0.0,
            y: 0.0,
            color: DEFAULT_COLOR.to_string(),
            starred: false,
            acute: false,
            links: BTreeMap::new(),
        }
    }

    /// Place the node at a board position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the commit value.
    pub fn with_commit(mut self, commit: f64) -> Self {
        self.commit = commit;
        self
    }

    /// Add an outgoing link.
    pub fn with_link(mut self, target: impl Into<NodeId>, weight: u32) -> Self {
        self.links.insert(target.into(), weight);
        self
    }

    /// Weight of the outgoing link to `target`, if any.
    pub fn link_weight(&self, target: &NodeId) -> Option<u32> {
        self.links.get(target).copied()
    }

    /// Whether this node links to `target`.
    pub fn has_link(&self, target: &NodeId) -> bool {
        self.links.contains_key(target)
    }
}
