//! The owned graph-state object: a node list plus its editing operations.
//!
//! The board keeps every node in one `Graph` and hands it by reference to
//! the propagation engine and to whatever renders it. Insertion order is
//! preserved; lookups are by id.

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};

/// Smallest weight the editor assigns.
pub const MIN_WEIGHT: u32 = 1;

/// Largest weight in the editor's cycle. Weights above this are legal in
/// the data model; the editor just never produces them.
pub const MAX_WEIGHT: u32 = 3;

/// A directed weighted graph of nodes, the union of all nodes' link maps.
///
/// Editing operations enforce the surface invariants (unique ids, no
/// self-loops, positive weights). A graph loaded from storage may still
/// violate them - consumers are expected to tolerate that.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Build a graph from nodes, rejecting duplicate ids.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
        let mut graph = Self::new();
        for node in nodes {
            graph.insert(node)?;
        }
        Ok(graph)
    }

    /// Insert a node. Fails if the id is already present.
    pub fn insert(&mut self, node: Node) -> Result<()> {
        if self.contains(&node.id) {
            return Err(Error::DuplicateId(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Remove a node and strip every other node's link to it.
    ///
    /// Returns the removed node.
    pub fn remove(&mut self, id: &NodeId) -> Result<Node> {
        let pos = self
            .nodes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        let removed = self.nodes.remove(pos);

        for node in &mut self.nodes {
            node.links.remove(id);
        }

        Ok(removed)
    }

    /// Get a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Get a node by id, mutably.
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterate nodes mutably.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// Total number of link edges across all nodes.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.links.len()).sum()
    }

    /// Create or overwrite a link from `source` to `target`.
    ///
    /// Rejects self-loops and zero weights. The target is *not* required to
    /// exist: deleting a node may orphan links elsewhere, so the data model
    /// has to admit dangling targets anyway.
    pub fn set_link(&mut self, source: &NodeId, target: &NodeId, weight: u32) -> Result<()> {
        if source == target {
            return Err(Error::SelfLink(source.clone()));
        }
        if weight == 0 {
            return Err(Error::ZeroWeight);
        }
        let node = self
            .node_mut(source)
            .ok_or_else(|| Error::NodeNotFound(source.clone()))?;
        node.links.insert(target.clone(), weight);
        Ok(())
    }

    /// Remove the link from `source` to `target`.
    pub fn remove_link(&mut self, source: &NodeId, target: &NodeId) -> Result<()> {
        let node = self
            .node_mut(source)
            .ok_or_else(|| Error::NodeNotFound(source.clone()))?;
        node.links.remove(target).ok_or_else(|| Error::LinkNotFound {
            source: source.clone(),
            target: target.clone(),
        })?;
        Ok(())
    }

    /// Step a link's weight up through the editor cycle 1 -> 2 -> 3 -> 1.
    pub fn cycle_weight_up(&mut self, source: &NodeId, target: &NodeId) -> Result<u32> {
        self.cycle_weight(source, target, |w| (w % MAX_WEIGHT) + 1)
    }

    /// Step a link's weight down through the editor cycle 1 -> 3 -> 2 -> 1.
    pub fn cycle_weight_down(&mut self, source: &NodeId, target: &NodeId) -> Result<u32> {
        self.cycle_weight(source, target, |w| ((w + 1) % MAX_WEIGHT) + 1)
    }

    fn cycle_weight(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        step: impl Fn(u32) -> u32,
    ) -> Result<u32> {
        let node = self
            .node_mut(source)
            .ok_or_else(|| Error::NodeNotFound(source.clone()))?;
        let weight = node.links.get_mut(target).ok_or_else(|| Error::LinkNotFound {
            source: source.clone(),
            target: target.clone(),
        })?;
        *weight = step(*weight);
        Ok(*weight)
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_node_graph() -> Graph {
        Graph::from_nodes([
            Node::new("a", "A").with_commit(50.0).with_link("b", 1),
            Node::new("b", "B").with_commit(30.0).with_link("a", 2),
            Node::new("c", "C").with_commit(80.0).with_link("a", 1),
        ])
        .unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let graph = three_node_graph();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.node(&"b".into()).unwrap().commit, 30.0);
        assert!(graph.contains(&"c".into()));
        assert!(!graph.contains(&"d".into()));
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut graph = three_node_graph();
        let err = graph.insert(Node::new("a", "A again")).unwrap_err();
        assert_eq!(err, Error::DuplicateId("a".into()));
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn remove_strips_incoming_links() {
        let mut graph = three_node_graph();
        let removed = graph.remove(&"a".into()).unwrap();
        assert_eq!(removed.id, "a".into());

        // b and c both linked to a; those links must be gone.
        assert!(!graph.node(&"b".into()).unwrap().has_link(&"a".into()));
        assert!(!graph.node(&"c".into()).unwrap().has_link(&"a".into()));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn remove_missing_node_fails() {
        let mut graph = three_node_graph();
        assert_eq!(
            graph.remove(&"missing".into()),
            Err(Error::NodeNotFound("missing".into()))
        );
    }

    #[test]
    fn set_link_rejects_self_loop() {
        let mut graph = three_node_graph();
        let err = graph.set_link(&"a".into(), &"a".into(), 1).unwrap_err();
        assert_eq!(err, Error::SelfLink("a".into()));
    }

    #[test]
    fn set_link_rejects_zero_weight() {
        let mut graph = three_node_graph();
        let err = graph.set_link(&"a".into(), &"c".into(), 0).unwrap_err();
        assert_eq!(err, Error::ZeroWeight);
    }

    #[test]
    fn set_link_allows_dangling_target() {
        // A target that no longer exists is tolerated at this layer.
        let mut graph = three_node_graph();
        graph.set_link(&"a".into(), &"ghost".into(), 1).unwrap();
        assert!(graph.node(&"a".into()).unwrap().has_link(&"ghost".into()));
    }

    #[test]
    fn remove_link() {
        let mut graph = three_node_graph();
        graph.remove_link(&"a".into(), &"b".into()).unwrap();
        assert!(!graph.node(&"a".into()).unwrap().has_link(&"b".into()));

        assert_eq!(
            graph.remove_link(&"a".into(), &"b".into()),
            Err(Error::LinkNotFound {
                source: "a".into(),
                target: "b".into(),
            })
        );
    }

    #[test]
    fn weight_cycles_through_one_two_three() {
        let mut graph = three_node_graph();
        let a: NodeId = "a".into();
        let b: NodeId = "b".into();

        // Up: 1 -> 2 -> 3 -> 1
        assert_eq!(graph.cycle_weight_up(&a, &b).unwrap(), 2);
        assert_eq!(graph.cycle_weight_up(&a, &b).unwrap(), 3);
        assert_eq!(graph.cycle_weight_up(&a, &b).unwrap(), 1);

        // Down: 1 -> 3 -> 2 -> 1
        assert_eq!(graph.cycle_weight_down(&a, &b).unwrap(), 3);
        assert_eq!(graph.cycle_weight_down(&a, &b).unwrap(), 2);
        assert_eq!(graph.cycle_weight_down(&a, &b).unwrap(), 1);
    }

    #[test]
    fn edge_count_sums_all_link_maps() {
        let graph = three_node_graph();
        assert_eq!(graph.edge_count(), 3);
    }
}
