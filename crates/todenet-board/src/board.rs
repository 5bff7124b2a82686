//! Board state: the owned graph, the current selection, and the commit
//! history, with the editing operations the UI surface calls.
//!
//! All mutation funnels through `&mut self`, which also serializes
//! propagation runs - there is no way to start a second run over the same
//! graph while one is in flight.

use std::time::{SystemTime, UNIX_EPOCH};

use todenet_engine::{propagate, PropagationConfig};
use todenet_graph::{Graph, Node, NodeId};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::history::CommitHistory;

/// Side length of the virtual board canvas.
pub const BOARD_SIZE: f64 = 10_000.0;

/// Horizontal spacing when creating a row of nodes at once.
pub const ROW_SPACING: f64 = 180.0;

/// Label given to freshly created nodes ("new goal").
pub const DEFAULT_NODE_NAME: &str = "새로운 목표";

/// The board: graph state plus selection plus commit history.
#[derive(Debug, Clone, Default)]
pub struct Board {
    graph: Graph,
    selected: Option<NodeId>,
    history: CommitHistory,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a board from loaded state.
    pub fn from_parts(graph: Graph, history: CommitHistory) -> Self {
        Self {
            graph,
            selected: None,
            history,
        }
    }

    /// The starter board: three linked goals centered on the canvas.
    pub fn seeded() -> Self {
        let center = BOARD_SIZE / 2.0;
        let graph = Graph::from_nodes([
            Node::new("app_dev", "App Develop")
                .with_commit(50.0)
                .at(center - 150.0, center)
                .with_link("ai_theory", 1),
            Node::new("ai_theory", "AI Theory")
                .with_commit(30.0)
                .at(center + 150.0, center - 50.0)
                .with_link("app_dev", 2),
            Node::new("exercise", "운동하기")
                .with_commit(80.0)
                .at(center, center + 200.0)
                .with_link("app_dev", 1),
        ])
        .unwrap_or_default();

        Self::from_parts(graph, CommitHistory::new())
    }

    /// The graph, for the engine's consumers and for rendering.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The commit history.
    pub fn history(&self) -> &CommitHistory {
        &self.history
    }

    /// Currently selected node, if any.
    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Select a node.
    pub fn select(&mut self, id: &NodeId) -> Result<()> {
        if !self.graph.contains(id) {
            return Err(Error::NotFound(id.to_string()));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Create a node at a position and select it. Returns the new id.
    pub fn add_node(&mut self, x: f64, y: f64) -> NodeId {
        let id = self.mint_id();
        let node = Node::new(id.clone(), DEFAULT_NODE_NAME).at(x, y);
        // The id was just minted unique, insert cannot fail.
        let _ = self.graph.insert(node);
        self.selected = Some(id.clone());
        info!(node = %id, "node created");
        id
    }

    /// Create one node per name in a horizontal row starting at
    /// (`base_x`, `base_y`). Blank names are skipped.
    pub fn add_node_row(
        &mut self,
        names: &[String],
        base_x: f64,
        base_y: f64,
    ) -> Vec<NodeId> {
        let mut created = Vec::new();
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let x = base_x + created.len() as f64 * ROW_SPACING;
            let id = self.add_node(x, base_y);
            if let Some(node) = self.graph.node_mut(&id) {
                node.name = name.to_string();
            }
            created.push(id);
        }
        created
    }

    /// Delete a node: strips incoming links, drops its history rows, and
    /// clears the selection if it pointed there.
    pub fn delete_node(&mut self, id: &NodeId) -> Result<Node> {
        let removed = self.graph.remove(id)?;
        self.history.remove_node(id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        info!(node = %id, "node deleted");
        Ok(removed)
    }

    /// Rename a node and set its commit value, recording the commit delta
    /// in the history.
    pub fn update_content(&mut self, id: &NodeId, name: &str, commit: f64) -> Result<()> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let old_commit = node.commit;
        node.name = name.to_string();
        node.commit = commit;
        self.history.record(id, old_commit, commit);
        debug!(node = %id, old = old_commit, new = commit, "content updated");
        Ok(())
    }

    /// Move a node. Persisting batched moves is the caller's call, as with
    /// drag-end saves in the original surface.
    pub fn update_position(&mut self, id: &NodeId, x: f64, y: f64) -> Result<()> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    /// Recolor a node.
    pub fn update_color(&mut self, id: &NodeId, color: &str) -> Result<()> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        node.color = color.to_string();
        Ok(())
    }

    /// Toggle the star flag; returns the new value.
    pub fn toggle_star(&mut self, id: &NodeId) -> Result<bool> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        node.starred = !node.starred;
        Ok(node.starred)
    }

    /// Toggle the history-panel flag; returns the new value.
    pub fn toggle_acute(&mut self, id: &NodeId) -> Result<bool> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        node.acute = !node.acute;
        Ok(node.acute)
    }

    /// Draw a new link with weight 1. Refuses to overwrite an existing
    /// link, matching the drawing surface.
    pub fn link(&mut self, source: &NodeId, target: &NodeId) -> Result<()> {
        if !self.graph.contains(target) {
            return Err(Error::NotFound(target.to_string()));
        }
        let source_node = self
            .graph
            .node(source)
            .ok_or_else(|| Error::NotFound(source.to_string()))?;
        if source_node.has_link(target) {
            return Err(Error::InvalidInput(format!(
                "link {} -> {} already exists",
                source, target
            )));
        }
        self.graph
            .set_link(source, target, todenet_graph::MIN_WEIGHT)?;
        Ok(())
    }

    /// Remove a link.
    pub fn unlink(&mut self, source: &NodeId, target: &NodeId) -> Result<()> {
        self.graph.remove_link(source, target)?;
        Ok(())
    }

    /// Step a link weight up through the editor cycle; returns the new
    /// weight.
    pub fn weight_up(&mut self, source: &NodeId, target: &NodeId) -> Result<u32> {
        Ok(self.graph.cycle_weight_up(source, target)?)
    }

    /// Step a link weight down; returns the new weight.
    pub fn weight_down(&mut self, source: &NodeId, target: &NodeId) -> Result<u32> {
        Ok(self.graph.cycle_weight_down(source, target)?)
    }

    /// Run the activation engine over the whole graph.
    pub fn propagate(&mut self, config: &PropagationConfig) -> Result<()> {
        info!(
            nodes = self.graph.len(),
            edges = self.graph.edge_count(),
            iterations = config.iterations,
            rate = config.rate,
            "running activation propagation"
        );
        propagate(&mut self.graph, config)?;
        Ok(())
    }

    /// Nodes flagged for the history panel.
    pub fn acute_nodes(&self) -> Vec<&Node> {
        self.graph.iter().filter(|n| n.acute).collect()
    }

    /// Replace the whole graph (import). Clears the selection.
    pub fn set_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.selected = None;
    }

    /// Mint a `node_{millis}` id, bumping past collisions from same-
    /// millisecond creations.
    fn mint_id(&self) -> NodeId {
        let mut millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        loop {
            let id = NodeId::new(format!("node_{}", millis));
            if !self.graph.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }
}
