//! Persistent storage using RocksDB.
//!
//! Nodes are stored one key per node id, history one key per tracked node,
//! both as JSON. Loading a graph is a prefix scan; saving deletes keys for
//! nodes that no longer exist so deletions survive restarts.

use crate::error::Result;
use crate::history::{CommitHistory, DayDeltas};
use rocksdb::{Options, DB};
use std::path::Path;
use todenet_graph::{Graph, Node, NodeId};
use tracing::debug;

const NODE_PREFIX: &str = "node:";
const HISTORY_PREFIX: &str = "history:";

/// Storage backend for board data.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    // --- Nodes ---

    /// Store a node under its id.
    pub fn put_node(&self, node: &Node) -> Result<()> {
        let key = format!("{}{}", NODE_PREFIX, node.id);
        let value = serde_json::to_vec(node)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// Get a node by id.
    pub fn get_node(&self, id: &NodeId) -> Result<Option<Node>> {
        let key = format!("{}{}", NODE_PREFIX, id);
        match self.db.get(key.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Delete a node's record.
    pub fn delete_node(&self, id: &NodeId) -> Result<()> {
        let key = format!("{}{}", NODE_PREFIX, id);
        self.db.delete(key.as_bytes())?;
        Ok(())
    }

    /// Load every stored node into a graph.
    pub fn load_graph(&self) -> Result<Graph> {
        let mut graph = Graph::new();
        for id in self.keys_with_prefix(NODE_PREFIX)? {
            if let Some(node) = self.get_node(&NodeId::new(id))? {
                graph.insert(node)?;
            }
        }
        debug!(nodes = graph.len(), "graph loaded");
        Ok(graph)
    }

    /// Persist the whole graph, removing records for deleted nodes.
    pub fn save_graph(&self, graph: &Graph) -> Result<()> {
        for id in self.keys_with_prefix(NODE_PREFIX)? {
            let id = NodeId::new(id);
            if !graph.contains(&id) {
                self.delete_node(&id)?;
            }
        }
        for node in graph.iter() {
            self.put_node(node)?;
        }
        debug!(nodes = graph.len(), "graph saved");
        Ok(())
    }

    // --- Commit history ---

    /// Store one node's history buckets.
    pub fn put_history(&self, id: &NodeId, days: &DayDeltas) -> Result<()> {
        let key = format!("{}{}", HISTORY_PREFIX, id);
        let value = serde_json::to_vec(days)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// Get one node's history buckets.
    pub fn get_history(&self, id: &NodeId) -> Result<Option<DayDeltas>> {
        let key = format!("{}{}", HISTORY_PREFIX, id);
        match self.db.get(key.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Load the full commit history.
    pub fn load_history(&self) -> Result<CommitHistory> {
        let mut history = CommitHistory::new();
        for id in self.keys_with_prefix(HISTORY_PREFIX)? {
            let id = NodeId::new(id);
            if let Some(days) = self.get_history(&id)? {
                history.set_days(id, days);
            }
        }
        Ok(history)
    }

    /// Persist the full commit history, removing rows for dropped nodes.
    pub fn save_history(&self, history: &CommitHistory) -> Result<()> {
        for id in self.keys_with_prefix(HISTORY_PREFIX)? {
            let id = NodeId::new(id);
            if history.days(&id).is_none() {
                let key = format!("{}{}", HISTORY_PREFIX, id);
                self.db.delete(key.as_bytes())?;
            }
        }
        for id in history.node_ids() {
            if let Some(days) = history.days(id) {
                self.put_history(id, days)?;
            }
        }
        Ok(())
    }

    /// Ids of all keys under a prefix, prefix stripped.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let iter = self.db.prefix_iterator(prefix.as_bytes());
        for item in iter {
            let (key, _) = item?;
            if key.starts_with(prefix.as_bytes()) {
                let key_str = String::from_utf8_lossy(&key);
                if let Some(id) = key_str.strip_prefix(prefix) {
                    ids.push(id.to_string());
                }
            } else {
                break;
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn node_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let node = Node::new("app_dev", "App Develop")
            .with_commit(50.0)
            .at(100.0, 200.0)
            .with_link("ai_theory", 2);

        storage.put_node(&node).unwrap();
        let loaded = storage.get_node(&"app_dev".into()).unwrap().unwrap();
        assert_eq!(node, loaded);
    }

    #[test]
    fn load_graph_collects_all_nodes() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        storage.put_node(&Node::new("a", "A")).unwrap();
        storage.put_node(&Node::new("b", "B")).unwrap();

        let graph = storage.load_graph().unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.contains(&"a".into()));
    }

    #[test]
    fn save_graph_drops_deleted_nodes() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let mut graph = Graph::from_nodes([Node::new("a", "A"), Node::new("b", "B")]).unwrap();
        storage.save_graph(&graph).unwrap();

        graph.remove(&"b".into()).unwrap();
        storage.save_graph(&graph).unwrap();

        let reloaded = storage.load_graph().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(storage.get_node(&"b".into()).unwrap().is_none());
    }

    #[test]
    fn history_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let mut history = CommitHistory::new();
        history.record_on(&"a".into(), "2026-08-23", 12.0);
        history.record_on(&"a".into(), "2026-08-22", -3.0);
        history.record_on(&"b".into(), "2026-08-23", 7.0);

        storage.save_history(&history).unwrap();
        let loaded = storage.load_history().unwrap();
        assert_eq!(history, loaded);
    }

    #[test]
    fn activation_survives_persistence() {
        // The engine's output is retained across sessions via the node
        // records themselves.
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let mut node = Node::new("a", "A").with_commit(50.0);
        node.activation = 63.25;
        storage.put_node(&node).unwrap();

        let loaded = storage.get_node(&"a".into()).unwrap().unwrap();
        assert_eq!(loaded.activation, 63.25);
    }
}
