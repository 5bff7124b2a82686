//! JSON export and import of the full node list.
//!
//! The export format is the plain node array, pretty-printed - the same
//! shape a browser-side board would download. Import runs through the
//! graph's own insert so duplicate ids are rejected, and serde defaults
//! fill in fields older exports lack.

use chrono::Utc;
use todenet_graph::{Graph, Node};

use crate::error::Result;

/// Serialize the graph's nodes as pretty-printed JSON.
pub fn export_json(graph: &Graph) -> Result<String> {
    let nodes: Vec<&Node> = graph.iter().collect();
    Ok(serde_json::to_string_pretty(&nodes)?)
}

/// Parse an exported node array back into a graph.
pub fn import_json(data: &str) -> Result<Graph> {
    let nodes: Vec<Node> = serde_json::from_str(data)?;
    Ok(Graph::from_nodes(nodes)?)
}

/// Suggested filename for an export, dated today.
pub fn default_export_filename() -> String {
    format!("todenet_export_{}.json", Utc::now().format("%Y-%m-%d"))
}
