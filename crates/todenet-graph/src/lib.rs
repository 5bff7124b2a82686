//! Todenet Board Graph
//!
//! The data model for the node-and-link board: labeled nodes carrying a
//! numeric "commit" (effort) value, joined by weighted directed links.
//!
//! # Shape
//!
//! Every node owns its **outgoing** links as a map from target id to a
//! positive weight; the graph as a whole is simply the union of those maps.
//! There is no separate edge list to keep in sync.
//!
//! # Invariants
//!
//! - Node ids are unique (`Graph::insert` enforces this).
//! - The editing surface never creates self-loops; loaded data might carry
//!   one, and consumers must not choke on it.
//! - Weights are positive integers here (the editor cycles them through
//!   1, 2, 3), but nothing downstream may assume that range.
//!
//! The propagation engine that spreads commit values through this graph
//! lives in `todenet-engine`; this crate is pure data plus editing ops.

mod error;
mod graph;
mod node;

pub use error::{Error, Result};
pub use graph::{Graph, MAX_WEIGHT, MIN_WEIGHT};
pub use node::{Node, NodeId, DEFAULT_COLOR};

// The editor cycle only makes sense if it starts at the minimum.
const _: () = assert!(MIN_WEIGHT == 1 && MAX_WEIGHT >= MIN_WEIGHT);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_is_union_of_link_maps() {
        let graph = Graph::from_nodes([
            Node::new("a", "A").with_link("b", 1),
            Node::new("b", "B").with_link("a", 2).with_link("c", 3),
            Node::new("c", "C"),
        ])
        .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 3);
    }
}
