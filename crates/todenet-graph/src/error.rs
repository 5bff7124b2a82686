//! Error types for graph editing operations.

use crate::NodeId;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by graph editing operations.
///
/// These guard the editing surface only. The propagation engine never sees
/// them: it tolerates whatever shape a loaded graph is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A node with this id already exists.
    DuplicateId(NodeId),

    /// No node with this id.
    NodeNotFound(NodeId),

    /// No link between these nodes.
    LinkNotFound {
        /// Link source.
        source: NodeId,
        /// Link target.
        target: NodeId,
    },

    /// A node may not link to itself through the editing surface.
    SelfLink(NodeId),

    /// Link weights are positive.
    ZeroWeight,
}

// Display is written by hand rather than derived with thiserror because the
// `LinkNotFound.source` field name would otherwise be inferred as an error
// source, which `NodeId` cannot be.
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DuplicateId(id) => write!(f, "duplicate node id: {id}"),
            Error::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Error::LinkNotFound { source, target } => {
                write!(f, "no link from {source} to {target}")
            }
            Error::SelfLink(id) => write!(f, "node {id} cannot link to itself"),
            Error::ZeroWeight => write!(f, "link weight must be positive"),
        }
    }
}

impl std::error::Error for Error {}
