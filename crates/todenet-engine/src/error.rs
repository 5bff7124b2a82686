//! Error types for the propagation engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the propagation engine.
///
/// The only fatal precondition is a bad configuration. Malformed graph
/// input (dangling link targets, empty graphs, linkless nodes) has
/// well-defined degenerate output and is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The configuration failed validation. No node was mutated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
