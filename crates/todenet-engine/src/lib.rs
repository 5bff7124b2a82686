//! Todenet Activation Engine
//!
//! Spreads each node's commit value through the weighted directed link
//! graph over a bounded number of rounds, producing a derived "activation"
//! score per node.
//!
//! # Update rule
//!
//! The engine is a synchronous fixed-point iteration (Jacobi update): every
//! round reads the activations as they stood when the round began, and all
//! increments land simultaneously at the round's end. In-place updates
//! would let node ordering bias the result for edge pairs like A->B / B->A.
//!
//! Per round, an edge `S -> T` with weight `w` adds
//! `w * (S.commit + S.activation * rate) / iterations` to `T`, and every
//! node adds `commit / iterations` to itself. Summed over a full run the
//! self term totals exactly `commit`, so the output scale does not depend
//! on the iteration count, and an isolated node ends at its own commit.
//!
//! # Contract
//!
//! One call mutates `activation` in place across the whole graph and
//! touches nothing else. Activations are reset first, so runs are
//! idempotent. The only error is an invalid configuration (zero rounds,
//! non-finite or negative rate); dangling link targets are silently
//! skipped. The engine holds no state between calls - callers own the
//! graph, the scheduling, and the one-run-at-a-time discipline.

mod config;
mod error;
mod propagate;

pub use config::{PropagationConfig, DEFAULT_ITERATIONS, DEFAULT_RATE};
pub use error::{Error, Result};
pub use propagate::propagate;
