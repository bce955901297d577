//! Graph container APIs used by `lineage`.
//!
//! Nodes are keyed by string ids and carry a label of type `N`; edges are keyed by their
//! endpoints and carry a label of type `E`. Insertion order is preserved everywhere so that every
//! algorithm in [`alg`] is deterministic for a given construction sequence.

mod graph;

pub use graph::alg;
pub use graph::{EdgeKey, Graph, GraphOptions};
