//! Graph data structures and the disclosure engine.
//!
//! This module provides the flattened representation of the ontology tree
//! (nodes, edges, attributes), the one-shot flattener that produces it,
//! and the `DisclosureGraph` engine that derives the visible subgraph from
//! the expanded-id set.

mod edge;
mod engine;
mod flatten;
mod node;

pub use edge::GraphEdge;
pub use engine::{DisclosureGraph, VisibleSubgraph};
pub use flatten::{FlatGraph, MalformedTreeError, flatten};
pub use node::{GraphNode, NodeAttributes, NodeKind, PhenotypeDetails, Point};
