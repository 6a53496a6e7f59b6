//! Edge type for the flattened ontology graph.
//!
//! Edges are directed parent→child links. The edge set is exactly the
//! parent/child relation of the source tree: one edge per non-root node,
//! no duplicates, nothing pointing into the root.

use std::fmt;

use serde::Serialize;

/// A directed parent→child edge of the flattened graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    /// Unique edge identifier, derived from the endpoint ids.
    pub id: String,
    /// Parent node id.
    pub source: String,
    /// Child node id.
    pub target: String,
}

impl GraphEdge {
    /// Create the edge from `source` to `target`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("edge-{source}-{target}"),
            source,
            target,
        }
    }
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_format() {
        let edge = GraphEdge::new("alkylating", "cisplatin");
        assert_eq!(edge.id, "edge-alkylating-cisplatin");
        assert_eq!(edge.source, "alkylating");
        assert_eq!(edge.target, "cisplatin");
    }

    #[test]
    fn test_edge_display() {
        let edge = GraphEdge::new("a", "b");
        assert_eq!(format!("{}", edge), "a -> b");
    }
}
