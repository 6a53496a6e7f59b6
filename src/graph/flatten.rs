//! Tree flattener: nested source tree → flat node and edge lists.
//!
//! The flattener runs exactly once per dataset load. It walks the nested
//! JSON document in preorder, visiting children in their given order, and
//! emits one `GraphNode` per tree node plus one parent→child `GraphEdge`
//! per non-root node. Emission order is deterministic and becomes the
//! tie-break order for everything downstream.
//!
//! Nodes without a usable `id` get a synthesized `node-<n>` identifier from
//! a counter scoped to the single flatten call, so repeated flattens of the
//! same document always agree.

use serde_json::{Map, Value};
use thiserror::Error;

use super::edge::GraphEdge;
use super::node::{GraphNode, NodeAttributes, NodeKind};

/// Structural defects in the source tree, detected during flattening.
///
/// A malformed tree halts graph construction; whatever graph was loaded
/// before stays untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedTreeError {
    /// The document root is not a JSON object.
    #[error("tree root is not an object")]
    RootNotAnObject,
    /// The root node has no usable `name`.
    #[error("tree root is missing a name")]
    MissingRootName,
    /// A `children` field exists but is not an array.
    #[error("children of node `{parent}` is not a sequence")]
    ChildrenNotASequence {
        /// Id of the offending node.
        parent: String,
    },
    /// A child entry is not a JSON object.
    #[error("a child of node `{parent}` is not an object")]
    ChildNotAnObject {
        /// Id of the parent whose child list is broken.
        parent: String,
    },
}

/// The flattened graph: immutable node and edge lists plus the resolved
/// root id.
///
/// The root id is explicit output rather than an assumed literal, so
/// datasets whose root carries any identifier (or none) work the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatGraph {
    /// All nodes, in preorder.
    pub nodes: Vec<GraphNode>,
    /// All parent→child edges, in emission order.
    pub edges: Vec<GraphEdge>,
    /// Id of the single root node.
    pub root_id: String,
}

/// Flatten a nested source tree into nodes and edges.
///
/// Purely functional over its input: no side effects beyond the returned
/// graph. Traversal is iterative, so source depth is bounded only by
/// memory, not by the call stack.
pub fn flatten(tree: &Value) -> Result<FlatGraph, MalformedTreeError> {
    let root = tree.as_object().ok_or(MalformedTreeError::RootNotAnObject)?;
    if root.get("name").and_then(Value::as_str).is_none() {
        return Err(MalformedTreeError::MissingRootName);
    }

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut root_id = String::new();
    // Counter for synthesized ids, threaded explicitly through the walk.
    let mut synthesized: u64 = 0;

    let mut stack: Vec<(&Map<String, Value>, Option<String>)> = vec![(root, None)];

    while let Some((object, parent_id)) = stack.pop() {
        let id = resolve_id(object, &mut synthesized);

        match &parent_id {
            Some(parent) => edges.push(GraphEdge::new(parent.clone(), id.clone())),
            None => root_id = id.clone(),
        }
        nodes.push(build_node(object, &id));

        match object.get("children") {
            None | Some(Value::Null) => {}
            Some(Value::Array(children)) => {
                // Reverse push keeps preorder emission in the given order.
                for child in children.iter().rev() {
                    let child_object = child
                        .as_object()
                        .ok_or_else(|| MalformedTreeError::ChildNotAnObject {
                            parent: id.clone(),
                        })?;
                    stack.push((child_object, Some(id.clone())));
                }
            }
            Some(_) => {
                return Err(MalformedTreeError::ChildrenNotASequence { parent: id });
            }
        }
    }

    Ok(FlatGraph {
        nodes,
        edges,
        root_id,
    })
}

/// Use the explicit id when present and non-empty, otherwise synthesize one.
fn resolve_id(object: &Map<String, Value>, synthesized: &mut u64) -> String {
    match object.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => {
            let id = format!("node-{synthesized}");
            *synthesized += 1;
            id
        }
    }
}

/// Build a graph node, carrying through every source field except `children`.
fn build_node(object: &Map<String, Value>, id: &str) -> GraphNode {
    let kind = NodeKind::from_type(object.get("type").and_then(Value::as_str));
    let label = object
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    let mut fields = Map::new();
    for (key, value) in object {
        // The structure lives in the edge list; a source `label` is
        // superseded by the derived one.
        if key == "children" || key == "label" {
            continue;
        }
        fields.insert(key.clone(), value.clone());
    }

    GraphNode {
        id: id.to_owned(),
        kind,
        attributes: NodeAttributes { label, fields },
        position: None,
    }
}
