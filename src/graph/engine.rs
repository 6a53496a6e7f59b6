//! DisclosureGraph - the core disclosure engine.
//!
//! Owns the immutable flattened graph (node list, edge list, petgraph
//! topology with a stable-id index) and the one piece of mutable state:
//! the set of expanded node ids. From those it derives, on demand, the
//! visible subgraph and runs layout passes that merge positions back onto
//! the node records.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use serde::Serialize;

use super::edge::GraphEdge;
use super::flatten::FlatGraph;
use super::node::{GraphNode, Point};
use crate::layout::{LayoutDriver, LayoutSpacing, NodeExtent};

/// The derived subgraph eligible for display.
///
/// Recomputed from the flattened graph and the disclosure state on every
/// read; never stored as an independent source of truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisibleSubgraph {
    /// Visible nodes, in the flattener's original order.
    pub nodes: Vec<GraphNode>,
    /// Edges whose endpoints are both visible.
    pub edges: Vec<GraphEdge>,
}

/// The disclosure engine over one loaded dataset.
///
/// The flattened graph is immutable after construction; a new dataset load
/// builds a fresh engine. The only mutable state is the expanded-id set
/// and the node positions written by layout passes.
pub struct DisclosureGraph {
    /// All nodes, in preorder. Slot order is the display tie-break order.
    nodes: Vec<GraphNode>,
    /// All parent→child edges, in emission order.
    edges: Vec<GraphEdge>,
    /// Id of the root node, as resolved by the flattener.
    root_id: String,
    /// Topology; node weights are slots into `nodes`.
    topology: StableGraph<usize, ()>,
    /// Map from stable node id to topology index.
    id_to_index: HashMap<String, NodeIndex>,
    /// Expanded node ids. Membership is advisory: ids unknown to the graph
    /// may sit here harmlessly.
    expanded: HashSet<String>,
}

impl DisclosureGraph {
    /// Build the engine from a flattened graph.
    pub fn from_flat(flat: FlatGraph) -> Self {
        let FlatGraph {
            nodes,
            edges,
            root_id,
        } = flat;

        let mut topology = StableGraph::with_capacity(nodes.len(), edges.len());
        let mut id_to_index = HashMap::with_capacity(nodes.len());
        for (slot, node) in nodes.iter().enumerate() {
            let index = topology.add_node(slot);
            id_to_index.insert(node.id.clone(), index);
        }
        for edge in &edges {
            if let (Some(&source), Some(&target)) =
                (id_to_index.get(&edge.source), id_to_index.get(&edge.target))
            {
                topology.add_edge(source, target, ());
            }
        }

        Self {
            nodes,
            edges,
            root_id,
            topology,
            id_to_index,
            expanded: HashSet::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Id of the root node.
    #[inline]
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Total number of nodes in the flattened graph.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges in the flattened graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes, in the flattener's order.
    #[inline]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All edges, in the flattener's order.
    #[inline]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.id_to_index
            .get(id)
            .map(|&index| &self.nodes[self.topology[index]])
    }

    // =========================================================================
    // Disclosure State
    // =========================================================================

    /// Flip the expansion membership of `id`; returns the new membership.
    ///
    /// Never validated against the graph: toggling a stale or unknown id
    /// is safe and undone by a second toggle.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_owned());
            true
        }
    }

    /// Whether `id` is currently expanded.
    #[inline]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Expand every node of the graph.
    pub fn expand_all(&mut self) {
        self.expanded = self.nodes.iter().map(|node| node.id.clone()).collect();
    }

    /// Collapse everything back to the root-only view.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    // =========================================================================
    // Visibility Resolver
    // =========================================================================

    /// Derive the currently visible subgraph.
    ///
    /// A node is visible iff it is the root or reachable from the root via
    /// edges whose sources are all expanded. The root itself is visible
    /// unconditionally; its expansion only controls whether its children
    /// appear.
    pub fn visible(&self) -> VisibleSubgraph {
        let visible = self.visible_slots();
        let ids: HashSet<&str> = visible
            .iter()
            .map(|&slot| self.nodes[slot].id.as_str())
            .collect();

        VisibleSubgraph {
            nodes: self
                .nodes
                .iter()
                .enumerate()
                .filter(|(slot, _)| visible.contains(slot))
                .map(|(_, node)| node.clone())
                .collect(),
            edges: self
                .edges
                .iter()
                .filter(|edge| {
                    ids.contains(edge.source.as_str()) && ids.contains(edge.target.as_str())
                })
                .cloned()
                .collect(),
        }
    }

    /// Slots (indices into `nodes`) of the visible set, via an iterative
    /// work-list walk. The revisit guard makes this total on any finite
    /// input, and no recursion means depth is never a hazard.
    fn visible_slots(&self) -> HashSet<usize> {
        let mut visible = HashSet::new();
        let Some(&root_index) = self.id_to_index.get(&self.root_id) else {
            return visible;
        };
        visible.insert(self.topology[root_index]);

        let mut frontier = Vec::new();
        if self.expanded.contains(&self.root_id) {
            frontier.push(root_index);
        }

        while let Some(index) = frontier.pop() {
            for child in self.children(index) {
                let slot = self.topology[child];
                if !visible.insert(slot) {
                    continue;
                }
                if self.expanded.contains(&self.nodes[slot].id) {
                    frontier.push(child);
                }
            }
        }
        visible
    }

    /// Children of a topology node, in edge insertion order. petgraph walks
    /// neighbors most-recent-first, so the collected list is reversed back.
    fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .topology
            .neighbors_directed(index, Direction::Outgoing)
            .collect();
        children.reverse();
        children
    }

    // =========================================================================
    // Layout Orchestration
    // =========================================================================

    /// Position every node of the flattened graph (the whole-tree pass run
    /// once per dataset load).
    pub fn layout_full(&mut self, driver: &dyn LayoutDriver, spacing: &LayoutSpacing) {
        let slots: Vec<usize> = (0..self.nodes.len()).collect();
        self.run_layout(driver, spacing, &slots);
    }

    /// Re-position the visible subgraph. Must run after every visibility
    /// change so stale positions are never shown for a different visible
    /// set.
    pub fn layout_visible(&mut self, driver: &dyn LayoutDriver, spacing: &LayoutSpacing) {
        let mut slots: Vec<usize> = self.visible_slots().into_iter().collect();
        slots.sort_unstable();
        self.run_layout(driver, spacing, &slots);
    }

    /// Hand the selected nodes and their induced edges to the driver and
    /// merge the returned centers back as top-left anchors. Nodes the
    /// driver could not place keep their previous position.
    fn run_layout(&mut self, driver: &dyn LayoutDriver, spacing: &LayoutSpacing, slots: &[usize]) {
        let extents: Vec<NodeExtent> = slots
            .iter()
            .map(|&slot| NodeExtent {
                id: self.nodes[slot].id.clone(),
                width: spacing.node_width,
                height: spacing.node_height,
            })
            .collect();

        let included: HashSet<&str> = slots
            .iter()
            .map(|&slot| self.nodes[slot].id.as_str())
            .collect();
        let edges: Vec<(String, String)> = self
            .edges
            .iter()
            .filter(|edge| {
                included.contains(edge.source.as_str()) && included.contains(edge.target.as_str())
            })
            .map(|edge| (edge.source.clone(), edge.target.clone()))
            .collect();

        let centers = driver.compute(&extents, &edges, &spacing.options());
        log::debug!(
            "layout pass placed {} of {} nodes",
            centers.len(),
            extents.len()
        );

        for &slot in slots {
            if let Some(&(x, y)) = centers.get(self.nodes[slot].id.as_str()) {
                self.nodes[slot].position = Some(Point {
                    x: x - spacing.node_width / 2.0,
                    y: y - spacing.node_height / 2.0,
                });
            }
        }
    }
}
