//! Minimal layered layout.
//!
//! A small stand-in for a full Sugiyama pipeline, sufficient for laying out
//! disclosure trees:
//!
//! 1. **Rank assignment:** longest path from the source layer, computed in
//!    topological order.
//! 2. **In-rank ordering:** preorder index from a DFS that follows edge
//!    insertion order. For trees this keeps subtrees contiguous, so edges
//!    never cross.
//! 3. **Coordinate assignment:** stack each rank along the cross axis, then
//!    run one deepest-to-root sweep centering parents over their children
//!    with separation re-enforced.
//!
//! The driver is stateless; every invocation builds its own scratch arrays
//! and discards them, so no nodes or edges can survive between passes.

use std::collections::{HashMap, VecDeque};

use super::{CenterMap, LayoutDriver, LayoutOptions, NodeExtent, RankDirection};

/// The built-in layered layout driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredLayout;

impl LayeredLayout {
    /// Create a layered layout driver.
    pub fn new() -> Self {
        Self
    }
}

impl LayoutDriver for LayeredLayout {
    fn compute(
        &self,
        nodes: &[NodeExtent],
        edges: &[(String, String)],
        options: &LayoutOptions,
    ) -> CenterMap {
        Scratch::build(nodes, edges).solve(options)
    }
}

/// Per-invocation working state.
struct Scratch<'a> {
    nodes: &'a [NodeExtent],
    /// Children per node, in edge insertion order.
    children: Vec<Vec<usize>>,
    /// Incoming edge count per node.
    in_degree: Vec<usize>,
}

impl<'a> Scratch<'a> {
    fn build(nodes: &'a [NodeExtent], edges: &[(String, String)]) -> Self {
        let index_of: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.as_str(), index))
            .collect();

        let mut children = vec![Vec::new(); nodes.len()];
        let mut in_degree = vec![0usize; nodes.len()];

        for (source, target) in edges {
            let (Some(&from), Some(&to)) =
                (index_of.get(source.as_str()), index_of.get(target.as_str()))
            else {
                // Edges into or out of unknown nodes are ignored.
                continue;
            };
            if from == to {
                continue;
            }
            children[from].push(to);
            in_degree[to] += 1;
        }

        Self {
            nodes,
            children,
            in_degree,
        }
    }

    fn solve(&self, options: &LayoutOptions) -> CenterMap {
        let count = self.nodes.len();
        if count == 0 {
            return CenterMap::new();
        }

        let rank = self.assign_ranks();
        let order = self.preorder();

        // Bucket nodes per rank, ordered by preorder index.
        let max_rank = rank.iter().copied().max().unwrap_or(0);
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
        for index in 0..count {
            layers[rank[index]].push(index);
        }
        for layer in &mut layers {
            layer.sort_by_key(|&index| order[index]);
        }

        // Extents relative to the layout axes.
        let lateral = |index: usize| match options.direction {
            RankDirection::LeftToRight => self.nodes[index].height,
            RankDirection::TopToBottom => self.nodes[index].width,
        };
        let forward = |index: usize| match options.direction {
            RankDirection::LeftToRight => self.nodes[index].width,
            RankDirection::TopToBottom => self.nodes[index].height,
        };

        // Initial stacking along the cross axis, per layer.
        let mut offset = vec![0.0f64; count];
        for layer in &layers {
            let mut cursor = 0.0;
            for &index in layer {
                offset[index] = cursor + lateral(index) / 2.0;
                cursor += lateral(index) + options.node_separation;
            }
        }

        // Parent-centering sweep, deepest layer toward the root layer.
        for depth in (0..max_rank).rev() {
            for &index in &layers[depth] {
                let descendants: Vec<usize> = self.children[index]
                    .iter()
                    .copied()
                    .filter(|&child| rank[child] > rank[index])
                    .collect();
                if descendants.is_empty() {
                    continue;
                }
                let sum: f64 = descendants.iter().map(|&child| offset[child]).sum();
                offset[index] = sum / descendants.len() as f64;
            }
            // Re-enforce separation in layer order.
            let layer = &layers[depth];
            for slot in 1..layer.len() {
                let previous = layer[slot - 1];
                let current = layer[slot];
                let minimum = offset[previous]
                    + lateral(previous) / 2.0
                    + options.node_separation
                    + lateral(current) / 2.0;
                if offset[current] < minimum {
                    offset[current] = minimum;
                }
            }
        }

        // Forward axis: one band per rank, sized by the widest member.
        let mut band_extent = vec![0.0f64; max_rank + 1];
        for (depth, layer) in layers.iter().enumerate() {
            band_extent[depth] = layer.iter().map(|&index| forward(index)).fold(0.0, f64::max);
        }
        let mut band_start = vec![0.0f64; max_rank + 1];
        let mut cursor = 0.0;
        for depth in 0..=max_rank {
            band_start[depth] = cursor;
            cursor += band_extent[depth] + options.rank_separation;
        }

        // Normalize the cross axis so the outermost box edge sits at zero.
        let min_edge = (0..count)
            .map(|index| offset[index] - lateral(index) / 2.0)
            .fold(f64::INFINITY, f64::min);

        let mut centers = CenterMap::with_capacity(count);
        for index in 0..count {
            let main = band_start[rank[index]] + band_extent[rank[index]] / 2.0;
            let cross = offset[index] - min_edge;
            let (x, y) = match options.direction {
                RankDirection::LeftToRight => (main, cross),
                RankDirection::TopToBottom => (cross, main),
            };
            centers.insert(self.nodes[index].id.clone(), (x, y));
        }
        centers
    }

    /// Longest-path ranks in topological order. Nodes on a cycle keep the
    /// best rank seen from their acyclic ancestors; the walk always
    /// terminates because every edge is relaxed at most once.
    fn assign_ranks(&self) -> Vec<usize> {
        let count = self.nodes.len();
        let mut rank = vec![0usize; count];
        let mut degree = self.in_degree.clone();
        let mut queue: VecDeque<usize> = (0..count).filter(|&index| degree[index] == 0).collect();

        while let Some(index) = queue.pop_front() {
            for &child in &self.children[index] {
                rank[child] = rank[child].max(rank[index] + 1);
                degree[child] -= 1;
                if degree[child] == 0 {
                    queue.push_back(child);
                }
            }
        }
        rank
    }

    /// Preorder index per node: DFS from the source nodes in input order,
    /// children in edge insertion order. Unreached nodes are appended in
    /// input order.
    fn preorder(&self) -> Vec<usize> {
        let count = self.nodes.len();
        let mut order = vec![usize::MAX; count];
        let mut visited = vec![false; count];
        let mut next = 0usize;
        let mut stack = Vec::new();

        for root in (0..count).filter(|&index| self.in_degree[index] == 0) {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            stack.push(root);
            while let Some(index) = stack.pop() {
                order[index] = next;
                next += 1;
                for &child in self.children[index].iter().rev() {
                    if !visited[child] {
                        visited[child] = true;
                        stack.push(child);
                    }
                }
            }
        }

        for index in 0..count {
            if order[index] == usize::MAX {
                order[index] = next;
                next += 1;
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: LayoutOptions = LayoutOptions {
        direction: RankDirection::LeftToRight,
        node_separation: 40.0,
        rank_separation: 200.0,
    };

    fn extents(ids: &[&str]) -> Vec<NodeExtent> {
        ids.iter()
            .map(|id| NodeExtent {
                id: (*id).to_owned(),
                width: 200.0,
                height: 80.0,
            })
            .collect()
    }

    fn pairs(edges: &[(&str, &str)]) -> Vec<(String, String)> {
        edges
            .iter()
            .map(|(s, t)| ((*s).to_owned(), (*t).to_owned()))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let centers = LayeredLayout::new().compute(&[], &[], &OPTIONS);
        assert!(centers.is_empty());
    }

    #[test]
    fn test_single_node_centered_on_its_box() {
        let centers = LayeredLayout::new().compute(&extents(&["root"]), &[], &OPTIONS);
        assert_eq!(centers["root"], (100.0, 40.0));
    }

    #[test]
    fn test_ranks_advance_along_every_edge() {
        let nodes = extents(&["r", "a", "b", "c", "d"]);
        let edges = pairs(&[("r", "a"), ("r", "b"), ("a", "c"), ("a", "d")]);
        let centers = LayeredLayout::new().compute(&nodes, &edges, &OPTIONS);

        for (source, target) in &edges {
            assert!(
                centers[target].0 > centers[source].0,
                "edge {source}->{target} must advance in x"
            );
        }
        // Uniform boxes: one x per rank.
        assert_eq!(centers["a"].0, centers["b"].0);
        assert_eq!(centers["c"].0, centers["d"].0);
        assert_eq!(centers["a"].0 - centers["r"].0, 400.0); // width + ranksep
    }

    #[test]
    fn test_in_rank_separation_is_enforced() {
        let nodes = extents(&["r", "a", "b", "c"]);
        let edges = pairs(&[("r", "a"), ("r", "b"), ("r", "c")]);
        let centers = LayeredLayout::new().compute(&nodes, &edges, &OPTIONS);

        let mut ys: Vec<f64> = ["a", "b", "c"].iter().map(|id| centers[*id].1).collect();
        ys.sort_by(|left, right| left.total_cmp(right));
        for pair in ys.windows(2) {
            assert!(
                pair[1] - pair[0] >= 120.0 - 1e-9,
                "siblings closer than height + separation: {ys:?}"
            );
        }
    }

    #[test]
    fn test_parent_centered_over_children() {
        let nodes = extents(&["r", "a", "b"]);
        let edges = pairs(&[("r", "a"), ("r", "b")]);
        let centers = LayeredLayout::new().compute(&nodes, &edges, &OPTIONS);

        let midpoint = (centers["a"].1 + centers["b"].1) / 2.0;
        assert!((centers["r"].1 - midpoint).abs() < 1e-9);
    }

    #[test]
    fn test_subtrees_do_not_interleave() {
        // Two subtrees of two leaves each; preorder ordering must keep each
        // parent's leaves adjacent.
        let nodes = extents(&["r", "a", "b", "a1", "a2", "b1", "b2"]);
        let edges = pairs(&[
            ("r", "a"),
            ("r", "b"),
            ("a", "a1"),
            ("a", "a2"),
            ("b", "b1"),
            ("b", "b2"),
        ]);
        let centers = LayeredLayout::new().compute(&nodes, &edges, &OPTIONS);

        let a_max = centers["a1"].1.max(centers["a2"].1);
        let b_min = centers["b1"].1.min(centers["b2"].1);
        assert!(a_max < b_min, "a-leaves must all sit before b-leaves");
    }

    #[test]
    fn test_deterministic() {
        let nodes = extents(&["r", "a", "b", "c", "d", "e"]);
        let edges = pairs(&[("r", "a"), ("r", "b"), ("a", "c"), ("a", "d"), ("b", "e")]);
        let driver = LayeredLayout::new();
        assert_eq!(
            driver.compute(&nodes, &edges, &OPTIONS),
            driver.compute(&nodes, &edges, &OPTIONS)
        );
    }

    #[test]
    fn test_unknown_endpoints_and_self_loops_ignored() {
        let nodes = extents(&["r", "a"]);
        let edges = pairs(&[("r", "a"), ("r", "ghost"), ("ghost", "a"), ("a", "a")]);
        let centers = LayeredLayout::new().compute(&nodes, &edges, &OPTIONS);

        assert_eq!(centers.len(), 2);
        assert!(centers["a"].0 > centers["r"].0);
    }

    #[test]
    fn test_cycle_terminates() {
        let nodes = extents(&["a", "b", "c"]);
        let edges = pairs(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let centers = LayeredLayout::new().compute(&nodes, &edges, &OPTIONS);
        assert_eq!(centers.len(), 3);
    }

    #[test]
    fn test_top_to_bottom_swaps_axes() {
        let nodes = extents(&["r", "a", "b"]);
        let edges = pairs(&[("r", "a"), ("r", "b")]);
        let options = LayoutOptions {
            direction: RankDirection::TopToBottom,
            ..OPTIONS
        };
        let centers = LayeredLayout::new().compute(&nodes, &edges, &options);

        assert!(centers["a"].1 > centers["r"].1, "ranks advance in y");
        assert_eq!(centers["a"].1, centers["b"].1);
        assert!(
            (centers["a"].0 - centers["b"].0).abs() >= 240.0 - 1e-9,
            "siblings separated in x by width + separation"
        );
    }

    #[test]
    fn test_cross_axis_starts_at_zero() {
        let nodes = extents(&["r", "a", "b", "c"]);
        let edges = pairs(&[("r", "a"), ("r", "b"), ("r", "c")]);
        let centers = LayeredLayout::new().compute(&nodes, &edges, &OPTIONS);

        let min_top = centers
            .values()
            .map(|&(_, y)| y - 40.0)
            .fold(f64::INFINITY, f64::min);
        assert!(min_top.abs() < 1e-9);
    }
}
