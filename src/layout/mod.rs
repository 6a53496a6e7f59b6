//! Layout of the visible subgraph.
//!
//! The engine treats layout as an external collaborator: a pure function
//! from (sized nodes, directed edges, options) to center coordinates. The
//! `LayoutDriver` trait is that seam; `LayeredLayout` is the built-in
//! layered implementation used by the wasm boundary. Embedders and tests
//! can supply their own driver.

pub mod layered;

pub use layered::LayeredLayout;

use std::collections::HashMap;

/// Which way ranks advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDirection {
    /// Ranks advance along the x axis; siblings stack vertically.
    #[default]
    LeftToRight,
    /// Ranks advance along the y axis; siblings stack horizontally.
    TopToBottom,
}

/// A node handed to a layout driver: its id and bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeExtent {
    /// Stable node id, the key of the returned center map.
    pub id: String,
    /// Bounding box width.
    pub width: f64,
    /// Bounding box height.
    pub height: f64,
}

/// Options for one layout invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Rank direction.
    pub direction: RankDirection,
    /// Minimum gap between nodes sharing a rank.
    pub node_separation: f64,
    /// Gap between consecutive ranks.
    pub rank_separation: f64,
}

/// Center coordinates keyed by node id.
///
/// A driver may omit nodes it could not place; callers keep the previous
/// position for those.
pub type CenterMap = HashMap<String, (f64, f64)>;

/// The external layout collaborator seam.
///
/// Implementations must be pure with respect to their input: no state
/// carried between invocations, so stale nodes or edges can never leak
/// from one layout pass into the next.
pub trait LayoutDriver {
    /// Compute center coordinates for the given subgraph.
    fn compute(
        &self,
        nodes: &[NodeExtent],
        edges: &[(String, String)],
        options: &LayoutOptions,
    ) -> CenterMap;
}

/// Node box and separation parameters for one layout pass.
///
/// Two presets exist: `INITIAL` for the whole-tree pass on dataset load and
/// `FOCUSED` for the re-layout after a visibility change, which spreads the
/// smaller filtered graph wider for readability. Any other values are
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpacing {
    /// Uniform node box width.
    pub node_width: f64,
    /// Uniform node box height.
    pub node_height: f64,
    /// Minimum gap between nodes sharing a rank.
    pub node_separation: f64,
    /// Gap between consecutive ranks.
    pub rank_separation: f64,
    /// Rank direction.
    pub direction: RankDirection,
}

impl LayoutSpacing {
    /// Whole-tree pass on dataset load.
    pub const INITIAL: Self = Self {
        node_width: 200.0,
        node_height: 80.0,
        node_separation: 40.0,
        rank_separation: 200.0,
        direction: RankDirection::LeftToRight,
    };

    /// Re-layout of the filtered visible subgraph.
    pub const FOCUSED: Self = Self {
        node_width: 200.0,
        node_height: 80.0,
        node_separation: 60.0,
        rank_separation: 260.0,
        direction: RankDirection::LeftToRight,
    };

    /// The per-invocation options carried by this spacing.
    pub fn options(&self) -> LayoutOptions {
        LayoutOptions {
            direction: self.direction,
            node_separation: self.node_separation,
            rank_separation: self.rank_separation,
        }
    }
}
