//! Explorer session: dataset lifecycle and event routing.
//!
//! The session begins in "awaiting data" and stays there until a dataset
//! parses and flattens successfully. Every mutation is a discrete,
//! sequential event: a disclosure toggle synchronously re-derives the
//! visible subgraph and re-runs layout before the next event is seen, so
//! stale positions are never observable.

use serde_json::Value;
use thiserror::Error;

use super::dispatcher::{ClickOutcome, DispatcherState, InteractionDispatcher};
use crate::graph::{
    DisclosureGraph, MalformedTreeError, PhenotypeDetails, VisibleSubgraph, flatten,
};
use crate::layout::{LayeredLayout, LayoutDriver, LayoutSpacing};

/// Dataset intake failures.
///
/// Either variant leaves the session exactly as it was: a fresh session
/// stays awaiting data, and a previously loaded graph (including its
/// disclosure state and selection) survives untouched.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The document is not valid JSON.
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but is not a well-formed tree.
    #[error(transparent)]
    Malformed(#[from] MalformedTreeError),
}

enum LoadState {
    AwaitingData,
    Ready(DisclosureGraph),
}

/// One explorer session: load state, disclosure engine, dispatcher and
/// layout wiring.
pub struct ExplorerSession {
    state: LoadState,
    dispatcher: InteractionDispatcher,
    layout: Box<dyn LayoutDriver>,
    initial_spacing: LayoutSpacing,
    focus_spacing: LayoutSpacing,
}

impl ExplorerSession {
    /// Create a session with the built-in layered layout and the standard
    /// spacing presets.
    pub fn new() -> Self {
        Self::with_layout(
            Box::new(LayeredLayout::new()),
            LayoutSpacing::INITIAL,
            LayoutSpacing::FOCUSED,
        )
    }

    /// Create a session with a custom layout driver and spacing presets.
    pub fn with_layout(
        layout: Box<dyn LayoutDriver>,
        initial_spacing: LayoutSpacing,
        focus_spacing: LayoutSpacing,
    ) -> Self {
        Self {
            state: LoadState::AwaitingData,
            dispatcher: InteractionDispatcher::new(),
            layout,
            initial_spacing,
            focus_spacing,
        }
    }

    /// Whether the session is still waiting for a dataset.
    #[inline]
    pub fn is_awaiting_data(&self) -> bool {
        matches!(self.state, LoadState::AwaitingData)
    }

    /// The loaded disclosure engine, if any.
    pub fn graph(&self) -> Option<&DisclosureGraph> {
        match &self.state {
            LoadState::Ready(graph) => Some(graph),
            LoadState::AwaitingData => None,
        }
    }

    /// Load a dataset document from JSON text, replacing any previously
    /// loaded graph.
    ///
    /// On success the disclosure state resets to empty and any open detail
    /// view closes; the whole tree is laid out once with the initial
    /// preset, then the root-only visible set with the focus preset. On
    /// failure the previous state stays fully intact.
    pub fn load_dataset(&mut self, json: &str) -> Result<(), DatasetError> {
        let document: Value = serde_json::from_str(json)?;
        self.load_tree(&document)?;
        Ok(())
    }

    /// Load an already parsed dataset document. Same replacement and
    /// failure semantics as [`load_dataset`](Self::load_dataset).
    pub fn load_tree(&mut self, document: &Value) -> Result<(), MalformedTreeError> {
        let flat = flatten(document)?;

        let mut graph = DisclosureGraph::from_flat(flat);
        graph.layout_full(&*self.layout, &self.initial_spacing);
        graph.layout_visible(&*self.layout, &self.focus_spacing);

        log::info!(
            "dataset loaded: {} nodes, {} edges, root `{}`",
            graph.node_count(),
            graph.edge_count(),
            graph.root_id()
        );
        self.dispatcher.close();
        self.state = LoadState::Ready(graph);
        Ok(())
    }

    /// Handle a click on a node.
    ///
    /// Before a dataset is loaded no click is meaningful, so all are
    /// dropped. A toggle re-runs the visibility → layout chain before
    /// returning; opening or replacing a detail selection does not.
    pub fn click(&mut self, id: &str) -> ClickOutcome {
        let LoadState::Ready(graph) = &mut self.state else {
            log::debug!("click on `{id}` while awaiting data, ignoring");
            return ClickOutcome::Ignored;
        };

        let outcome = self.dispatcher.click(graph, id);
        if matches!(outcome, ClickOutcome::ToggledExpansion { .. }) {
            graph.layout_visible(&*self.layout, &self.focus_spacing);
        }
        outcome
    }

    /// Close the detail view. Safe at any time, including while awaiting
    /// data.
    pub fn close_detail(&mut self) {
        self.dispatcher.close();
    }

    /// Expand every node and re-lay out the now fully visible tree.
    pub fn expand_all(&mut self) {
        if let LoadState::Ready(graph) = &mut self.state {
            graph.expand_all();
            graph.layout_visible(&*self.layout, &self.focus_spacing);
        }
    }

    /// Collapse back to the root-only view.
    pub fn collapse_all(&mut self) {
        if let LoadState::Ready(graph) = &mut self.state {
            graph.collapse_all();
            graph.layout_visible(&*self.layout, &self.focus_spacing);
        }
    }

    /// The currently visible subgraph; empty while awaiting data.
    pub fn visible(&self) -> VisibleSubgraph {
        match &self.state {
            LoadState::Ready(graph) => graph.visible(),
            LoadState::AwaitingData => VisibleSubgraph::default(),
        }
    }

    /// The active phenotype selection, if the detail view is open.
    pub fn selected_phenotype(&self) -> Option<&PhenotypeDetails> {
        self.dispatcher.selected()
    }

    /// Dispatcher state, for collaborators that mirror the panel.
    pub fn detail_state(&self) -> DispatcherState {
        self.dispatcher.state()
    }
}

impl Default for ExplorerSession {
    fn default() -> Self {
        Self::new()
    }
}
