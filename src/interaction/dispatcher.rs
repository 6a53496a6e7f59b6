//! Click dispatch state machine.
//!
//! Two states: `Idle` and `DetailOpen`. A phenotype click opens (or
//! replaces) the detail selection; any other click toggles that node's
//! disclosure. The expansion and detail axes are independent: toggling
//! never closes an open panel, and opening a panel never collapses
//! anything.

use serde::Serialize;

use crate::graph::{DisclosureGraph, PhenotypeDetails};

/// Dispatcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatcherState {
    /// No detail view open.
    #[default]
    Idle,
    /// A phenotype's detail view is open.
    DetailOpen,
}

/// What a click did, reported back to the caller so it can decide whether
/// a re-layout is due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickOutcome {
    /// A non-phenotype node's disclosure was flipped.
    ToggledExpansion {
        /// The toggled node id.
        id: String,
        /// Membership after the toggle.
        expanded: bool,
    },
    /// A phenotype's detail view was opened or its selection replaced.
    OpenedDetail {
        /// The selected phenotype id.
        id: String,
    },
    /// The click referenced no known node and was dropped.
    Ignored,
}

/// Maps clicks to disclosure toggles or the detail view.
#[derive(Debug, Default)]
pub struct InteractionDispatcher {
    state: DispatcherState,
    selected: Option<PhenotypeDetails>,
}

impl InteractionDispatcher {
    /// Create a dispatcher in the `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> DispatcherState {
        self.state
    }

    /// The active phenotype selection, if the detail view is open.
    #[inline]
    pub fn selected(&self) -> Option<&PhenotypeDetails> {
        self.selected.as_ref()
    }

    /// Handle a click on `id`.
    ///
    /// A stale id (one the graph no longer knows) is recovered locally as
    /// a no-op; it never propagates.
    pub fn click(&mut self, graph: &mut DisclosureGraph, id: &str) -> ClickOutcome {
        if let Some(node) = graph.node(id) {
            if node.is_phenotype() {
                self.selected = Some(PhenotypeDetails::from_node(node));
                self.state = DispatcherState::DetailOpen;
                return ClickOutcome::OpenedDetail { id: node.id.clone() };
            }
        } else {
            log::warn!("click on stale node id `{id}`; no such node in the graph");
            return ClickOutcome::Ignored;
        }

        let expanded = graph.toggle(id);
        ClickOutcome::ToggledExpansion {
            id: id.to_owned(),
            expanded,
        }
    }

    /// Close the detail view and clear the selection. Safe to call from
    /// `Idle`.
    pub fn close(&mut self) {
        self.selected = None;
        self.state = DispatcherState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::flatten;
    use serde_json::json;

    fn graph() -> DisclosureGraph {
        let tree = json!({
            "id": "root", "name": "R", "type": "root",
            "children": [
                { "id": "a", "name": "A", "type": "therapy_class", "children": [
                    { "id": "b", "name": "B", "type": "phenotype", "cut_id": "CUT-1" },
                    { "id": "c", "name": "C", "type": "phenotype", "cut_id": "CUT-2" }
                ]}
            ]
        });
        DisclosureGraph::from_flat(flatten(&tree).unwrap())
    }

    #[test]
    fn test_phenotype_click_opens_detail() {
        let mut graph = graph();
        let mut dispatcher = InteractionDispatcher::new();

        let outcome = dispatcher.click(&mut graph, "b");
        assert_eq!(outcome, ClickOutcome::OpenedDetail { id: "b".into() });
        assert_eq!(dispatcher.state(), DispatcherState::DetailOpen);

        let details = dispatcher.selected().unwrap();
        assert_eq!(details.name, "B");
        assert_eq!(details.cut_id.as_deref(), Some("CUT-1"));
        // Opening the detail view never touches disclosure.
        assert!(!graph.is_expanded("b"));
    }

    #[test]
    fn test_second_phenotype_click_replaces_selection() {
        let mut graph = graph();
        let mut dispatcher = InteractionDispatcher::new();

        dispatcher.click(&mut graph, "b");
        dispatcher.click(&mut graph, "c");

        assert_eq!(dispatcher.state(), DispatcherState::DetailOpen);
        assert_eq!(dispatcher.selected().unwrap().id, "c");
    }

    #[test]
    fn test_non_phenotype_click_toggles() {
        let mut graph = graph();
        let mut dispatcher = InteractionDispatcher::new();

        let outcome = dispatcher.click(&mut graph, "a");
        assert_eq!(
            outcome,
            ClickOutcome::ToggledExpansion {
                id: "a".into(),
                expanded: true
            }
        );
        assert!(graph.is_expanded("a"));
        assert_eq!(dispatcher.state(), DispatcherState::Idle);

        let outcome = dispatcher.click(&mut graph, "a");
        assert_eq!(
            outcome,
            ClickOutcome::ToggledExpansion {
                id: "a".into(),
                expanded: false
            }
        );
        assert!(!graph.is_expanded("a"));
    }

    #[test]
    fn test_toggle_does_not_close_open_detail() {
        let mut graph = graph();
        let mut dispatcher = InteractionDispatcher::new();

        dispatcher.click(&mut graph, "b");
        dispatcher.click(&mut graph, "a");

        // The two axes are independent.
        assert_eq!(dispatcher.state(), DispatcherState::DetailOpen);
        assert_eq!(dispatcher.selected().unwrap().id, "b");
        assert!(graph.is_expanded("a"));
    }

    #[test]
    fn test_stale_click_is_a_no_op() {
        let mut graph = graph();
        let mut dispatcher = InteractionDispatcher::new();
        dispatcher.click(&mut graph, "b");

        let outcome = dispatcher.click(&mut graph, "vanished");
        assert_eq!(outcome, ClickOutcome::Ignored);
        assert_eq!(dispatcher.state(), DispatcherState::DetailOpen);
        assert_eq!(dispatcher.selected().unwrap().id, "b");
    }

    #[test]
    fn test_close_clears_selection_and_is_idempotent() {
        let mut graph = graph();
        let mut dispatcher = InteractionDispatcher::new();

        // Closing from Idle is a safe no-op.
        dispatcher.close();
        assert_eq!(dispatcher.state(), DispatcherState::Idle);

        dispatcher.click(&mut graph, "b");
        dispatcher.close();
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
        assert!(dispatcher.selected().is_none());

        dispatcher.close();
        assert_eq!(dispatcher.state(), DispatcherState::Idle);
    }

    #[test]
    fn test_root_click_toggles_like_any_non_phenotype() {
        let mut graph = graph();
        let mut dispatcher = InteractionDispatcher::new();

        let outcome = dispatcher.click(&mut graph, "root");
        assert_eq!(
            outcome,
            ClickOutcome::ToggledExpansion {
                id: "root".into(),
                expanded: true
            }
        );
    }
}
