//! OntoTree - WASM Module
//!
//! This module provides the hierarchical disclosure graph engine behind the
//! OntoTree ontology explorer. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen; the JS side owns rendering,
//! pan/zoom and the detail panel, and feeds clicks back in by node id.
//!
//! # Architecture
//!
//! - `graph`: flattened tree representation and the disclosure engine
//! - `layout`: layered layout of the visible subgraph
//! - `interaction`: click dispatch state machine and the explorer session

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod graph;
pub mod interaction;
pub mod layout;

use graph::Point;
use interaction::ExplorerSession;

/// Initialize the WASM module: panic hook and console logging sink.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Main entry point for the disclosure engine.
///
/// Wraps the internal `ExplorerSession` and provides the public API exposed
/// to JavaScript. The session starts in the awaiting-data state; the JS
/// side fetches the dataset document and hands the text to `loadDataset`.
#[wasm_bindgen]
pub struct OntoTreeWasm {
    session: ExplorerSession,
}

#[wasm_bindgen]
impl OntoTreeWasm {
    /// Create an engine in the awaiting-data state.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: ExplorerSession::new(),
        }
    }

    // =========================================================================
    // Dataset Lifecycle
    // =========================================================================

    /// Load a dataset document from JSON text.
    ///
    /// Returns true on success. On failure the error is reported to the
    /// console sink and the engine keeps its previous state (awaiting data
    /// if nothing was ever loaded); there is no automatic retry.
    #[wasm_bindgen(js_name = loadDataset)]
    pub fn load_dataset(&mut self, json: &str) -> bool {
        match self.session.load_dataset(json) {
            Ok(()) => true,
            Err(error) => {
                log::error!("dataset load failed: {error}");
                false
            }
        }
    }

    /// Whether the engine is still waiting for a dataset.
    #[wasm_bindgen(js_name = isAwaitingData)]
    pub fn is_awaiting_data(&self) -> bool {
        self.session.is_awaiting_data()
    }

    /// Total number of nodes in the loaded graph (0 while awaiting data).
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.session.graph().map_or(0, |graph| graph.node_count())
    }

    /// Total number of edges in the loaded graph (0 while awaiting data).
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> usize {
        self.session.graph().map_or(0, |graph| graph.edge_count())
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Handle a click on a node.
    ///
    /// Returns the outcome as `{ action: "toggled_expansion" | "opened_detail"
    /// | "ignored", ... }` so the renderer knows whether positions changed.
    pub fn click(&mut self, node_id: &str) -> JsValue {
        let outcome = self.session.click(node_id);
        serde_wasm_bindgen::to_value(&outcome).unwrap_or(JsValue::NULL)
    }

    /// Close the phenotype detail view. Safe no-op when nothing is open.
    #[wasm_bindgen(js_name = closeDetail)]
    pub fn close_detail(&mut self) {
        self.session.close_detail();
    }

    /// Expand every node at once.
    #[wasm_bindgen(js_name = expandAll)]
    pub fn expand_all(&mut self) {
        self.session.expand_all();
    }

    /// Collapse back to the root-only view.
    #[wasm_bindgen(js_name = collapseAll)]
    pub fn collapse_all(&mut self) {
        self.session.collapse_all();
    }

    // =========================================================================
    // Derived State for the Renderer
    // =========================================================================

    /// The visible nodes with their attributes and top-left positions.
    #[wasm_bindgen(js_name = visibleNodes)]
    pub fn visible_nodes(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.visible().nodes).unwrap_or(JsValue::NULL)
    }

    /// The visible edges.
    #[wasm_bindgen(js_name = visibleEdges)]
    pub fn visible_edges(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.visible().edges).unwrap_or(JsValue::NULL)
    }

    /// Interleaved top-left positions `[x0, y0, x1, y1, ...]` in
    /// `visibleNodes` order, for renderers that prefer a typed array.
    #[wasm_bindgen(js_name = visiblePositions)]
    pub fn visible_positions(&self) -> Float32Array {
        let visible = self.session.visible();
        let mut coords = Vec::with_capacity(visible.nodes.len() * 2);
        for node in &visible.nodes {
            let position = node.position.unwrap_or(Point { x: 0.0, y: 0.0 });
            coords.push(position.x as f32);
            coords.push(position.y as f32);
        }
        Float32Array::from(&coords[..])
    }

    /// The active phenotype selection for the detail panel, or null.
    #[wasm_bindgen(js_name = selectedPhenotype)]
    pub fn selected_phenotype(&self) -> JsValue {
        match self.session.selected_phenotype() {
            Some(details) => serde_wasm_bindgen::to_value(details).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }
}

impl Default for OntoTreeWasm {
    fn default() -> Self {
        Self::new()
    }
}
