//! Interaction handling.
//!
//! `InteractionDispatcher` maps node clicks to either a disclosure toggle
//! or the phenotype detail view; `ExplorerSession` wires the dispatcher,
//! the disclosure engine and the layout driver into the event loop the JS
//! boundary drives.

mod dispatcher;
mod session;

pub use dispatcher::{ClickOutcome, DispatcherState, InteractionDispatcher};
pub use session::{DatasetError, ExplorerSession};
