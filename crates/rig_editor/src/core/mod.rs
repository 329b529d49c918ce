//! Core rig types: click picking and the selection state machine.

mod picking;
mod selection;

pub use picking::PickingResolver;
pub use selection::{SelectionController, SelectionState, Transition};
