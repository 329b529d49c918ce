//! Keyboard input: logical rig actions and the keys bound to them.
//!
//! Physical keys never reach the gizmo directly. `KeyBindings` maps a key and
//! its phase to a `RigAction`, and `apply_action` turns that action into gizmo
//! configuration calls.

mod actions;
mod bindings;

pub use actions::{apply_action, RigAction};
pub use bindings::{KeyBindings, KeyPhase};
