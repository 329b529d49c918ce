//! Transform Rig
//!
//! Interactive selection and manipulation overlay for a 3D scene.
//!
//! ## Features
//!
//! - **Picking**: a click casts a ray from the camera; the closest selectable hit wins
//! - **Selection**: single-slot state machine driving gizmo attachment and panel fields
//! - **Transform Gizmo**: translate/rotate/scale handles with snapping and local/world space
//! - **Inspector Panel**: nine numeric fields kept in sync with the selection, both ways
//! - **Orbit Controls**: orbit, pan and zoom, suspended while the gizmo is dragged
//! - **Key Bindings**: physical keys mapped to logical rig actions
//!
//! ## Architecture
//!
//! ```text
//! click → PickingResolver → SelectionController → Gizmo / PropertyPanel → redraw
//! drag  → Gizmo → GizmoEvent → SelectionController::refresh → redraw
//! key   → KeyBindings → RigAction → Gizmo
//! ```
//!
//! `TransformRig` owns all of the above for one `RigContext`.

pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod gizmo;
pub mod input;
pub mod panels;
pub mod rig;
pub mod viewport;

pub use config::{RigPreferences, SnapSettings};
pub use self::core::{PickingResolver, SelectionController, SelectionState, Transition};
pub use error::{Result, RigError};
pub use events::{Notifier, Subscription};
pub use gizmo::{Gizmo, GizmoEvent, GizmoMode, GizmoSpace, SnapState, TransformGizmo};
pub use input::{apply_action, KeyBindings, KeyPhase, RigAction};
pub use panels::{Field, FieldEdit, FieldId, FieldKey, FieldTable, InspectorPanel, PropertyPanel};
pub use rig::{ClickTarget, MouseButton, RedrawTarget, RigContext, TransformRig};
pub use viewport::{OrbitController, ViewportState};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
