//! Logical rig actions.

use std::fmt;

use rig_scene::{Axis, Scene};

use crate::config::RigPreferences;
use crate::gizmo::{Gizmo, GizmoMode};

/// Something the user can ask the rig to do from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RigAction {
    /// Switch between world and local space
    ToggleSpace,
    /// Turn on snapping to the configured increments
    EnableSnap,
    /// Back to free movement
    DisableSnap,
    SetMode(GizmoMode),
    GrowGizmo,
    ShrinkGizmo,
    ToggleAxis(Axis),
    ToggleEnabled,
    /// Undo the drag in progress
    ResetGizmo,
}

impl fmt::Display for RigAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RigAction::ToggleSpace => write!(f, "Toggle Space"),
            RigAction::EnableSnap => write!(f, "Enable Snap"),
            RigAction::DisableSnap => write!(f, "Disable Snap"),
            RigAction::SetMode(mode) => write!(f, "{:?} Mode", mode),
            RigAction::GrowGizmo => write!(f, "Grow Gizmo"),
            RigAction::ShrinkGizmo => write!(f, "Shrink Gizmo"),
            RigAction::ToggleAxis(axis) => write!(f, "Toggle {} Axis", axis.name().to_uppercase()),
            RigAction::ToggleEnabled => write!(f, "Toggle Gizmo"),
            RigAction::ResetGizmo => write!(f, "Reset Gizmo"),
        }
    }
}

/// Perform an action on the gizmo.
///
/// Returns false if the action had nothing to act on (a reset with no drag
/// in progress).
pub fn apply_action(action: RigAction, gizmo: &mut dyn Gizmo, scene: &mut Scene, prefs: &RigPreferences) -> bool {
    log::debug!("Action: {}", action);

    match action {
        RigAction::ToggleSpace => gizmo.set_space(gizmo.space().toggled()),
        RigAction::EnableSnap => {
            let snap = prefs.snap_settings();
            gizmo.set_translation_snap(Some(snap.translate));
            gizmo.set_rotation_snap(Some(snap.rotate));
            gizmo.set_scale_snap(Some(snap.scale));
        }
        RigAction::DisableSnap => {
            gizmo.set_translation_snap(None);
            gizmo.set_rotation_snap(None);
            gizmo.set_scale_snap(None);
        }
        RigAction::SetMode(mode) => gizmo.set_mode(mode),
        RigAction::GrowGizmo => gizmo.set_size(gizmo.size() + prefs.gizmo_size_step),
        RigAction::ShrinkGizmo => {
            gizmo.set_size((gizmo.size() - prefs.gizmo_size_step).max(prefs.gizmo_min_size))
        }
        RigAction::ToggleAxis(axis) => gizmo.set_axis_visible(axis, !gizmo.axis_visible(axis)),
        RigAction::ToggleEnabled => gizmo.set_enabled(!gizmo.enabled()),
        RigAction::ResetGizmo => return gizmo.reset(scene),
    }

    true
}
