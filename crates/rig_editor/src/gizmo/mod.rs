//! Transform gizmo for visual manipulation.
//!
//! The `Gizmo` trait is the seam the selection controller and the input
//! bindings talk to; `TransformGizmo` is the built-in implementation with
//! translate, rotate and scale handles.

mod transform_gizmo;

pub use transform_gizmo::TransformGizmo;

use rig_scene::{Axis, Camera, MemberId, Ray, Scene};

use crate::events::Notifier;

/// Smallest gizmo size accepted by `set_size`.
pub const MIN_GIZMO_SIZE: f32 = 0.1;

/// Current gizmo operation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Space for gizmo operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GizmoSpace {
    /// Local space (relative to object rotation)
    Local,
    /// World space (aligned to world axes)
    #[default]
    World,
}

impl GizmoSpace {
    pub fn toggled(self) -> Self {
        match self {
            GizmoSpace::Local => GizmoSpace::World,
            GizmoSpace::World => GizmoSpace::Local,
        }
    }
}

/// Active snap increments; `None` means free movement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SnapState {
    pub translate: Option<f32>,
    /// Radians
    pub rotate: Option<f32>,
    pub scale: Option<f32>,
}

impl SnapState {
    pub fn is_active(&self) -> bool {
        self.translate.is_some() || self.rotate.is_some() || self.scale.is_some()
    }
}

/// Notifications emitted by a gizmo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GizmoEvent {
    /// Gizmo appearance changed; a redraw is due
    Changed,
    /// A drag started (`true`) or ended (`false`)
    DraggingChanged(bool),
    /// The attached member's transform was modified by a drag
    ObjectChanged,
}

/// A manipulation widget that can be attached to one scene member.
pub trait Gizmo {
    /// Attach to a member, replacing any previous target.
    fn attach(&mut self, member: MemberId);

    /// Detach from the current target, ending any drag in progress.
    fn detach(&mut self);

    /// Current target.
    fn attached(&self) -> Option<MemberId>;

    fn set_mode(&mut self, mode: GizmoMode);
    fn mode(&self) -> GizmoMode;

    fn set_space(&mut self, space: GizmoSpace);
    fn space(&self) -> GizmoSpace;

    fn set_translation_snap(&mut self, snap: Option<f32>);
    /// Rotation snap in radians.
    fn set_rotation_snap(&mut self, snap: Option<f32>);
    fn set_scale_snap(&mut self, snap: Option<f32>);
    fn snap(&self) -> SnapState;

    /// Set the visual size, floored at [`MIN_GIZMO_SIZE`].
    fn set_size(&mut self, size: f32);
    fn size(&self) -> f32;

    fn set_axis_visible(&mut self, axis: Axis, visible: bool);
    fn axis_visible(&self, axis: Axis) -> bool;

    fn set_enabled(&mut self, enabled: bool);
    fn enabled(&self) -> bool;

    fn is_dragging(&self) -> bool;

    /// Handle under the ray, if any.
    fn pick_handle(&self, scene: &Scene, camera: &Camera, ray: &Ray) -> Option<Axis>;

    /// Start dragging a handle. Returns false if no drag could start.
    fn begin_drag(&mut self, axis: Axis, scene: &Scene, camera: &Camera, ray: &Ray) -> bool;

    /// Continue the drag, writing the new transform into the scene.
    /// Returns true if the attached member moved.
    fn update_drag(&mut self, scene: &mut Scene, ray: &Ray) -> bool;

    /// Finish the drag. Returns false if none was in progress.
    fn end_drag(&mut self) -> bool;

    /// Restore the transform captured when the current drag started.
    fn reset(&mut self, scene: &mut Scene) -> bool;

    /// Notification stream for this gizmo.
    fn notifier(&mut self) -> &mut Notifier<GizmoEvent>;
}

/// Apply snapping to a value.
pub fn snap_value(value: f32, snap: f32) -> f32 {
    if snap > 0.0 {
        (value / snap).round() * snap
    } else {
        value
    }
}
