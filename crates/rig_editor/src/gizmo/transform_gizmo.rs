//! Built-in translate/rotate/scale gizmo.

use glam::{Mat4, Quat, Vec3};
use rig_scene::{closest_line_params, ray_plane, ray_segment_distance, Axis, Camera, MemberId, Ray, Scene, Transform};

use super::{snap_value, Gizmo, GizmoEvent, GizmoMode, GizmoSpace, SnapState, MIN_GIZMO_SIZE};
use crate::events::Notifier;

/// Where the pointer grabbed the handle.
#[derive(Clone, Copy, Debug)]
enum Anchor {
    /// Parameter along the axis line (translate, scale)
    Along(f32),
    /// Unit vector from the pivot on the rotation plane (rotate)
    Around(Vec3),
}

/// State during a handle drag.
#[derive(Clone, Debug)]
struct DragState {
    member: MemberId,
    axis: Axis,
    start_transform: Transform,
    pivot: Vec3,
    axis_dir: Vec3,
    handle_length: f32,
    parent_inverse: Mat4,
    parent_rotation: Quat,
    start: Anchor,
    current: Anchor,
}

/// Translate/rotate/scale gizmo with one handle per axis.
#[derive(Debug)]
pub struct TransformGizmo {
    attached: Option<MemberId>,
    mode: GizmoMode,
    space: GizmoSpace,
    snap: SnapState,
    size: f32,
    show: [bool; 3],
    enabled: bool,
    drag: Option<DragState>,
    notifier: Notifier<GizmoEvent>,
}

impl Default for TransformGizmo {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self {
            attached: None,
            mode: GizmoMode::Translate,
            space: GizmoSpace::World,
            snap: SnapState::default(),
            size: 1.0,
            show: [true; 3],
            enabled: true,
            drag: None,
            notifier: Notifier::new(),
        }
    }

    fn changed(&mut self) {
        self.notifier.emit(&GizmoEvent::Changed);
    }

    /// World length of the handles for a member at `pivot`.
    ///
    /// Grows with camera distance so the gizmo keeps a steady screen size.
    pub fn handle_length(&self, camera: &Camera, pivot: Vec3) -> f32 {
        self.size * (camera.distance_to(pivot) * 0.15).clamp(0.1, 10.0)
    }

    /// Handle direction for the current mode and space.
    fn axis_direction(&self, axis: Axis, world_rotation: Quat) -> Vec3 {
        // Scale always works on the member's own axes
        let local = self.space == GizmoSpace::Local || self.mode == GizmoMode::Scale;
        if local {
            (world_rotation * axis.unit()).normalize_or_zero()
        } else {
            axis.unit()
        }
    }

    fn anchor(&self, ray: &Ray, pivot: Vec3, axis_dir: Vec3) -> Option<Anchor> {
        match self.mode {
            GizmoMode::Translate | GizmoMode::Scale => {
                closest_line_params(pivot, axis_dir, ray).map(|(s, _)| Anchor::Along(s))
            }
            GizmoMode::Rotate => {
                let t = ray_plane(ray, pivot, axis_dir)?;
                let v = (ray.at(t) - pivot).normalize_or_zero();
                (v != Vec3::ZERO).then_some(Anchor::Around(v))
            }
        }
    }

    fn dragged_transform(&self, drag: &DragState) -> Transform {
        let mut t = drag.start_transform;

        match (drag.start, drag.current) {
            (Anchor::Along(s0), Anchor::Along(s1)) if self.mode == GizmoMode::Translate => {
                let mut delta = s1 - s0;
                if let Some(snap) = self.snap.translate {
                    delta = snap_value(delta, snap);
                }
                let offset = drag.parent_inverse.transform_vector3(drag.axis_dir * delta);
                t.position = drag.start_transform.position + offset;
            }
            (Anchor::Along(s0), Anchor::Along(s1)) => {
                let i = drag.axis.index();
                let factor = 1.0 + (s1 - s0) / drag.handle_length;
                let mut value = drag.start_transform.scale[i] * factor;
                if let Some(snap) = self.snap.scale {
                    value = snap_value(value, snap);
                    if value == 0.0 {
                        value = snap;
                    }
                }
                t.scale[i] = value;
            }
            (Anchor::Around(v0), Anchor::Around(v1)) => {
                let mut angle = drag.axis_dir.dot(v0.cross(v1)).atan2(v0.dot(v1));
                if let Some(snap) = self.snap.rotate {
                    angle = snap_value(angle, snap);
                }
                let delta = Quat::from_axis_angle(drag.axis_dir, angle);
                let local = drag.parent_rotation.inverse()
                    * delta
                    * drag.parent_rotation
                    * drag.start_transform.rotation_quat();
                t.set_rotation_quat(local);
            }
            _ => {}
        }

        t
    }
}

impl Gizmo for TransformGizmo {
    fn attach(&mut self, member: MemberId) {
        if self.attached == Some(member) {
            return;
        }
        if self.drag.is_some() {
            self.end_drag();
        }
        self.attached = Some(member);
        self.changed();
    }

    fn detach(&mut self) {
        if self.attached.is_none() {
            return;
        }
        if self.drag.is_some() {
            self.end_drag();
        }
        self.attached = None;
        self.changed();
    }

    fn attached(&self) -> Option<MemberId> {
        self.attached
    }

    fn set_mode(&mut self, mode: GizmoMode) {
        // Mode is locked for the duration of a drag
        if self.drag.is_none() && self.mode != mode {
            self.mode = mode;
            self.changed();
        }
    }

    fn mode(&self) -> GizmoMode {
        self.mode
    }

    fn set_space(&mut self, space: GizmoSpace) {
        if self.space != space {
            self.space = space;
            self.changed();
        }
    }

    fn space(&self) -> GizmoSpace {
        self.space
    }

    fn set_translation_snap(&mut self, snap: Option<f32>) {
        self.snap.translate = snap.filter(|s| *s > 0.0);
    }

    fn set_rotation_snap(&mut self, snap: Option<f32>) {
        self.snap.rotate = snap.filter(|s| *s > 0.0);
    }

    fn set_scale_snap(&mut self, snap: Option<f32>) {
        self.snap.scale = snap.filter(|s| *s > 0.0);
    }

    fn snap(&self) -> SnapState {
        self.snap
    }

    fn set_size(&mut self, size: f32) {
        self.size = size.max(MIN_GIZMO_SIZE);
        self.changed();
    }

    fn size(&self) -> f32 {
        self.size
    }

    fn set_axis_visible(&mut self, axis: Axis, visible: bool) {
        self.show[axis.index()] = visible;
        self.changed();
    }

    fn axis_visible(&self, axis: Axis) -> bool {
        self.show[axis.index()]
    }

    fn set_enabled(&mut self, enabled: bool) {
        if !enabled && self.drag.is_some() {
            self.end_drag();
        }
        self.enabled = enabled;
        self.changed();
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn pick_handle(&self, scene: &Scene, camera: &Camera, ray: &Ray) -> Option<Axis> {
        if !self.enabled {
            return None;
        }
        let member = self.attached?;
        let (_, rotation, pivot) = scene.world_matrix(member)?.to_scale_rotation_translation();
        let length = self.handle_length(camera, pivot);
        let hit_radius = length * 0.1;

        let mut closest: Option<(Axis, f32)> = None;
        for axis in Axis::ALL {
            if !self.show[axis.index()] {
                continue;
            }
            let end = pivot + self.axis_direction(axis, rotation) * length;
            if let Some((dist, t)) = ray_segment_distance(ray, pivot, end) {
                if dist < hit_radius && closest.map_or(true, |(_, best)| t < best) {
                    closest = Some((axis, t));
                }
            }
        }

        closest.map(|(axis, _)| axis)
    }

    fn begin_drag(&mut self, axis: Axis, scene: &Scene, camera: &Camera, ray: &Ray) -> bool {
        if !self.enabled || self.drag.is_some() || !self.show[axis.index()] {
            return false;
        }
        let Some(member) = self.attached else {
            return false;
        };
        let (Some(node), Some(world)) = (scene.get(member), scene.world_matrix(member)) else {
            return false;
        };

        let parent_world = node
            .parent
            .and_then(|p| scene.world_matrix(p))
            .unwrap_or(Mat4::IDENTITY);
        let (_, parent_rotation, _) = parent_world.to_scale_rotation_translation();
        let (_, rotation, pivot) = world.to_scale_rotation_translation();
        let axis_dir = self.axis_direction(axis, rotation);

        let Some(start) = self.anchor(ray, pivot, axis_dir) else {
            log::debug!("Handle {} is edge-on to the view, not dragging", axis);
            return false;
        };

        self.drag = Some(DragState {
            member,
            axis,
            start_transform: node.transform,
            pivot,
            axis_dir,
            handle_length: self.handle_length(camera, pivot),
            parent_inverse: parent_world.inverse(),
            parent_rotation,
            start,
            current: start,
        });

        log::debug!("Begin {:?} drag on {} axis {}", self.mode, member, axis);
        self.notifier.emit(&GizmoEvent::DraggingChanged(true));
        true
    }

    fn update_drag(&mut self, scene: &mut Scene, ray: &Ray) -> bool {
        let Some(mut drag) = self.drag.take() else {
            return false;
        };
        if let Some(anchor) = self.anchor(ray, drag.pivot, drag.axis_dir) {
            drag.current = anchor;
        }
        let member = drag.member;
        let next = self.dragged_transform(&drag);
        self.drag = Some(drag);

        let Some(node) = scene.get_mut(member) else {
            log::warn!("{} vanished mid-drag", member);
            self.end_drag();
            return false;
        };
        if node.transform == next {
            return false;
        }
        node.transform = next;

        self.notifier.emit(&GizmoEvent::ObjectChanged);
        self.changed();
        true
    }

    fn end_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        log::debug!("End drag on {}", drag.member);
        self.notifier.emit(&GizmoEvent::DraggingChanged(false));
        self.changed();
        true
    }

    fn reset(&mut self, scene: &mut Scene) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        // Later movement continues from where the pointer is now
        drag.start = drag.current;
        let (member, start_transform) = (drag.member, drag.start_transform);

        let Some(node) = scene.get_mut(member) else {
            return false;
        };
        node.transform = start_transform;

        self.notifier.emit(&GizmoEvent::ObjectChanged);
        self.changed();
        true
    }

    fn notifier(&mut self) -> &mut Notifier<GizmoEvent> {
        &mut self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_scene::{demo_scene, Shape};

    fn front_camera() -> Camera {
        let mut camera = Camera::perspective(50.0, 1.0, 0.01, 1000.0).with_position(Vec3::new(0.0, 0.0, 10.0));
        camera.look_at(Vec3::ZERO);
        camera
    }

    fn ray_through(camera: &Camera, point: Vec3) -> Ray {
        camera.ray_from_ndc(camera.project(point).truncate())
    }

    #[test]
    fn test_defaults() {
        let gizmo = TransformGizmo::new();
        assert_eq!(gizmo.mode(), GizmoMode::Translate);
        assert_eq!(gizmo.space(), GizmoSpace::World);
        assert_eq!(gizmo.size(), 1.0);
        assert!(gizmo.enabled());
        assert!(Axis::ALL.iter().all(|a| gizmo.axis_visible(*a)));
        assert!(!gizmo.snap().is_active());
    }

    #[test]
    fn test_size_has_floor() {
        let mut gizmo = TransformGizmo::new();
        gizmo.set_size(0.01);
        assert_eq!(gizmo.size(), MIN_GIZMO_SIZE);
    }

    #[test]
    fn test_non_positive_snap_is_none() {
        let mut gizmo = TransformGizmo::new();
        gizmo.set_translation_snap(Some(0.0));
        gizmo.set_scale_snap(Some(0.25));
        assert_eq!(gizmo.snap().translate, None);
        assert_eq!(gizmo.snap().scale, Some(0.25));
    }

    #[test]
    fn test_pick_handle_respects_visibility_and_enabled() {
        let (scene, [a, _]) = demo_scene();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(a);

        let len = gizmo.handle_length(&camera, Vec3::ZERO);
        let ray = ray_through(&camera, Vec3::new(len * 0.8, 0.0, 0.0));
        assert_eq!(gizmo.pick_handle(&scene, &camera, &ray), Some(Axis::X));

        gizmo.set_axis_visible(Axis::X, false);
        assert_eq!(gizmo.pick_handle(&scene, &camera, &ray), None);

        gizmo.set_axis_visible(Axis::X, true);
        gizmo.set_enabled(false);
        assert_eq!(gizmo.pick_handle(&scene, &camera, &ray), None);
    }

    #[test]
    fn test_translate_drag_moves_along_axis() {
        let (mut scene, [a, _]) = demo_scene();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::new();
        let (_sub, rx) = gizmo.notifier().subscribe();
        gizmo.attach(a);

        let grab = ray_through(&camera, Vec3::new(0.5, 0.0, 0.0));
        assert!(gizmo.begin_drag(Axis::X, &scene, &camera, &grab));
        assert!(gizmo.is_dragging());

        let to = ray_through(&camera, Vec3::new(2.0, 0.0, 0.0));
        assert!(gizmo.update_drag(&mut scene, &to));

        let pos = scene.get(a).unwrap().transform.position;
        assert!((pos.x - 1.5).abs() < 1e-3);
        assert!(pos.y.abs() < 1e-5);

        assert!(gizmo.end_drag());
        let events: Vec<_> = rx.try_iter().collect();
        assert!(events.contains(&GizmoEvent::DraggingChanged(true)));
        assert!(events.contains(&GizmoEvent::ObjectChanged));
        assert_eq!(events.last(), Some(&GizmoEvent::Changed));
        assert!(events.contains(&GizmoEvent::DraggingChanged(false)));
    }

    #[test]
    fn test_translate_snap() {
        let (mut scene, [a, _]) = demo_scene();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(a);
        gizmo.set_translation_snap(Some(1.0));

        gizmo.begin_drag(Axis::X, &scene, &camera, &ray_through(&camera, Vec3::new(0.5, 0.0, 0.0)));
        gizmo.update_drag(&mut scene, &ray_through(&camera, Vec3::new(1.9, 0.0, 0.0)));

        assert!((scene.get(a).unwrap().transform.position.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_drag_quarter_turn() {
        let (mut scene, [a, _]) = demo_scene();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(a);
        gizmo.set_mode(GizmoMode::Rotate);
        gizmo.set_rotation_snap(Some(15f32.to_radians()));

        // Rotation plane for Z faces the camera
        gizmo.begin_drag(Axis::Z, &scene, &camera, &ray_through(&camera, Vec3::new(1.0, 0.0, 0.0)));
        gizmo.update_drag(&mut scene, &ray_through(&camera, Vec3::new(0.0, 1.0, 0.0)));

        let rot = scene.get(a).unwrap().transform.rotation;
        assert!((rot.z - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn test_scale_drag_and_reset() {
        let (mut scene, [a, _]) = demo_scene();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(a);
        gizmo.set_mode(GizmoMode::Scale);

        let len = gizmo.handle_length(&camera, Vec3::ZERO);
        gizmo.begin_drag(Axis::X, &scene, &camera, &ray_through(&camera, Vec3::new(len, 0.0, 0.0)));
        gizmo.update_drag(&mut scene, &ray_through(&camera, Vec3::new(2.0 * len, 0.0, 0.0)));
        assert!((scene.get(a).unwrap().transform.scale.x - 2.0).abs() < 1e-3);

        assert!(gizmo.reset(&mut scene));
        assert_eq!(scene.get(a).unwrap().transform.scale, Vec3::ONE);
        assert!(gizmo.is_dragging());
    }

    #[test]
    fn test_reset_without_drag_is_noop() {
        let (mut scene, [a, _]) = demo_scene();
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(a);
        assert!(!gizmo.reset(&mut scene));
    }

    #[test]
    fn test_detach_ends_drag() {
        let (scene, [a, _]) = demo_scene();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(a);
        gizmo.begin_drag(Axis::Y, &scene, &camera, &ray_through(&camera, Vec3::new(0.0, 0.5, 0.0)));
        let (_sub, rx) = gizmo.notifier().subscribe();

        gizmo.detach();
        assert!(!gizmo.is_dragging());
        assert_eq!(gizmo.attached(), None);
        assert_eq!(rx.try_recv(), Ok(GizmoEvent::DraggingChanged(false)));
    }

    #[test]
    fn test_mode_locked_while_dragging() {
        let (scene, [a, _]) = demo_scene();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(a);
        gizmo.begin_drag(Axis::X, &scene, &camera, &ray_through(&camera, Vec3::new(0.5, 0.0, 0.0)));

        gizmo.set_mode(GizmoMode::Scale);
        assert_eq!(gizmo.mode(), GizmoMode::Translate);
    }

    #[test]
    fn test_local_translate_follows_child_of_rotated_parent() {
        let mut scene = Scene::new();
        let parent = scene.spawn("pivot", Shape::Empty);
        scene.get_mut(parent).unwrap().transform.rotation = Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        let child = scene.spawn_child(parent, "arm", Shape::unit_cube()).unwrap();

        let camera = front_camera();
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(child);

        // World X handle; in the parent's rotated frame that is local -Y
        gizmo.begin_drag(Axis::X, &scene, &camera, &ray_through(&camera, Vec3::new(0.5, 0.0, 0.0)));
        gizmo.update_drag(&mut scene, &ray_through(&camera, Vec3::new(1.5, 0.0, 0.0)));

        let local = scene.get(child).unwrap().transform.position;
        assert!((local - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-3);
        let world = scene.world_matrix(child).unwrap().transform_point3(Vec3::ZERO);
        assert!((world - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-3);
    }
}
