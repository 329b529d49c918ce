//! Click picking against selectable scene members.

use glam::Vec2;
use rig_scene::{Camera, Intersection, MemberId, Scene};

/// Turns a click position into at most one candidate member.
///
/// The ray is cast from the camera through the click and tested against
/// every selectable root, descending into their children. The closest hit
/// wins; its member may be a descendant of the selectable root.
#[derive(Clone, Copy, Debug, Default)]
pub struct PickingResolver;

impl PickingResolver {
    pub fn new() -> Self {
        Self
    }

    /// All hits for a click, closest first.
    ///
    /// `ndc` is in normalized device coordinates (-1..1, +Y up).
    pub fn intersections(&self, scene: &Scene, camera: &Camera, ndc: Vec2) -> Vec<Intersection> {
        let ray = camera.ray_from_ndc(ndc);
        if !ray.is_valid() {
            return Vec::new();
        }

        let targets: Vec<MemberId> = scene
            .roots()
            .iter()
            .copied()
            .filter(|id| scene.get(*id).is_some_and(|m| m.selectable))
            .collect();

        scene.intersect(&ray, &targets, true)
    }

    /// The closest hit, if any.
    pub fn resolve(&self, scene: &Scene, camera: &Camera, ndc: Vec2) -> Option<MemberId> {
        let hits = self.intersections(scene, camera, ndc);
        log::trace!("Pick at {:?}: {} hit(s)", ndc, hits.len());
        hits.first().map(|hit| hit.member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rig_scene::{demo_scene, Shape};

    fn camera_at(position: Vec3) -> Camera {
        let mut camera = Camera::perspective(50.0, 1.0, 0.01, 30000.0).with_position(position);
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn test_closest_hit_wins() {
        let (scene, [a, b]) = demo_scene();
        let hits = PickingResolver::new().intersections(&scene, &camera_at(Vec3::new(0.0, 0.0, 5.0)), Vec2::ZERO);

        assert_eq!(hits.iter().map(|h| h.member).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(
            PickingResolver::new().resolve(&scene, &camera_at(Vec3::new(0.0, 0.0, 5.0)), Vec2::ZERO),
            Some(a)
        );
    }

    #[test]
    fn test_empty_space_misses() {
        let (scene, _) = demo_scene();
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(PickingResolver::new().resolve(&scene, &camera, Vec2::new(0.9, 0.9)), None);
    }

    #[test]
    fn test_unselectable_members_are_skipped() {
        let (mut scene, [a, b]) = demo_scene();
        scene.set_selectable(a, false).unwrap();
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));

        assert_eq!(PickingResolver::new().resolve(&scene, &camera, Vec2::ZERO), Some(b));
    }

    #[test]
    fn test_descendant_of_selectable_root_is_returned() {
        let mut scene = Scene::new();
        let root = scene.spawn("group", Shape::Empty);
        scene.set_selectable(root, true).unwrap();
        let child = scene.spawn_child(root, "part", Shape::unit_cube()).unwrap();

        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(PickingResolver::new().resolve(&scene, &camera, Vec2::ZERO), Some(child));
    }

    #[test]
    fn test_selectable_child_of_unselectable_root_is_ignored() {
        let mut scene = Scene::new();
        let root = scene.spawn("group", Shape::Empty);
        let child = scene.spawn_child(root, "part", Shape::unit_cube()).unwrap();
        scene.set_selectable(child, true).unwrap();

        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(PickingResolver::new().resolve(&scene, &camera, Vec2::ZERO), None);
    }
}
