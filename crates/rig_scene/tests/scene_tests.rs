//! Scene graph tests
//!
//! Hierarchies, world matrices and ray picking through cameras.

use glam::{Vec2, Vec3};
use rig_scene::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn camera_at(eye: Vec3) -> Camera {
    let mut camera = Camera::perspective(50.0, 4.0 / 3.0, 0.01, 30000.0).with_position(eye);
    camera.look_at(Vec3::ZERO);
    camera
}

#[test]
fn test_child_hit_uses_composed_transform() {
    init_logging();
    let mut scene = Scene::new();
    let arm = scene.spawn("arm", Shape::Empty);
    scene
        .set_transform(arm, Transform::from_position(Vec3::new(3.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0)))
        .unwrap();
    let hand = scene
        .spawn_child(arm, "hand", Shape::Sphere { radius: 0.5 })
        .unwrap();

    // World sphere: center (3, 0, 0), radius 1
    let ray = Ray::new(Vec3::new(3.0, 0.0, 10.0), Vec3::NEG_Z);
    let hits = scene.intersect(&ray, &[arm], true);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].member, hand);
    assert!((hits[0].distance - 9.0).abs() < 1e-4);
    assert!((hits[0].point - Vec3::new(3.0, 0.0, 1.0)).length() < 1e-4);

    // Without recursion only the empty parent is tested
    assert!(scene.intersect(&ray, &[arm], false).is_empty());
}

#[test]
fn test_reparenting_rejects_cycles() {
    let mut scene = Scene::new();
    let a = scene.spawn("a", Shape::Empty);
    let b = scene.spawn_child(a, "b", Shape::Empty).unwrap();
    let c = scene.spawn_child(b, "c", Shape::Empty).unwrap();

    assert!(matches!(
        scene.set_parent(a, Some(c)),
        Err(SceneError::CyclicParent { .. })
    ));

    scene.set_parent(c, None).unwrap();
    assert!(scene.roots().contains(&c));
    assert!(!scene.is_ancestor(a, c));
}

#[test]
fn test_removing_subtree() {
    let mut scene = Scene::new();
    let a = scene.spawn("a", Shape::Empty);
    let b = scene.spawn_child(a, "b", Shape::unit_cube()).unwrap();
    let other = scene.spawn("other", Shape::unit_cube());

    let removed = scene.remove(a).unwrap();
    assert_eq!(removed.len(), 2);
    assert!(!scene.contains(b));
    assert!(scene.contains(other));
    assert_eq!(scene.roots(), &[other]);
    assert!(matches!(scene.remove(a), Err(SceneError::MemberNotFound(_))));
}

#[test]
fn test_camera_ray_through_projected_point_hits_member() {
    let (scene, [a, b]) = demo_scene();
    let camera = camera_at(Vec3::new(5.0, 2.5, 5.0));

    for (id, point) in [(a, Vec3::ZERO), (b, Vec3::new(0.0, 0.0, -2.0))] {
        let ray = camera.ray_from_ndc(camera.project(point).truncate());
        let hits = scene.intersect(&ray, &[a, b], true);
        assert_eq!(hits.first().map(|h| h.member), Some(id));
    }
}

#[test]
fn test_pixels_round_trip_through_ndc() {
    let viewport = Vec2::new(1024.0, 768.0);
    let pixel = Vec2::new(100.0, 700.0);
    let back = pixels_from_ndc(ndc_from_pixels(pixel, viewport), viewport);
    assert!((back - pixel).length() < 1e-3);
}

#[test]
fn test_rotated_member_world_matrix() {
    let mut scene = Scene::new();
    let id = scene.spawn("turned", Shape::unit_cube());
    scene
        .set_transform(id, Transform::new().with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0)))
        .unwrap();

    let world = scene.world_matrix(id).unwrap();
    // +X local points along -Z in world after a quarter turn about Y
    assert!((world.transform_vector3(Vec3::X) - Vec3::NEG_Z).length() < 1e-5);
}
