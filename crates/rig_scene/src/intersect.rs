//! Intersection tests for picking
//!
//! Provides ray intersection tests against:
//! - AABB (slab method)
//! - Sphere
//! - Plane
//! - Lines and segments (closest approach, used by gizmo handles)
//!
//! The box and sphere tests accept an un-normalized direction so a ray mapped
//! into a member's local space reports distances in world units.

use glam::Vec3;

use crate::bounds::Aabb;
use crate::ray::Ray;

/// Ray-AABB intersection using the slab method
///
/// Returns the parameter along the ray of the first intersection in front of
/// the origin, or None if the ray doesn't intersect the AABB.
pub fn ray_aabb(origin: Vec3, direction: Vec3, aabb: &Aabb) -> Option<f32> {
    let inv_dir = direction.recip();

    let t1 = (aabb.min.x - origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    // tmax < 0: box is behind the origin; tmin > tmax: miss
    if tmax < 0.0 || tmin > tmax {
        None
    } else {
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Ray-Sphere intersection with center and radius
///
/// Returns the nearest positive parameter, or None on a miss.
pub fn ray_sphere_at(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let a = direction.dot(direction);
    if a <= f32::EPSILON {
        return None;
    }
    let b = 2.0 * oc.dot(direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 > 0.0 {
        Some(t1)
    } else if t2 > 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Ray-Plane intersection
///
/// Returns the distance along the ray, or None if parallel or behind the origin.
pub fn ray_plane(ray: &Ray, plane_point: Vec3, plane_normal: Vec3) -> Option<f32> {
    let denom = plane_normal.dot(ray.direction);
    if denom.abs() < 1e-4 {
        return None;
    }

    let t = (plane_point - ray.origin).dot(plane_normal) / denom;
    if t < 0.0 {
        None
    } else {
        Some(t)
    }
}

/// Closest approach between an infinite line and a ray's supporting line.
///
/// `line_dir` must be normalized. Returns `(s, t)` where `line_origin + line_dir * s`
/// and `ray.at(t)` are the closest pair, or None when the lines are parallel.
pub fn closest_line_params(line_origin: Vec3, line_dir: Vec3, ray: &Ray) -> Option<(f32, f32)> {
    let w0 = line_origin - ray.origin;
    let b = line_dir.dot(ray.direction);
    let d = line_dir.dot(w0);
    let e = ray.direction.dot(w0);
    let denom = 1.0 - b * b;

    if denom.abs() < 1e-6 {
        return None;
    }

    let s = (b * e - d) / denom;
    let t = (e - b * d) / denom;
    Some((s, t))
}

/// Distance between a ray and the segment `a..b`.
///
/// Returns `(distance, t)` with `t` the parameter of the closest point on the
/// ray (never negative).
pub fn ray_segment_distance(ray: &Ray, a: Vec3, b: Vec3) -> Option<(f32, f32)> {
    let u = b - a;
    let len_sq = u.length_squared();
    if len_sq < 1e-8 {
        return None;
    }

    let w0 = a - ray.origin;
    let uv = u.dot(ray.direction);
    let uw = u.dot(w0);
    let vw = ray.direction.dot(w0);
    let denom = len_sq - uv * uv;

    let mut s = if denom.abs() < 1e-6 {
        0.0
    } else {
        ((uv * vw - uw) / denom).clamp(0.0, 1.0)
    };

    let mut t = (a + u * s - ray.origin).dot(ray.direction);
    if t < 0.0 {
        t = 0.0;
        s = ((ray.origin - a).dot(u) / len_sq).clamp(0.0, 1.0);
    }

    let distance = ((a + u * s) - ray.at(t)).length();
    Some((distance, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn test_ray_aabb_hit() {
        let t = ray_aabb(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, &unit_box());
        assert!((t.unwrap() - 4.5).abs() < 1e-5);
    }

    #[test]
    fn test_ray_aabb_miss_and_behind() {
        assert!(ray_aabb(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z, &unit_box()).is_none());
        assert!(ray_aabb(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, &unit_box()).is_none());
    }

    #[test]
    fn test_ray_aabb_from_inside() {
        let t = ray_aabb(Vec3::ZERO, Vec3::X, &unit_box()).unwrap();
        assert!((t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_ray_aabb_scaled_direction() {
        // Doubling the direction halves the parameter
        let t = ray_aabb(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0), &unit_box()).unwrap();
        assert!((t - 2.25).abs() < 1e-5);
    }

    #[test]
    fn test_ray_sphere() {
        let t = ray_sphere_at(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        assert!(ray_sphere_at(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_ray_plane() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let t = ray_plane(&ray, Vec3::ZERO, Vec3::Y).unwrap();
        assert!((t - 5.0).abs() < 1e-5);

        // Parallel and behind
        assert!(ray_plane(&ray, Vec3::ZERO, Vec3::X).is_none());
        assert!(ray_plane(&ray, Vec3::new(0.0, 10.0, 0.0), Vec3::Y).is_none());
    }

    #[test]
    fn test_closest_line_params() {
        // Ray looking down -Z at x = 2, line along X through the origin
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z);
        let (s, t) = closest_line_params(Vec3::ZERO, Vec3::X, &ray).unwrap();
        assert!((s - 2.0).abs() < 1e-5);
        assert!((t - 5.0).abs() < 1e-5);

        // Parallel lines have no unique answer
        assert!(closest_line_params(Vec3::ZERO, Vec3::Z, &ray).is_none());
    }

    #[test]
    fn test_ray_segment_distance() {
        let ray = Ray::new(Vec3::new(0.5, 0.1, 5.0), Vec3::NEG_Z);
        let (dist, t) = ray_segment_distance(&ray, Vec3::ZERO, Vec3::X).unwrap();
        assert!((dist - 0.1).abs() < 1e-5);
        assert!((t - 5.0).abs() < 1e-5);

        // Past the end of the segment the distance grows
        let ray = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        let (dist, _) = ray_segment_distance(&ray, Vec3::ZERO, Vec3::X).unwrap();
        assert!((dist - 2.0).abs() < 1e-5);
    }
}
