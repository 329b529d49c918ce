//! # rig_scene - Scene Graph for the Transform Rig
//!
//! The minimal 3D scene model the editing rig works against:
//! - Members with a stable identity, a transform and a pickable shape
//! - Parent/child grouping with composed world matrices
//! - Perspective and orthographic cameras that cast picking rays
//! - Ray intersection against boxes and spheres

pub mod bounds;
pub mod camera;
pub mod error;
pub mod intersect;
pub mod ray;
pub mod scene;
pub mod transform;

pub use bounds::Aabb;
pub use camera::{ndc_from_pixels, pixels_from_ndc, Camera, Projection};
pub use error::{Result, SceneError};
pub use intersect::{
    closest_line_params, ray_aabb, ray_plane, ray_segment_distance, ray_sphere_at,
};
pub use ray::Ray;
pub use scene::{demo_scene, Intersection, MemberId, Scene, SceneMember, Shape};
pub use transform::{Axis, Transform, TransformGroup};
