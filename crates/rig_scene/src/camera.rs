//! Cameras and screen-space conversions.
//!
//! A camera turns a pointer position (in normalized device coordinates) into a
//! picking ray, and projects world points back to the screen.

use glam::{Mat4, Vec2, Vec3};

use crate::ray::Ray;

/// Camera projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees
        fov_y_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        /// Half of the visible height in world units
        half_height: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    pub fn aspect(&self) -> f32 {
        match *self {
            Projection::Perspective { aspect, .. } | Projection::Orthographic { aspect, .. } => {
                aspect
            }
        }
    }

    pub fn is_perspective(&self) -> bool {
        matches!(self, Projection::Perspective { .. })
    }

    /// Projection matrix (right-handed, depth 0..1).
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov_y_degrees,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far),
            Projection::Orthographic {
                half_height,
                aspect,
                near,
                far,
            } => {
                let half_width = half_height * aspect;
                Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, near, far)
            }
        }
    }
}

/// A camera placed in the scene, looking at a target point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
}

impl Camera {
    /// Perspective camera at the origin looking down -Z.
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            projection: Projection::Perspective {
                fov_y_degrees,
                aspect,
                near,
                far,
            },
        }
    }

    /// Orthographic camera at the origin looking down -Z.
    pub fn orthographic(half_height: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            projection: Projection::Orthographic {
                half_height,
                aspect,
                near,
                far,
            },
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Aim the camera at a point.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_aspect(&mut self, new_aspect: f32) {
        match &mut self.projection {
            Projection::Perspective { aspect, .. } | Projection::Orthographic { aspect, .. } => {
                *aspect = new_aspect;
            }
        }
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Picking ray through a point in normalized device coordinates.
    ///
    /// Perspective rays start at the eye; orthographic rays start on the near
    /// plane and run parallel to the view direction.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        // Built in view space and mapped back; unprojecting through the full
        // inverse loses precision with wide near/far ranges.
        let camera_to_world = self.view_matrix().inverse();

        match self.projection {
            Projection::Perspective {
                fov_y_degrees,
                aspect,
                ..
            } => {
                let half_h = (fov_y_degrees.to_radians() * 0.5).tan();
                let dir_view = Vec3::new(ndc.x * half_h * aspect, ndc.y * half_h, -1.0);
                Ray::new(self.position, camera_to_world.transform_vector3(dir_view))
            }
            Projection::Orthographic {
                half_height,
                aspect,
                near,
                ..
            } => {
                let origin_view = Vec3::new(ndc.x * half_height * aspect, ndc.y * half_height, -near);
                Ray::new(
                    camera_to_world.transform_point3(origin_view),
                    camera_to_world.transform_vector3(Vec3::NEG_Z),
                )
            }
        }
    }

    /// Project a world point to normalized device coordinates.
    ///
    /// `z` is the depth in 0..1 for points between the near and far planes.
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_projection().project_point3(point)
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        (point - self.position).length()
    }
}

/// Convert a pixel position (origin top-left) to normalized device coordinates.
pub fn ndc_from_pixels(pixel: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        pixel.x / viewport.x * 2.0 - 1.0,
        -(pixel.y / viewport.y * 2.0 - 1.0),
    )
}

/// Convert normalized device coordinates back to a pixel position.
pub fn pixels_from_ndc(ndc: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    )
}
