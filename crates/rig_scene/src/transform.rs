//! Member transforms
//!
//! Position, Euler rotation and scale, addressed either as whole vectors or
//! one axis at a time (the way the property panel binds to them).

use std::fmt;

use glam::{EulerRot, Mat4, Quat, Vec3};

/// One of the three component groups of a transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransformGroup {
    Position,
    Rotation,
    Scale,
}

impl TransformGroup {
    /// All groups in display order.
    pub const ALL: [TransformGroup; 3] = [
        TransformGroup::Position,
        TransformGroup::Rotation,
        TransformGroup::Scale,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TransformGroup::Position => "position",
            TransformGroup::Rotation => "rotation",
            TransformGroup::Scale => "scale",
        }
    }

    /// Capitalized label used for panel folders.
    pub fn label(&self) -> &'static str {
        match self {
            TransformGroup::Position => "Position",
            TransformGroup::Rotation => "Rotation",
            TransformGroup::Scale => "Scale",
        }
    }
}

impl fmt::Display for TransformGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cartesian axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn name(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// Unit vector along this axis.
    #[inline]
    pub fn unit(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Local transform of a scene member.
///
/// Rotation is stored as intrinsic XYZ Euler angles in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn new() -> Self {
        Self::IDENTITY
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Vector for a whole component group.
    pub fn group(&self, group: TransformGroup) -> Vec3 {
        match group {
            TransformGroup::Position => self.position,
            TransformGroup::Rotation => self.rotation,
            TransformGroup::Scale => self.scale,
        }
    }

    fn group_mut(&mut self, group: TransformGroup) -> &mut Vec3 {
        match group {
            TransformGroup::Position => &mut self.position,
            TransformGroup::Rotation => &mut self.rotation,
            TransformGroup::Scale => &mut self.scale,
        }
    }

    /// Read one axis of one group.
    pub fn get(&self, group: TransformGroup, axis: Axis) -> f32 {
        self.group(group)[axis.index()]
    }

    /// Write one axis of one group.
    pub fn set(&mut self, group: TransformGroup, axis: Axis, value: f32) {
        self.group_mut(group)[axis.index()] = value;
    }

    /// Rotation as a quaternion.
    #[inline]
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Replace the rotation with the Euler decomposition of `q`.
    pub fn set_rotation_quat(&mut self, q: Quat) {
        let (x, y, z) = q.normalize().to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// Local-to-parent matrix: scale, then rotate, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }
}
