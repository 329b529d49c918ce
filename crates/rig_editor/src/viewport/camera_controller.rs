//! Orbit camera controls for viewport navigation.

use glam::Vec3;
use rig_scene::Camera;

use crate::config::RigPreferences;

const PITCH_LIMIT: f32 = 1.4;

/// Orbits, pans and zooms a camera around a target point.
///
/// The camera sits at `distance` from `target`, at `yaw` around +Y and
/// `pitch` above the horizon. Disabled while a gizmo drag is in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitController {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,

    pub orbit_sensitivity: f32,
    pub pan_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub invert_y: bool,
    pub invert_x: bool,

    enabled: bool,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::from_preferences(&RigPreferences::default())
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preferences(prefs: &RigPreferences) -> Self {
        let mut controller = Self {
            target: Vec3::from(prefs.camera_target),
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.0,
            orbit_sensitivity: prefs.orbit_sensitivity,
            pan_sensitivity: prefs.pan_sensitivity,
            zoom_sensitivity: prefs.zoom_sensitivity,
            min_distance: prefs.min_distance,
            max_distance: prefs.max_distance,
            invert_y: prefs.invert_y,
            invert_x: prefs.invert_x,
            enabled: true,
        };
        controller.set_eye(Vec3::from(prefs.camera_position));
        controller
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::trace!("Orbit controls {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    /// Adopt a camera's current position and target.
    pub fn sync_from_camera(&mut self, camera: &Camera) {
        self.target = camera.target;
        self.set_eye(camera.position);
    }

    fn set_eye(&mut self, eye: Vec3) {
        let offset = eye - self.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Camera eye position.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Handle pointer drag for orbiting. Returns false when disabled.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) -> bool {
        if !self.enabled {
            return false;
        }
        let dx = if self.invert_x { -delta_x } else { delta_x };
        let dy = if self.invert_y { -delta_y } else { delta_y };

        self.yaw -= dx * self.orbit_sensitivity;
        self.pitch = (self.pitch + dy * self.orbit_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        true
    }

    /// Handle pointer drag for panning in the camera plane.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) -> bool {
        if !self.enabled {
            return false;
        }
        let forward = (self.target - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        // Scale with distance so the target tracks the pointer
        let scale = self.pan_sensitivity * self.distance * 0.1;
        self.target += (-right * delta_x + up * delta_y) * scale;
        true
    }

    /// Handle scroll for zooming; positive `delta` moves closer.
    pub fn zoom(&mut self, delta: f32) -> bool {
        if !self.enabled {
            return false;
        }
        let factor = (1.0 - delta * self.zoom_sensitivity).max(0.05);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
        true
    }

    /// Place and aim the camera.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.position = self.eye();
        camera.look_at(self.target);
    }
}
