//! Rig preferences and settings.
//!
//! Persistent settings that survive restarts: snap increments, gizmo sizing,
//! camera defaults and orbit sensitivities.

use std::path::{Path, PathBuf};

use glam::Vec3;
use rig_scene::Camera;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RigError};

/// Snap increments applied while the snap modifier is held.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapSettings {
    /// Translation snap (world units)
    pub translate: f32,
    /// Rotation snap (radians)
    pub rotate: f32,
    /// Scale snap (scale factor)
    pub scale: f32,
}

impl Default for SnapSettings {
    fn default() -> Self {
        RigPreferences::default().snap_settings()
    }
}

/// Rig preferences and settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigPreferences {
    // Snapping settings
    pub translation_snap: f32,
    pub rotation_snap_degrees: f32,
    pub scale_snap: f32,

    // Gizmo settings
    pub gizmo_size: f32,
    pub gizmo_size_step: f32,
    pub gizmo_min_size: f32,

    // Pointer settings
    /// Pointer travel (pixels) past which a press-release is a drag, not a click
    pub click_drag_threshold: f32,

    // Camera settings
    pub camera_fov_degrees: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],

    // Orbit settings
    pub orbit_sensitivity: f32,
    pub pan_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for RigPreferences {
    fn default() -> Self {
        Self {
            // Snapping
            translation_snap: 100.0,
            rotation_snap_degrees: 15.0,
            scale_snap: 0.25,

            // Gizmo
            gizmo_size: 1.0,
            gizmo_size_step: 0.1,
            gizmo_min_size: 0.1,

            // Pointer
            click_drag_threshold: 5.0,

            // Camera
            camera_fov_degrees: 50.0,
            camera_near: 0.01,
            camera_far: 30000.0,
            camera_position: [5.0, 2.5, 5.0],
            camera_target: [0.0, 0.0, 0.0],

            // Orbit
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.01,
            zoom_sensitivity: 0.1,
            min_distance: 0.1,
            max_distance: 10000.0,
            invert_x: false,
            invert_y: false,
        }
    }
}

impl RigPreferences {
    /// Load preferences from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RigError::PreferencesIo {
            path: path.to_path_buf(),
            source,
        })?;
        let prefs = toml::from_str(&content).map_err(|source| RigError::PreferencesParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded preferences from {:?}", path);
        Ok(prefs)
    }

    /// Load preferences, falling back to defaults when the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(prefs) => prefs,
            Err(RigError::PreferencesIo { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::debug!("No preferences at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Save preferences to a file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let io_err = |source| RigError::PreferencesIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        std::fs::write(path, content).map_err(io_err)?;
        log::info!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Get the default preferences path.
    pub fn default_path() -> Result<PathBuf> {
        let mut p = dirs::config_dir().ok_or(RigError::NoConfigDir)?;
        p.push("transform_rig");
        p.push("preferences.toml");
        Ok(p)
    }

    /// Snap increments with rotation converted to radians.
    pub fn snap_settings(&self) -> SnapSettings {
        SnapSettings {
            translate: self.translation_snap,
            rotate: self.rotation_snap_degrees.to_radians(),
            scale: self.scale_snap,
        }
    }

    /// Perspective camera placed and aimed per these preferences.
    pub fn perspective_camera(&self, aspect: f32) -> Camera {
        let mut camera = Camera::perspective(
            self.camera_fov_degrees,
            aspect,
            self.camera_near,
            self.camera_far,
        )
        .with_position(Vec3::from(self.camera_position));
        camera.look_at(Vec3::from(self.camera_target));
        camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("rig_editor_prefs_{}_{}", name, std::process::id()));
        dir.push("preferences.toml");
        dir
    }

    #[test]
    fn test_defaults_match_reference_setup() {
        let prefs = RigPreferences::default();
        let snap = prefs.snap_settings();
        assert_eq!(snap.translate, 100.0);
        assert!((snap.rotate - 15f32.to_radians()).abs() < 1e-6);
        assert_eq!(snap.scale, 0.25);
        assert_eq!(prefs.gizmo_min_size, 0.1);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut prefs = RigPreferences::default();
        prefs.translation_snap = 0.5;
        prefs.invert_y = true;

        prefs.save(&path).unwrap();
        let loaded = RigPreferences::load(&path).unwrap();
        assert_eq!(loaded, prefs);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let prefs: RigPreferences = toml::from_str("scale_snap = 0.5\n").unwrap();
        assert_eq!(prefs.scale_snap, 0.5);
        assert_eq!(prefs.camera_fov_degrees, 50.0);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = temp_path("missing");
        assert!(matches!(
            RigPreferences::load(&path),
            Err(RigError::PreferencesIo { .. })
        ));
        assert_eq!(RigPreferences::load_or_default(&path), RigPreferences::default());
    }

    #[test]
    fn test_broken_file_is_parse_error() {
        let path = temp_path("broken");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "gizmo_size = \"big\"").unwrap();

        assert!(matches!(
            RigPreferences::load(&path),
            Err(RigError::PreferencesParse { .. })
        ));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_perspective_camera() {
        let camera = RigPreferences::default().perspective_camera(1.5);
        assert_eq!(camera.position, Vec3::new(5.0, 2.5, 5.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert_eq!(camera.projection.aspect(), 1.5);
    }
}
