//! Viewport state and configuration.

use glam::Vec2;
use rig_scene::ndc_from_pixels;

/// Size of the render canvas in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl ViewportState {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Get the aspect ratio.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0 {
            self.width as f32 / self.height as f32
        } else {
            1.0
        }
    }

    /// Update viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Pixel position (origin top-left) to normalized device coordinates.
    pub fn to_ndc(&self, pixel: Vec2) -> Vec2 {
        ndc_from_pixels(pixel, self.size())
    }

    pub fn contains(&self, pixel: Vec2) -> bool {
        pixel.x >= 0.0 && pixel.y >= 0.0 && pixel.x < self.width as f32 && pixel.y < self.height as f32
    }
}
