//! Viewport size tracking and orbit camera controls.

mod camera_controller;
mod viewport_state;

pub use camera_controller::OrbitController;
pub use viewport_state::ViewportState;
