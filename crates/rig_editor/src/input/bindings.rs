//! Key bindings for rig actions.

use std::collections::HashMap;

use rig_scene::Axis;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use super::RigAction;
use crate::gizmo::GizmoMode;

/// Whether a binding fires on press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Pressed,
    Released,
}

impl From<ElementState> for KeyPhase {
    fn from(state: ElementState) -> Self {
        match state {
            ElementState::Pressed => Self::Pressed,
            ElementState::Released => Self::Released,
        }
    }
}

impl From<bool> for KeyPhase {
    fn from(pressed: bool) -> Self {
        if pressed {
            Self::Pressed
        } else {
            Self::Released
        }
    }
}

/// Explicit map from physical keys to actions.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    map: HashMap<(KeyCode, KeyPhase), RigAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use KeyPhase::{Pressed, Released};

        let mut bindings = Self::empty();
        bindings.bind(KeyCode::KeyQ, Pressed, RigAction::ToggleSpace);

        for shift in [KeyCode::ShiftLeft, KeyCode::ShiftRight] {
            bindings.bind(shift, Pressed, RigAction::EnableSnap);
            bindings.bind(shift, Released, RigAction::DisableSnap);
        }

        bindings.bind(KeyCode::KeyW, Pressed, RigAction::SetMode(GizmoMode::Translate));
        bindings.bind(KeyCode::KeyE, Pressed, RigAction::SetMode(GizmoMode::Rotate));
        bindings.bind(KeyCode::KeyR, Pressed, RigAction::SetMode(GizmoMode::Scale));

        bindings.bind(KeyCode::Equal, Pressed, RigAction::GrowGizmo);
        bindings.bind(KeyCode::NumpadAdd, Pressed, RigAction::GrowGizmo);
        bindings.bind(KeyCode::Minus, Pressed, RigAction::ShrinkGizmo);
        bindings.bind(KeyCode::NumpadSubtract, Pressed, RigAction::ShrinkGizmo);

        bindings.bind(KeyCode::KeyX, Pressed, RigAction::ToggleAxis(Axis::X));
        bindings.bind(KeyCode::KeyY, Pressed, RigAction::ToggleAxis(Axis::Y));
        bindings.bind(KeyCode::KeyZ, Pressed, RigAction::ToggleAxis(Axis::Z));

        bindings.bind(KeyCode::Space, Pressed, RigAction::ToggleEnabled);
        bindings.bind(KeyCode::Escape, Pressed, RigAction::ResetGizmo);
        bindings
    }
}

impl KeyBindings {
    /// No bindings at all.
    pub fn empty() -> Self {
        Self { map: HashMap::new() }
    }

    /// Bind a key, returning the action it replaced.
    pub fn bind(&mut self, key: KeyCode, phase: KeyPhase, action: RigAction) -> Option<RigAction> {
        self.map.insert((key, phase), action)
    }

    pub fn unbind(&mut self, key: KeyCode, phase: KeyPhase) -> Option<RigAction> {
        self.map.remove(&(key, phase))
    }

    pub fn action_for(&self, key: KeyCode, phase: KeyPhase) -> Option<RigAction> {
        self.map.get(&(key, phase)).copied()
    }

    /// Keys bound to an action, in no particular order.
    pub fn keys_for(&self, action: RigAction) -> Vec<(KeyCode, KeyPhase)> {
        self.map
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
