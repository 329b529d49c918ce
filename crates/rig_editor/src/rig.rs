//! The transform rig: picking, selection, gizmo, panel and orbit controls
//! wired to one scene and one camera.
//!
//! Hosts build a [`RigContext`] once and hand it over together with the
//! collaborators. Raw pointer and keyboard input goes in through the
//! `pointer_*`, `scroll` and `handle_key` methods (or `handle_window_event`
//! for winit hosts); redraw requests come out through the [`RedrawTarget`].
//!
//! A typical frame:
//!
//! ```text
//! window events -> handle_window_event
//! panel ui      -> sync_panel_edits
//! render when a redraw was requested
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use glam::Vec2;
use rig_scene::{Camera, MemberId, Scene, SceneError};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::config::RigPreferences;
use crate::core::{PickingResolver, SelectionController, SelectionState, Transition};
use crate::error::Result;
use crate::events::Subscription;
use crate::gizmo::{Gizmo, GizmoEvent};
use crate::input::{apply_action, KeyBindings, KeyPhase};
use crate::panels::PropertyPanel;
use crate::viewport::{OrbitController, ViewportState};

/// Pixels per scroll line for pixel-precise wheels.
const PIXELS_PER_LINE: f32 = 50.0;

/// Scene, camera and viewport the rig operates on.
#[derive(Clone, Debug)]
pub struct RigContext {
    pub scene: Scene,
    pub camera: Camera,
    pub viewport: ViewportState,
    /// Window pixels per UI point, e.g. `window.scale_factor()`
    pub pixels_per_point: f32,
}

impl RigContext {
    pub fn new(scene: Scene, camera: Camera, viewport: ViewportState) -> Self {
        Self {
            scene,
            camera,
            viewport,
            pixels_per_point: 1.0,
        }
    }

    /// Seed the UI scale, typically from `window.scale_factor()` at startup.
    pub fn with_pixels_per_point(mut self, pixels_per_point: f32) -> Self {
        if pixels_per_point > 0.0 {
            self.pixels_per_point = pixels_per_point;
        }
        self
    }

    /// Context with the preferred perspective camera for this viewport.
    pub fn from_preferences(scene: Scene, viewport: ViewportState, prefs: &RigPreferences) -> Self {
        let camera = prefs.perspective_camera(viewport.aspect_ratio());
        Self::new(scene, camera, viewport)
    }
}

/// Something that can be asked to draw a new frame.
///
/// Requests are idempotent; several per frame collapse into one draw.
pub trait RedrawTarget {
    fn request_redraw(&mut self);
}

impl RedrawTarget for Arc<Window> {
    fn request_redraw(&mut self) {
        Window::request_redraw(self);
    }
}

/// Where a click landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// The render canvas
    Canvas,
    /// Any UI drawn over the canvas
    Overlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn from_winit(button: winit::event::MouseButton) -> Option<Self> {
        match button {
            winit::event::MouseButton::Left => Some(Self::Left),
            winit::event::MouseButton::Right => Some(Self::Right),
            winit::event::MouseButton::Middle => Some(Self::Middle),
            _ => None,
        }
    }
}

/// What a held button is doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gesture {
    Gizmo,
    Orbit,
    Pan,
    Idle,
}

#[derive(Clone, Copy, Debug)]
struct Press {
    button: MouseButton,
    origin: Vec2,
    last: Vec2,
    gesture: Gesture,
    /// Travelled past the click threshold at some point
    dragged: bool,
}

/// Interactive selection and transform rig.
pub struct TransformRig<G: Gizmo, P: PropertyPanel, R: RedrawTarget> {
    context: RigContext,
    gizmo: G,
    panel: P,
    redraw: R,
    prefs: RigPreferences,
    picker: PickingResolver,
    controller: SelectionController,
    orbit: OrbitController,
    bindings: KeyBindings,
    subscription: Option<(Subscription, Receiver<GizmoEvent>)>,
    press: Option<Press>,
    cursor: Vec2,
    held_keys: HashSet<KeyCode>,
    disposed: bool,
}

impl<G: Gizmo, P: PropertyPanel, R: RedrawTarget> TransformRig<G, P, R> {
    pub fn new(mut context: RigContext, mut gizmo: G, panel: P, mut redraw: R, prefs: RigPreferences) -> Self {
        let mut orbit = OrbitController::from_preferences(&prefs);
        context.camera.look_at(orbit.target);
        orbit.sync_from_camera(&context.camera);

        gizmo.set_size(prefs.gizmo_size);
        let subscription = gizmo.notifier().subscribe();

        log::info!(
            "Transform rig ready ({} members, {}x{})",
            context.scene.len(),
            context.viewport.width,
            context.viewport.height
        );
        redraw.request_redraw();

        Self {
            context,
            gizmo,
            panel,
            redraw,
            prefs,
            picker: PickingResolver::new(),
            controller: SelectionController::new(),
            orbit,
            bindings: KeyBindings::default(),
            subscription: Some(subscription),
            press: None,
            cursor: Vec2::ZERO,
            held_keys: HashSet::new(),
            disposed: false,
        }
    }

    pub fn context(&self) -> &RigContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RigContext {
        &mut self.context
    }

    pub fn scene(&self) -> &Scene {
        &self.context.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.context.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.context.camera
    }

    pub fn gizmo(&self) -> &G {
        &self.gizmo
    }

    pub fn gizmo_mut(&mut self) -> &mut G {
        &mut self.gizmo
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn redraw_target(&self) -> &R {
        &self.redraw
    }

    pub fn selection(&self) -> SelectionState {
        self.controller.state()
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    pub fn preferences(&self) -> &RigPreferences {
        &self.prefs
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Scale between window pixels and panel UI points.
    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        if pixels_per_point > 0.0 {
            self.context.pixels_per_point = pixels_per_point;
        }
    }

    fn over_panel(&self, pixel: Vec2) -> bool {
        self.panel.contains_point(pixel / self.context.pixels_per_point)
    }

    /// Select whatever is under a click.
    ///
    /// Clicks on an overlay, on the panel, or outside the canvas never reach
    /// the picker.
    pub fn click(&mut self, pixel: Vec2, target: ClickTarget) -> Transition {
        if self.disposed {
            return Transition::Unchanged;
        }
        if target != ClickTarget::Canvas
            || !self.context.viewport.contains(pixel)
            || self.over_panel(pixel)
        {
            log::trace!("Ignoring click at {:?} on {:?}", pixel, target);
            return Transition::Unchanged;
        }

        let ndc = self.context.viewport.to_ndc(pixel);
        let candidate = self.picker.resolve(&self.context.scene, &self.context.camera, ndc);
        self.apply_pick(candidate)
    }

    /// Select a member directly, as if it had been clicked.
    pub fn select(&mut self, member: MemberId) -> Result<Transition> {
        if !self.context.scene.contains(member) {
            return Err(SceneError::MemberNotFound(member).into());
        }
        Ok(self.apply_pick(Some(member)))
    }

    /// Drop the selection, as if empty space had been clicked.
    pub fn deselect(&mut self) -> Transition {
        self.apply_pick(None)
    }

    fn apply_pick(&mut self, candidate: Option<MemberId>) -> Transition {
        let transition = self
            .controller
            .handle_pick(candidate, &self.context.scene, &mut self.gizmo, &mut self.panel);

        if transition.needs_redraw() {
            self.redraw.request_redraw();
        }
        self.pump_gizmo_events();
        transition
    }

    /// Button press. Returns true if it grabbed a gizmo handle.
    ///
    /// Only one button gesture runs at a time; presses of other buttons are
    /// ignored until it is released.
    pub fn pointer_down(&mut self, pixel: Vec2, button: MouseButton) -> bool {
        if self.disposed {
            return false;
        }
        self.cursor = pixel;
        if let Some(active) = self.press {
            log::trace!("Ignoring {:?} press during {:?} gesture", button, active.button);
            return false;
        }

        let gesture = if self.over_panel(pixel) {
            Gesture::Idle
        } else if button == MouseButton::Left {
            if self.try_grab_handle(pixel) {
                Gesture::Gizmo
            } else {
                Gesture::Orbit
            }
        } else if button == MouseButton::Right {
            Gesture::Pan
        } else {
            Gesture::Idle
        };

        self.press = Some(Press {
            button,
            origin: pixel,
            last: pixel,
            gesture,
            dragged: false,
        });
        self.pump_gizmo_events();
        gesture == Gesture::Gizmo
    }

    fn try_grab_handle(&mut self, pixel: Vec2) -> bool {
        let ray = self
            .context
            .camera
            .ray_from_ndc(self.context.viewport.to_ndc(pixel));
        let Some(axis) = self.gizmo.pick_handle(&self.context.scene, &self.context.camera, &ray) else {
            return false;
        };
        self.gizmo
            .begin_drag(axis, &self.context.scene, &self.context.camera, &ray)
    }

    /// Pointer motion. Returns true if it moved the camera or a member.
    pub fn pointer_move(&mut self, pixel: Vec2) -> bool {
        self.cursor = pixel;
        if self.disposed {
            return false;
        }
        let Some(press) = self.press.as_mut() else {
            return false;
        };

        let delta = pixel - press.last;
        press.last = pixel;
        if pixel.distance(press.origin) >= self.prefs.click_drag_threshold {
            press.dragged = true;
        }

        let moved = match press.gesture {
            Gesture::Gizmo => {
                let ray = self
                    .context
                    .camera
                    .ray_from_ndc(self.context.viewport.to_ndc(pixel));
                self.gizmo.update_drag(&mut self.context.scene, &ray)
            }
            Gesture::Orbit => self.orbit.orbit(delta.x, delta.y),
            Gesture::Pan => self.orbit.pan(delta.x, delta.y),
            Gesture::Idle => false,
        };

        if moved && matches!(press.gesture, Gesture::Orbit | Gesture::Pan) {
            self.orbit.apply_to(&mut self.context.camera);
            self.redraw.request_redraw();
        }
        self.pump_gizmo_events();
        moved
    }

    /// Button that started the gesture in progress, if any.
    pub fn pressed_button(&self) -> Option<MouseButton> {
        self.press.map(|press| press.button)
    }

    /// Button release. A short press-release without a gizmo drag is a click.
    pub fn pointer_up(&mut self, pixel: Vec2, button: MouseButton) -> Option<Transition> {
        self.cursor = pixel;
        if self.disposed {
            return None;
        }
        let press = match self.press {
            Some(press) if press.button == button => press,
            _ => return None,
        };
        self.press = None;

        if press.gesture == Gesture::Gizmo {
            self.gizmo.end_drag();
            self.pump_gizmo_events();
            return None;
        }

        let is_click = button == MouseButton::Left
            && !press.dragged
            && pixel.distance(press.origin) < self.prefs.click_drag_threshold;
        is_click.then(|| self.click(pixel, ClickTarget::Canvas))
    }

    /// Wheel input; positive `lines` zooms in.
    pub fn scroll(&mut self, lines: f32) -> bool {
        if self.disposed || !self.orbit.zoom(lines) {
            return false;
        }
        self.orbit.apply_to(&mut self.context.camera);
        self.redraw.request_redraw();
        true
    }

    /// Key press or release. Returns true if the key is bound.
    ///
    /// Keys sharing a press action (left and right Shift) act as one: the
    /// release action only fires once the last of them goes up.
    pub fn handle_key(&mut self, code: KeyCode, pressed: bool) -> bool {
        if self.disposed {
            return false;
        }
        if pressed {
            self.held_keys.insert(code);
        } else {
            self.held_keys.remove(&code);
        }
        let Some(action) = self.bindings.action_for(code, KeyPhase::from(pressed)) else {
            return false;
        };
        if !pressed && self.twin_still_held(code) {
            log::trace!("{:?} released while a twin key is held", code);
            return true;
        }

        apply_action(action, &mut self.gizmo, &mut self.context.scene, &self.prefs);
        self.pump_gizmo_events();
        true
    }

    fn twin_still_held(&self, code: KeyCode) -> bool {
        let Some(on_press) = self.bindings.action_for(code, KeyPhase::Pressed) else {
            return false;
        };
        self.held_keys
            .iter()
            .any(|held| self.bindings.action_for(*held, KeyPhase::Pressed) == Some(on_press))
    }

    /// Track a canvas resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.viewport.resize(width, height);
        self.context
            .camera
            .set_aspect(self.context.viewport.aspect_ratio());
        log::debug!("Viewport resized to {}x{}", width, height);
        self.redraw.request_redraw();
    }

    /// Write values typed into the panel back into the selected member.
    ///
    /// Call after the panel's UI has run for the frame.
    pub fn sync_panel_edits(&mut self) -> bool {
        let edits = self.panel.take_edits();
        if edits.is_empty() {
            return false;
        }
        let changed = self.controller.apply_edits(&edits, &mut self.context.scene);
        if changed {
            self.redraw.request_redraw();
        }
        changed
    }

    /// React to everything the gizmo has reported since the last call.
    ///
    /// Returns the number of notifications handled.
    pub fn pump_gizmo_events(&mut self) -> usize {
        let events = self.drain_events();

        let mut redraw = false;
        for event in &events {
            match event {
                GizmoEvent::Changed => redraw = true,
                GizmoEvent::DraggingChanged(dragging) => self.orbit.set_enabled(!dragging),
                GizmoEvent::ObjectChanged => {
                    self.controller
                        .refresh(&self.context.scene, &mut self.gizmo, &mut self.panel);
                    redraw = true;
                }
            }
        }

        if redraw {
            self.redraw.request_redraw();
        }
        events.len()
    }

    fn drain_events(&mut self) -> Vec<GizmoEvent> {
        match &self.subscription {
            Some((_, rx)) => rx.try_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Feed a winit window event.
    ///
    /// `ui_consumed` is whether the UI drawn over the canvas took the event.
    /// Returns true if the rig acted on it.
    pub fn handle_window_event(&mut self, event: &WindowEvent, ui_consumed: bool) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_move(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = MouseButton::from_winit(*button) else {
                    return false;
                };
                match state {
                    ElementState::Pressed if ui_consumed => false,
                    ElementState::Pressed => self.pointer_down(self.cursor, button),
                    ElementState::Released => {
                        let matched = self.pressed_button() == Some(button);
                        self.pointer_up(self.cursor, button);
                        matched
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !ui_consumed => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.scroll(lines)
            }
            WindowEvent::KeyboardInput { event, .. } if !ui_consumed && !event.repeat => {
                match event.physical_key {
                    PhysicalKey::Code(code) => self.handle_key(code, event.state == ElementState::Pressed),
                    PhysicalKey::Unidentified(_) => false,
                }
            }
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
                true
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_pixels_per_point(*scale_factor as f32);
                false
            }
            _ => false,
        }
    }

    /// Tear down: release the gizmo subscription and clear the selection.
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.press = None;
        self.held_keys.clear();

        self.controller.clear(&mut self.gizmo, &mut self.panel);
        if let Some((subscription, _rx)) = self.subscription.take() {
            self.gizmo.notifier().unsubscribe(subscription);
        }
        log::debug!("Transform rig disposed");
    }
}

impl<G: Gizmo, P: PropertyPanel, R: RedrawTarget> Drop for TransformRig<G, P, R> {
    fn drop(&mut self) {
        self.dispose();
    }
}
