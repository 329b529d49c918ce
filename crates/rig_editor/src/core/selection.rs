//! Single-slot selection state machine.
//!
//! The controller owns the "currently selected member" slot and keeps two
//! collaborators in step with it:
//! - the gizmo is attached exactly when something is selected, to that member
//! - the property panel holds nine fields bound to the selection's transform
//!   axes when something is selected, and none otherwise

use rig_scene::{MemberId, Scene};

use crate::gizmo::Gizmo;
use crate::panels::{FieldEdit, FieldId, FieldKey, PropertyPanel};

/// What is currently selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    Selected(MemberId),
}

impl SelectionState {
    pub fn member(&self) -> Option<MemberId> {
        match self {
            SelectionState::Empty => None,
            SelectionState::Selected(id) => Some(*id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionState::Empty)
    }
}

/// Outcome of feeding a pick result to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Same member clicked again, or a miss with nothing selected
    Unchanged,
    Selected(MemberId),
    Switched { from: MemberId, to: MemberId },
    Cleared,
}

impl Transition {
    /// Every transition except `Unchanged` changes what is on screen.
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

/// Drives gizmo attachment and panel fields from pick results.
#[derive(Clone, Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    bindings: Vec<(FieldId, FieldKey)>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn selected(&self) -> Option<MemberId> {
        self.state.member()
    }

    /// Live field bindings, in creation order.
    pub fn bindings(&self) -> &[(FieldId, FieldKey)] {
        &self.bindings
    }

    pub fn field_for(&self, key: FieldKey) -> Option<FieldId> {
        self.bindings.iter().find(|(_, k)| *k == key).map(|(id, _)| *id)
    }

    /// Apply the result of a canvas click.
    ///
    /// `candidate` is the picked member, or `None` when the click hit nothing.
    /// Members are compared by identity only.
    pub fn handle_pick(
        &mut self,
        candidate: Option<MemberId>,
        scene: &Scene,
        gizmo: &mut dyn Gizmo,
        panel: &mut dyn PropertyPanel,
    ) -> Transition {
        let candidate = candidate.filter(|id| {
            let known = scene.contains(*id);
            if !known {
                log::warn!("Picked {} is not in the scene", id);
            }
            known
        });

        let transition = match (self.state, candidate) {
            (SelectionState::Selected(current), Some(hit)) if current == hit => Transition::Unchanged,
            (SelectionState::Empty, None) => Transition::Unchanged,
            (SelectionState::Empty, Some(hit)) => {
                self.select(hit, scene, gizmo, panel);
                panel.show();
                Transition::Selected(hit)
            }
            (SelectionState::Selected(current), Some(hit)) => {
                gizmo.detach();
                gizmo.attach(hit);
                self.unbind(panel);
                self.bind(hit, scene, panel);
                self.state = SelectionState::Selected(hit);
                Transition::Switched { from: current, to: hit }
            }
            (SelectionState::Selected(_), None) => self.clear(gizmo, panel),
        };

        if transition != Transition::Unchanged {
            log::debug!("Selection: {:?}", transition);
        }
        transition
    }

    /// Push the selection's current transform into the existing fields.
    ///
    /// Returns true if anything was updated. If the selected member has left
    /// the scene, the selection is cleared instead.
    pub fn refresh(&mut self, scene: &Scene, gizmo: &mut dyn Gizmo, panel: &mut dyn PropertyPanel) -> bool {
        let Some(member) = self.selected() else {
            return false;
        };
        let Some(transform) = scene.transform(member) else {
            log::warn!("Selected {} was removed from the scene", member);
            self.clear(gizmo, panel);
            return true;
        };

        for (field, key) in &self.bindings {
            panel.update_field(*field, transform.get(key.group, key.axis));
        }
        true
    }

    /// Write values typed into the panel back into the selected member.
    ///
    /// Edits for fields that are no longer bound are ignored. Returns true if
    /// the transform changed.
    pub fn apply_edits(&mut self, edits: &[FieldEdit], scene: &mut Scene) -> bool {
        let Some(member) = self.selected() else {
            return false;
        };
        let Some(node) = scene.get_mut(member) else {
            return false;
        };

        let mut changed = false;
        for edit in edits {
            let Some(key) = self
                .bindings
                .iter()
                .find(|(id, _)| *id == edit.field)
                .map(|(_, key)| *key)
            else {
                log::trace!("Dropping edit for stale {}", edit.field);
                continue;
            };
            if node.transform.get(key.group, key.axis) != edit.value {
                node.transform.set(key.group, key.axis, edit.value);
                changed = true;
            }
        }
        changed
    }

    /// Deselect: detach the gizmo, destroy the fields and hide the panel.
    pub fn clear(&mut self, gizmo: &mut dyn Gizmo, panel: &mut dyn PropertyPanel) -> Transition {
        if self.state.is_empty() {
            return Transition::Unchanged;
        }
        gizmo.detach();
        self.unbind(panel);
        panel.hide();
        self.state = SelectionState::Empty;
        Transition::Cleared
    }

    fn select(&mut self, member: MemberId, scene: &Scene, gizmo: &mut dyn Gizmo, panel: &mut dyn PropertyPanel) {
        gizmo.attach(member);
        self.bind(member, scene, panel);
        self.state = SelectionState::Selected(member);
    }

    fn bind(&mut self, member: MemberId, scene: &Scene, panel: &mut dyn PropertyPanel) {
        let transform = scene.transform(member).copied().unwrap_or_default();
        self.bindings = FieldKey::all()
            .map(|key| {
                let field = panel.add_field(key.group.label(), key, transform.get(key.group, key.axis));
                (field, key)
            })
            .collect();
    }

    fn unbind(&mut self, panel: &mut dyn PropertyPanel) {
        panel.destroy_fields();
        self.bindings.clear();
    }
}
