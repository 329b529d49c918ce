//! Inspector panel - egui window editing the selected member's transform.

use egui::Context as EguiContext;
use glam::Vec2;
use rig_scene::TransformGroup;

use super::{FieldEdit, FieldId, FieldKey, FieldTable, PropertyPanel};

const TITLE: &str = "Transform";

/// Floating egui window with one collapsing header per transform group.
pub struct InspectorPanel {
    table: FieldTable,
    visible: bool,
    /// Screen rect from the last frame the window was drawn
    rect: Option<egui::Rect>,
    pending: Vec<FieldEdit>,
}

impl Default for InspectorPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectorPanel {
    pub fn new() -> Self {
        Self {
            table: FieldTable::new(),
            visible: false,
            rect: None,
            pending: Vec::new(),
        }
    }

    pub fn fields(&self) -> &FieldTable {
        &self.table
    }

    /// Last drawn screen rect, if the window is on screen.
    pub fn last_rect(&self) -> Option<egui::Rect> {
        self.rect
    }

    /// Write a value as if the user typed it. Returns false for unknown ids.
    pub fn edit(&mut self, field: FieldId, value: f32) -> bool {
        record_edit(&mut self.table, &mut self.pending, field, value)
    }

    /// Render the panel's UI.
    pub fn ui(&mut self, ctx: &EguiContext) {
        if !self.visible {
            self.rect = None;
            return;
        }

        let table = &mut self.table;
        let pending = &mut self.pending;

        let response = egui::Window::new(TITLE)
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                if table.is_empty() {
                    ui.label("Nothing selected");
                    return;
                }
                for label in table.groups() {
                    egui::CollapsingHeader::new(label.as_str())
                        .default_open(true)
                        .show(ui, |ui| {
                            group_ui(ui, table, pending, &label);
                        });
                }
            });

        self.rect = response.map(|r| r.response.rect);
    }
}

fn group_ui(ui: &mut egui::Ui, table: &mut FieldTable, pending: &mut Vec<FieldEdit>, label: &str) {
    let mut edits = Vec::new();

    ui.horizontal(|ui| {
        for field in table.iter().filter(|f| f.group_label == label) {
            ui.label(format!("{}:", field.key.axis.name().to_uppercase()));
            if let Some(value) = drag_value(ui, field.key, field.value) {
                edits.push((field.id, value));
            }
        }
    });

    for (id, value) in edits {
        record_edit(table, pending, id, value);
    }
}

/// One `DragValue`; rotation is shown in degrees and stored in radians.
fn drag_value(ui: &mut egui::Ui, key: FieldKey, value: f32) -> Option<f32> {
    if key.group == TransformGroup::Rotation {
        let mut degrees = value.to_degrees();
        let changed = ui
            .add(egui::DragValue::new(&mut degrees).speed(1.0).suffix("°"))
            .changed();
        changed.then(|| degrees.to_radians())
    } else {
        let mut v = value;
        let changed = ui.add(egui::DragValue::new(&mut v).speed(0.1)).changed();
        changed.then_some(v)
    }
}

fn record_edit(table: &mut FieldTable, pending: &mut Vec<FieldEdit>, field: FieldId, value: f32) -> bool {
    if !table.set(field, value) {
        return false;
    }
    pending.push(FieldEdit { field, value });
    true
}

impl PropertyPanel for InspectorPanel {
    fn add_field(&mut self, group_label: &str, key: FieldKey, value: f32) -> FieldId {
        self.table.add(group_label, key, value)
    }

    fn update_field(&mut self, field: FieldId, value: f32) {
        if !self.table.set(field, value) {
            log::trace!("Ignoring update for destroyed {}", field);
        }
    }

    fn destroy_fields(&mut self) {
        self.table.clear();
        // Edits aimed at destroyed fields are meaningless now
        self.pending.clear();
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.rect = None;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn field_count(&self) -> usize {
        self.table.len()
    }

    fn contains_point(&self, pixel: Vec2) -> bool {
        self.visible
            && self
                .rect
                .map_or(false, |r| r.contains(egui::pos2(pixel.x, pixel.y)))
    }

    fn take_edits(&mut self) -> Vec<FieldEdit> {
        std::mem::take(&mut self.pending)
    }
}
