//! Property panel: numeric fields mirroring the selected member's transform.

mod inspector;

pub use inspector::InspectorPanel;

use std::fmt;

use glam::Vec2;
use rig_scene::{Axis, TransformGroup};

/// Identity of one field, unique for the lifetime of a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u64);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({})", self.0)
    }
}

/// The transform axis a field is bound to, e.g. `position.x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub group: TransformGroup,
    pub axis: Axis,
}

impl FieldKey {
    pub const fn new(group: TransformGroup, axis: Axis) -> Self {
        Self { group, axis }
    }

    /// All nine keys, position then rotation then scale, x/y/z within each.
    pub fn all() -> impl Iterator<Item = FieldKey> {
        TransformGroup::ALL
            .into_iter()
            .flat_map(|group| Axis::ALL.into_iter().map(move |axis| FieldKey::new(group, axis)))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group.name(), self.axis.name())
    }
}

/// A value typed into the panel by the user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldEdit {
    pub field: FieldId,
    pub value: f32,
}

/// One numeric field.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub id: FieldId,
    pub group_label: String,
    pub key: FieldKey,
    pub value: f32,
}

/// Ordered field storage shared by panel implementations.
#[derive(Clone, Debug)]
pub struct FieldTable {
    fields: Vec<Field>,
    next_id: u64,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldTable {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add(&mut self, group_label: &str, key: FieldKey, value: f32) -> FieldId {
        let id = FieldId(self.next_id);
        self.next_id += 1;
        self.fields.push(Field {
            id,
            group_label: group_label.to_string(),
            key,
            value,
        });
        id
    }

    /// Set a field's value. Returns false for unknown ids.
    pub fn set(&mut self, id: FieldId, value: f32) -> bool {
        match self.fields.iter_mut().find(|f| f.id == id) {
            Some(field) => {
                field.value = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Remove every field. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Group labels in first-seen order.
    pub fn groups(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for field in &self.fields {
            if !labels.contains(&field.group_label) {
                labels.push(field.group_label.clone());
            }
        }
        labels
    }
}

/// A panel of grouped numeric fields.
pub trait PropertyPanel {
    /// Add a field under a group container and return its identity.
    fn add_field(&mut self, group_label: &str, key: FieldKey, value: f32) -> FieldId;

    /// Change a field's displayed value in place.
    fn update_field(&mut self, field: FieldId, value: f32);

    /// Destroy all fields and their group containers.
    fn destroy_fields(&mut self);

    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;

    fn field_count(&self) -> usize;

    /// Whether a pixel position falls on the panel's own UI.
    fn contains_point(&self, pixel: Vec2) -> bool;

    /// Drain the values the user has typed since the last call.
    fn take_edits(&mut self) -> Vec<FieldEdit>;
}
