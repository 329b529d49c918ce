//! Scene graph of editable members.
//!
//! Members are owned by the scene; tools only read and write their transforms.
//! Identity is the `MemberId`, which is never reused within one scene, so two
//! members with identical transforms are still told apart.

use std::collections::HashMap;
use std::fmt;

use glam::{Mat4, Vec3};

use crate::bounds::Aabb;
use crate::error::{Result, SceneError};
use crate::intersect::{ray_aabb, ray_sphere_at};
use crate::ray::Ray;
use crate::transform::Transform;

/// Stable identity of a scene member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member({})", self.0)
    }
}

/// Pickable geometry of a member, in its local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Box centered on the local origin
    Cuboid { half_extents: Vec3 },
    /// Sphere centered on the local origin
    Sphere { radius: f32 },
    /// Grouping node with no geometry of its own
    Empty,
}

impl Shape {
    /// Unit cube (edge length 1).
    pub fn unit_cube() -> Self {
        Shape::Cuboid {
            half_extents: Vec3::splat(0.5),
        }
    }

    /// Local-space intersection parameter for an un-normalized ray.
    fn intersect_local(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        match *self {
            Shape::Cuboid { half_extents } => {
                ray_aabb(origin, direction, &Aabb::from_center_half_extents(Vec3::ZERO, half_extents))
            }
            Shape::Sphere { radius } => ray_sphere_at(origin, direction, Vec3::ZERO, radius),
            Shape::Empty => None,
        }
    }
}

/// An entity in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneMember {
    pub id: MemberId,
    pub name: String,
    /// Whether clicks may pick this member (and its descendants)
    pub selectable: bool,
    /// Transform relative to the parent
    pub transform: Transform,
    pub shape: Shape,
    pub parent: Option<MemberId>,
    pub children: Vec<MemberId>,
}

impl SceneMember {
    fn new(id: MemberId, name: String, shape: Shape) -> Self {
        Self {
            id,
            name,
            selectable: false,
            transform: Transform::default(),
            shape,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A ray hit against a member.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// The member whose geometry was hit
    pub member: MemberId,
    /// World-space distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// Flat storage of members plus the root ordering.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    members: Vec<SceneMember>,
    index: HashMap<MemberId, usize>,
    roots: Vec<MemberId>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn allocate_id(&mut self) -> MemberId {
        // Default-constructed scenes start at 0; skip it so ids stay non-zero
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = MemberId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, member: SceneMember) {
        let id = member.id;
        self.index.insert(id, self.members.len());
        self.members.push(member);
    }

    /// Add a top-level member.
    pub fn spawn(&mut self, name: impl Into<String>, shape: Shape) -> MemberId {
        let id = self.allocate_id();
        self.insert(SceneMember::new(id, name.into(), shape));
        self.roots.push(id);
        log::trace!("Spawned {}", id);
        id
    }

    /// Add a member under an existing parent.
    pub fn spawn_child(
        &mut self,
        parent: MemberId,
        name: impl Into<String>,
        shape: Shape,
    ) -> Result<MemberId> {
        if !self.contains(parent) {
            return Err(SceneError::MemberNotFound(parent));
        }
        let id = self.allocate_id();
        let mut member = SceneMember::new(id, name.into(), shape);
        member.parent = Some(parent);
        self.insert(member);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    pub fn get(&self, id: MemberId) -> Option<&SceneMember> {
        self.index.get(&id).map(|&idx| &self.members[idx])
    }

    pub fn get_mut(&mut self, id: MemberId) -> Option<&mut SceneMember> {
        self.index.get(&id).map(|&idx| &mut self.members[idx])
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.index.contains_key(&id)
    }

    /// Flag a member as pickable or not.
    pub fn set_selectable(&mut self, id: MemberId, selectable: bool) -> Result<()> {
        let member = self.get_mut(id).ok_or(SceneError::MemberNotFound(id))?;
        member.selectable = selectable;
        Ok(())
    }

    /// Replace a member's local transform.
    pub fn set_transform(&mut self, id: MemberId, transform: Transform) -> Result<()> {
        let member = self.get_mut(id).ok_or(SceneError::MemberNotFound(id))?;
        member.transform = transform;
        Ok(())
    }

    pub fn transform(&self, id: MemberId) -> Option<&Transform> {
        self.get(id).map(|m| &m.transform)
    }

    /// Top-level members in insertion order.
    pub fn roots(&self) -> &[MemberId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneMember> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check whether `ancestor` is on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: MemberId, id: MemberId) -> bool {
        let mut current = self.get(id).and_then(|m| m.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.get(p).and_then(|m| m.parent);
        }
        false
    }

    /// Move a member under a new parent (or to the top level), keeping its
    /// local transform.
    pub fn set_parent(&mut self, child: MemberId, parent: Option<MemberId>) -> Result<()> {
        if !self.contains(child) {
            return Err(SceneError::MemberNotFound(child));
        }
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(SceneError::MemberNotFound(p));
            }
            if p == child || self.is_ancestor(child, p) {
                return Err(SceneError::CyclicParent { child, parent: p });
            }
        }

        self.detach_from_parent(child);
        match parent {
            Some(p) => {
                if let Some(pm) = self.get_mut(p) {
                    pm.children.push(child);
                }
            }
            None => self.roots.push(child),
        }
        if let Some(cm) = self.get_mut(child) {
            cm.parent = parent;
        }
        Ok(())
    }

    fn detach_from_parent(&mut self, id: MemberId) {
        match self.get(id).and_then(|m| m.parent) {
            Some(p) => {
                if let Some(pm) = self.get_mut(p) {
                    pm.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
    }

    /// Remove a member and its whole subtree. Returns the removed members.
    pub fn remove(&mut self, id: MemberId) -> Result<Vec<SceneMember>> {
        if !self.contains(id) {
            return Err(SceneError::MemberNotFound(id));
        }
        self.detach_from_parent(id);

        let mut doomed = vec![id];
        let mut cursor = 0;
        while cursor < doomed.len() {
            if let Some(m) = self.get(doomed[cursor]) {
                doomed.extend(m.children.iter().copied());
            }
            cursor += 1;
        }

        let mut removed = Vec::with_capacity(doomed.len());
        let mut kept = Vec::with_capacity(self.members.len());
        for member in self.members.drain(..) {
            if doomed.contains(&member.id) {
                removed.push(member);
            } else {
                kept.push(member);
            }
        }
        self.members = kept;
        self.index = self
            .members
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.id, idx))
            .collect();

        log::debug!("Removed {} ({} members)", id, removed.len());
        Ok(removed)
    }

    /// Local-to-world matrix composed along the parent chain.
    pub fn world_matrix(&self, id: MemberId) -> Option<Mat4> {
        let member = self.get(id)?;
        let local = member.transform.matrix();
        match member.parent {
            Some(p) => Some(self.world_matrix(p)? * local),
            None => Some(local),
        }
    }

    /// Intersect a ray with the given members, closest hit first.
    ///
    /// With `recursive`, descendants of each target are tested as well, whatever
    /// their own selectable flag.
    pub fn intersect(&self, ray: &Ray, targets: &[MemberId], recursive: bool) -> Vec<Intersection> {
        let mut hits = Vec::new();

        for &id in targets {
            let parent_world = self
                .get(id)
                .and_then(|m| m.parent)
                .and_then(|p| self.world_matrix(p))
                .unwrap_or(Mat4::IDENTITY);
            self.intersect_member(id, parent_world, ray, recursive, &mut hits);
        }

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits
    }

    fn intersect_member(
        &self,
        id: MemberId,
        parent_world: Mat4,
        ray: &Ray,
        recursive: bool,
        hits: &mut Vec<Intersection>,
    ) {
        let Some(member) = self.get(id) else {
            return;
        };
        let world = parent_world * member.transform.matrix();

        // Zero scale collapses the shape; nothing to hit
        if world.determinant().abs() > 1e-12 {
            let (origin, direction) = ray.transformed_unnormalized(&world.inverse());
            if let Some(t) = member.shape.intersect_local(origin, direction) {
                hits.push(Intersection {
                    member: id,
                    distance: t,
                    point: ray.at(t),
                });
            }
        }

        if recursive {
            for &child in &member.children {
                self.intersect_member(child, world, ray, recursive, hits);
            }
        }
    }
}

/// Two selectable unit crates: one at the origin, one at (0, 0, -2).
pub fn demo_scene() -> (Scene, [MemberId; 2]) {
    let mut scene = Scene::new();

    let first = scene.spawn("crate", Shape::unit_cube());
    let second = scene.spawn("crate.001", Shape::unit_cube());

    for id in [first, second] {
        if let Some(member) = scene.get_mut(id) {
            member.selectable = true;
        }
    }
    if let Some(member) = scene.get_mut(second) {
        member.transform.position = Vec3::new(0.0, 0.0, -2.0);
    }

    (scene, [first, second])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_z() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_ids_are_unique() {
        let mut scene = Scene::new();
        let a = scene.spawn("a", Shape::Empty);
        let b = scene.spawn("b", Shape::Empty);
        scene.remove(a).unwrap();
        let c = scene.spawn("c", Shape::Empty);

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_intersect_sorted_closest_first() {
        let (scene, [a, b]) = demo_scene();
        let hits = scene.intersect(&looking_down_z(), &[b, a], false);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].member, a);
        assert!((hits[0].distance - 4.5).abs() < 1e-4);
        assert_eq!(hits[1].member, b);
        assert!((hits[1].distance - 6.5).abs() < 1e-4);
    }

    #[test]
    fn test_intersect_respects_transform() {
        let mut scene = Scene::new();
        let id = scene.spawn("wide", Shape::unit_cube());
        let member = scene.get_mut(id).unwrap();
        member.transform.position = Vec3::new(2.0, 0.0, 0.0);
        member.transform.scale = Vec3::new(4.0, 1.0, 1.0);

        // Scaled box spans x in 0..4, so a ray at x = 0.5 hits it
        let ray = Ray::new(Vec3::new(0.5, 0.0, 5.0), Vec3::NEG_Z);
        let hits = scene.intersect(&ray, &[id], false);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point.z - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_intersect_recursive_reaches_children() {
        let mut scene = Scene::new();
        let group = scene.spawn("group", Shape::Empty);
        scene.get_mut(group).unwrap().transform.position = Vec3::new(0.0, 0.0, -1.0);
        let child = scene.spawn_child(group, "child", Shape::Sphere { radius: 0.5 }).unwrap();

        let ray = looking_down_z();
        assert!(scene.intersect(&ray, &[group], false).is_empty());

        let hits = scene.intersect(&ray, &[group], true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].member, child);
        assert!((hits[0].distance - 5.5).abs() < 1e-4);
    }

    #[test]
    fn test_zero_scale_is_not_hit() {
        let (mut scene, [a, _]) = demo_scene();
        scene.get_mut(a).unwrap().transform.scale = Vec3::ZERO;
        assert!(scene.intersect(&looking_down_z(), &[a], false).is_empty());
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut scene = Scene::new();
        let parent = scene.spawn("parent", Shape::Empty);
        scene.get_mut(parent).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
        let child = scene.spawn_child(parent, "child", Shape::Empty).unwrap();
        scene.get_mut(child).unwrap().transform.position = Vec3::new(0.0, 2.0, 0.0);

        let world = scene.world_matrix(child).unwrap();
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut scene = Scene::new();
        let a = scene.spawn("a", Shape::Empty);
        let b = scene.spawn_child(a, "b", Shape::Empty).unwrap();

        assert_eq!(
            scene.set_parent(a, Some(b)),
            Err(SceneError::CyclicParent { child: a, parent: b })
        );

        scene.set_parent(b, None).unwrap();
        assert_eq!(scene.roots(), &[a, b]);
        assert!(scene.get(a).unwrap().children.is_empty());
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut scene = Scene::new();
        let a = scene.spawn("a", Shape::Empty);
        let b = scene.spawn_child(a, "b", Shape::Empty).unwrap();
        let c = scene.spawn("c", Shape::Empty);

        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!scene.contains(a));
        assert!(!scene.contains(b));
        assert_eq!(scene.roots(), &[c]);
        assert_eq!(scene.get(c).unwrap().name, "c");
    }

    #[test]
    fn test_missing_member_errors() {
        let mut scene = Scene::new();
        let ghost = MemberId(42);
        assert_eq!(
            scene.spawn_child(ghost, "x", Shape::Empty),
            Err(SceneError::MemberNotFound(ghost))
        );
        assert!(scene.set_selectable(ghost, true).is_err());
    }
}
