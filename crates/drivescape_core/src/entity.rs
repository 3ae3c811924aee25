//! Entities
//!
//! An entity is one node of the city scene graph: a container, a mesh or a
//! helper. Parent/child links are owned by [`World`](crate::World).

use std::collections::HashSet;

use bitflags::bitflags;
use drivescape_math::{Euler, Vec3};
use drivescape_physics::BodyKey;

use crate::materials::Material;
use crate::world::EntityKey;
use crate::Transform3D;

bitflags! {
    /// Which parts of an entity changed since the last frame
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        const NONE = 0;
        const TRANSFORM = 1 << 0;
        const MESH = 1 << 1;
        const MATERIAL = 1 << 2;
        /// Visibility or opacity
        const VISIBILITY = 1 << 3;
        const ALL = Self::TRANSFORM.bits()
            | Self::MESH.bits()
            | Self::MATERIAL.bits()
            | Self::VISIBILITY.bits();
    }
}

/// Geometry summary of a placed mesh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshData {
    /// Bounding box dimensions in local units
    pub size: Vec3,
    pub vertex_count: u32,
}

impl MeshData {
    pub fn volume(&self) -> f32 {
        self.size.product()
    }
}

/// A node in the world
#[derive(Clone, Debug)]
pub struct Entity {
    pub name: Option<String>,
    pub tags: HashSet<String>,
    transform: Transform3D,
    pub mesh: Option<MeshData>,
    material: Material,
    visible: bool,
    opacity: f32,
    /// Body this entity follows every physics step
    pub physics_body: Option<BodyKey>,
    pub(crate) parent: Option<EntityKey>,
    pub(crate) children: Vec<EntityKey>,
    dirty: DirtyFlags,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity {
    /// Empty container
    pub fn new() -> Self {
        Self {
            name: None,
            tags: HashSet::new(),
            transform: Transform3D::identity(),
            mesh: None,
            material: Material::Model(drivescape_math::Color::WHITE),
            visible: true,
            opacity: 1.0,
            physics_body: None,
            parent: None,
            children: Vec::new(),
            dirty: DirtyFlags::ALL,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshData, material: Material) -> Self {
        self.mesh = Some(mesh);
        self.material = material;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_physics_body(mut self, body: BodyKey) -> Self {
        self.physics_body = Some(body);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn transform(&self) -> &Transform3D {
        &self.transform
    }

    /// Mutable transform; marks the entity dirty
    pub fn transform_mut(&mut self) -> &mut Transform3D {
        self.dirty |= DirtyFlags::TRANSFORM;
        &mut self.transform
    }

    pub fn set_transform(&mut self, transform: Transform3D) {
        self.transform = transform;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform_mut().position = position;
    }

    pub fn set_rotation(&mut self, rotation: Euler) {
        self.transform_mut().rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform_mut().scale = scale;
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.dirty |= DirtyFlags::MATERIAL;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty |= DirtyFlags::VISIBILITY;
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Clamped to 0..=1
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.dirty |= DirtyFlags::VISIBILITY;
    }

    pub fn parent(&self) -> Option<EntityKey> {
        self.parent
    }

    pub fn children(&self) -> &[EntityKey] {
        &self.children
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}
