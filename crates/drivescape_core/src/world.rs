//! World container for entities
//!
//! Entities live in a slot map and form a forest through parent/child
//! links. The world optionally owns the physics simulation and copies body
//! poses onto the entities that follow them.

use slotmap::{new_key_type, SlotMap};

use drivescape_physics::{PhysicsConfig, PhysicsWorld};

use crate::{Entity, Transform3D};

new_key_type! {
    /// Generational key to an entity in the world
    pub struct EntityKey;
}

/// The city scene: entities plus optional physics
pub struct World {
    entities: SlotMap<EntityKey, Entity>,
    physics_world: Option<PhysicsWorld>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            physics_world: None,
        }
    }

    /// Enable physics for this world
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.physics_world = Some(PhysicsWorld::with_config(config));
        self
    }

    pub fn physics(&self) -> Option<&PhysicsWorld> {
        self.physics_world.as_ref()
    }

    pub fn physics_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.physics_world.as_mut()
    }

    /// Add a root entity
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        self.entities.insert(entity)
    }

    /// Add `entity` under `parent`; `None` if the parent is gone
    pub fn add_child(&mut self, parent: EntityKey, mut entity: Entity) -> Option<EntityKey> {
        if !self.entities.contains_key(parent) {
            return None;
        }
        entity.parent = Some(parent);
        let key = self.entities.insert(entity);
        self.entities[parent].children.push(key);
        Some(key)
    }

    /// Remove an entity, its subtree and their physics bodies
    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        let parent = self.entities.get(key)?.parent;
        if let Some(parent) = parent.and_then(|p| self.entities.get_mut(p)) {
            parent.children.retain(|&c| c != key);
        }

        for descendant in self.descendants(key) {
            if let Some(child) = self.entities.remove(descendant) {
                self.remove_body_of(&child);
            }
        }
        let entity = self.entities.remove(key)?;
        self.remove_body_of(&entity);
        Some(entity)
    }

    fn remove_body_of(&mut self, entity: &Entity) {
        if let (Some(body), Some(physics)) = (entity.physics_body, self.physics_world.as_mut()) {
            physics.remove_body(body);
        }
    }

    pub fn get_entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn get_entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    pub fn children(&self, key: EntityKey) -> &[EntityKey] {
        self.entities.get(key).map(|e| e.children()).unwrap_or(&[])
    }

    /// All entities below `key`, depth first, excluding `key` itself
    pub fn descendants(&self, key: EntityKey) -> Vec<EntityKey> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityKey> = self.children(key).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// First entity with this name, in insertion order
    pub fn find_by_name(&self, name: &str) -> Option<EntityKey> {
        self.entities
            .iter()
            .find(|(_, e)| e.name() == Some(name))
            .map(|(k, _)| k)
    }

    /// First descendant of `root` (depth first) with this name
    pub fn find_descendant_by_name(&self, root: EntityKey, name: &str) -> Option<EntityKey> {
        self.descendants(root)
            .into_iter()
            .find(|&k| self.entities[k].name() == Some(name))
    }

    /// Transform of `key` in world space, composed through its ancestors
    pub fn world_transform(&self, key: EntityKey) -> Option<Transform3D> {
        let entity = self.entities.get(key)?;
        let local = *entity.transform();
        match entity.parent {
            Some(parent) => self.world_transform(parent).map(|p| p.compose(&local)),
            None => Some(local),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Step physics and copy body poses onto the entities that follow them
    pub fn update(&mut self, dt: f32) {
        let Some(physics) = self.physics_world.as_mut() else {
            return;
        };
        physics.step(dt);

        for (_key, entity) in &mut self.entities {
            let Some(body) = entity.physics_body.and_then(|b| physics.get_body(b)) else {
                continue;
            };
            if body.is_static() {
                continue;
            }
            let (position, rotation) = (body.position, body.orientation.to_euler());
            let transform = entity.transform_mut();
            transform.position = position;
            transform.rotation = rotation;
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_with_keys(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    pub fn dirty_entities(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter().filter(|(_, e)| e.is_dirty())
    }

    pub fn clear_all_dirty(&mut self) {
        for entity in self.entities.values_mut() {
            entity.clear_dirty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivescape_math::Vec3;
    use drivescape_physics::RigidBody;

    #[test]
    fn test_add_and_get() {
        let mut world = World::new();
        let key = world.add_entity(Entity::new().with_name("road"));
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.get_entity(key).unwrap().name(), Some("road"));
        assert_eq!(world.find_by_name("road"), Some(key));
    }

    #[test]
    fn test_hierarchy_and_descendants_order() {
        let mut world = World::new();
        let root = world.add_entity(Entity::new().with_name("root"));
        let a = world.add_child(root, Entity::new().with_name("a")).unwrap();
        let b = world.add_child(a, Entity::new().with_name("b")).unwrap();
        let c = world.add_child(root, Entity::new().with_name("c")).unwrap();

        assert_eq!(world.descendants(root), vec![a, b, c]);
        assert_eq!(world.get_entity(b).unwrap().parent(), Some(a));
        assert_eq!(world.find_descendant_by_name(root, "c"), Some(c));
        assert_eq!(world.find_descendant_by_name(a, "c"), None);
    }

    #[test]
    fn test_add_child_to_missing_parent() {
        let mut world = World::new();
        let root = world.add_entity(Entity::new());
        world.remove_entity(root);
        assert!(world.add_child(root, Entity::new()).is_none());
    }

    #[test]
    fn test_remove_subtree_and_bodies() {
        let mut world = World::new().with_physics(PhysicsConfig::default());
        let body = world
            .physics_mut()
            .unwrap()
            .add_body(RigidBody::new_static_box(Vec3::ZERO, Vec3::ONE));
        let root = world.add_entity(Entity::new());
        let child = world.add_child(root, Entity::new().with_physics_body(body)).unwrap();

        world.remove_entity(root);
        assert!(!world.contains(child));
        assert_eq!(world.physics().unwrap().body_count(), 0);
        assert!(world.is_empty());
    }

    #[test]
    fn test_world_transform_composes_parents() {
        let mut world = World::new();
        let root = world.add_entity(Entity::new().with_transform(Transform3D::from_position(Vec3::new(-85.0, 0.0, 0.0))));
        let child = world
            .add_child(root, Entity::new().with_transform(Transform3D::from_position(Vec3::new(1.0, 2.0, 3.0))))
            .unwrap();
        let t = world.world_transform(child).unwrap();
        assert_eq!(t.position, Vec3::new(-84.0, 2.0, 3.0));
    }

    #[test]
    fn test_update_syncs_dynamic_bodies_only() {
        let mut world = World::new().with_physics(PhysicsConfig::new(-10.0));
        let physics = world.physics_mut().unwrap();
        let falling = physics.add_body(RigidBody::new_sphere(Vec3::new(0.0, 0.0, 10.0), 0.5));
        let fixed = physics.add_body(RigidBody::new_static_box(Vec3::new(5.0, 0.0, 0.0), Vec3::ONE));

        let a = world.add_entity(Entity::new().with_physics_body(falling));
        let b = world.add_entity(
            Entity::new()
                .with_transform(Transform3D::from_position(Vec3::new(7.0, 0.0, 0.0)))
                .with_physics_body(fixed),
        );

        world.update(0.1);
        assert!(world.get_entity(a).unwrap().transform().position.z < 10.0);
        assert_eq!(world.get_entity(b).unwrap().transform().position.x, 7.0);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut world = World::new();
        let key = world.add_entity(Entity::new());
        assert_eq!(world.dirty_entities().count(), 1);
        world.clear_all_dirty();
        assert_eq!(world.dirty_entities().count(), 0);
        world.get_entity_mut(key).unwrap().set_visible(false);
        assert_eq!(world.dirty_entities().count(), 1);
    }
}
