//! SceneBuilder - Declarative construction of the drivable ground
//!
//! Provides a fluent API for the parts of the city that do not come from a
//! scene file: the physics world, the floor and the vehicle chassis.

use drivescape_core::{BodyKey, Entity, Material, MeshData, PhysicsConfig, RigidBody, StaticCollider, Transform3D, World};
use drivescape_math::{Color, Vec3};
use drivescape_physics::{CollisionFilter, PhysicsMaterial, Shape, ShapeInstance};

const FLOOR_SIZE: f32 = 400.0;
const FLOOR_COLOR: u32 = 0xdcd9d2;

/// Builder for the physics world, floor and vehicle
///
/// # Example
/// ```ignore
/// let builder = SceneBuilder::new()
///     .with_physics(PhysicsConfig::new(-9.82))
///     .add_floor(0.0, PhysicsMaterial::FLOOR)
///     .add_vehicle(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.5, 0.4), 20.0);
/// let vehicle = builder.vehicle();
/// let world = builder.build();
/// ```
pub struct SceneBuilder {
    world: World,
    vehicle: Option<BodyKey>,
    spawn: Option<Vec3>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            vehicle: None,
            spawn: None,
        }
    }

    /// Enable physics
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.world = self.world.with_physics(config);
        self
    }

    /// Add the ground at height `z`
    ///
    /// This adds both a physics floor collider and a visual floor entity.
    pub fn add_floor(mut self, z: f32, material: PhysicsMaterial) -> Self {
        if let Some(physics) = self.world.physics_mut() {
            physics.add_static_collider(StaticCollider::floor(z, material));
        }

        self.world.add_entity(
            Entity::new()
                .with_name("floor")
                .with_tag("static")
                .with_transform(Transform3D::from_position(Vec3::new(0.0, 0.0, z)))
                .with_mesh(
                    MeshData {
                        size: Vec3::new(FLOOR_SIZE, FLOOR_SIZE, 0.0),
                        vertex_count: 4,
                    },
                    Material::Flat(Color::from_hex(FLOOR_COLOR)),
                ),
        );
        self
    }

    /// Add the vehicle chassis as a dynamic box
    ///
    /// Without physics only the spawn point is recorded.
    pub fn add_vehicle(mut self, spawn: Vec3, half_extents: Vec3, mass: f32) -> Self {
        self.spawn = Some(spawn);

        let Some(physics) = self.world.physics_mut() else {
            log::warn!("Vehicle added to a scene without physics");
            return self;
        };
        let material = physics.materials.get_or_default("wheel");
        let body = RigidBody::new(mass.max(f32::EPSILON))
            .with_position(spawn)
            .with_shape(ShapeInstance::new(Shape::Box { half_extents }))
            .with_material(material)
            .with_filter(CollisionFilter::vehicle());
        let key = physics.add_body(body);
        self.vehicle = Some(key);

        self.world.add_entity(
            Entity::new()
                .with_name("vehicle")
                .with_tag("dynamic")
                .with_transform(Transform3D::from_position(spawn))
                .with_physics_body(key),
        );
        self
    }

    /// Add a custom entity to the scene
    pub fn add_entity(mut self, entity: Entity) -> Self {
        self.world.add_entity(entity);
        self
    }

    /// Chassis body, once [`add_vehicle`](Self::add_vehicle) ran with physics
    pub fn vehicle(&self) -> Option<BodyKey> {
        self.vehicle
    }

    pub fn spawn(&self) -> Option<Vec3> {
        self.spawn
    }

    pub fn build(self) -> World {
        self.world
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scene() {
        let world = SceneBuilder::new().build();
        assert_eq!(world.entity_count(), 0);
        assert!(world.physics().is_none());
    }

    #[test]
    fn test_scene_with_physics() {
        let world = SceneBuilder::new().with_physics(PhysicsConfig::new(-20.0)).build();
        assert_eq!(world.physics().unwrap().config.gravity, -20.0);
    }

    #[test]
    fn test_scene_with_floor() {
        let world = SceneBuilder::new()
            .with_physics(PhysicsConfig::default())
            .add_floor(0.0, PhysicsMaterial::FLOOR)
            .build();

        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.physics().unwrap().static_colliders().len(), 1);

        let floor = world.find_by_name("floor").unwrap();
        assert!(world.get_entity(floor).unwrap().has_tag("static"));
    }

    #[test]
    fn test_scene_with_vehicle() {
        let builder = SceneBuilder::new()
            .with_physics(PhysicsConfig::default())
            .add_vehicle(Vec3::new(0.0, 1.0, 2.0), Vec3::new(1.0, 0.5, 0.4), 20.0);
        let key = builder.vehicle().unwrap();
        assert_eq!(builder.spawn(), Some(Vec3::new(0.0, 1.0, 2.0)));

        let world = builder.build();
        let body = world.physics().unwrap().get_body(key).unwrap();
        assert_eq!(body.position, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(body.mass, 20.0);
        assert_eq!(body.filter, CollisionFilter::vehicle());
        assert!(!body.is_static());

        let entity = world.find_by_name("vehicle").unwrap();
        assert!(world.get_entity(entity).unwrap().has_tag("dynamic"));
    }

    #[test]
    fn test_vehicle_without_physics() {
        let builder = SceneBuilder::new().add_vehicle(Vec3::Z, Vec3::ONE, 1.0);
        assert_eq!(builder.vehicle(), None);
        assert_eq!(builder.spawn(), Some(Vec3::Z));
        assert_eq!(builder.build().entity_count(), 0);
    }

    #[test]
    fn test_vehicle_falls_onto_floor() {
        let builder = SceneBuilder::new()
            .with_physics(PhysicsConfig::default())
            .add_floor(0.0, PhysicsMaterial::FLOOR)
            .add_vehicle(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.5, 0.4), 20.0);
        let key = builder.vehicle().unwrap();
        let mut world = builder.build();

        for _ in 0..120 {
            world.update(1.0 / 60.0);
        }
        let z = world.physics().unwrap().get_body(key).unwrap().position.z;
        assert!(z < 2.0 && z > 0.2, "vehicle should rest on the floor, z = {}", z);
    }
}
