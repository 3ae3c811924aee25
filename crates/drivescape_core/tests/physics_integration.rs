//! Integration tests for the placement and physics pipeline
//!
//! These tests verify that:
//! 1. Resources placed with a collision model get matching bodies
//! 2. Dynamic props fall and their entities follow the body
//! 3. Static buildings and hand-described bodies stay put
//! 4. Removing an object removes its body

use drivescape_core::placement::{add_resource_object, add_static_body, ResourceObject};
use drivescape_core::{
    BoxTemplate, Entity, MaterialLibrary, MeshInfo, ModelAsset, ModelNode, PhysicsConfig, Resources, Rotation,
    StaticBodyTemplate, StaticCollider, Transform3D, World,
};
use drivescape_math::{Euler, Vec3};
use drivescape_physics::PhysicsMaterial;

fn crate_model() -> ModelNode {
    ModelNode::new("root").with_child(ModelNode::new("pureRed").with_mesh(MeshInfo::default()))
}

fn crate_collision() -> ModelNode {
    ModelNode::new("root").with_child(ModelNode::new("cube").with_transform(Transform3D::identity()))
}

fn resources() -> Resources {
    let mut resources = Resources::new("assets");
    resources.insert("crateModel", ModelAsset::new("crate", crate_model()));
    resources.insert("crateCollision", ModelAsset::new("crateCollision", crate_collision()));
    resources
}

fn physics_world() -> World {
    let mut world = World::new().with_physics(PhysicsConfig::new(-9.82));
    if let Some(physics) = world.physics_mut() {
        physics.add_static_collider(StaticCollider::floor(0.0, PhysicsMaterial::FLOOR));
    }
    world
}

// ==================== Placement Tests ====================

#[test]
fn test_dynamic_prop_falls_and_entity_follows() {
    let mut world = physics_world();
    let materials = MaterialLibrary::new();
    let resources = resources();

    let placed = add_resource_object(
        &mut world,
        &materials,
        &resources,
        ResourceObject {
            base: "crateModel",
            collision: Some("crateCollision"),
            offset: Vec3::new(3.0, 4.0, 5.0),
            rotation: Euler::ZERO,
            mass: 2.0,
        },
    )
    .expect("crate should place");
    let body = placed.body.expect("world has physics");

    for _ in 0..240 {
        world.update(1.0 / 60.0);
    }

    let body = world.physics().unwrap().get_body(body).unwrap();
    assert!(body.position.z < 5.0, "Prop should fall. Z={}", body.position.z);
    assert!(body.position.z > 0.0, "Prop should rest on the floor. Z={}", body.position.z);

    let entity = world.get_entity(placed.container).unwrap();
    assert_eq!(entity.transform().position, body.position);
    assert_eq!(entity.name(), Some("crateModel"));
}

#[test]
fn test_static_building_stays_put() {
    let mut world = physics_world();
    let materials = MaterialLibrary::new();
    let resources = resources();

    let placed = add_resource_object(
        &mut world,
        &materials,
        &resources,
        ResourceObject {
            base: "crateModel",
            collision: Some("crateModel"),
            offset: Vec3::new(10.0, -20.0, 0.0),
            rotation: Euler::new(0.0, 0.0, -0.99),
            mass: 0.0,
        },
    )
    .unwrap();

    for _ in 0..60 {
        world.update(1.0 / 60.0);
    }

    let entity = world.get_entity(placed.container).unwrap();
    assert_eq!(entity.transform().position, Vec3::new(10.0, -20.0, 0.0));
    let body = world.physics().unwrap().get_body(placed.body.unwrap()).unwrap();
    assert!(body.is_static());
}

#[test]
fn test_missing_collision_resource_is_an_error() {
    let mut world = physics_world();
    let result = add_resource_object(
        &mut world,
        &MaterialLibrary::new(),
        &resources(),
        ResourceObject {
            base: "crateModel",
            collision: Some("nope"),
            offset: Vec3::ZERO,
            rotation: Euler::ZERO,
            mass: 0.0,
        },
    );
    assert!(result.is_err());
    assert_eq!(world.entity_count(), 0);
}

// ==================== Static Body Tests ====================

#[test]
fn test_hand_described_body_blocks_a_falling_box() {
    let mut world = physics_world();
    let template = StaticBodyTemplate {
        material: "dummy".into(),
        offset: Vec3::ZERO,
        rotation: Rotation::default(),
        boxes: vec![BoxTemplate {
            half_extents: Vec3::new(2.5, 0.5, 2.0),
            offset: Vec3::ZERO,
        }],
    };
    add_static_body(&mut world, &template, Vec3::new(-85.0, 0.0, 0.0)).expect("world has physics");

    let physics = world.physics_mut().unwrap();
    let key = physics.add_body(drivescape_physics::RigidBody::new_box(
        Vec3::new(-85.0, 0.0, 4.0),
        Vec3::splat(0.5),
    ));
    for _ in 0..240 {
        physics.step(1.0 / 60.0);
    }

    let body = physics.get_body(key).unwrap();
    assert!(body.position.z > 2.0, "Box should land on the wall top. Z={}", body.position.z);
}

#[test]
fn test_removing_object_removes_body() {
    let mut world = physics_world();
    let placed = add_resource_object(
        &mut world,
        &MaterialLibrary::new(),
        &resources(),
        ResourceObject {
            base: "crateModel",
            collision: Some("crateCollision"),
            offset: Vec3::new(0.0, 0.0, 2.0),
            rotation: Euler::ZERO,
            mass: 1.0,
        },
    )
    .unwrap();
    let body = placed.body.unwrap();

    world.remove_entity(placed.container);
    assert!(world.physics().unwrap().get_body(body).is_none());
    assert!(world.is_empty());
}

#[test]
fn test_world_without_physics_places_meshes_only() {
    let mut world = World::new();
    world.add_entity(Entity::new().with_name("sun"));
    let placed = add_resource_object(
        &mut world,
        &MaterialLibrary::new(),
        &resources(),
        ResourceObject {
            base: "crateModel",
            collision: None,
            offset: Vec3::ZERO,
            rotation: Euler::ZERO,
            mass: 0.0,
        },
    )
    .unwrap();
    assert!(placed.body.is_none());
    assert_eq!(world.entity_count(), 3);
}
