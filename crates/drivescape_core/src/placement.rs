//! Placing models in the world
//!
//! [`convert_model`] turns the children of a model node into a container
//! entity with one child entity per node, resolving materials by mesh name.
//! [`add_object`] does the same and also builds a rigid body from a
//! collision model: nodes named `cube*` or `box*` become boxes, nodes named
//! `sphere*` become spheres.

use std::sync::Arc;

use drivescape_math::{Euler, Vec3};
use drivescape_physics::{BodyKey, CollisionFilter, RigidBody, Shape, ShapeInstance};

use crate::materials::MaterialLibrary;
use crate::model::{ModelAsset, ModelNode};
use crate::resources::Resources;
use crate::scene::StaticBodyTemplate;
use crate::{Entity, EntityKey, MeshData, Transform3D, World};

/// Why an object could not be placed
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// No resource is registered under this name
    MissingResource(String),
    /// The resource loaded but has no scene root
    MissingScene(String),
    /// The scene root has no children to convert
    EmptyModel(String),
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::MissingResource(name) => write!(f, "Resource '{}' not found", name),
            PlacementError::MissingScene(name) => write!(f, "Resource '{}' has no scene", name),
            PlacementError::EmptyModel(name) => write!(f, "Resource '{}' has no nodes", name),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Look up a model that can be placed
pub fn require_model(resources: &Resources, name: &str) -> Result<Arc<ModelAsset>, PlacementError> {
    let asset = resources
        .get(name)
        .ok_or_else(|| PlacementError::MissingResource(name.to_string()))?;
    match &asset.scene {
        None => Err(PlacementError::MissingScene(name.to_string())),
        Some(root) if root.children.is_empty() => Err(PlacementError::EmptyModel(name.to_string())),
        Some(_) => Ok(asset),
    }
}

/// Convert `nodes` under a new root container at the identity transform
pub fn convert_model(world: &mut World, materials: &MaterialLibrary, nodes: &[ModelNode]) -> EntityKey {
    let container = world.add_entity(Entity::new().with_tag("container"));
    for node in nodes {
        convert_node(world, materials, container, node);
    }
    container
}

/// Convert the children of a named resource's scene root
pub fn convert_resource(
    world: &mut World,
    materials: &MaterialLibrary,
    resources: &Resources,
    name: &str,
) -> Result<EntityKey, PlacementError> {
    let asset = require_model(resources, name)?;
    let root = asset
        .scene
        .as_ref()
        .ok_or_else(|| PlacementError::MissingScene(name.to_string()))?;
    let container = convert_model(world, materials, &root.children);
    if let Some(entity) = world.get_entity_mut(container) {
        entity.name = Some(name.to_string());
    }
    Ok(container)
}

fn convert_node(world: &mut World, materials: &MaterialLibrary, parent: EntityKey, node: &ModelNode) {
    let mut entity = Entity::new()
        .with_name(node.name.clone())
        .with_transform(node.transform);
    if let Some(mesh) = &node.mesh {
        let material = materials.resolve(&node.name, mesh.color);
        entity = entity.with_mesh(
            MeshData {
                size: mesh.size,
                vertex_count: mesh.vertex_count,
            },
            material,
        );
    }
    let Some(key) = world.add_child(parent, entity) else {
        return;
    };
    for child in &node.children {
        convert_node(world, materials, key, child);
    }
}

/// Inputs to [`add_object`]
#[derive(Clone, Debug)]
pub struct ObjectSpec<'a> {
    pub base: &'a ModelNode,
    pub collision: Option<&'a ModelNode>,
    pub offset: Vec3,
    pub rotation: Euler,
    /// 0 gives a static body
    pub mass: f32,
}

/// What [`add_object`] created
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedObject {
    pub container: EntityKey,
    /// `None` when the world has no physics
    pub body: Option<BodyKey>,
}

/// Shapes described by the nodes of a collision model
pub fn collision_shapes(collision: &ModelNode) -> Vec<ShapeInstance> {
    let mut shapes = Vec::new();
    for node in &collision.children {
        let name = node.name.to_ascii_lowercase();
        let shape = if name.starts_with("cube") || name.starts_with("box") {
            Shape::Box {
                half_extents: node.transform.scale * 0.5,
            }
        } else if name.starts_with("sphere") {
            Shape::Sphere {
                radius: node.transform.scale.x,
            }
        } else {
            continue;
        };
        shapes.push(
            ShapeInstance::new(shape)
                .with_offset(node.transform.position)
                .with_orientation(node.transform.quat()),
        );
    }
    shapes
}

/// Place a model with a matching body
pub fn add_object(world: &mut World, materials: &MaterialLibrary, spec: ObjectSpec<'_>) -> PlacedObject {
    let container = convert_model(world, materials, &spec.base.children);
    if let Some(entity) = world.get_entity_mut(container) {
        entity.set_transform(Transform3D::from_position(spec.offset).with_rotation(spec.rotation));
        if !spec.base.name.is_empty() {
            entity.name = Some(spec.base.name.clone());
        }
    }

    let shapes = spec.collision.map(collision_shapes).unwrap_or_default();
    let body = world.physics_mut().map(|physics| {
        let mut body = RigidBody::new(spec.mass)
            .with_position(spec.offset)
            .with_orientation(spec.rotation.to_quat())
            .with_material(physics.materials.get_or_default("dummy"));
        if spec.mass > 0.0 {
            body = body.with_filter(CollisionFilter::prop());
        }
        if shapes.is_empty() {
            log::debug!("Object '{}' has no collision shapes", spec.base.name);
        }
        for shape in &shapes {
            body.add_shape(*shape);
        }
        physics.add_body(body)
    });

    if let (Some(body), Some(entity)) = (body, world.get_entity_mut(container)) {
        entity.physics_body = Some(body);
    }

    PlacedObject { container, body }
}

/// Named resources to place with [`add_resource_object`]
#[derive(Clone, Copy, Debug)]
pub struct ResourceObject<'a> {
    pub base: &'a str,
    pub collision: Option<&'a str>,
    pub offset: Vec3,
    pub rotation: Euler,
    pub mass: f32,
}

/// Place a named resource with its collision resource
pub fn add_resource_object(
    world: &mut World,
    materials: &MaterialLibrary,
    resources: &Resources,
    object: ResourceObject<'_>,
) -> Result<PlacedObject, PlacementError> {
    let base_asset = require_model(resources, object.base)?;
    let collision_asset = match object.collision {
        Some(name) => Some(require_model(resources, name)?),
        None => None,
    };
    let base_root = base_asset
        .scene
        .as_ref()
        .ok_or_else(|| PlacementError::MissingScene(object.base.to_string()))?;
    let collision_root = collision_asset.as_ref().and_then(|a| a.scene.as_ref());

    let placed = add_object(
        world,
        materials,
        ObjectSpec {
            base: base_root,
            collision: collision_root,
            offset: object.offset,
            rotation: object.rotation,
            mass: object.mass,
        },
    );
    if let Some(entity) = world.get_entity_mut(placed.container) {
        entity.name = Some(object.base.to_string());
    }
    Ok(placed)
}

/// Build a hand-described static body at `position`
pub fn add_static_body(world: &mut World, template: &StaticBodyTemplate, position: Vec3) -> Option<BodyKey> {
    let physics = world.physics_mut()?;
    let material = physics.materials.get_or_default(&template.material);
    let mut body = RigidBody::new(0.0)
        .with_position(position + template.offset)
        .with_orientation(template.rotation.to_euler().to_quat())
        .with_material(material);
    for b in &template.boxes {
        body.add_shape(
            ShapeInstance::new(Shape::Box {
                half_extents: b.half_extents,
            })
            .with_offset(b.offset),
        );
    }
    Some(physics.add_body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Material;
    use crate::model::MeshInfo;
    use crate::scene::{BoxTemplate, Rotation};
    use drivescape_math::Color;
    use drivescape_physics::{BodyType, PhysicsConfig};

    fn building() -> ModelNode {
        ModelNode::new("root")
            .with_child(
                ModelNode::new("shadeRoad")
                    .with_mesh(MeshInfo::default())
                    .with_child(ModelNode::new("pureRed").with_mesh(MeshInfo::default())),
            )
            .with_child(ModelNode::new("walls").with_mesh(MeshInfo {
                color: Color::from_hex(0x336699),
                ..Default::default()
            }))
    }

    fn collision() -> ModelNode {
        ModelNode::new("root")
            .with_child(
                ModelNode::new("cube_main")
                    .with_transform(Transform3D::from_position(Vec3::new(0.0, 0.0, 1.0)).with_scale(Vec3::new(4.0, 2.0, 2.0))),
            )
            .with_child(ModelNode::new("Sphere.001").with_transform(Transform3D::identity().with_uniform_scale(0.5)))
            .with_child(ModelNode::new("decor"))
    }

    #[test]
    fn test_convert_model_keeps_hierarchy_and_materials() {
        let mut world = World::new();
        let materials = MaterialLibrary::new();
        let container = convert_model(&mut world, &materials, &building().children);

        assert_eq!(world.children(container).len(), 2);
        assert_eq!(world.descendants(container).len(), 3);

        let road = world.find_descendant_by_name(container, "shadeRoad").unwrap();
        assert_eq!(world.get_entity(road).unwrap().material(), &Material::Shade("road".into()));
        let red = world.find_descendant_by_name(container, "pureRed").unwrap();
        assert_eq!(world.get_entity(red).unwrap().parent(), Some(road));
        let walls = world.find_descendant_by_name(container, "walls").unwrap();
        assert_eq!(
            world.get_entity(walls).unwrap().material(),
            &Material::Model(Color::from_hex(0x336699))
        );
    }

    #[test]
    fn test_collision_shapes_by_name() {
        let shapes = collision_shapes(&collision());
        assert_eq!(shapes.len(), 2);
        assert_eq!(
            shapes[0].shape,
            Shape::Box {
                half_extents: Vec3::new(2.0, 1.0, 1.0)
            }
        );
        assert_eq!(shapes[0].offset, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(shapes[1].shape, Shape::Sphere { radius: 0.5 });
    }

    #[test]
    fn test_add_object_static() {
        let mut world = World::new().with_physics(PhysicsConfig::default());
        let materials = MaterialLibrary::new();
        let base = building();
        let collision = collision();
        let placed = add_object(
            &mut world,
            &materials,
            ObjectSpec {
                base: &base,
                collision: Some(&collision),
                offset: Vec3::new(10.0, -20.0, 0.0),
                rotation: Euler::ZERO,
                mass: 0.0,
            },
        );

        let body_key = placed.body.unwrap();
        let body = world.physics().unwrap().get_body(body_key).unwrap();
        assert_eq!(body.body_type(), BodyType::Static);
        assert_eq!(body.position, Vec3::new(10.0, -20.0, 0.0));
        assert_eq!(body.shapes().len(), 2);

        let container = world.get_entity(placed.container).unwrap();
        assert_eq!(container.transform().position, Vec3::new(10.0, -20.0, 0.0));
        assert_eq!(container.physics_body, Some(body_key));
    }

    #[test]
    fn test_add_object_without_physics() {
        let mut world = World::new();
        let materials = MaterialLibrary::new();
        let base = building();
        let placed = add_object(
            &mut world,
            &materials,
            ObjectSpec {
                base: &base,
                collision: None,
                offset: Vec3::ZERO,
                rotation: Euler::ZERO,
                mass: 0.0,
            },
        );
        assert!(placed.body.is_none());
        assert!(world.contains(placed.container));
    }

    #[test]
    fn test_require_model_errors() {
        let mut resources = Resources::new("assets");
        resources.insert("empty", ModelAsset::empty("empty"));
        resources.insert("bare", ModelAsset::new("bare", ModelNode::new("root")));

        assert_eq!(
            require_model(&resources, "missing").unwrap_err(),
            PlacementError::MissingResource("missing".into())
        );
        assert_eq!(
            require_model(&resources, "empty").unwrap_err(),
            PlacementError::MissingScene("empty".into())
        );
        assert_eq!(
            require_model(&resources, "bare").unwrap_err(),
            PlacementError::EmptyModel("bare".into())
        );
    }

    #[test]
    fn test_add_static_body_from_template() {
        let mut world = World::new().with_physics(PhysicsConfig::default());
        let template = StaticBodyTemplate {
            material: "dummy".into(),
            offset: Vec3::new(1.5, 1.2, 0.0),
            rotation: Rotation::Radians([0.0, 0.0, -0.99]),
            boxes: vec![BoxTemplate {
                half_extents: Vec3::new(2.5, 1.75, 2.5),
                offset: Vec3::ZERO,
            }],
        };
        let key = add_static_body(&mut world, &template, Vec3::new(41.0, -14.0, 0.0)).unwrap();
        let body = world.physics().unwrap().get_body(key).unwrap();
        assert!(body.is_static());
        assert!((body.position - Vec3::new(42.5, -12.8, 0.0)).length() < 1e-5);
        assert_eq!(body.shapes().len(), 1);
    }
}
