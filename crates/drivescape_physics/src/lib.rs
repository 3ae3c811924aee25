//! Rigid-body physics for drivescape
//!
//! - Collision shapes (spheres, boxes, planes) combined into compound bodies
//! - Collision detection and layer filtering
//! - Static, dynamic and kinematic bodies with sleeping
//! - Named physics materials

pub mod body;
pub mod collision;
pub mod material;
pub mod shapes;
pub mod world;

pub use body::{BodyKey, BodyType, RigidBody, SleepState, StaticCollider};
pub use collision::{
    aabb_vs_aabb, aabb_vs_plane, collide, sphere_vs_aabb, sphere_vs_plane, sphere_vs_sphere, CollisionFilter,
    CollisionLayer, Contact,
};
pub use material::{MaterialRegistry, PhysicsMaterial};
pub use shapes::{Aabb, Collider, Plane, Shape, ShapeInstance, Sphere};
pub use world::{PhysicsConfig, PhysicsWorld};
