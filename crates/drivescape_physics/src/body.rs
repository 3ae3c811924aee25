//! Rigid bodies

use crate::collision::CollisionFilter;
use crate::material::PhysicsMaterial;
use crate::shapes::{Aabb, Collider, Plane, Shape, ShapeInstance};
use drivescape_math::{Quat, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Generational: a key to a removed body returns None instead of
    /// pointing at whatever reused the slot.
    pub struct BodyKey;
}

/// How a body takes part in the simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyType {
    /// Never moves; mass 0
    Static,
    /// Moved by gravity, velocity and contacts
    Dynamic,
    /// Moved only by its velocity, pushes but is not pushed
    Kinematic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SleepState {
    Awake,
    Sleeping,
}

/// A rigid body made of one or more shapes
#[derive(Clone, Debug)]
pub struct RigidBody {
    pub position: Vec3,
    pub orientation: Quat,
    /// Units per second
    pub velocity: Vec3,
    /// Radians per second about each world axis
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub material: PhysicsMaterial,
    pub filter: CollisionFilter,
    pub affected_by_gravity: bool,
    body_type: BodyType,
    shapes: Vec<ShapeInstance>,
    sleep_state: SleepState,
    idle_time: f32,
}

impl RigidBody {
    /// Body with the given mass; mass 0 makes it static
    pub fn new(mass: f32) -> Self {
        let body_type = if mass > 0.0 { BodyType::Dynamic } else { BodyType::Static };
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: mass.max(0.0),
            material: PhysicsMaterial::default(),
            filter: if body_type == BodyType::Static {
                CollisionFilter::static_world()
            } else {
                CollisionFilter::default()
            },
            affected_by_gravity: body_type == BodyType::Dynamic,
            body_type,
            shapes: Vec::new(),
            sleep_state: SleepState::Awake,
            idle_time: 0.0,
        }
    }

    /// Dynamic single-sphere body
    pub fn new_sphere(position: Vec3, radius: f32) -> Self {
        Self::new(1.0)
            .with_position(position)
            .with_shape(ShapeInstance::new(Shape::Sphere { radius }))
    }

    /// Dynamic single-box body
    pub fn new_box(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(1.0)
            .with_position(position)
            .with_shape(ShapeInstance::new(Shape::Box { half_extents }))
    }

    /// Static single-box body
    pub fn new_static_box(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(0.0)
            .with_position(position)
            .with_shape(ShapeInstance::new(Shape::Box { half_extents }))
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    pub fn with_shape(mut self, shape: ShapeInstance) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Switch the body type; static bodies lose gravity
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        if body_type != BodyType::Dynamic {
            self.affected_by_gravity = false;
        }
        self
    }

    /// Start asleep
    pub fn asleep(mut self) -> Self {
        self.sleep();
        self
    }

    pub fn add_shape(&mut self, shape: ShapeInstance) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[ShapeInstance] {
        &self.shapes
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn sleep_state(&self) -> SleepState {
        self.sleep_state
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleep_state == SleepState::Sleeping
    }

    /// Put the body to sleep; its velocities are cleared
    pub fn sleep(&mut self) {
        self.sleep_state = SleepState::Sleeping;
        self.reset_velocity();
    }

    pub fn wake_up(&mut self) {
        self.sleep_state = SleepState::Awake;
        self.idle_time = 0.0;
    }

    /// Zero linear and angular velocity
    pub fn reset_velocity(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Move instantly, clearing velocities
    pub fn teleport(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation;
        self.reset_velocity();
    }

    /// Apply a positional correction (e.g., from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec3) {
        self.position += correction;
    }

    /// World-space colliders of every shape
    pub fn colliders(&self) -> impl Iterator<Item = Collider> + '_ {
        self.shapes
            .iter()
            .map(move |s| s.world_collider(self.position, self.orientation))
    }

    /// Union of all shape bounds
    pub fn bounds(&self) -> Option<Aabb> {
        self.colliders()
            .filter_map(|c| c.bounds())
            .reduce(|a, b| a.union(&b))
    }

    pub(crate) fn accumulate_idle(&mut self, dt: f32, speed_limit: f32, time_limit: f32) {
        let speed = self.velocity.length() + self.angular_velocity.length();
        if speed < speed_limit {
            self.idle_time += dt;
            if self.idle_time >= time_limit {
                self.sleep();
            }
        } else {
            self.idle_time = 0.0;
        }
    }
}

/// Unbounded static geometry such as the ground plane
#[derive(Clone, Debug)]
pub struct StaticCollider {
    pub collider: Collider,
    pub material: PhysicsMaterial,
    pub filter: CollisionFilter,
}

impl StaticCollider {
    pub fn new(collider: Collider, material: PhysicsMaterial) -> Self {
        Self {
            collider,
            material,
            filter: CollisionFilter::static_world(),
        }
    }

    /// Ground plane at height `z`
    pub fn floor(z: f32, material: PhysicsMaterial) -> Self {
        Self::new(Collider::Plane(Plane::floor(z)), material)
    }
}
