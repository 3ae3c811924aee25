//! Physics world and simulation

use crate::body::{BodyKey, BodyType, RigidBody, StaticCollider};
use crate::collision::{collide, CollisionFilter, Contact};
use crate::material::{MaterialRegistry, PhysicsMaterial};
use crate::shapes::Collider;
use drivescape_math::Vec3;
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity acceleration along Z (negative = down)
    pub gravity: f32,
    /// Let idle bodies fall asleep
    pub allow_sleep: bool,
    /// Combined linear + angular speed under which a body counts as idle
    pub sleep_speed_limit: f32,
    /// Seconds a body must stay idle before sleeping
    pub sleep_time_limit: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.82,
            allow_sleep: true,
            sleep_speed_limit: 0.1,
            sleep_time_limit: 1.0,
        }
    }
}

impl PhysicsConfig {
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }
}

/// Static geometry gathered once per step
struct StaticShape {
    collider: Collider,
    material: PhysicsMaterial,
    filter: CollisionFilter,
}

/// The physics world containing all rigid bodies
pub struct PhysicsWorld {
    bodies: SlotMap<BodyKey, RigidBody>,
    static_colliders: Vec<StaticCollider>,
    pub config: PhysicsConfig,
    /// Named materials for bodies created against this world
    pub materials: MaterialRegistry,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            static_colliders: Vec::new(),
            config,
            materials: MaterialRegistry::default(),
        }
    }

    pub fn add_static_collider(&mut self, collider: StaticCollider) {
        self.static_colliders.push(collider);
    }

    pub fn static_colliders(&self) -> &[StaticCollider] {
        &self.static_colliders
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        self.bodies.remove(key)
    }

    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> {
        self.bodies.iter()
    }

    /// Step the simulation forward by `dt` seconds
    ///
    /// 1. Gravity and velocity integration for awake dynamic and kinematic bodies
    /// 2. Contacts against static geometry
    /// 3. Contacts between movable bodies, waking sleepers that get hit
    /// 4. Sleep bookkeeping
    pub fn step(&mut self, dt: f32) {
        for (_key, body) in &mut self.bodies {
            if body.is_static() || body.is_sleeping() {
                continue;
            }
            if body.affected_by_gravity && body.body_type() == BodyType::Dynamic {
                body.velocity.z += self.config.gravity * dt;
            }
            body.position += body.velocity * dt;
            body.orientation = body.orientation.integrate(body.angular_velocity, dt);
        }

        self.resolve_static_collisions();
        self.resolve_body_collisions();

        if self.config.allow_sleep {
            let (limit, time) = (self.config.sleep_speed_limit, self.config.sleep_time_limit);
            for (_key, body) in &mut self.bodies {
                if body.body_type() == BodyType::Dynamic && !body.is_sleeping() {
                    body.accumulate_idle(dt, limit, time);
                }
            }
        }
    }

    fn gather_static_shapes(&self) -> Vec<StaticShape> {
        let mut shapes: Vec<StaticShape> = self
            .static_colliders
            .iter()
            .map(|s| StaticShape {
                collider: s.collider,
                material: s.material,
                filter: s.filter,
            })
            .collect();
        for (_key, body) in &self.bodies {
            if body.is_static() {
                shapes.extend(body.colliders().map(|collider| StaticShape {
                    collider,
                    material: body.material,
                    filter: body.filter,
                }));
            }
        }
        shapes
    }

    fn resolve_static_collisions(&mut self) {
        let statics = self.gather_static_shapes();

        for (_key, body) in &mut self.bodies {
            if body.body_type() != BodyType::Dynamic || body.is_sleeping() {
                continue;
            }

            for stat in &statics {
                if !body.filter.collides_with(&stat.filter) {
                    continue;
                }
                // Recompute per static shape since earlier corrections moved the body
                let contact = deepest_contact(body.colliders(), std::iter::once(stat.collider));
                if let Some(contact) = contact {
                    body.apply_correction(contact.normal * contact.penetration);
                    let combined = body.material.combine(&stat.material);
                    apply_velocity_response(&mut body.velocity, contact.normal, combined);
                }
            }
        }
    }

    fn resolve_body_collisions(&mut self) {
        let keys: Vec<BodyKey> = self
            .bodies
            .iter()
            .filter(|(_, b)| !b.is_static())
            .map(|(k, _)| k)
            .collect();

        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let (key_a, key_b) = (keys[i], keys[j]);
                let (a, b) = (&self.bodies[key_a], &self.bodies[key_b]);

                let movable_a = a.body_type() == BodyType::Dynamic;
                let movable_b = b.body_type() == BodyType::Dynamic;
                if !movable_a && !movable_b {
                    continue;
                }
                if a.is_sleeping() && b.is_sleeping() {
                    continue;
                }
                if !a.filter.collides_with(&b.filter) {
                    continue;
                }

                let colliders_b: Vec<Collider> = b.colliders().collect();
                let contact = deepest_contact(a.colliders(), colliders_b.into_iter());
                if let Some(contact) = contact {
                    self.resolve_pair(key_a, key_b, &contact);
                }
            }
        }
    }

    /// Push the pair apart; contact normal points from B toward A
    fn resolve_pair(&mut self, key_a: BodyKey, key_b: BodyKey, contact: &Contact) {
        let pushable = |b: &RigidBody| b.body_type() == BodyType::Dynamic;
        let (pushable_a, pushable_b) = (pushable(&self.bodies[key_a]), pushable(&self.bodies[key_b]));

        let (ratio_a, ratio_b) = match (pushable_a, pushable_b) {
            (true, false) => (1.0, 0.0),
            (false, true) => (0.0, 1.0),
            _ => {
                let mass_a = self.bodies[key_a].mass;
                let mass_b = self.bodies[key_b].mass;
                let total = mass_a + mass_b;
                if total > 0.0 {
                    (mass_b / total, mass_a / total)
                } else {
                    (0.5, 0.5)
                }
            }
        };

        let combined = self.bodies[key_a].material.combine(&self.bodies[key_b].material);

        if pushable_a {
            let body = &mut self.bodies[key_a];
            body.wake_up();
            body.apply_correction(contact.normal * contact.penetration * ratio_a);
            apply_velocity_response(&mut body.velocity, contact.normal, combined);
        }
        if pushable_b {
            let body = &mut self.bodies[key_b];
            body.wake_up();
            body.apply_correction(-contact.normal * contact.penetration * ratio_b);
            apply_velocity_response(&mut body.velocity, -contact.normal, combined);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Deepest contact between any collider of `a` and any of `b`
fn deepest_contact(
    a: impl Iterator<Item = Collider>,
    b: impl Iterator<Item = Collider> + Clone,
) -> Option<Contact> {
    let mut best: Option<Contact> = None;
    for ca in a {
        for cb in b.clone() {
            if let Some(c) = collide(&ca, &cb).filter(Contact::is_colliding) {
                if best.map_or(true, |prev| c.penetration > prev.penetration) {
                    best = Some(c);
                }
            }
        }
    }
    best
}

/// Impacts slower than this don't bounce
const RESTING_SPEED: f32 = 0.5;

/// Remove the velocity component into the surface, bouncing by restitution
/// and damping the tangential part by friction
fn apply_velocity_response(velocity: &mut Vec3, normal: Vec3, material: PhysicsMaterial) {
    let along_normal = velocity.dot(normal);
    if along_normal >= 0.0 {
        return;
    }
    let restitution = if -along_normal < RESTING_SPEED { 0.0 } else { material.restitution };
    *velocity -= normal * along_normal * (1.0 + restitution);

    let normal_part = normal * velocity.dot(normal);
    let tangent = *velocity - normal_part;
    if tangent.length() > 0.0001 {
        *velocity = normal_part + tangent * (1.0 - material.friction);
    }
}
