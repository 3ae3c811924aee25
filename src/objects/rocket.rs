//! Rocket
//!
//! Shakes, lifts off, climbs to 25 units, comes back down and settles on its
//! pad. The physics body is not linked to the container: it is moved along
//! with the rocket while airborne and put to sleep once it has landed.

use std::f32::consts::FRAC_PI_2;

use drivescape_core::{
    BodyKey, DebugChange, DebugValue, Easing, Entity, EntityKey, Material, MeshData, ObjectTemplate, Placement,
    RigidBody, SliderRange, Tick, Transform3D, Tween, World,
};
use drivescape_math::{Color, Quat, Vec3};
use drivescape_physics::{CollisionFilter, Shape, ShapeInstance};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::landmark::edit_placement;
use super::{place_template, BuildContext, ObjectContext, ObjectInput, WorldObject};

const SHAKES: u32 = 10;
const SHAKE_DURATION: f32 = 0.08;
const SHAKE_AMPLITUDE: f32 = 0.05;

const LIFT: f32 = 0.8;
const LIFT_DURATION: f32 = 1.5;

const MAX_HEIGHT: f32 = 25.0;
const CLIMB_TIME: f32 = 5.0;
const RETURN_DELAY: f32 = 5.0;
const DESCENT_TIME: f32 = 7.5;
const SETTLE_DURATION: f32 = 0.3;

const BODY_MASS: f32 = 100.0;
const BODY_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 0.4, 0.9);

const SMOKE_PARTICLES: usize = 20;
const SMOKE_COLOR: u32 = 0xcccccc;
const SMOKE_FALL: f32 = 100.0;
const SMOKE_GROWTH: f32 = 10.0;
const SMOKE_FADE: f32 = 10.0;
const SMOKE_FLOOR: f32 = -5.0;

/// Where the rocket is in its flight
#[derive(Clone, Debug, PartialEq)]
pub enum RocketPhase {
    Idle,
    /// Jittering on the pad before lift-off
    Preparing { shakes_left: u32, shake: Tween<Vec3> },
    /// Slow rise off the pad
    Launching(Tween<f32>),
    Flying { time: f32 },
    Returning { time: f32 },
    /// Easing back onto the pad after touchdown
    Settling(Tween<Vec3>),
}

impl RocketPhase {
    fn emits_smoke(&self) -> bool {
        matches!(
            self,
            RocketPhase::Launching(_) | RocketPhase::Flying { .. } | RocketPhase::Returning { .. }
        )
    }

    fn airborne(&self) -> bool {
        matches!(self, RocketPhase::Flying { .. } | RocketPhase::Returning { .. })
    }
}

pub struct Rocket {
    name: String,
    container: Option<EntityKey>,
    body: Option<BodyKey>,
    placement: Placement,
    /// Pad position recorded at launch
    start: Vec3,
    fire: Vec<EntityKey>,
    smoke: Vec<EntityKey>,
    phase: RocketPhase,
    rng: ChaCha8Rng,
}

impl Rocket {
    pub fn new(template: &ObjectTemplate, ctx: &mut BuildContext<'_>) -> Self {
        let placement = template.effective_placement(ctx.debug_enabled());

        let container = match place_template(template, &placement, ctx) {
            Ok(placed) => Some(placed.container),
            Err(e) => {
                log::error!("Failed to place rocket '{}': {}", template.name, e);
                None
            }
        };

        let fire = container
            .map(|c| {
                ctx.world
                    .descendants(c)
                    .into_iter()
                    .filter(|&key| {
                        ctx.world
                            .get_entity(key)
                            .and_then(Entity::name)
                            .is_some_and(|n| n.contains("fire") || n.contains("Fire"))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let smoke = container
            .map(|c| {
                (0..SMOKE_PARTICLES)
                    .filter_map(|_| {
                        let particle = Entity::new()
                            .with_name("smoke")
                            .with_transform(Transform3D::default().with_uniform_scale(0.15))
                            .with_mesh(
                                MeshData {
                                    size: Vec3::ONE,
                                    vertex_count: 4,
                                },
                                Material::Flat(Color::from_hex(SMOKE_COLOR)),
                            )
                            .with_visible(false);
                        let key = ctx.world.add_child(c, particle)?;
                        if let Some(e) = ctx.world.get_entity_mut(key) {
                            e.set_opacity(0.6);
                        }
                        Some(key)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let body = ctx.world.physics_mut().map(|physics| {
            let material = physics.materials.get_or_default("dummy");
            physics.add_body(
                RigidBody::new(BODY_MASS)
                    .with_position(placement.position)
                    .with_shape(ShapeInstance::new(Shape::Box {
                        half_extents: BODY_HALF_EXTENTS,
                    }))
                    .with_material(material)
                    .with_filter(CollisionFilter::prop())
                    .asleep(),
            )
        });

        if let Some(panel) = ctx.debug.as_deref_mut() {
            let folder_name = template.debug_panel.as_ref().map_or("rocket", |d| d.name.as_str());
            let folder = panel.add_folder(folder_name);
            panel.add_button(folder, &template.name, "launch");
            let p = placement.position.to_array();
            for (i, axis) in ["x", "y", "z"].iter().enumerate() {
                let id = panel.add_slider(
                    folder,
                    &template.name,
                    &format!("position.{axis}"),
                    p[i],
                    SliderRange::unbounded(0.1),
                );
                panel.set_label(id, *axis);
            }
        }

        Self {
            name: template.name.clone(),
            container,
            body,
            start: placement.position,
            placement,
            fire,
            smoke,
            phase: RocketPhase::Idle,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Use a fixed seed for the shake and smoke jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn phase(&self) -> &RocketPhase {
        &self.phase
    }

    pub fn is_launched(&self) -> bool {
        self.phase != RocketPhase::Idle
    }

    pub fn body(&self) -> Option<BodyKey> {
        self.body
    }

    pub fn container(&self) -> Option<EntityKey> {
        self.container
    }

    /// Start the launch sequence; false if already launched or not placed
    pub fn launch(&mut self, world: &mut World) -> bool {
        if self.is_launched() {
            log::info!("Rocket already launched");
            return false;
        }
        let Some(position) = self.position(world) else {
            log::warn!("Rocket '{}' has no model, cannot launch", self.name);
            return false;
        };

        self.start = position;
        self.phase = RocketPhase::Preparing {
            shakes_left: SHAKES - 1,
            shake: self.shake_from(position),
        };
        log::info!("Rocket engines preparing");
        true
    }

    fn position(&self, world: &World) -> Option<Vec3> {
        let key = self.container?;
        world.get_entity(key).map(|e| e.transform().position)
    }

    fn set_position(&self, world: &mut World, position: Vec3) {
        if let Some(entity) = self.container.and_then(|c| world.get_entity_mut(c)) {
            entity.set_position(position);
        }
    }

    fn shake_from(&mut self, from: Vec3) -> Tween<Vec3> {
        let to = Vec3::new(
            self.start.x + self.rng.gen_range(-SHAKE_AMPLITUDE..SHAKE_AMPLITUDE),
            self.start.y + self.rng.gen_range(-SHAKE_AMPLITUDE..SHAKE_AMPLITUDE),
            from.z,
        );
        Tween::new(from, to, SHAKE_DURATION)
    }

    fn set_fire_visible(&self, world: &mut World, visible: bool) {
        for &key in &self.fire {
            if let Some(entity) = world.get_entity_mut(key) {
                entity.set_visible(visible);
            }
        }
    }

    fn with_body(&self, world: &mut World, f: impl FnOnce(&mut RigidBody)) {
        if let Some(body) = self
            .body
            .and_then(|b| world.physics_mut().and_then(|p| p.get_body_mut(b)))
        {
            f(body);
        }
    }

    fn start_launch(&mut self, world: &mut World) {
        let z = self.position(world).map_or(self.start.z, |p| p.z);
        self.set_fire_visible(world, true);
        self.with_body(world, RigidBody::wake_up);
        self.phase = RocketPhase::Launching(Tween::new(z, z + LIFT, LIFT_DURATION).with_easing(Easing::Power2In));
        log::info!("Rocket launched");
    }

    fn start_flying(&mut self, world: &mut World) {
        for &key in &self.smoke {
            if let Some(particle) = world.get_entity_mut(key) {
                particle.set_opacity(0.9);
                particle.set_scale(Vec3::splat(0.2));
            }
        }
        self.phase = RocketPhase::Flying { time: 0.0 };
    }

    fn update_smoke(&mut self, world: &mut World, dt: f32) {
        for &key in &self.smoke {
            let Some(particle) = world.get_entity_mut(key) else {
                continue;
            };

            if !particle.is_visible() {
                particle.set_visible(true);
                particle.set_opacity(0.6);
                particle.set_transform(
                    Transform3D::from_position(Vec3::new(
                        self.rng.gen_range(-0.4..0.4),
                        self.rng.gen_range(-0.4..0.4),
                        -0.5 - self.rng.gen_range(0.0..0.5),
                    ))
                    .with_uniform_scale(0.1),
                );
            }

            let transform = particle.transform_mut();
            transform.position.z -= SMOKE_FALL * dt;
            transform.scale.x += SMOKE_GROWTH * dt;
            transform.scale.y += SMOKE_GROWTH * dt;
            let z = transform.position.z;
            let opacity = particle.opacity() - SMOKE_FADE * dt;
            particle.set_opacity(opacity);

            if z < SMOKE_FLOOR || opacity <= 0.0 {
                particle.set_visible(false);
            }
        }
    }

    fn advance(&mut self, world: &mut World, dt: f32) {
        let phase = std::mem::replace(&mut self.phase, RocketPhase::Idle);
        self.phase = match phase {
            RocketPhase::Idle => RocketPhase::Idle,
            RocketPhase::Preparing { shakes_left, mut shake } => {
                let position = shake.advance(dt);
                self.set_position(world, position);
                if !shake.is_complete() {
                    RocketPhase::Preparing { shakes_left, shake }
                } else if shakes_left > 0 {
                    RocketPhase::Preparing {
                        shakes_left: shakes_left - 1,
                        shake: self.shake_from(position),
                    }
                } else {
                    self.start_launch(world);
                    return;
                }
            }
            RocketPhase::Launching(mut lift) => {
                let z = lift.advance(dt);
                if let Some(p) = self.position(world) {
                    self.set_position(world, Vec3::new(p.x, p.y, z));
                }
                if lift.is_complete() {
                    self.start_flying(world);
                    return;
                }
                RocketPhase::Launching(lift)
            }
            RocketPhase::Flying { time } => {
                let time = time + dt;
                let n = (time / CLIMB_TIME).min(1.0);
                let height = MAX_HEIGHT * (n * FRAC_PI_2).sin();
                if let Some(p) = self.position(world) {
                    self.set_position(world, Vec3::new(p.x, p.y, self.start.z + height));
                }
                if time > RETURN_DELAY {
                    log::info!("Rocket returning");
                    RocketPhase::Returning { time: 0.0 }
                } else {
                    RocketPhase::Flying { time }
                }
            }
            RocketPhase::Returning { time } => {
                let time = time + dt;
                let n = (time / DESCENT_TIME).min(1.0);
                let position = Vec3::new(self.start.x, self.start.y, self.start.z + MAX_HEIGHT * (1.0 - n));
                self.set_position(world, position);
                if n >= 0.99 {
                    self.set_fire_visible(world, false);
                    RocketPhase::Settling(
                        Tween::new(position, self.start, SETTLE_DURATION).with_easing(Easing::Power1Out),
                    )
                } else {
                    RocketPhase::Returning { time }
                }
            }
            RocketPhase::Settling(mut settle) => {
                let position = settle.advance(dt);
                self.set_position(world, position);
                if settle.is_complete() {
                    self.with_body(world, |body| {
                        body.teleport(position, Quat::IDENTITY);
                        body.sleep();
                    });
                    log::info!("Rocket back on its pad");
                    RocketPhase::Idle
                } else {
                    RocketPhase::Settling(settle)
                }
            }
        };
    }

    fn sync_body(&self, world: &mut World) {
        let Some(position) = self.position(world) else {
            return;
        };
        if let Some(entity) = self.container.and_then(|c| world.get_entity_mut(c)) {
            entity.set_rotation(Default::default());
        }
        self.with_body(world, |body| {
            body.teleport(position, Quat::IDENTITY);
            body.wake_up();
        });
    }
}

impl WorldObject for Rocket {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: Tick, ctx: &mut ObjectContext<'_>) {
        if self.phase.emits_smoke() {
            self.update_smoke(ctx.world, tick.delta);
        }
        self.advance(ctx.world, tick.delta);
        if self.phase.airborne() {
            self.sync_body(ctx.world);
        }
    }

    fn handle_input(&mut self, input: ObjectInput, ctx: &mut ObjectContext<'_>) -> bool {
        match input {
            ObjectInput::Launch => self.launch(ctx.world),
            _ => false,
        }
    }

    fn apply_debug(&mut self, change: &DebugChange, ctx: &mut ObjectContext<'_>) {
        match (change.field.as_str(), change.value) {
            ("launch", DebugValue::Pressed) => {
                self.launch(ctx.world);
            }
            (field, DebugValue::Number(value)) if field.starts_with("position.") => {
                edit_placement(&mut self.placement, field, value);
                self.set_position(ctx.world, self.placement.position);
            }
            _ => log::warn!("'{}' has no debug field '{}'", self.name, change.field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::Harness;
    use drivescape_core::{Behavior, MeshInfo, ModelNode};

    const DT: f32 = 1.0 / 60.0;

    fn template() -> ObjectTemplate {
        ObjectTemplate::new("rocket")
            .with_resource("rocketModel")
            .with_placement(Placement::at(Vec3::new(15.0, 8.0, 0.5)).with_scale(Vec3::splat(1.5)))
            .with_behavior(Behavior::Rocket)
    }

    fn harness() -> Harness {
        let root = ModelNode::new("root")
            .with_child(ModelNode::new("shadeGray").with_mesh(MeshInfo::default()))
            .with_child(ModelNode::new("engineFire").with_mesh(MeshInfo::default()));
        Harness::new().with_asset("rocketModel", root)
    }

    fn run(rocket: &mut Rocket, h: &mut Harness, seconds: f32) {
        let mut elapsed = 0.0;
        while elapsed < seconds {
            elapsed += DT;
            rocket.update(Tick { elapsed, delta: DT }, &mut h.ctx(None));
        }
    }

    fn height(rocket: &Rocket, h: &Harness) -> f32 {
        let key = rocket.container().unwrap();
        h.world.get_entity(key).unwrap().transform().position.z
    }

    #[test]
    fn test_body_starts_asleep() {
        let mut h = harness();
        let rocket = Rocket::new(&template(), &mut h.build_ctx(false)).with_seed(7);
        let body = h.world.physics().unwrap().get_body(rocket.body().unwrap()).unwrap();
        assert!(body.is_sleeping());
        assert_eq!(body.mass, 100.0);
        assert_eq!(body.position, Vec3::new(15.0, 8.0, 0.5));
    }

    #[test]
    fn test_second_launch_ignored() {
        let mut h = harness();
        let mut rocket = Rocket::new(&template(), &mut h.build_ctx(false)).with_seed(7);
        assert!(rocket.handle_input(ObjectInput::Launch, &mut h.ctx(None)));
        assert!(!rocket.handle_input(ObjectInput::Launch, &mut h.ctx(None)));
        assert!(matches!(rocket.phase(), RocketPhase::Preparing { .. }));
    }

    #[test]
    fn test_shakes_stay_near_pad() {
        let mut h = harness();
        let mut rocket = Rocket::new(&template(), &mut h.build_ctx(false)).with_seed(3);
        rocket.launch(&mut h.world);
        for _ in 0..20 {
            run(&mut rocket, &mut h, DT);
            let p = h.world.get_entity(rocket.container().unwrap()).unwrap().transform().position;
            assert!((p.x - 15.0).abs() <= SHAKE_AMPLITUDE + 1e-4);
            assert!((p.y - 8.0).abs() <= SHAKE_AMPLITUDE + 1e-4);
        }
    }

    #[test]
    fn test_full_flight_returns_to_pad() {
        let mut h = harness();
        let mut rocket = Rocket::new(&template(), &mut h.build_ctx(false)).with_seed(11);
        rocket.launch(&mut h.world);

        // 10 shakes of 0.08 s, then 1.5 s of lift
        run(&mut rocket, &mut h, 0.85);
        assert!(matches!(rocket.phase(), RocketPhase::Launching(_)));
        let fire = h.world.find_by_name("engineFire").unwrap();
        assert!(h.world.get_entity(fire).unwrap().is_visible());

        run(&mut rocket, &mut h, 1.6);
        assert!(matches!(rocket.phase(), RocketPhase::Flying { .. }));

        run(&mut rocket, &mut h, 4.5);
        assert!(height(&rocket, &h) > 0.5 + 24.0);
        let body = h.world.physics().unwrap().get_body(rocket.body().unwrap()).unwrap();
        assert!((body.position.z - height(&rocket, &h)).abs() < 1e-4);
        assert!(!body.is_sleeping());

        run(&mut rocket, &mut h, 0.6);
        assert!(matches!(rocket.phase(), RocketPhase::Returning { .. }));

        run(&mut rocket, &mut h, 8.0);
        assert_eq!(rocket.phase(), &RocketPhase::Idle);
        assert!(!rocket.is_launched());
        assert!(!h.world.get_entity(fire).unwrap().is_visible());

        let p = h.world.get_entity(rocket.container().unwrap()).unwrap().transform().position;
        assert!((p - Vec3::new(15.0, 8.0, 0.5)).length() < 1e-3);
        let body = h.world.physics().unwrap().get_body(rocket.body().unwrap()).unwrap();
        assert!(body.is_sleeping());
    }

    #[test]
    fn test_smoke_only_while_emitting() {
        let mut h = harness();
        let mut rocket = Rocket::new(&template(), &mut h.build_ctx(false)).with_seed(5);
        let smoke: Vec<_> = h.world.iter().filter(|e| e.name() == Some("smoke")).collect();
        assert_eq!(smoke.len(), SMOKE_PARTICLES);
        assert!(smoke.iter().all(|e| !e.is_visible()));

        rocket.launch(&mut h.world);
        // 10 shakes of five ticks each
        for _ in 0..50 {
            rocket.update(Tick { elapsed: 0.0, delta: DT }, &mut h.ctx(None));
        }
        assert!(matches!(rocket.phase(), RocketPhase::Launching(_)));
        let visible = h.world.iter().filter(|e| e.name() == Some("smoke") && e.is_visible()).count();
        assert_eq!(visible, 0);

        // the first emitting tick respawns every hidden particle
        rocket.update(Tick { elapsed: 0.0, delta: DT }, &mut h.ctx(None));
        let visible = h.world.iter().filter(|e| e.name() == Some("smoke") && e.is_visible()).count();
        assert_eq!(visible, SMOKE_PARTICLES);
    }

    #[test]
    fn test_debug_folder_and_launch_button() {
        let mut h = harness();
        let mut rocket = Rocket::new(&template(), &mut h.build_ctx(true)).with_seed(1);
        assert_eq!(h.panel.control_count(), 4);

        let x = h.panel.find("rocket", "position.x").unwrap();
        let change = h.panel.set_number(x, 20.0).unwrap();
        rocket.apply_debug(&change, &mut h.ctx(None));
        let p = h.world.get_entity(rocket.container().unwrap()).unwrap().transform().position;
        assert_eq!(p.x, 20.0);

        let button = h.panel.find("rocket", "launch").unwrap();
        let change = h.panel.press(button).unwrap();
        rocket.apply_debug(&change, &mut h.ctx(None));
        assert!(rocket.is_launched());
    }

    #[test]
    fn test_missing_model_cannot_launch() {
        let mut h = Harness::new();
        let mut rocket = Rocket::new(&template(), &mut h.build_ctx(false));
        assert!(rocket.container().is_none());
        assert!(!rocket.launch(&mut h.world));
    }
}
