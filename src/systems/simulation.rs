//! Game simulation system
//!
//! Runs one frame of the city:
//! - Delta time calculation (capped)
//! - Vehicle input → chassis velocity
//! - Physics, zones, objects and their timers
//! - Reacting to scene effects and decaying camera shake

use std::time::Instant;

use drivescape_core::{Clock, Tick};
use drivescape_input::VehicleController;
use drivescape_math::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::objects::SceneEffect;
use crate::scene::City;

/// Longest frame the simulation will step, in seconds
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Random camera offset that fades out over its duration
#[derive(Clone, Debug)]
pub struct CameraShake {
    intensity: f32,
    duration: f32,
    remaining: f32,
    offset: Vec3,
    rng: ChaCha8Rng,
}

impl CameraShake {
    pub fn new(seed: u64) -> Self {
        Self {
            intensity: 0.0,
            duration: 0.0,
            remaining: 0.0,
            offset: Vec3::ZERO,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Start shaking; a running shake is replaced
    pub fn start(&mut self, intensity: f32, duration: f32) {
        self.intensity = intensity.max(0.0);
        self.duration = duration.max(0.0);
        self.remaining = self.duration;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Advance by `dt` and pick the offset for this frame
    pub fn update(&mut self, dt: f32) -> Vec3 {
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining <= 0.0 || self.duration <= 0.0 {
            self.offset = Vec3::ZERO;
            return self.offset;
        }

        let strength = self.intensity * self.remaining / self.duration;
        let mut jitter = || self.rng.gen_range(-1.0f32..=1.0) * strength;
        self.offset = Vec3::new(jitter(), jitter(), jitter());
        self.offset
    }
}

/// Result of a simulation update
pub struct SimulationResult {
    pub tick: Tick,
    /// Effects raised by the city this frame, already applied
    pub effects: Vec<SceneEffect>,
    pub vehicle_position: Option<Vec3>,
}

/// Manages the game simulation loop
pub struct SimulationSystem {
    last_frame: Instant,
    clock: Clock,
    shake: CameraShake,
    input_blocked: bool,
}

impl SimulationSystem {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            clock: Clock::new(MAX_FRAME_DELTA),
            shake: CameraShake::new(0),
            input_blocked: false,
        }
    }

    /// Run one frame, timed from the previous call
    pub fn update(&mut self, city: &mut City, controller: &mut VehicleController) -> SimulationResult {
        let now = Instant::now();
        let raw_dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let tick = self.clock.advance(raw_dt);
        self.step(city, controller, tick)
    }

    /// Run one frame with an explicit tick
    pub fn step(&mut self, city: &mut City, controller: &mut VehicleController, tick: Tick) -> SimulationResult {
        if controller.is_enabled() {
            if let Some(mut chassis) = city.chassis() {
                controller.update(&mut chassis, tick.delta);
            }
        }

        let effects = city.update(tick);
        self.apply_effects(&effects, city, controller);
        self.shake.update(tick.delta);

        SimulationResult {
            tick,
            effects,
            vehicle_position: city.vehicle_position(),
        }
    }

    /// React to effects raised outside a frame, e.g. by input handling
    pub fn apply_effects(&mut self, effects: &[SceneEffect], city: &City, controller: &mut VehicleController) {
        for effect in effects {
            match *effect {
                SceneEffect::VehicleControls(enabled) => controller.set_enabled(enabled),
                SceneEffect::InputBlocker(blocked) => self.input_blocked = blocked,
                SceneEffect::CameraShake { intensity, duration } => self.shake.start(intensity, duration),
                SceneEffect::VehicleTeleported => {
                    controller.reset(city.vehicle_heading().unwrap_or(0.0));
                }
            }
        }
    }

    /// Whether a popup layer is swallowing game input
    pub fn input_blocked(&self) -> bool {
        self.input_blocked
    }

    pub fn camera_shake(&self) -> &CameraShake {
        &self.shake
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::FakeTextures;
    use crate::objects::ObjectInput;
    use crate::scene::CitySettings;
    use drivescape_core::{Behavior, ObjectTemplate, Placement, Resources, Scene};
    use std::sync::Arc;
    use winit::event::ElementState;
    use winit::keyboard::KeyCode;

    fn city() -> City {
        let mut scene = Scene::new("test");
        scene.add_object(
            ObjectTemplate::new("popupButton")
                .with_placement(Placement::at(Vec3::new(0.0, 0.0, 0.0)))
                .with_behavior(Behavior::PopupButton),
        );
        let settings = CitySettings {
            spawn: Vec3::new(0.0, 0.0, 0.5),
            ..CitySettings::default()
        };
        City::build(&scene, Resources::new("assets"), &settings, Arc::new(FakeTextures))
    }

    fn tick(elapsed: f32) -> Tick {
        Tick { elapsed, delta: 1.0 / 60.0 }
    }

    #[test]
    fn test_delta_time_capped() {
        let mut city = city();
        let mut controller = VehicleController::new();
        let mut sim = SimulationSystem::new();
        std::thread::sleep(std::time::Duration::from_millis(300));

        let result = sim.update(&mut city, &mut controller);
        assert_eq!(result.tick.delta, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_throttle_moves_vehicle() {
        let mut city = city();
        let mut controller = VehicleController::new();
        let mut sim = SimulationSystem::new();
        controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed);

        let start = city.vehicle_position().unwrap();
        let mut last = None;
        for i in 0..60 {
            last = sim.step(&mut city, &mut controller, tick(i as f32 / 60.0)).vehicle_position;
        }
        let end = last.unwrap();
        assert!(end.x > start.x + 0.5, "vehicle should drive forward: {:?} -> {:?}", start, end);
    }

    #[test]
    fn test_open_popup_disables_controls() {
        let mut city = city();
        let mut controller = VehicleController::new();
        let mut sim = SimulationSystem::new();

        assert!(city.handle_input(ObjectInput::Interact));
        let effects = city.take_effects();
        sim.apply_effects(&effects, &city, &mut controller);
        assert!(!controller.is_enabled());
        assert!(sim.input_blocked());

        city.handle_input(ObjectInput::Cancel);
        let effects = city.take_effects();
        sim.apply_effects(&effects, &city, &mut controller);
        assert!(controller.is_enabled());
        assert!(!sim.input_blocked());
    }

    #[test]
    fn test_teleport_resets_controller() {
        let mut city = city();
        let mut controller = VehicleController::new();
        let mut sim = SimulationSystem::new();
        controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        for i in 0..30 {
            sim.step(&mut city, &mut controller, tick(i as f32 / 60.0));
        }
        assert!(controller.speed() > 0.0);

        city.reset_vehicle();
        let effects = city.take_effects();
        sim.apply_effects(&effects, &city, &mut controller);
        assert_eq!(controller.speed(), 0.0);
        assert!(controller.heading().abs() < 1e-5);
    }

    #[test]
    fn test_camera_shake_fades() {
        let mut shake = CameraShake::new(7);
        assert_eq!(shake.update(0.1), Vec3::ZERO);

        shake.start(0.5, 0.3);
        assert!(shake.is_active());
        let offset = shake.update(0.1);
        assert!(offset.x.abs() <= 0.5 && offset.y.abs() <= 0.5 && offset.z.abs() <= 0.5);

        shake.update(0.25);
        assert!(!shake.is_active());
        assert_eq!(shake.offset(), Vec3::ZERO);
    }

    #[test]
    fn test_camera_shake_is_seeded() {
        let mut a = CameraShake::new(3);
        let mut b = CameraShake::new(3);
        a.start(1.0, 1.0);
        b.start(1.0, 1.0);
        assert_eq!(a.update(0.1), b.update(0.1));
    }
}
