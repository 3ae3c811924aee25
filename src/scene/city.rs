//! The running city
//!
//! Owns the world, the placed objects and the vehicle, and routes ticks,
//! zone transitions, input and debug changes to the objects.

use std::sync::Arc;

use drivescape_core::{
    Areas, AssetError, BodyKey, DebugChange, DebugPanel, MaterialLibrary, PhysicsConfig, Quat, ResourceManifest,
    Resources, RigidBody, Scene, SceneError, SceneValidator, Tick, World,
};
use drivescape_input::ChassisControl;
use drivescape_math::{Euler, Vec3};
use drivescape_physics::PhysicsMaterial;

use super::SceneBuilder;
use crate::config::AppConfig;
use crate::objects::{build_object, BuildContext, ObjectContext, ObjectInput, SceneEffect, TextureSource, WorldObject};

/// Everything besides the scene file that shapes the city
#[derive(Clone, Debug)]
pub struct CitySettings {
    pub physics: PhysicsConfig,
    pub floor_z: f32,
    pub spawn: Vec3,
    pub chassis_half_extents: Vec3,
    pub vehicle_mass: f32,
    /// Debug placements and the debug panel
    pub debug: bool,
}

impl Default for CitySettings {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            floor_z: 0.0,
            spawn: Vec3::new(0.0, 0.0, 2.0),
            chassis_half_extents: Vec3::new(1.0, 0.5, 0.4),
            vehicle_mass: 20.0,
            debug: false,
        }
    }
}

impl CitySettings {
    /// Settings from the config; the scene's gravity and spawn win
    pub fn from_config(config: &AppConfig, scene: &Scene) -> Self {
        let [sx, sy, sz] = config.vehicle.spawn_position;
        let [hx, hy, hz] = config.vehicle.chassis_half_extents;
        let mut physics = PhysicsConfig::new(scene.gravity.unwrap_or(config.physics.gravity));
        physics.sleep_speed_limit = config.physics.sleep_speed_limit;
        physics.sleep_time_limit = config.physics.sleep_time_limit;

        Self {
            physics,
            floor_z: config.physics.floor_z,
            spawn: scene.car_spawn.unwrap_or(Vec3::new(sx, sy, sz)),
            chassis_half_extents: Vec3::new(hx, hy, hz),
            vehicle_mass: config.vehicle.mass,
            debug: config.debug.enabled,
        }
    }
}

/// Failure loading the city from disk
#[derive(Debug)]
pub enum CityError {
    Manifest(AssetError),
    Scene(SceneError),
}

impl From<AssetError> for CityError {
    fn from(e: AssetError) -> Self {
        CityError::Manifest(e)
    }
}

impl From<SceneError> for CityError {
    fn from(e: SceneError) -> Self {
        CityError::Scene(e)
    }
}

impl std::fmt::Display for CityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CityError::Manifest(e) => write!(f, "Resource manifest: {}", e),
            CityError::Scene(e) => write!(f, "Scene: {}", e),
        }
    }
}

impl std::error::Error for CityError {}

/// The vehicle's body as seen by the controller
pub struct Chassis<'a> {
    body: &'a mut RigidBody,
}

impl ChassisControl for Chassis<'_> {
    fn set_planar_velocity(&mut self, velocity: Vec3) {
        if velocity.x != 0.0 || velocity.y != 0.0 {
            self.body.wake_up();
        }
        self.body.velocity.x = velocity.x;
        self.body.velocity.y = velocity.y;
    }

    fn set_heading(&mut self, heading: f32) {
        self.body.orientation = Euler::new(0.0, 0.0, heading).to_quat();
    }

    fn position(&self) -> Vec3 {
        self.body.position
    }
}

pub struct City {
    name: String,
    world: World,
    resources: Resources,
    materials: MaterialLibrary,
    areas: Areas,
    debug: Option<DebugPanel>,
    objects: Vec<Box<dyn WorldObject>>,
    vehicle: Option<BodyKey>,
    spawn: Vec3,
    effects: Vec<SceneEffect>,
}

impl City {
    /// Load the manifest and scene named by `config`, validate, and build
    pub fn load(config: &AppConfig, textures: Arc<dyn TextureSource>) -> Result<Self, CityError> {
        let mut resources = Resources::new(&config.scene.asset_root);
        resources.set_hot_reload(config.debug.hot_reload);
        let manifest = ResourceManifest::load(&config.scene.manifest)?;
        let loaded = resources.load_manifest(&manifest);
        log::info!("Loaded {} model resource(s)", loaded);

        let scene = Scene::load(&config.scene.path).map_err(SceneError::from)?;
        let errors = SceneValidator::validate_with_resources(&scene, &resources);
        if !errors.is_empty() {
            return Err(SceneError::Invalid(errors).into());
        }

        let settings = CitySettings::from_config(config, &scene);
        Ok(Self::build(&scene, resources, &settings, textures))
    }

    /// Place every object of `scene` on a floor with a vehicle
    pub fn build(scene: &Scene, resources: Resources, settings: &CitySettings, textures: Arc<dyn TextureSource>) -> Self {
        let builder = SceneBuilder::new()
            .with_physics(settings.physics.clone())
            .add_floor(settings.floor_z, PhysicsMaterial::FLOOR)
            .add_vehicle(settings.spawn, settings.chassis_half_extents, settings.vehicle_mass);
        let vehicle = builder.vehicle();
        let mut world = builder.build();

        let materials = MaterialLibrary::new();
        let mut areas = Areas::new();
        let mut debug = settings.debug.then(DebugPanel::new);

        let mut objects = Vec::with_capacity(scene.objects.len());
        for template in &scene.objects {
            let mut ctx = BuildContext {
                world: &mut world,
                resources: &resources,
                materials: &materials,
                areas: &mut areas,
                debug: debug.as_mut(),
                textures: Arc::clone(&textures),
            };
            objects.push(build_object(template, &mut ctx));
        }
        log::info!("City '{}' built with {} object(s)", scene.name, objects.len());

        Self {
            name: scene.name.clone(),
            world,
            resources,
            materials,
            areas,
            debug,
            objects,
            vehicle,
            spawn: settings.spawn,
            effects: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn areas(&self) -> &Areas {
        &self.areas
    }

    pub fn debug_panel(&self) -> Option<&DebugPanel> {
        self.debug.as_ref()
    }

    pub fn vehicle(&self) -> Option<BodyKey> {
        self.vehicle
    }

    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    pub fn vehicle_position(&self) -> Option<Vec3> {
        let key = self.vehicle?;
        self.world.physics()?.get_body(key).map(|b| b.position)
    }

    /// Direction the vehicle's nose points in the ground plane
    pub fn vehicle_heading(&self) -> Option<f32> {
        let key = self.vehicle?;
        let body = self.world.physics()?.get_body(key)?;
        let forward = body.orientation.rotate(Vec3::X);
        Some(forward.y.atan2(forward.x))
    }

    pub fn chassis(&mut self) -> Option<Chassis<'_>> {
        let key = self.vehicle?;
        let body = self.world.physics_mut()?.get_body_mut(key)?;
        Some(Chassis { body })
    }

    pub fn object(&self, name: &str) -> Option<&dyn WorldObject> {
        self.objects.iter().find(|o| o.name() == name).map(|o| o.as_ref())
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.name())
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn popup_open(&self) -> bool {
        self.objects.iter().any(|o| o.popup_open())
    }

    /// Step physics, report zone transitions, then update every object
    ///
    /// Returns the effects raised since the last call.
    pub fn update(&mut self, tick: Tick) -> Vec<SceneEffect> {
        self.world.update(tick.delta);

        let events = match self.vehicle_position() {
            Some(position) => self.areas.update(position.xy()),
            None => Vec::new(),
        };

        let mut ctx = ObjectContext {
            world: &mut self.world,
            vehicle: self.vehicle,
            effects: &mut self.effects,
        };
        for (zone, event) in events {
            log::debug!("Zone {:?}: {:?}", zone, event);
            for object in &mut self.objects {
                object.on_zone(zone, event, &mut ctx);
            }
        }
        for object in &mut self.objects {
            object.update(tick, &mut ctx);
        }

        self.take_effects()
    }

    /// Effects raised by input or debug changes outside [`update`](Self::update)
    pub fn take_effects(&mut self) -> Vec<SceneEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Offer `input` to the objects
    ///
    /// An open popup gets everything except the rocket launch, which stays
    /// global.
    pub fn handle_input(&mut self, input: ObjectInput) -> bool {
        let mut ctx = ObjectContext {
            world: &mut self.world,
            vehicle: self.vehicle,
            effects: &mut self.effects,
        };

        if input != ObjectInput::Launch {
            if let Some(open) = self.objects.iter_mut().find(|o| o.popup_open()) {
                return open.handle_input(input, &mut ctx);
            }
        }
        self.objects.iter_mut().any(|o| o.handle_input(input, &mut ctx))
    }

    /// Hand a debug change to the object it targets
    pub fn apply_debug(&mut self, change: &DebugChange) -> bool {
        let mut ctx = ObjectContext {
            world: &mut self.world,
            vehicle: self.vehicle,
            effects: &mut self.effects,
        };
        match self.objects.iter_mut().find(|o| o.name() == change.target) {
            Some(object) => {
                object.apply_debug(change, &mut ctx);
                true
            }
            None => {
                log::warn!("Debug change for unknown object '{}'", change.target);
                false
            }
        }
    }

    /// Move a debug slider and apply the result
    pub fn set_debug_number(&mut self, target: &str, field: &str, value: f32) -> bool {
        let change = self.debug.as_mut().and_then(|panel| {
            let control = panel.find(target, field)?;
            panel.set_number(control, value)
        });
        change.is_some_and(|c| self.apply_debug(&c))
    }

    pub fn set_debug_toggle(&mut self, target: &str, field: &str, value: bool) -> bool {
        let change = self.debug.as_mut().and_then(|panel| {
            let control = panel.find(target, field)?;
            panel.set_toggle(control, value)
        });
        change.is_some_and(|c| self.apply_debug(&c))
    }

    pub fn press_debug(&mut self, target: &str, action: &str) -> bool {
        let change = self.debug.as_mut().and_then(|panel| {
            let control = panel.find(target, action)?;
            panel.press(control)
        });
        change.is_some_and(|c| self.apply_debug(&c))
    }

    /// Put the vehicle back on its spawn point, at rest
    pub fn reset_vehicle(&mut self) -> bool {
        let spawn = self.spawn;
        let Some(body) = self
            .vehicle
            .and_then(|key| self.world.physics_mut()?.get_body_mut(key))
        else {
            log::warn!("No vehicle to reset");
            return false;
        };
        body.teleport(spawn, Quat::IDENTITY);
        body.wake_up();
        self.effects.push(SceneEffect::VehicleTeleported);
        log::info!("Vehicle reset to {:?}", spawn);
        true
    }

    /// Show or hide collision helper meshes; returns how many changed
    pub fn set_helpers_visible(&mut self, visible: bool) -> usize {
        let helpers: Vec<_> = self
            .world
            .iter_with_keys()
            .filter(|(_, e)| e.has_tag("helper"))
            .map(|(k, _)| k)
            .collect();
        for key in &helpers {
            if let Some(entity) = self.world.get_entity_mut(*key) {
                entity.set_visible(visible);
            }
        }
        helpers.len()
    }

    /// Reload changed model files; the names of reloaded resources
    pub fn check_hot_reload(&mut self) -> Vec<String> {
        let reloaded = self.resources.check_hot_reload();
        for name in &reloaded {
            log::info!("Model '{}' changed on disk; placed objects keep their meshes until restart", name);
        }
        reloaded
    }
}
