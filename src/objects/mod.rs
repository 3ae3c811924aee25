//! World objects
//!
//! Every object in the city is built from an [`ObjectTemplate`] with
//! [`BuildContext`] and then driven through [`WorldObject`] each tick.
//! Objects report side effects that reach beyond the world (camera shake,
//! vehicle controls) as [`SceneEffect`]s.

pub mod backgrounds;
pub mod butterflies;
pub mod button;
pub mod carousel;
pub mod green_box;
pub mod green_screen;
pub mod landmark;
pub mod popup;
pub mod popup_button;
pub mod rocket;
pub mod teleport;
pub mod textures;

use std::sync::Arc;

use drivescape_core::placement::{add_resource_object, add_static_body, convert_resource, PlacementError, ResourceObject};
use drivescape_core::{
    Areas, Behavior, BodyKey, DebugChange, DebugPanel, EntityKey, MaterialLibrary, ObjectTemplate, Placement,
    PlacementMode, Resources, Tick, World, ZoneEvent, ZoneKey,
};
use drivescape_math::Vec3;

pub use butterflies::Butterflies;
pub use green_box::GreenBox;
pub use landmark::Landmark;
pub use popup_button::PopupButton;
pub use rocket::Rocket;
pub use textures::TextureSource;

/// Something an object asks the application to do
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneEffect {
    /// Shake the camera by `intensity` for `duration` seconds
    CameraShake { intensity: f32, duration: f32 },
    /// Enable or disable vehicle driving
    VehicleControls(bool),
    /// Show or hide the layer that swallows game input
    InputBlocker(bool),
    /// The vehicle body was moved; drop any motion the controller holds
    VehicleTeleported,
}

/// Input routed to objects
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObjectInput {
    Interact,
    Cancel,
    Prev,
    Next,
    Select,
    Launch,
    /// A visible carousel card, 0 = top
    CardClicked(usize),
    /// Pointer pressed on the carousel at this screen y
    DragStart(f32),
    DragMove(f32),
    DragEnd,
    /// Wheel delta, positive = scrolled down
    Wheel(f32),
    BlockerClicked,
}

/// Shared handles for building objects
pub struct BuildContext<'a> {
    pub world: &'a mut World,
    pub resources: &'a Resources,
    pub materials: &'a MaterialLibrary,
    pub areas: &'a mut Areas,
    /// Present only in debug mode
    pub debug: Option<&'a mut DebugPanel>,
    pub textures: Arc<dyn TextureSource>,
}

impl BuildContext<'_> {
    pub fn debug_enabled(&self) -> bool {
        self.debug.is_some()
    }
}

/// Shared handles for one tick
pub struct ObjectContext<'a> {
    pub world: &'a mut World,
    /// Chassis body of the vehicle
    pub vehicle: Option<BodyKey>,
    pub effects: &'a mut Vec<SceneEffect>,
}

impl ObjectContext<'_> {
    pub fn vehicle_position(&self) -> Option<Vec3> {
        let key = self.vehicle?;
        self.world.physics()?.get_body(key).map(|b| b.position)
    }
}

/// An object living in the city
pub trait WorldObject {
    fn name(&self) -> &str;

    fn update(&mut self, _tick: Tick, _ctx: &mut ObjectContext<'_>) {}

    /// A zone changed state; objects ignore zones they do not own
    fn on_zone(&mut self, _zone: ZoneKey, _event: ZoneEvent, _ctx: &mut ObjectContext<'_>) {}

    /// Returns true if the input was consumed
    fn handle_input(&mut self, _input: ObjectInput, _ctx: &mut ObjectContext<'_>) -> bool {
        false
    }

    /// Apply a debug panel change targeted at this object
    fn apply_debug(&mut self, _change: &DebugChange, _ctx: &mut ObjectContext<'_>) {}

    fn popup_open(&self) -> bool {
        false
    }
}

/// Build the object a template describes
pub fn build_object(template: &ObjectTemplate, ctx: &mut BuildContext<'_>) -> Box<dyn WorldObject> {
    match &template.behavior {
        Behavior::Landmark => Box::new(Landmark::new(template, ctx)),
        Behavior::Butterflies { speed, height } => Box::new(Butterflies::new(template, *speed, *height, ctx)),
        Behavior::Rocket => Box::new(Rocket::new(template, ctx)),
        Behavior::GreenBox => Box::new(GreenBox::new(template, ctx)),
        Behavior::PopupButton => Box::new(PopupButton::new(template, ctx)),
    }
}

/// What [`place_template`] created
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedTemplate {
    pub container: EntityKey,
    /// Body built from the collision model
    pub body: Option<BodyKey>,
    /// Hand-described static body
    pub static_body: Option<BodyKey>,
}

/// Place a template's resource at `placement` following its mode
pub fn place_template(
    template: &ObjectTemplate,
    placement: &Placement,
    ctx: &mut BuildContext<'_>,
) -> Result<PlacedTemplate, PlacementError> {
    let resource = template
        .resource
        .as_deref()
        .ok_or_else(|| PlacementError::MissingResource(template.name.clone()))?;

    let (container, body) = match template.mode {
        PlacementMode::Converted => {
            let container = convert_resource(ctx.world, ctx.materials, ctx.resources, resource)?;
            if let Some(entity) = ctx.world.get_entity_mut(container) {
                entity.set_transform(placement.to_transform());
            }
            (container, None)
        }
        PlacementMode::Physics { mass } => {
            let placed = add_resource_object(
                ctx.world,
                ctx.materials,
                ctx.resources,
                ResourceObject {
                    base: resource,
                    collision: template.collision.as_deref(),
                    offset: placement.position,
                    rotation: placement.rotation.to_euler(),
                    mass,
                },
            )?;
            if let Some(entity) = ctx.world.get_entity_mut(placed.container) {
                entity.set_scale(placement.scale);
            }
            (placed.container, placed.body)
        }
    };

    if let Some(entity) = ctx.world.get_entity_mut(container) {
        entity.name = Some(template.name.clone());
    }

    let static_body = template
        .static_body
        .as_ref()
        .and_then(|sb| add_static_body(ctx.world, sb, placement.position));

    log::info!("Placed '{}' at {:?}", template.name, placement.position);
    Ok(PlacedTemplate {
        container,
        body,
        static_body,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use drivescape_core::{
        Areas, DebugPanel, MaterialLibrary, MeshInfo, ModelAsset, ModelNode, PhysicsConfig, Resources, Transform3D,
        World,
    };
    use drivescape_math::Vec3;

    use super::textures::{Texture, TextureError, TextureSource};
    use super::{BuildContext, ObjectContext, SceneEffect};

    /// Texture source that serves a 1x1 image for paths containing `ok`
    pub struct FakeTextures;

    impl TextureSource for FakeTextures {
        fn load(&self, location: &str) -> Result<Texture, TextureError> {
            if location.contains("ok") {
                Ok(Texture::new(location, 1, 1, vec![0, 255, 0, 255]))
            } else {
                Err(TextureError::UnsupportedSource(location.to_string()))
            }
        }
    }

    /// Everything a test needs to build and tick objects
    pub struct Harness {
        pub world: World,
        pub resources: Resources,
        pub materials: MaterialLibrary,
        pub areas: Areas,
        pub panel: DebugPanel,
        pub effects: Vec<SceneEffect>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                world: World::new().with_physics(PhysicsConfig::default()),
                resources: Resources::new("assets"),
                materials: MaterialLibrary::new(),
                areas: Areas::new(),
                panel: DebugPanel::new(),
                effects: Vec::new(),
            }
        }

        /// Register a model with one mesh node per name
        pub fn with_model(mut self, resource: &str, nodes: &[&str]) -> Self {
            let mut root = ModelNode::new("root");
            for (i, name) in nodes.iter().enumerate() {
                root = root.with_child(
                    ModelNode::new(*name)
                        .with_transform(Transform3D::from_position(Vec3::new(i as f32, 0.0, 0.0)))
                        .with_mesh(MeshInfo::default()),
                );
            }
            self.resources.insert(resource, ModelAsset::new(resource, root));
            self
        }

        pub fn with_asset(mut self, resource: &str, root: ModelNode) -> Self {
            self.resources.insert(resource, ModelAsset::new(resource, root));
            self
        }

        pub fn build_ctx(&mut self, debug: bool) -> BuildContext<'_> {
            BuildContext {
                world: &mut self.world,
                resources: &self.resources,
                materials: &self.materials,
                areas: &mut self.areas,
                debug: if debug { Some(&mut self.panel) } else { None },
                textures: Arc::new(FakeTextures),
            }
        }

        pub fn ctx(&mut self, vehicle: Option<drivescape_core::BodyKey>) -> ObjectContext<'_> {
            ObjectContext {
                world: &mut self.world,
                vehicle,
                effects: &mut self.effects,
            }
        }
    }
}
