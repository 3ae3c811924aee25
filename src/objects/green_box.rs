//! Green box studio
//!
//! A static room with a green screen, a floor button next to it and a popup
//! of landscapes. Choosing a landscape puts it on the screen, closes the
//! popup and drops the vehicle into the studio.

use std::collections::HashSet;

use drivescape_core::placement::add_static_body;
use drivescape_core::{
    BodyKey, BoxTemplate, DebugChange, DebugValue, Entity, EntityKey, Material, MeshData, ObjectTemplate, Quat,
    Rotation, StaticBodyTemplate, Tick, Timers, Transform3D, World, ZoneEvent, ZoneKey,
};
use drivescape_math::{Color, Vec2, Vec3};

use super::backgrounds::{landscapes, Background};
use super::button::{ButtonStyle, HoverButton};
use super::green_screen::GreenScreen;
use super::popup::{Popup, PopupOutcome};
use super::teleport::teleport_to_studio;
use super::textures::{LoadedTexture, TextureCache, TextureLoader};
use super::{place_template, BuildContext, ObjectContext, ObjectInput, WorldObject};

/// Button position relative to the studio
const BUTTON_OFFSET: Vec2 = Vec2::new(7.0, -3.0);

const BACK_WALL: BoxTemplate = BoxTemplate {
    half_extents: Vec3::new(2.5, 0.5, 6.0),
    offset: Vec3::new(0.0, 2.3, 0.0),
};
const LEFT_WALL: BoxTemplate = BoxTemplate {
    half_extents: Vec3::new(0.5, 3.0, 6.0),
    offset: Vec3::new(-2.3, 0.0, 0.0),
};
const CAMERA_BOX: BoxTemplate = BoxTemplate {
    half_extents: Vec3::new(0.8, 0.8, 1.5),
    offset: Vec3::new(5.9, -5.8, 1.0),
};

const WALL_HELPER_COLOR: u32 = 0xff0000;
const CAMERA_HELPER_COLOR: u32 = 0xff00ff;
const PLACEHOLDER_COLOR: u32 = 0x00ff00;

const HIDE_DELAY: f32 = 0.5;
const TELEPORT_DELAY: f32 = 0.8;

/// Walls and camera obstacle used when the scene gives no static body
pub fn studio_walls() -> StaticBodyTemplate {
    StaticBodyTemplate {
        material: "dummy".to_string(),
        offset: Vec3::ZERO,
        rotation: Rotation::default(),
        boxes: vec![BACK_WALL, LEFT_WALL, CAMERA_BOX],
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GreenBoxTimer {
    HidePopup,
    Teleport,
}

pub struct GreenBox {
    name: String,
    container: Option<EntityKey>,
    static_body: Option<BodyKey>,
    /// Pose of the static body right after placement
    home: Option<(Vec3, Quat)>,
    screen: Option<GreenScreen>,
    wall_helpers: Vec<EntityKey>,
    button: HoverButton,
    popup: Popup,
    backgrounds: Vec<Background>,
    cache: TextureCache,
    loader: TextureLoader,
    /// Ids with a load in flight
    loading: HashSet<&'static str>,
    /// Background currently on the screen
    current: Option<&'static str>,
    timers: Timers<GreenBoxTimer>,
}

impl GreenBox {
    pub fn new(template: &ObjectTemplate, ctx: &mut BuildContext<'_>) -> Self {
        let placement = template.effective_placement(ctx.debug_enabled());
        let position = placement.position;

        let (container, static_body, screen) = match place_template(template, &placement, ctx) {
            Ok(placed) => {
                let static_body = placed
                    .static_body
                    .or_else(|| add_static_body(ctx.world, &studio_walls(), position));
                let screen = GreenScreen::find(ctx.world, placed.container);
                if screen.is_none() {
                    log::error!("'{}' has no green screen", template.name);
                }
                (Some(placed.container), static_body, screen)
            }
            Err(e) => {
                log::error!("Failed to place green box '{}': {}", template.name, e);
                let placeholder = ctx.world.add_entity(
                    Entity::new()
                        .with_name(template.name.as_str())
                        .with_tag("placeholder")
                        .with_transform(Transform3D::from_position(position))
                        .with_mesh(
                            MeshData {
                                size: Vec3::new(5.0, 6.0, 4.0),
                                vertex_count: 8,
                            },
                            Material::Wireframe(Color::from_hex(PLACEHOLDER_COLOR)),
                        ),
                );
                let static_body = add_static_body(ctx.world, &studio_walls(), position);
                (Some(placeholder), static_body, None)
            }
        };

        let home = static_body
            .and_then(|key| ctx.world.physics()?.get_body(key))
            .map(|body| (body.position, body.orientation));

        let wall_helpers = match (container, ctx.debug_enabled()) {
            (Some(container), true) => add_wall_helpers(ctx.world, container),
            _ => Vec::new(),
        };

        let button = HoverButton::new(
            ctx.world,
            ctx.areas,
            &format!("{}Button", template.name),
            position.xy() + BUTTON_OFFSET,
            ButtonStyle::COMPACT,
        );

        if let Some(panel) = ctx.debug.as_deref_mut() {
            let folder_name = template.debug_panel.as_ref().map_or("greenBox", |d| d.name.as_str());
            let folder = panel.add_folder(folder_name);
            let reset = panel.add_button(folder, &template.name, "resetPosition");
            panel.set_label(reset, "Reset Position");
            let helpers = panel.add_toggle(folder, &template.name, "wallHelpers.visible", false);
            panel.set_label(helpers, "Show Collision Walls");
        }

        let backgrounds = landscapes();
        Self {
            name: template.name.clone(),
            container,
            static_body,
            home,
            screen,
            wall_helpers,
            button,
            popup: Popup::new(backgrounds.len()),
            backgrounds,
            cache: TextureCache::new(),
            loader: TextureLoader::new(ctx.textures.clone()),
            loading: HashSet::new(),
            current: None,
            timers: Timers::new(),
        }
    }

    /// Offer these backgrounds instead of the landscapes
    pub fn with_backgrounds(mut self, backgrounds: Vec<Background>) -> Self {
        self.popup = Popup::new(backgrounds.len());
        self.backgrounds = backgrounds;
        self
    }

    pub fn container(&self) -> Option<EntityKey> {
        self.container
    }

    pub fn static_body(&self) -> Option<BodyKey> {
        self.static_body
    }

    pub fn screen(&self) -> Option<&GreenScreen> {
        self.screen.as_ref()
    }

    pub fn button(&self) -> &HoverButton {
        &self.button
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    pub fn wall_helpers(&self) -> &[EntityKey] {
        &self.wall_helpers
    }

    /// Id of the background last put on the screen
    pub fn current_background(&self) -> Option<&'static str> {
        self.current
    }

    /// Put the background at `index` on the screen
    ///
    /// A cached texture is faded in directly. Otherwise the placeholder
    /// colour goes up first and the image is loaded in the background.
    pub fn change_background(&mut self, world: &mut World, index: usize) {
        let Some(background) = self.backgrounds.get(index) else {
            log::warn!("No background at index {}", index);
            return;
        };
        let Some(screen) = self.screen.as_mut() else {
            log::error!("'{}' has no green screen to change", self.name);
            return;
        };

        log::info!("Changing background to {}", background.id);
        self.current = Some(background.id);
        if self.cache.contains(background.id) {
            log::debug!("Texture {} served from cache", background.id);
            screen.apply(world, Material::Texture(background.id.to_string()));
            return;
        }

        screen.apply(world, Material::Flat(background.placeholder));
        if self.loading.insert(background.id) {
            self.loader.request(background.id, background.candidates());
        }
    }

    /// Fade the model's own screen material back in
    pub fn reset_background(&mut self, world: &mut World) {
        if let Some(screen) = self.screen.as_mut() {
            screen.reset_background(world);
            self.current = None;
        }
    }

    /// Put the static body back where it was placed
    pub fn reset_position(&self, world: &mut World) {
        let (Some(key), Some((position, orientation))) = (self.static_body, self.home) else {
            return;
        };
        if let Some(body) = world.physics_mut().and_then(|p| p.get_body_mut(key)) {
            body.teleport(position, orientation);
            body.wake_up();
            log::debug!("'{}' body reset", self.name);
        }
    }

    fn set_wall_helpers_visible(&self, world: &mut World, visible: bool) {
        for &key in &self.wall_helpers {
            if let Some(helper) = world.get_entity_mut(key) {
                helper.set_visible(visible);
            }
        }
    }

    fn receive(&mut self, world: &mut World, loaded: LoadedTexture) {
        let Some(id) = self.loading.iter().copied().find(|&id| id == loaded.id) else {
            return;
        };
        self.loading.remove(id);
        match loaded.result {
            Ok(texture) => {
                log::info!("Texture {} loaded from {}", id, texture.source);
                self.cache.insert(id, texture);
                if self.current == Some(id) {
                    if let Some(screen) = self.screen.as_mut() {
                        screen.apply(world, Material::Texture(id.to_string()));
                    }
                }
            }
            Err(e) => log::error!("Background {} unavailable, keeping flat colour: {}", id, e),
        }
    }

    fn on_selected(&mut self, index: usize, world: &mut World) {
        self.change_background(world, index);
        self.timers.schedule(HIDE_DELAY, GreenBoxTimer::HidePopup);
        self.timers.schedule(TELEPORT_DELAY, GreenBoxTimer::Teleport);
    }
}

/// Hidden wireframes outlining the collision walls
fn add_wall_helpers(world: &mut World, container: EntityKey) -> Vec<EntityKey> {
    [
        ("backWallHelper", BACK_WALL, WALL_HELPER_COLOR),
        ("leftWallHelper", LEFT_WALL, WALL_HELPER_COLOR),
        ("cameraHelper", CAMERA_BOX, CAMERA_HELPER_COLOR),
    ]
    .into_iter()
    .filter_map(|(name, shape, color)| {
        world.add_child(
            container,
            Entity::new()
                .with_name(name)
                .with_tag("helper")
                .with_transform(Transform3D::from_position(shape.offset))
                .with_mesh(
                    MeshData {
                        size: shape.half_extents * 2.0,
                        vertex_count: 8,
                    },
                    Material::Wireframe(Color::from_hex(color)),
                )
                .with_visible(false),
        )
    })
    .collect()
}

impl WorldObject for GreenBox {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, tick: Tick, ctx: &mut ObjectContext<'_>) {
        self.button.update(ctx.world, tick);
        if let Some(screen) = self.screen.as_mut() {
            screen.update(ctx.world, tick.delta);
        }

        for loaded in self.loader.poll_all() {
            self.receive(ctx.world, loaded);
        }

        for timer in self.timers.advance(tick.delta) {
            match timer {
                GreenBoxTimer::HidePopup => self.popup.hide(ctx.effects),
                GreenBoxTimer::Teleport => {
                    if let Err(e) = teleport_to_studio(ctx) {
                        log::error!("Cannot teleport into '{}': {}", self.name, e);
                    }
                }
            }
        }
    }

    fn on_zone(&mut self, zone: ZoneKey, event: ZoneEvent, _ctx: &mut ObjectContext<'_>) {
        self.button.on_zone(zone, event);
    }

    fn handle_input(&mut self, input: ObjectInput, ctx: &mut ObjectContext<'_>) -> bool {
        if input == ObjectInput::Interact {
            let near = ctx
                .vehicle_position()
                .is_some_and(|p| self.button.within_radius(p));
            if !near {
                return false;
            }
            self.popup.toggle(ctx.effects);
            if self.popup.is_visible() {
                self.button.hide_hint();
            }
            return true;
        }

        match self.popup.handle_input(input, ctx.effects) {
            PopupOutcome::Selected(index) => {
                self.on_selected(index, ctx.world);
                true
            }
            outcome => outcome.consumed(),
        }
    }

    fn apply_debug(&mut self, change: &DebugChange, ctx: &mut ObjectContext<'_>) {
        match (change.field.as_str(), change.value) {
            ("resetPosition", DebugValue::Pressed) => self.reset_position(ctx.world),
            ("wallHelpers.visible", DebugValue::Bool(visible)) => self.set_wall_helpers_visible(ctx.world, visible),
            _ => log::warn!("'{}' has no debug field '{}'", self.name, change.field),
        }
    }

    fn popup_open(&self) -> bool {
        self.popup.is_visible()
    }
}
