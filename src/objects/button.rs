//! Floor button with an ENTER label
//!
//! A square border and fence on the ground, a floating label, and a zone.
//! Driving into the zone lifts the label and brightens the fence.

use drivescape_core::{
    Areas, Easing, Entity, EntityKey, Material, MeshData, Tick, Transform3D, Tween, World, ZoneEvent, ZoneKey,
};
use drivescape_math::{Color, Vec2, Vec3};

const FENCE_COLOR: u32 = 0x4285f4;
const FENCE_HOVER: Color = Color::new(0.1, 0.7, 1.0);
const FENCE_IDLE: Color = Color::new(0.25, 0.52, 0.95);

const LABEL_HOVER_Z: f32 = 0.5;
const LABEL_IDLE_Z: f32 = 0.3;
const HOVER_SECONDS: f32 = 0.3;

/// Dimensions of a button
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonStyle {
    /// Side of the square floor area
    pub size: f32,
    /// Height of the fence
    pub fence_height: f32,
    pub fence_z: f32,
    /// Label width and height
    pub label: (f32, f32),
    pub label_z: f32,
    /// Half side of the trigger zone
    pub zone_half_extent: f32,
    /// Distance from the centre within which Enter works
    pub interaction_radius: f32,
    /// Show the "press Enter" hint while inside the zone
    pub show_hint: bool,
}

impl ButtonStyle {
    pub const LARGE: Self = Self {
        size: 4.0,
        fence_height: 0.5,
        fence_z: 0.25,
        label: (2.5, 1.0),
        label_z: 0.3,
        zone_half_extent: 3.0,
        interaction_radius: 2.0,
        show_hint: true,
    };

    pub const COMPACT: Self = Self {
        size: 2.0,
        fence_height: 0.3,
        fence_z: 0.15,
        label: (1.5, 0.6),
        label_z: 0.2,
        zone_half_extent: 1.5,
        interaction_radius: 1.0,
        show_hint: false,
    };
}

pub struct HoverButton {
    position: Vec2,
    style: ButtonStyle,
    root: EntityKey,
    fence: Option<EntityKey>,
    label: Option<EntityKey>,
    zone: ZoneKey,
    inside: bool,
    hint_visible: bool,
    label_z: Tween<f32>,
    fence_color: Tween<Color>,
}

fn flat_mesh(name: &str, size: Vec3, z: f32, material: Material) -> Entity {
    Entity::new()
        .with_name(name)
        .with_transform(Transform3D::from_position(Vec3::new(0.0, 0.0, z)))
        .with_mesh(MeshData { size, vertex_count: 4 }, material)
}

impl HoverButton {
    pub fn new(world: &mut World, areas: &mut Areas, name: &str, position: Vec2, style: ButtonStyle) -> Self {
        let root = world.add_entity(
            Entity::new()
                .with_name(name)
                .with_tag("button")
                .with_transform(Transform3D::from_position(Vec3::new(position.x, position.y, 0.0))),
        );

        world.add_child(
            root,
            flat_mesh("border", Vec3::new(style.size, style.size, 0.0), 0.0, Material::Flat(Color::WHITE)),
        );
        let fence = world.add_child(
            root,
            flat_mesh(
                "fence",
                Vec3::new(style.size, style.size, style.fence_height),
                style.fence_z,
                Material::Flat(Color::from_hex(FENCE_COLOR)),
            ),
        );
        let label = world.add_child(
            root,
            flat_mesh(
                "label",
                Vec3::new(style.label.0, style.label.1, 0.0),
                style.label_z,
                Material::Texture("enterLabel".to_string()),
            ),
        );

        let zone = areas.add(position, Vec2::new(style.zone_half_extent, style.zone_half_extent));

        Self {
            position,
            style,
            root,
            fence,
            label,
            zone,
            inside: false,
            hint_visible: false,
            label_z: Tween::new(style.label_z, style.label_z, 0.0).with_easing(Easing::Power2Out),
            fence_color: Tween::new(Color::from_hex(FENCE_COLOR), Color::from_hex(FENCE_COLOR), 0.0)
                .with_easing(Easing::Power1Out),
        }
    }

    pub fn root(&self) -> EntityKey {
        self.root
    }

    pub fn label(&self) -> Option<EntityKey> {
        self.label
    }

    pub fn fence(&self) -> Option<EntityKey> {
        self.fence
    }

    pub fn zone(&self) -> ZoneKey {
        self.zone
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Whether the vehicle is in the zone
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Whether the "press Enter" hint is showing
    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    /// Close enough to the centre for Enter to work
    pub fn within_radius(&self, point: Vec3) -> bool {
        self.position.distance(point.xy()) < self.style.interaction_radius
    }

    /// React to this button's zone; false for other zones
    pub fn on_zone(&mut self, zone: ZoneKey, event: ZoneEvent) -> bool {
        if zone != self.zone {
            return false;
        }
        match event {
            ZoneEvent::In => {
                self.inside = true;
                self.hint_visible = self.style.show_hint;
                self.label_z.retarget(LABEL_HOVER_Z, HOVER_SECONDS);
                self.fence_color.retarget(FENCE_HOVER, HOVER_SECONDS);
            }
            ZoneEvent::Out => {
                self.inside = false;
                self.hint_visible = false;
                self.label_z.retarget(LABEL_IDLE_Z, HOVER_SECONDS);
                self.fence_color.retarget(FENCE_IDLE, HOVER_SECONDS);
            }
        }
        true
    }

    pub fn hide_hint(&mut self) {
        self.hint_visible = false;
    }

    /// Hover tweens plus the idle bob, sway and fence pulse
    pub fn update(&mut self, world: &mut World, tick: Tick) {
        let t = tick.elapsed;
        let label_z = self.label_z.advance(tick.delta);
        let fence_color = self.fence_color.advance(tick.delta);

        if let Some(root) = world.get_entity_mut(self.root) {
            root.transform_mut().position.z = (t * 2.0).sin() * 0.1;
        }
        if let Some(label) = self.label.and_then(|k| world.get_entity_mut(k)) {
            let transform = label.transform_mut();
            transform.position.z = label_z;
            transform.rotation.z = t.sin() * 0.05;
        }
        if let Some(fence) = self.fence.and_then(|k| world.get_entity_mut(k)) {
            fence.set_material(Material::Flat(fence_color));
            fence.set_opacity(0.5 + (t * 2.0).sin() * 0.2);
        }
    }
}
