//! The green screen surface inside the studio model
//!
//! Finds the mesh that acts as the screen, flashes it red once so it can be
//! spotted, and fades new materials onto it.

use std::cmp::Ordering;

use drivescape_core::{Easing, EntityKey, Material, Tween, World};
use drivescape_math::Color;

/// Names the screen mesh is known by, most specific first
const SCREEN_NAMES: [&str; 2] = ["pureUc", "Cube.002"];

const HIGHLIGHT_COLOR: Color = Color::new(1.0, 0.0, 0.0);
const HIGHLIGHT_OPACITY: f32 = 0.9;
const HIGHLIGHT_SECONDS: f32 = 1.5;

const FADE_SECONDS: f32 = 0.5;

#[derive(Clone, Copy, Debug)]
struct Candidate {
    key: EntityKey,
    volume: f32,
    vertex_count: u32,
    greenness: f32,
}

/// One side clearly outweighs the other (by half again)
fn dominates(a: f32, b: f32) -> Ordering {
    if a > b * 1.5 {
        Ordering::Greater
    } else if b > a * 1.5 {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

fn is_green(color: Color) -> bool {
    color.g > color.r * 1.5 && color.g > color.b * 1.5 && color.g > 0.4
}

/// Pick the mesh under `container` that is most likely the green screen
///
/// Tried in turn: a mesh named `pureUc`, a mesh named `Cube.002`, the best
/// clearly green mesh that is large or detailed (by vertex count, then
/// volume, then greenness), and finally the largest mesh by volume then
/// vertex count.
pub fn find_green_part(world: &World, container: EntityKey) -> Option<EntityKey> {
    let meshes: Vec<Candidate> = world
        .descendants(container)
        .into_iter()
        .filter_map(|key| {
            let entity = world.get_entity(key)?;
            let mesh = entity.mesh?;
            Some(Candidate {
                key,
                volume: mesh.volume(),
                vertex_count: mesh.vertex_count,
                greenness: entity.material().color().map_or(0.0, |c| c.g),
            })
        })
        .collect();

    for name in SCREEN_NAMES {
        let named = meshes
            .iter()
            .find(|c| world.get_entity(c.key).and_then(|e| e.name()) == Some(name));
        if let Some(c) = named {
            log::info!("Green screen found by name '{}'", name);
            return Some(c.key);
        }
    }

    let green_and_large = meshes.iter().filter(|c| {
        let Some(entity) = world.get_entity(c.key) else {
            return false;
        };
        let (Some(color), Some(mesh)) = (entity.material().color(), entity.mesh) else {
            return false;
        };
        let large = mesh.size.x > 2.0 || mesh.size.y > 2.0 || mesh.size.z > 2.0;
        is_green(color) && (large || mesh.vertex_count > 100)
    });
    let best = green_and_large.fold(None::<&Candidate>, |best, c| match best {
        Some(b) if rank_green(b, c) != Ordering::Less => Some(b),
        _ => Some(c),
    });
    if let Some(c) = best {
        log::info!("Green screen found by colour and size");
        return Some(c.key);
    }

    let largest = meshes.iter().fold(None::<&Candidate>, |best, c| match best {
        Some(b) if rank_size(b, c) != Ordering::Less => Some(b),
        _ => Some(c),
    });
    if largest.is_none() {
        log::error!("No mesh to use as green screen");
    }
    largest.map(|c| c.key)
}

fn rank_green(a: &Candidate, b: &Candidate) -> Ordering {
    dominates(a.vertex_count as f32, b.vertex_count as f32)
        .then_with(|| dominates(a.volume, b.volume))
        .then_with(|| a.greenness.partial_cmp(&b.greenness).unwrap_or(Ordering::Equal))
}

fn rank_size(a: &Candidate, b: &Candidate) -> Ordering {
    dominates(a.volume, b.volume).then_with(|| a.vertex_count.cmp(&b.vertex_count))
}

/// The screen mesh and its material state
#[derive(Clone, Debug)]
pub struct GreenScreen {
    part: EntityKey,
    original: Material,
    /// Material hidden under the start-up highlight
    highlight: Option<(f32, Material)>,
    fade: Option<Tween<f32>>,
}

impl GreenScreen {
    /// Locate the screen under `container` and flash it red
    pub fn find(world: &mut World, container: EntityKey) -> Option<Self> {
        let part = find_green_part(world, container)?;
        let entity = world.get_entity_mut(part)?;
        let original = entity.material().clone();

        entity.set_material(Material::Flat(HIGHLIGHT_COLOR));
        entity.set_opacity(HIGHLIGHT_OPACITY);
        log::debug!("Green screen is '{}'", entity.name().unwrap_or("<unnamed>"));

        Some(Self {
            part,
            highlight: Some((HIGHLIGHT_SECONDS, original.clone())),
            original,
            fade: None,
        })
    }

    pub fn part(&self) -> EntityKey {
        self.part
    }

    pub fn original(&self) -> &Material {
        &self.original
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Fade `material` in over half a second
    pub fn apply(&mut self, world: &mut World, material: Material) {
        self.highlight = None;
        let Some(entity) = world.get_entity_mut(self.part) else {
            return;
        };
        entity.set_material(material);
        entity.set_opacity(0.0);
        self.fade = Some(Tween::new(0.0, 1.0, FADE_SECONDS).with_easing(Easing::Power2InOut));
    }

    /// Fade the model's own material back in
    pub fn reset_background(&mut self, world: &mut World) {
        self.apply(world, self.original.clone());
        log::info!("Green screen restored");
    }

    pub fn update(&mut self, world: &mut World, dt: f32) {
        if let Some((left, material)) = self.highlight.take() {
            let left = left - dt;
            if left > 0.0 {
                self.highlight = Some((left, material));
            } else if let Some(entity) = world.get_entity_mut(self.part) {
                entity.set_material(material);
                entity.set_opacity(1.0);
            }
        }

        if let Some(mut fade) = self.fade.take() {
            let opacity = fade.advance(dt);
            if let Some(entity) = world.get_entity_mut(self.part) {
                entity.set_opacity(opacity);
            }
            if !fade.is_complete() {
                self.fade = Some(fade);
            }
        }
    }
}
