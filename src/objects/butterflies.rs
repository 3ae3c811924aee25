//! Butterflies
//!
//! Each top-level node of the model bobs along Y and flaps around Z, phase
//! shifted by its index.

use drivescape_core::{DebugChange, DebugValue, EntityKey, ObjectTemplate, SliderRange, Tick};
use drivescape_math::Vec3;

use super::landmark::Landmark;
use super::{BuildContext, ObjectContext, WorldObject};

struct Wing {
    key: EntityKey,
    origin: Vec3,
}

pub struct Butterflies {
    landmark: Landmark,
    wings: Vec<Wing>,
    pub speed: f32,
    pub height: f32,
}

impl Butterflies {
    pub fn new(template: &ObjectTemplate, speed: f32, height: f32, ctx: &mut BuildContext<'_>) -> Self {
        let landmark = Landmark::new(template, ctx);

        let wings = landmark
            .container()
            .map(|container| {
                ctx.world
                    .children(container)
                    .iter()
                    .filter_map(|&key| {
                        let origin = ctx.world.get_entity(key)?.transform().position;
                        Some(Wing { key, origin })
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let (Some(folder), Some(panel)) = (landmark.folder(), ctx.debug.as_deref_mut()) {
            panel.add_slider(folder, &template.name, "speed", speed, SliderRange::new(0.0, 2.0, 0.01));
            panel.add_slider(folder, &template.name, "height", height, SliderRange::new(0.0, 5.0, 0.1));
        }

        Self {
            landmark,
            wings,
            speed,
            height,
        }
    }

    pub fn wing_count(&self) -> usize {
        self.wings.len()
    }
}

impl WorldObject for Butterflies {
    fn name(&self) -> &str {
        self.landmark.name()
    }

    fn update(&mut self, tick: Tick, ctx: &mut ObjectContext<'_>) {
        let t = tick.elapsed_ms() * self.speed;
        for (i, wing) in self.wings.iter().enumerate() {
            let i = i as f32;
            let Some(entity) = ctx.world.get_entity_mut(wing.key) else {
                continue;
            };
            let transform = entity.transform_mut();
            transform.position.y = wing.origin.y + (t + i * 0.5).sin() * self.height;
            transform.rotation.z = (t * 5.0 + i).sin() * 0.2;
        }
    }

    fn apply_debug(&mut self, change: &DebugChange, ctx: &mut ObjectContext<'_>) {
        match (change.field.as_str(), change.value) {
            ("speed", DebugValue::Number(v)) => self.speed = v,
            ("height", DebugValue::Number(v)) => self.height = v,
            _ => self.landmark.apply_debug(change, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::Harness;
    use drivescape_core::{Behavior, DebugFolderTemplate, Placement};

    fn template() -> ObjectTemplate {
        ObjectTemplate::new("kelebekler")
            .with_resource("kelebeklerModel")
            .with_placement(Placement::at(Vec3::new(75.0, 0.0, 0.0)).with_scale(Vec3::splat(3.0)))
            .with_behavior(Behavior::Butterflies {
                speed: 1e-8,
                height: 0.0,
            })
            .with_debug_panel(DebugFolderTemplate {
                name: "Kelebekler".into(),
                nested: false,
                position: Some(SliderRange::new(-50.0, 50.0, 0.1)),
                position_y: Some(SliderRange::new(-20.0, 20.0, 0.1)),
                rotation: Some(SliderRange::new(0.0, 360.0, 1.0)),
                scale: Some(SliderRange::new(0.1, 5.0, 0.1)),
            })
    }

    fn tick(elapsed: f32) -> Tick {
        Tick { elapsed, delta: 0.016 }
    }

    #[test]
    fn test_defaults_barely_move() {
        let mut h = Harness::new().with_model("kelebeklerModel", &["wing_a", "wing_b"]);
        let mut butterflies = Butterflies::new(&template(), 1e-8, 0.0, &mut h.build_ctx(false));
        assert_eq!(butterflies.wing_count(), 2);

        butterflies.update(tick(10.0), &mut h.ctx(None));
        let key = h.world.find_by_name("wing_b").unwrap();
        let transform = h.world.get_entity(key).unwrap().transform();
        assert_eq!(transform.position.y, 0.0);
        assert!(transform.rotation.z.abs() < 0.2);
    }

    #[test]
    fn test_bob_follows_phase() {
        let mut h = Harness::new().with_model("kelebeklerModel", &["wing_a", "wing_b"]);
        let mut butterflies = Butterflies::new(&template(), 1e-8, 0.0, &mut h.build_ctx(false));
        butterflies.speed = 0.001;
        butterflies.height = 2.0;

        // t = 1000 ms * 0.001 = 1
        butterflies.update(tick(1.0), &mut h.ctx(None));
        let a = h.world.find_by_name("wing_a").unwrap();
        let b = h.world.find_by_name("wing_b").unwrap();
        let ya = h.world.get_entity(a).unwrap().transform().position.y;
        let yb = h.world.get_entity(b).unwrap().transform().position.y;
        assert!((ya - 1.0f32.sin() * 2.0).abs() < 1e-4);
        assert!((yb - 1.5f32.sin() * 2.0).abs() < 1e-4);

        let rz = h.world.get_entity(b).unwrap().transform().rotation.z;
        assert!((rz - (5.0f32 + 1.0).sin() * 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_debug_sliders_and_changes() {
        let mut h = Harness::new().with_model("kelebeklerModel", &["wing_a"]);
        let mut butterflies = Butterflies::new(&template(), 1e-8, 0.0, &mut h.build_ctx(true));
        assert_eq!(h.panel.control_count(), 9);

        let y = h.panel.find("kelebekler", "position.y").unwrap();
        let change = h.panel.set_number(y, 45.0).unwrap();
        assert_eq!(change.value, DebugValue::Number(20.0));

        let height = h.panel.find("kelebekler", "height").unwrap();
        let change = h.panel.set_number(height, 1.5).unwrap();
        butterflies.apply_debug(&change, &mut h.ctx(None));
        assert!((butterflies.height - 1.5).abs() < 1e-5);
    }
}
