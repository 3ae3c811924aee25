//! Landmarks
//!
//! Buildings and props placed once from a resource. In debug mode their
//! placement can be edited from a debug folder; edits only take effect once
//! the model has been placed.

use drivescape_core::{
    BodyKey, DebugChange, DebugFolderTemplate, DebugPanel, DebugValue, EntityKey, FolderId, ObjectTemplate, Placement,
    Rotation, World,
};
use drivescape_math::Vec3;

use super::{place_template, BuildContext, ObjectContext, WorldObject};

const AXES: [&str; 3] = ["x", "y", "z"];

/// Part of a placement touched by a debug edit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementEdit {
    Position,
    Rotation,
    Scale,
}

/// Apply `field = value` (`position.x`, `rotation.z`, `scale` ...) to a
/// placement
pub fn edit_placement(placement: &mut Placement, field: &str, value: f32) -> Option<PlacementEdit> {
    let (group, axis) = match field.split_once('.') {
        Some((group, axis)) => (group, Some(AXES.iter().position(|a| *a == axis)?)),
        None => (field, None),
    };
    match (group, axis) {
        ("position", Some(i)) => {
            let mut p = placement.position.to_array();
            p[i] = value;
            placement.position = Vec3::from(p);
            Some(PlacementEdit::Position)
        }
        ("rotation", Some(i)) => {
            let mut r = placement.rotation.values();
            r[i] = value;
            placement.rotation = placement.rotation.with_values(r);
            Some(PlacementEdit::Rotation)
        }
        ("scale", Some(i)) => {
            let mut s = placement.scale.to_array();
            s[i] = value;
            placement.scale = Vec3::from(s);
            Some(PlacementEdit::Scale)
        }
        ("scale", None) => {
            placement.scale = Vec3::splat(value);
            Some(PlacementEdit::Scale)
        }
        _ => None,
    }
}

/// Build the placement folder for `target`
///
/// Nested folders get `position`, `rotation` and `scale` subfolders with one
/// slider per axis. Flat folders keep every slider at the top and use a
/// single uniform scale slider. Rotation sliders are in the units the
/// placement was authored in.
pub fn add_placement_sliders(
    panel: &mut DebugPanel,
    target: &str,
    template: &DebugFolderTemplate,
    placement: &Placement,
) -> FolderId {
    let root = panel.add_folder(template.name.clone());
    let group = |panel: &mut DebugPanel, name: &str| {
        if template.nested {
            panel.add_subfolder(root, name)
        } else {
            root
        }
    };

    if let Some(range) = template.position {
        let folder = group(panel, "position");
        let values = placement.position.to_array();
        for (i, axis) in AXES.iter().enumerate() {
            let range = match (i, template.position_y) {
                (1, Some(y)) => y,
                _ => range,
            };
            let id = panel.add_slider(folder, target, &format!("position.{axis}"), values[i], range);
            let label = if template.nested { axis.to_string() } else { format!("position {axis}") };
            panel.set_label(id, label);
        }
    }

    if let Some(range) = template.rotation {
        let folder = group(panel, "rotation");
        let values = placement.rotation.values();
        for (i, axis) in AXES.iter().enumerate() {
            let id = panel.add_slider(folder, target, &format!("rotation.{axis}"), values[i], range);
            let label = if template.nested { axis.to_string() } else { format!("rotation {axis}") };
            panel.set_label(id, label);
        }
    }

    if let Some(range) = template.scale {
        if template.nested {
            let folder = group(panel, "scale");
            let values = placement.scale.to_array();
            for (i, axis) in AXES.iter().enumerate() {
                let id = panel.add_slider(folder, target, &format!("scale.{axis}"), values[i], range);
                panel.set_label(id, axis.to_string());
            }
        } else {
            panel.add_slider(root, target, "scale", placement.scale.x, range);
        }
    }

    root
}

/// A placed resource with optional debug editing
pub struct Landmark {
    name: String,
    container: Option<EntityKey>,
    body: Option<BodyKey>,
    placement: Placement,
    folder: Option<FolderId>,
}

impl Landmark {
    pub fn new(template: &ObjectTemplate, ctx: &mut BuildContext<'_>) -> Self {
        let placement = template.effective_placement(ctx.debug_enabled());
        let (container, body) = match place_template(template, &placement, ctx) {
            Ok(placed) => (Some(placed.container), placed.body),
            Err(e) => {
                log::error!("Failed to place '{}': {}", template.name, e);
                (None, None)
            }
        };

        let folder = match (&template.debug_panel, ctx.debug.as_deref_mut()) {
            (Some(folder), Some(panel)) => Some(add_placement_sliders(panel, &template.name, folder, &placement)),
            _ => None,
        };

        Self {
            name: template.name.clone(),
            container,
            body,
            placement,
            folder,
        }
    }

    pub fn container(&self) -> Option<EntityKey> {
        self.container
    }

    pub fn body(&self) -> Option<BodyKey> {
        self.body
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Debug folder, if one was built
    pub fn folder(&self) -> Option<FolderId> {
        self.folder
    }

    pub fn update_position(&mut self, world: &mut World, position: Vec3) {
        self.placement.position = position;
        self.sync(world, PlacementEdit::Position);
    }

    pub fn update_rotation(&mut self, world: &mut World, rotation: Rotation) {
        self.placement.rotation = rotation;
        self.sync(world, PlacementEdit::Rotation);
    }

    pub fn update_scale(&mut self, world: &mut World, scale: Vec3) {
        self.placement.scale = scale;
        self.sync(world, PlacementEdit::Scale);
    }

    fn sync(&self, world: &mut World, edit: PlacementEdit) {
        let Some(entity) = self.container.and_then(|c| world.get_entity_mut(c)) else {
            log::debug!("'{}' has no mesh yet, ignoring {:?} edit", self.name, edit);
            return;
        };
        match edit {
            PlacementEdit::Position => entity.set_position(self.placement.position),
            PlacementEdit::Rotation => entity.set_rotation(self.placement.rotation.to_euler()),
            PlacementEdit::Scale => entity.set_scale(self.placement.scale),
        }

        let Some(body) = self
            .body
            .and_then(|b| world.physics_mut().and_then(|p| p.get_body_mut(b)))
        else {
            return;
        };
        match edit {
            PlacementEdit::Position => body.position = self.placement.position,
            PlacementEdit::Rotation => body.orientation = self.placement.rotation.to_euler().to_quat(),
            PlacementEdit::Scale => {}
        }
    }

    /// Apply a placement slider change; false for unrelated fields
    pub fn apply_change(&mut self, change: &DebugChange, world: &mut World) -> bool {
        let DebugValue::Number(value) = change.value else {
            return false;
        };
        match edit_placement(&mut self.placement, &change.field, value) {
            Some(edit) => {
                self.sync(world, edit);
                true
            }
            None => false,
        }
    }
}

impl WorldObject for Landmark {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_debug(&mut self, change: &DebugChange, ctx: &mut ObjectContext<'_>) {
        if !self.apply_change(change, ctx.world) {
            log::warn!("'{}' has no debug field '{}'", self.name, change.field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::Harness;
    use drivescape_core::{PlacementMode, SliderRange};

    fn ses_odasi() -> ObjectTemplate {
        ObjectTemplate::new("sesOdasi")
            .with_resource("sesOdasi")
            .with_placement(Placement::at(Vec3::new(-86.0, -12.0, 0.0)).with_rotation(Rotation::Degrees([0.0, 0.0, -8.0])))
            .with_debug_placement(
                Placement::at(Vec3::new(-86.0, -12.0, 0.0)).with_rotation(Rotation::Degrees([-90.0, -180.0, 0.0])),
            )
            .with_debug_panel(DebugFolderTemplate {
                name: "sesOdasi".into(),
                nested: true,
                position: Some(SliderRange::new(-100.0, 100.0, 0.1)),
                position_y: None,
                rotation: Some(SliderRange::new(-180.0, 180.0, 1.0)),
                scale: Some(SliderRange::new(0.1, 5.0, 0.1)),
            })
    }

    #[test]
    fn test_edit_placement_fields() {
        let mut placement = Placement::at(Vec3::ZERO).with_rotation(Rotation::Degrees([0.0; 3]));
        assert_eq!(edit_placement(&mut placement, "position.y", 4.0), Some(PlacementEdit::Position));
        assert_eq!(placement.position, Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(edit_placement(&mut placement, "rotation.z", 90.0), Some(PlacementEdit::Rotation));
        assert_eq!(placement.rotation, Rotation::Degrees([0.0, 0.0, 90.0]));
        assert_eq!(edit_placement(&mut placement, "scale", 2.0), Some(PlacementEdit::Scale));
        assert_eq!(placement.scale, Vec3::splat(2.0));
        assert_eq!(edit_placement(&mut placement, "position.w", 1.0), None);
        assert_eq!(edit_placement(&mut placement, "speed", 1.0), None);
    }

    #[test]
    fn test_normal_mode_uses_normal_placement() {
        let mut h = Harness::new().with_model("sesOdasi", &["shadeWhite"]);
        let landmark = Landmark::new(&ses_odasi(), &mut h.build_ctx(false));

        let container = landmark.container().unwrap();
        let entity = h.world.get_entity(container).unwrap();
        assert_eq!(entity.name(), Some("sesOdasi"));
        assert!((entity.transform().rotation.z - (-8.0f32).to_radians()).abs() < 1e-5);
        assert_eq!(h.panel.folder_count(), 0);
    }

    #[test]
    fn test_debug_mode_builds_nested_folder() {
        let mut h = Harness::new().with_model("sesOdasi", &["shadeWhite"]);
        let mut landmark = Landmark::new(&ses_odasi(), &mut h.build_ctx(true));

        let container = landmark.container().unwrap();
        let rotation = h.world.get_entity(container).unwrap().transform().rotation;
        assert!((rotation.x - (-90.0f32).to_radians()).abs() < 1e-5);

        // root + position/rotation/scale
        assert_eq!(h.panel.folder_count(), 4);
        assert_eq!(h.panel.control_count(), 9);

        let x = h.panel.find("sesOdasi", "position.x").unwrap();
        let change = h.panel.set_number(x, -90.0).unwrap();
        landmark.apply_debug(&change, &mut h.ctx(None));
        let position = h.world.get_entity(container).unwrap().transform().position;
        assert!((position.x + 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_flat_folder_uses_uniform_scale() {
        let mut h = Harness::new().with_model("alaaddinTepesiModel", &["shadeGreen"]);
        let template = ObjectTemplate::new("alaaddinTepesi")
            .with_resource("alaaddinTepesiModel")
            .with_placement(Placement::at(Vec3::new(-10.0, -30.0, -3.0)).with_scale(Vec3::splat(0.8)))
            .with_debug_panel(DebugFolderTemplate {
                name: "Alaaddin Tepesi".into(),
                nested: false,
                position: Some(SliderRange::new(-50.0, 50.0, 0.1)),
                position_y: None,
                rotation: Some(SliderRange::new(0.0, 360.0, 1.0)),
                scale: Some(SliderRange::new(0.1, 5.0, 0.1)),
            });
        let mut landmark = Landmark::new(&template, &mut h.build_ctx(true));
        assert_eq!(h.panel.folder_count(), 1);
        assert_eq!(h.panel.control_count(), 7);

        let scale = h.panel.find("alaaddinTepesi", "scale").unwrap();
        let change = h.panel.set_number(scale, 2.0).unwrap();
        landmark.apply_debug(&change, &mut h.ctx(None));
        let entity = h.world.get_entity(landmark.container().unwrap()).unwrap();
        assert_eq!(entity.transform().scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_missing_resource_leaves_edits_inert() {
        let mut h = Harness::new();
        let mut landmark = Landmark::new(&ses_odasi(), &mut h.build_ctx(false));
        assert!(landmark.container().is_none());

        landmark.update_position(&mut h.world, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(landmark.placement().position, Vec3::new(1.0, 2.0, 3.0));
        assert!(h.world.is_empty());
    }

    #[test]
    fn test_physics_landmark_moves_its_body() {
        let mut h = Harness::new().with_model("genclikMerkezi", &["cube"]);
        let template = ObjectTemplate::new("genclikMerkezi")
            .with_resource("genclikMerkezi")
            .with_collision("genclikMerkezi")
            .with_mode(PlacementMode::Physics { mass: 0.0 })
            .with_placement(Placement::at(Vec3::new(10.0, -20.0, 0.0)));
        let mut landmark = Landmark::new(&template, &mut h.build_ctx(false));
        let body = landmark.body().unwrap();

        landmark.update_position(&mut h.world, Vec3::new(12.0, -20.0, 0.0));
        let body = h.world.physics().unwrap().get_body(body).unwrap();
        assert_eq!(body.position, Vec3::new(12.0, -20.0, 0.0));
        assert!(body.is_static());
    }
}
