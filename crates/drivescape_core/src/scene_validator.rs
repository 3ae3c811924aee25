//! Scene validation
//!
//! Checks a [`Scene`] for mistakes before it is built: empty scenes,
//! duplicate object names, odd gravity, far-away positions, collapsed
//! scales and references to resources that are not loaded.

use std::collections::HashSet;

use drivescape_math::Vec3;

use crate::resources::Resources;
use crate::scene::{Behavior, Scene};

/// Problem found in a scene
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyScene,
    DuplicateName(String),
    /// Absolute gravity above 1000
    UnreasonableGravity(f32),
    /// Any component beyond 10000 units
    ExtremePosition { object: String, position: Vec3 },
    ExtremeSpawnPosition(Vec3),
    NonPositiveScale { object: String, scale: Vec3 },
    /// The behaviour needs a model but none is named
    MissingResource(String),
    UnknownResource { object: String, resource: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyScene => write!(f, "Scene has no objects"),
            ValidationError::DuplicateName(name) => write!(f, "Duplicate object name: '{}'", name),
            ValidationError::UnreasonableGravity(g) => {
                write!(f, "Unreasonable gravity value: {} (abs > 1000)", g)
            }
            ValidationError::ExtremePosition { object, position } => write!(
                f,
                "Object '{}' at extreme position [{}, {}, {}]",
                object, position.x, position.y, position.z
            ),
            ValidationError::ExtremeSpawnPosition(p) => {
                write!(f, "Extreme spawn position: [{}, {}, {}]", p.x, p.y, p.z)
            }
            ValidationError::NonPositiveScale { object, scale } => write!(
                f,
                "Object '{}' has non-positive scale [{}, {}, {}]",
                object, scale.x, scale.y, scale.z
            ),
            ValidationError::MissingResource(object) => {
                write!(f, "Object '{}' needs a resource", object)
            }
            ValidationError::UnknownResource { object, resource } => {
                write!(f, "Object '{}' uses unknown resource '{}'", object, resource)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

const MAX_GRAVITY: f32 = 1000.0;
const MAX_COORDINATE: f32 = 10000.0;

fn is_extreme(v: Vec3) -> bool {
    v.to_array().iter().any(|c| c.abs() > MAX_COORDINATE)
}

/// Static checks over a [`Scene`]
pub struct SceneValidator;

impl SceneValidator {
    /// Structural checks that need nothing but the scene
    pub fn validate(scene: &Scene) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if scene.objects.is_empty() {
            errors.push(ValidationError::EmptyScene);
        }

        let mut seen = HashSet::new();
        for object in &scene.objects {
            if !seen.insert(object.name.as_str()) {
                errors.push(ValidationError::DuplicateName(object.name.clone()));
            }
        }

        if let Some(gravity) = scene.gravity {
            if gravity.abs() > MAX_GRAVITY {
                errors.push(ValidationError::UnreasonableGravity(gravity));
            }
        }

        if let Some(spawn) = scene.car_spawn {
            if is_extreme(spawn) {
                errors.push(ValidationError::ExtremeSpawnPosition(spawn));
            }
        }

        for object in &scene.objects {
            let placements = std::iter::once(&object.placement).chain(object.debug_placement.as_ref());
            for placement in placements {
                if is_extreme(placement.position) {
                    errors.push(ValidationError::ExtremePosition {
                        object: object.name.clone(),
                        position: placement.position,
                    });
                }
                if placement.scale.to_array().iter().any(|c| *c <= 0.0) {
                    errors.push(ValidationError::NonPositiveScale {
                        object: object.name.clone(),
                        scale: placement.scale,
                    });
                }
            }

            let needs_model = !matches!(object.behavior, Behavior::PopupButton);
            if needs_model && object.resource.is_none() {
                errors.push(ValidationError::MissingResource(object.name.clone()));
            }
        }

        errors
    }

    /// Structural checks plus resource lookups
    pub fn validate_with_resources(scene: &Scene, resources: &Resources) -> Vec<ValidationError> {
        let mut errors = Self::validate(scene);
        for object in &scene.objects {
            for resource in object.resource.iter().chain(object.collision.iter()) {
                if !resources.contains(resource) {
                    errors.push(ValidationError::UnknownResource {
                        object: object.name.clone(),
                        resource: resource.clone(),
                    });
                }
            }
        }
        errors
    }

    /// [`validate`](SceneValidator::validate) as a `Result`
    pub fn validate_or_error(scene: &Scene) -> Result<(), Vec<ValidationError>> {
        let errors = Self::validate(scene);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelAsset, ModelNode};
    use crate::scene::{ObjectTemplate, Placement};

    fn make_valid_scene() -> Scene {
        let mut scene = Scene::new("Valid").with_gravity(-9.82).with_car_spawn(Vec3::new(0.0, 0.0, 2.0));
        scene.add_object(
            ObjectTemplate::new("road")
                .with_resource("roadModel")
                .with_placement(Placement::at(Vec3::new(35.0, -10.0, 0.0001)).with_scale(Vec3::new(1.6, 1.0, 2.0))),
        );
        scene.add_object(ObjectTemplate::new("popupButton").with_behavior(Behavior::PopupButton));
        scene
    }

    #[test]
    fn test_valid_scene_returns_no_errors() {
        let errors = SceneValidator::validate(&make_valid_scene());
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
        assert!(SceneValidator::validate_or_error(&make_valid_scene()).is_ok());
    }

    #[test]
    fn test_empty_scene_error() {
        let errors = SceneValidator::validate(&Scene::new("Empty"));
        assert!(errors.contains(&ValidationError::EmptyScene));
    }

    #[test]
    fn test_duplicate_names_detected() {
        let mut scene = make_valid_scene();
        scene.add_object(ObjectTemplate::new("road").with_resource("roadModel"));
        let errors = SceneValidator::validate(&scene);
        assert!(errors.contains(&ValidationError::DuplicateName("road".to_string())));
    }

    #[test]
    fn test_unreasonable_gravity_detected() {
        let scene = make_valid_scene().with_gravity(-5000.0);
        let errors = SceneValidator::validate(&scene);
        assert!(errors.contains(&ValidationError::UnreasonableGravity(-5000.0)));
    }

    #[test]
    fn test_extreme_positions_detected() {
        let mut scene = make_valid_scene().with_car_spawn(Vec3::new(99999.0, 0.0, 0.0));
        scene.add_object(
            ObjectTemplate::new("far")
                .with_resource("roadModel")
                .with_debug_placement(Placement::at(Vec3::new(0.0, -20000.0, 0.0))),
        );
        let errors = SceneValidator::validate(&scene);
        assert!(errors.contains(&ValidationError::ExtremeSpawnPosition(Vec3::new(99999.0, 0.0, 0.0))));
        assert!(errors.contains(&ValidationError::ExtremePosition {
            object: "far".into(),
            position: Vec3::new(0.0, -20000.0, 0.0),
        }));
    }

    #[test]
    fn test_non_positive_scale_detected() {
        let mut scene = make_valid_scene();
        scene.add_object(
            ObjectTemplate::new("flat")
                .with_resource("roadModel")
                .with_placement(Placement::default().with_scale(Vec3::new(1.0, 0.0, 1.0))),
        );
        let errors = SceneValidator::validate(&scene);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::NonPositiveScale { object, .. } if object == "flat")));
    }

    #[test]
    fn test_missing_resource_detected() {
        let mut scene = make_valid_scene();
        scene.add_object(ObjectTemplate::new("nothing"));
        let errors = SceneValidator::validate(&scene);
        assert!(errors.contains(&ValidationError::MissingResource("nothing".into())));
    }

    #[test]
    fn test_unknown_resource_detected() {
        let mut resources = Resources::new("assets");
        resources.insert("roadModel", ModelAsset::new("road", ModelNode::new("root")));

        let mut scene = make_valid_scene();
        scene.add_object(
            ObjectTemplate::new("greenBox")
                .with_resource("roadModel")
                .with_collision("greenBoxCollision"),
        );
        let errors = SceneValidator::validate_with_resources(&scene, &resources);
        assert_eq!(
            errors,
            vec![ValidationError::UnknownResource {
                object: "greenBox".into(),
                resource: "greenBoxCollision".into(),
            }]
        );
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(format!("{}", ValidationError::EmptyScene), "Scene has no objects");
        assert_eq!(
            format!("{}", ValidationError::DuplicateName("foo".to_string())),
            "Duplicate object name: 'foo'"
        );
        assert!(format!("{}", ValidationError::UnreasonableGravity(-5000.0)).contains("-5000"));
        assert!(format!("{}", ValidationError::ExtremeSpawnPosition(Vec3::new(1.0, 2.0, 3.0))).contains("1, 2, 3"));
    }
}
