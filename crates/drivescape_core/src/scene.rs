//! Scene serialization
//!
//! A scene is a RON file listing object templates: which resource to place,
//! how to place it, where, and which behaviour drives it afterwards. Scenes
//! also carry gravity and the vehicle spawn point.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use drivescape_math::{Euler, Vec3};

use crate::debug_panel::SliderRange;
use crate::Transform3D;

/// Euler rotation as authored, in degrees or radians
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Rotation {
    Degrees([f32; 3]),
    Radians([f32; 3]),
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::Radians([0.0; 3])
    }
}

impl Rotation {
    pub fn to_euler(self) -> Euler {
        match self {
            Rotation::Degrees([x, y, z]) => Euler::from_degrees(x, y, z),
            Rotation::Radians([x, y, z]) => Euler::new(x, y, z),
        }
    }

    pub fn is_degrees(&self) -> bool {
        matches!(self, Rotation::Degrees(_))
    }

    /// Raw authored values
    pub fn values(&self) -> [f32; 3] {
        match self {
            Rotation::Degrees(v) | Rotation::Radians(v) => *v,
        }
    }

    /// Same units, new values
    pub fn with_values(self, values: [f32; 3]) -> Self {
        match self {
            Rotation::Degrees(_) => Rotation::Degrees(values),
            Rotation::Radians(_) => Rotation::Radians(values),
        }
    }
}

/// Where an object goes
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl Placement {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Rotation::default(),
            scale: Vec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_transform(&self) -> Transform3D {
        Transform3D::from_position(self.position)
            .with_rotation(self.rotation.to_euler())
            .with_scale(self.scale)
    }
}

/// How the model becomes entities
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum PlacementMode {
    /// Converted mesh only, no body
    #[default]
    Converted,
    /// Converted mesh plus a body built from the collision model
    Physics { mass: f32 },
}

/// One box of a hand-described body
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxTemplate {
    pub half_extents: Vec3,
    #[serde(default)]
    pub offset: Vec3,
}

/// A static body described box by box rather than from a collision model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticBodyTemplate {
    /// Physics material name
    pub material: String,
    /// Body position relative to the object
    #[serde(default)]
    pub offset: Vec3,
    #[serde(default)]
    pub rotation: Rotation,
    pub boxes: Vec<BoxTemplate>,
}

/// Debug sliders for an object's placement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugFolderTemplate {
    pub name: String,
    /// Put position, rotation and scale into their own subfolders
    #[serde(default)]
    pub nested: bool,
    #[serde(default)]
    pub position: Option<SliderRange>,
    /// Replaces `position` for the y slider only
    #[serde(default)]
    pub position_y: Option<SliderRange>,
    #[serde(default)]
    pub rotation: Option<SliderRange>,
    #[serde(default)]
    pub scale: Option<SliderRange>,
}

/// What drives an object after placement
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Placed once, only debug edits move it
    #[default]
    Landmark,
    /// Children bob and flap
    Butterflies { speed: f32, height: f32 },
    Rocket,
    GreenBox,
    PopupButton,
}

/// One object in a scene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectTemplate {
    pub name: String,
    /// Model resource name; some behaviours build their own geometry
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub collision: Option<String>,
    #[serde(default)]
    pub mode: PlacementMode,
    #[serde(default)]
    pub placement: Placement,
    /// Used instead of `placement` when debug mode is on
    #[serde(default)]
    pub debug_placement: Option<Placement>,
    #[serde(default)]
    pub static_body: Option<StaticBodyTemplate>,
    #[serde(default)]
    pub debug_panel: Option<DebugFolderTemplate>,
    #[serde(default)]
    pub behavior: Behavior,
}

impl ObjectTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource: None,
            collision: None,
            mode: PlacementMode::Converted,
            placement: Placement::default(),
            debug_placement: None,
            static_body: None,
            debug_panel: None,
            behavior: Behavior::Landmark,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_collision(mut self, collision: impl Into<String>) -> Self {
        self.collision = Some(collision.into());
        self
    }

    pub fn with_mode(mut self, mode: PlacementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_debug_placement(mut self, placement: Placement) -> Self {
        self.debug_placement = Some(placement);
        self
    }

    pub fn with_static_body(mut self, body: StaticBodyTemplate) -> Self {
        self.static_body = Some(body);
        self
    }

    pub fn with_debug_panel(mut self, panel: DebugFolderTemplate) -> Self {
        self.debug_panel = Some(panel);
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Placement for the current mode
    pub fn effective_placement(&self, debug: bool) -> Placement {
        match (debug, self.debug_placement) {
            (true, Some(p)) => p,
            _ => self.placement,
        }
    }
}

/// A serializable city scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub objects: Vec<ObjectTemplate>,
    /// Gravity along Z (negative = down)
    #[serde(default)]
    pub gravity: Option<f32>,
    #[serde(default)]
    pub car_spawn: Option<Vec3>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
            gravity: None,
            car_spawn: None,
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(source: &str) -> Result<Self, SceneLoadError> {
        Ok(ron::from_str(source)?)
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, pretty)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSaveError> {
        let contents = self.to_ron()?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn add_object(&mut self, object: ObjectTemplate) {
        self.objects.push(object);
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn with_car_spawn(mut self, spawn: Vec3) -> Self {
        self.car_spawn = Some(spawn);
        self
    }

    pub fn object(&self, name: &str) -> Option<&ObjectTemplate> {
        self.objects.iter().find(|o| o.name == name)
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    Io(io::Error),
    /// Invalid RON syntax or shape
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SceneLoadError {}

/// Error saving a scene
#[derive(Debug)]
pub enum SceneSaveError {
    Io(io::Error),
    Serialize(ron::Error),
}

impl From<io::Error> for SceneSaveError {
    fn from(e: io::Error) -> Self {
        SceneSaveError::Io(e)
    }
}

impl From<ron::Error> for SceneSaveError {
    fn from(e: ron::Error) -> Self {
        SceneSaveError::Serialize(e)
    }
}

impl std::fmt::Display for SceneSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSaveError::Io(e) => write!(f, "IO error: {}", e),
            SceneSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneSaveError {}

/// Any failure getting a scene ready to run
#[derive(Debug)]
pub enum SceneError {
    Load(SceneLoadError),
    /// Validation found problems; each is listed
    Invalid(Vec<crate::scene_validator::ValidationError>),
}

impl From<SceneLoadError> for SceneError {
    fn from(e: SceneLoadError) -> Self {
        SceneError::Load(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Load(e) => write!(f, "{}", e),
            SceneError::Invalid(errors) => {
                write!(f, "Scene has {} validation error(s)", errors.len())?;
                for e in errors {
                    write!(f, "; {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SceneError {}
