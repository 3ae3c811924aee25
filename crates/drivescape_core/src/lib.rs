//! Core types for the drivescape city scene
//!
//! This crate provides the pieces every world object is built from:
//!
//! - [`Transform3D`] - Position, Euler rotation and scale
//! - [`Entity`] - A node of the scene with transform, mesh and material
//! - [`World`] - Container for all entities, optionally with physics
//! - [`MaterialLibrary`] - Shared materials resolved by mesh name
//! - [`Resources`] - Named model assets loaded from a manifest
//! - [`Scene`] - Loadable/saveable list of object templates
//! - [`placement`] - Converting models into entities and bodies
//! - [`Tween`], [`Clock`], [`Timers`] - Time-driven animation
//! - [`DebugPanel`] - Folders of sliders, toggles and buttons
//! - [`Areas`] - Ground zones reporting vehicle enter/leave

mod transform;
mod entity;
mod world;
mod materials;
mod model;
mod asset_cache;
mod asset_error;
mod resources;
mod scene;
mod scene_validator;

pub mod areas;
pub mod debug_panel;
pub mod placement;
pub mod time;
pub mod tween;

pub use transform::Transform3D;
pub use entity::{DirtyFlags, Entity, MeshData};
pub use world::{EntityKey, World};
pub use materials::{FloorShadowMaterial, Material, MaterialLibrary, PureMaterial, ShadeMaterial, ShadeUniforms};
pub use model::{MeshInfo, ModelAsset, ModelNode};
pub use asset_cache::{Asset, AssetCache, AssetHandle, AssetId};
pub use asset_error::AssetError;
pub use resources::{ResourceEntry, ResourceManifest, Resources};
pub use scene::{
    Behavior, BoxTemplate, DebugFolderTemplate, ObjectTemplate, Placement, PlacementMode, Rotation, Scene,
    SceneError, SceneLoadError, SceneSaveError, StaticBodyTemplate,
};
pub use scene_validator::{SceneValidator, ValidationError};

pub use areas::{Areas, ZoneEvent, ZoneKey};
pub use debug_panel::{ControlId, DebugChange, DebugPanel, DebugValue, FolderId, SliderRange};
pub use time::{Clock, Tick, TimerId, Timers};
pub use tween::{Easing, Lerp, Tween};

// Re-export commonly used types from drivescape_math for convenience
pub use drivescape_math::{Color, Euler, Quat, Vec2, Vec3};

// Re-export physics types for convenient access through drivescape_core
pub use drivescape_physics::{BodyKey, PhysicsConfig, PhysicsWorld, RigidBody, StaticCollider};
