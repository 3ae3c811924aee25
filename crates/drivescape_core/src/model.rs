//! Model assets
//!
//! A model is a named tree of nodes. Leaf nodes usually carry a mesh
//! summary: the colour it was authored with, its bounding size and vertex
//! count. Node names follow the material conventions resolved by
//! [`MaterialLibrary`](crate::MaterialLibrary).

use std::path::Path;

use drivescape_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::asset_cache::Asset;
use crate::asset_error::AssetError;
use crate::Transform3D;

/// Geometry summary of a mesh node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshInfo {
    #[serde(default = "default_color")]
    pub color: Color,
    /// Bounding box dimensions in local units
    #[serde(default = "default_size")]
    pub size: Vec3,
    #[serde(default)]
    pub vertex_count: u32,
}

fn default_color() -> Color {
    Color::WHITE
}

fn default_size() -> Vec3 {
    Vec3::ONE
}

impl Default for MeshInfo {
    fn default() -> Self {
        Self {
            color: default_color(),
            size: default_size(),
            vertex_count: 0,
        }
    }
}

/// One node of a model hierarchy
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelNode {
    pub name: String,
    #[serde(default)]
    pub transform: Transform3D,
    #[serde(default)]
    pub mesh: Option<MeshInfo>,
    #[serde(default)]
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshInfo) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_child(mut self, child: ModelNode) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first visit of this node and all descendants
    pub fn traverse<'a>(&'a self, visit: &mut impl FnMut(&'a ModelNode)) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// Total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ModelNode::node_count).sum::<usize>()
    }
}

/// A loaded model resource
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    pub name: String,
    /// Root of the hierarchy; a model file without one is still loadable
    /// but cannot be placed
    #[serde(default)]
    pub scene: Option<ModelNode>,
}

impl ModelAsset {
    pub fn new(name: impl Into<String>, scene: ModelNode) -> Self {
        Self {
            name: name.into(),
            scene: Some(scene),
        }
    }

    /// Model file without a scene root
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scene: None,
        }
    }

    pub fn from_ron(source: &str) -> Result<Self, AssetError> {
        Ok(ron::from_str(source)?)
    }
}

impl Asset for ModelAsset {
    fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }
}
