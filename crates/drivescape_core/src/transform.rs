//! 3D Transform (position, rotation, scale)

use drivescape_math::{Euler, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, XYZ Euler rotation and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub position: Vec3,
    /// Radians
    #[serde(default)]
    pub rotation: Euler,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Euler::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: Euler) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    #[inline]
    pub fn quat(&self) -> Quat {
        self.rotation.to_quat()
    }

    /// Local point to parent space: scale, then rotate, then translate
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.quat().rotate(p.component_mul(self.scale)) + self.position
    }

    /// Local direction to parent space (no translation)
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.quat().rotate(d.component_mul(self.scale))
    }

    /// Place `child` (expressed in this transform's space) into parent space
    ///
    /// Scale composes per axis, which is exact only when the child's
    /// rotation keeps axes aligned.
    pub fn compose(&self, child: &Transform3D) -> Transform3D {
        let rotation = (self.quat() * child.quat()).to_euler();
        Transform3D {
            position: self.transform_point(child.position),
            rotation,
            scale: self.scale.component_mul(child.scale),
        }
    }
}
