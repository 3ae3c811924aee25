//! Euler angles in radians, applied in X→Y→Z order

use serde::{Deserialize, Serialize};

use crate::Quat;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

/// Rotation about the X, Y and Z axes (radians, XYZ order)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Euler {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Build from angles given in degrees
    pub fn from_degrees(x: f32, y: f32, z: f32) -> Self {
        Self::new(deg_to_rad(x), deg_to_rad(y), deg_to_rad(z))
    }

    /// The same rotation expressed in degrees
    pub fn to_degrees(self) -> [f32; 3] {
        [rad_to_deg(self.x), rad_to_deg(self.y), rad_to_deg(self.z)]
    }

    /// Quaternion for this rotation
    #[inline]
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(self)
    }
}
