//! Unit quaternion used for body orientations

use serde::{Deserialize, Serialize};

use crate::{Euler, Vec3};

/// Rotation quaternion (x, y, z vector part, w scalar part)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis`
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Quaternion from Euler angles applied in XYZ order
    pub fn from_euler(e: Euler) -> Self {
        let (s1, c1) = (e.x * 0.5).sin_cos();
        let (s2, c2) = (e.y * 0.5).sin_cos();
        let (s3, c3) = (e.z * 0.5).sin_cos();
        Self::new(
            s1 * c2 * c3 + c1 * s2 * s3,
            c1 * s2 * c3 - s1 * c2 * s3,
            c1 * c2 * s3 + s1 * s2 * c3,
            c1 * c2 * c3 - s1 * s2 * s3,
        )
    }

    /// Back to XYZ Euler angles
    pub fn to_euler(self) -> Euler {
        let Self { x, y, z, w } = self;
        let m11 = 1.0 - 2.0 * (y * y + z * z);
        let m12 = 2.0 * (x * y - w * z);
        let m13 = 2.0 * (x * z + w * y);
        let m22 = 1.0 - 2.0 * (x * x + z * z);
        let m23 = 2.0 * (y * z - w * x);
        let m32 = 2.0 * (y * z + w * x);
        let m33 = 1.0 - 2.0 * (x * x + y * y);

        let ey = m13.clamp(-1.0, 1.0).asin();
        if m13.abs() < 0.999_999 {
            Euler::new((-m23).atan2(m33), ey, (-m12).atan2(m11))
        } else {
            // Gimbal lock
            Euler::new(m32.atan2(m22), ey, 0.0)
        }
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
        } else {
            Self::IDENTITY
        }
    }

    /// Rotate a vector by this quaternion
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    /// Integrate an angular velocity over `dt` seconds
    pub fn integrate(self, angular_velocity: Vec3, dt: f32) -> Self {
        let half = dt * 0.5;
        let (ax, ay, az) = (angular_velocity.x, angular_velocity.y, angular_velocity.z);
        let Self { x, y, z, w } = self;
        Self::new(
            x + half * (ax * w + ay * z - az * y),
            y + half * (ay * w + az * x - ax * z),
            z + half * (az * w + ax * y - ay * x),
            w + half * (-ax * x - ay * y - az * z),
        )
        .normalized()
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;
    fn mul(self, o: Self) -> Self {
        Self::new(
            self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
            self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
        )
    }
}
