//! Math types for the drivescape city scene
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector, Z is up
//! - [`Vec2`] - ground-plane vector
//! - [`Euler`] - XYZ Euler angles in radians
//! - [`Quat`] - rotation quaternion
//! - [`Color`] - RGB colour

mod vec3;
mod vec2;
mod euler;
mod quat;
mod color;

pub use vec3::Vec3;
pub use vec2::Vec2;
pub use euler::{deg_to_rad, rad_to_deg, Euler};
pub use quat::Quat;
pub use color::Color;
