//! Drivescape - a drivable Konya city scene
//!
//! The binary in `main.rs` wires these modules to a winit event loop:
//!
//! - [`config`] - Layered TOML + environment configuration
//! - [`input`] - Key and wheel events to actions
//! - [`objects`] - Landmarks, butterflies, rocket, green box, popup button
//! - [`scene`] - Floor, vehicle and the running [`scene::City`]
//! - [`systems`] - Per-frame simulation and the window

pub mod config;
pub mod input;
pub mod objects;
pub mod scene;
pub mod systems;
