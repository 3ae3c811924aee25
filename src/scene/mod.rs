//! Scene construction
//!
//! [`SceneBuilder`] lays down the floor and the vehicle; [`City`] places the
//! scene's objects on top and runs them.

mod city;
mod scene_builder;

pub use city::{Chassis, City, CityError, CitySettings};
pub use scene_builder::SceneBuilder;
