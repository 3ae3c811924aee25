//! Driving input
//!
//! This crate turns keyboard state into vehicle motion.

mod vehicle_controller;

pub use vehicle_controller::{ChassisControl, VehicleController};
