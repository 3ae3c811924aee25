//! Application systems
//!
//! Pieces of the binary's frame loop that can be tested without a window.

mod simulation;
mod window;

pub use simulation::{CameraShake, SimulationResult, SimulationSystem, MAX_FRAME_DELTA};
pub use window::{format_title, WindowError, WindowSystem};
