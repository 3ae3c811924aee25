//! Vehicle controller for keyboard driving
//!
//! Controls:
//! - W/S or Up/Down: Throttle forward/reverse
//! - A/D or Left/Right: Steer left/right
//! - Space: Brake
//!
//! The controller keeps a signed speed along the heading and hands a planar
//! velocity plus heading to whatever implements [`ChassisControl`].

use drivescape_math::Vec3;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Keyboard driving state
pub struct VehicleController {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    brake: bool,

    enabled: bool,

    /// Signed speed along the heading, units per second
    speed: f32,
    /// Radians around +Z, 0 facing +X
    heading: f32,

    // Configuration
    pub acceleration: f32,
    pub max_speed: f32,
    /// Reverse top speed as a fraction of `max_speed`
    pub reverse_factor: f32,
    /// Radians per second at full speed
    pub steering_speed: f32,
    pub brake_deceleration: f32,
    /// Speed lost per second with no throttle
    pub rolling_drag: f32,
}

impl Default for VehicleController {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleController {
    pub fn new() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            brake: false,

            enabled: true,

            speed: 0.0,
            heading: 0.0,

            acceleration: 12.0,
            max_speed: 20.0,
            reverse_factor: 0.5,
            steering_speed: 2.0,
            brake_deceleration: 30.0,
            rolling_drag: 4.0,
        }
    }

    /// Process keyboard input
    ///
    /// Returns true if the key is a driving key. Ignored while disabled.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        if !self.enabled {
            return false;
        }
        let pressed = state == ElementState::Pressed;

        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => { self.forward = pressed; true }
            KeyCode::KeyS | KeyCode::ArrowDown => { self.backward = pressed; true }
            KeyCode::KeyA | KeyCode::ArrowLeft => { self.left = pressed; true }
            KeyCode::KeyD | KeyCode::ArrowRight => { self.right = pressed; true }
            KeyCode::Space => { self.brake = pressed; true }
            _ => false,
        }
    }

    /// Enable or disable driving; disabling releases every held key
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.release_all();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn release_all(&mut self) {
        self.forward = false;
        self.backward = false;
        self.left = false;
        self.right = false;
        self.brake = false;
    }

    /// Advance speed and heading by `dt` and push them to the chassis
    ///
    /// Returns the chassis position for debug display.
    pub fn update<C: ChassisControl>(&mut self, chassis: &mut C, dt: f32) -> Vec3 {
        let (throttle, steer) = self.get_movement_input();

        if self.brake {
            self.speed = approach_zero(self.speed, self.brake_deceleration * dt);
        } else if throttle != 0.0 {
            self.speed += throttle * self.acceleration * dt;
        } else {
            self.speed = approach_zero(self.speed, self.rolling_drag * dt);
        }
        self.speed = self.speed.clamp(-self.max_speed * self.reverse_factor, self.max_speed);

        // Steering authority scales with speed; reversing flips it
        if self.max_speed > 0.0 {
            self.heading -= steer * self.steering_speed * dt * (self.speed / self.max_speed);
        }

        let direction = Vec3::new(self.heading.cos(), self.heading.sin(), 0.0);
        chassis.set_planar_velocity(direction * self.speed);
        chassis.set_heading(self.heading);

        chassis.position()
    }

    /// Check if any driving keys are pressed
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Get raw driving input
    ///
    /// Returns (throttle, steer) in range -1.0 to 1.0. Throttle is positive
    /// forward, steer is positive to the right.
    pub fn get_movement_input(&self) -> (f32, f32) {
        let throttle = (self.forward as i32 - self.backward as i32) as f32;
        let steer = (self.right as i32 - self.left as i32) as f32;
        (throttle, steer)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Stop and face `heading`, e.g. after a teleport
    pub fn reset(&mut self, heading: f32) {
        self.speed = 0.0;
        self.heading = heading;
    }

    /// Builder: set acceleration
    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Builder: set top speed
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed;
        self
    }

    /// Builder: set steering speed at full speed
    pub fn with_steering_speed(mut self, speed: f32) -> Self {
        self.steering_speed = speed;
        self
    }
}

fn approach_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else {
        (value + amount).min(0.0)
    }
}

/// Trait for the driven body
/// Allows the controller to work with different chassis implementations
pub trait ChassisControl {
    /// Set the X/Y velocity, leaving vertical motion to physics
    fn set_planar_velocity(&mut self, velocity: Vec3);
    fn set_heading(&mut self, heading: f32);
    fn position(&self) -> Vec3;
}
