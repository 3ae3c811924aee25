//! Moving the vehicle into the green box studio

use std::f32::consts::PI;

use drivescape_math::{Euler, Vec3};

use super::{ObjectContext, SceneEffect};

/// Where the vehicle lands inside the studio
pub const STUDIO_TARGET: Vec3 = Vec3::new(-85.0, 0.0, 0.4);

/// Heading inside the studio; the z angle is 90 radians, not degrees
pub const STUDIO_ROTATION: Euler = Euler::new(-PI, -PI, 90.0);

/// The vehicle is dropped from this far above the target
pub const DROP_HEIGHT: f32 = 5.0;

pub const SHAKE_INTENSITY: f32 = 0.5;
/// Seconds
pub const SHAKE_DURATION: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportError {
    /// The scene has no vehicle
    MissingVehicle,
    /// The vehicle's body is gone from the physics world
    MissingBody,
}

impl std::fmt::Display for TeleportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeleportError::MissingVehicle => write!(f, "no vehicle to teleport"),
            TeleportError::MissingBody => write!(f, "vehicle body not found"),
        }
    }
}

impl std::error::Error for TeleportError {}

/// Drop the vehicle above `target` with `rotation`, at rest
///
/// The body is put to sleep, moved, stripped of velocity and woken again.
/// Queues a camera shake and tells the controller to forget its motion.
pub fn teleport_vehicle(ctx: &mut ObjectContext<'_>, target: Vec3, rotation: Euler) -> Result<(), TeleportError> {
    let key = ctx.vehicle.ok_or(TeleportError::MissingVehicle)?;
    let body = ctx
        .world
        .physics_mut()
        .and_then(|p| p.get_body_mut(key))
        .ok_or(TeleportError::MissingBody)?;

    log::info!("Teleporting vehicle from {:?}", body.position);
    body.sleep();
    body.teleport(target + Vec3::new(0.0, 0.0, DROP_HEIGHT), rotation.to_quat());
    body.wake_up();
    log::info!("Vehicle now at {:?}", body.position);

    ctx.effects.push(SceneEffect::VehicleTeleported);
    ctx.effects.push(SceneEffect::CameraShake {
        intensity: SHAKE_INTENSITY,
        duration: SHAKE_DURATION,
    });
    Ok(())
}

/// [`teleport_vehicle`] into the studio
pub fn teleport_to_studio(ctx: &mut ObjectContext<'_>) -> Result<(), TeleportError> {
    teleport_vehicle(ctx, STUDIO_TARGET, STUDIO_ROTATION)
}
