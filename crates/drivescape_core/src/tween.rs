//! Tweens
//!
//! A tween moves a value from a start to an end over a fixed duration,
//! shaped by an easing curve. Progress is advanced explicitly with
//! [`Tween::advance`] so tweens follow the simulation clock rather than
//! wall time.

use drivescape_math::{Color, Vec3};

/// Easing curves, named after the animation library convention
/// (`power1` is quadratic, `power2` cubic)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    Power1Out,
    Power2In,
    Power2Out,
    Power2InOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Power2In => t * t * t,
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }

    /// Parse names like `power2.inOut`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" | "none" => Some(Easing::Linear),
            "power1.out" => Some(Easing::Power1Out),
            "power2.in" => Some(Easing::Power2In),
            "power2.out" => Some(Easing::Power2Out),
            "power2.inOut" => Some(Easing::Power2InOut),
            _ => None,
        }
    }
}

/// Values a tween can interpolate
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec3::lerp(self, other, t)
    }
}

impl Lerp for Color {
    fn lerp(self, other: Self, t: f32) -> Self {
        Color::lerp(self, other, t)
    }
}

/// An in-flight interpolation
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: f32,
    delay: f32,
    elapsed: f32,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    /// Tween from `from` to `to` over `duration` seconds
    pub fn new(from: T, to: T, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            elapsed: 0.0,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Hold the start value for `delay` seconds first
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Advance by `dt` seconds and return the new value
    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed += dt.max(0.0);
        self.value()
    }

    /// Progress from 0.0 to 1.0, before easing
    pub fn progress(&self) -> f32 {
        let active = self.elapsed - self.delay;
        if active <= 0.0 {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        (active / self.duration).min(1.0)
    }

    pub fn value(&self) -> T {
        if self.is_complete() {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(self.progress()))
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn target(&self) -> T {
        self.to
    }

    /// Restart towards a new target from the current value, like killing a
    /// running tween and starting another
    pub fn retarget(&mut self, to: T, duration: f32) {
        self.from = self.value();
        self.to = to;
        self.duration = duration.max(0.0);
        self.delay = 0.0;
        self.elapsed = 0.0;
    }
}
