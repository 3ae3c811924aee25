//! RGB colours

use serde::{Deserialize, Serialize};

/// Linear RGB colour with components in 0..=1
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Colour from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        )
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    /// Packed `0xRRGGBB` value
    pub fn to_hex(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Color::from_hex(0xff0000);
        assert_eq!(c, Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_accepts_hash_prefix() {
        assert_eq!(Color::parse("#e1c78f").map(Color::to_hex), Some(0xe1c78f));
        assert_eq!(Color::parse("87ceeb").map(Color::to_hex), Some(0x87ceeb));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::parse("#12").is_none());
        assert!(Color::parse("#zzzzzz").is_none());
    }

    #[test]
    fn test_lerp_midpoint() {
        let c = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert!((c.g - 0.5).abs() < 1e-6);
    }
}
