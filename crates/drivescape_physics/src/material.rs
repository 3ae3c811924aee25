//! Physical material properties for collision response

use std::collections::HashMap;

/// Friction and restitution of a surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0.0 = ice, 1.0 = rubber)
    pub friction: f32,
    /// Restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

impl PhysicsMaterial {
    /// Generic props and buildings
    pub const DUMMY: Self = Self {
        friction: 0.5,
        restitution: 0.3,
    };

    /// Ground plane
    pub const FLOOR: Self = Self {
        friction: 0.05,
        restitution: 0.3,
    };

    /// Vehicle wheels
    pub const WHEEL: Self = Self {
        friction: 0.3,
        restitution: 0.0,
    };

    /// Values are clamped to the range [0.0, 1.0].
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.clamp(0.0, 1.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Geometric mean for friction, maximum for restitution
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
        }
    }
}

/// Named materials shared by everything that creates bodies
#[derive(Clone, Debug)]
pub struct MaterialRegistry {
    items: HashMap<String, PhysicsMaterial>,
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        let mut registry = Self { items: HashMap::new() };
        registry.insert("dummy", PhysicsMaterial::DUMMY);
        registry.insert("floor", PhysicsMaterial::FLOOR);
        registry.insert("wheel", PhysicsMaterial::WHEEL);
        registry
    }
}

impl MaterialRegistry {
    pub fn insert(&mut self, name: impl Into<String>, material: PhysicsMaterial) {
        self.items.insert(name.into(), material);
    }

    pub fn get(&self, name: &str) -> Option<PhysicsMaterial> {
        self.items.get(name).copied()
    }

    /// Look up `name`, falling back to the default material
    pub fn get_or_default(&self, name: &str) -> PhysicsMaterial {
        self.get(name).unwrap_or_else(|| {
            log::warn!("Unknown physics material '{}', using default", name);
            PhysicsMaterial::default()
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }
}
