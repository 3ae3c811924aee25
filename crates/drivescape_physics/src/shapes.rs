//! Collision shapes
//!
//! Bodies carry local [`Shape`]s placed by a [`ShapeInstance`]; the world
//! turns them into world-space [`Collider`]s every step.

use drivescape_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.max_components(self.min).min_components(self.max)
    }

    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min_components(other.min),
            max: self.max.max_components(other.max),
        }
    }
}

/// An infinite plane: `normal · point = distance`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal pointing to the positive side
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalized(),
            distance,
        }
    }

    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalized();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    /// Horizontal ground plane at height `z`
    pub fn floor(z: f32) -> Self {
        Self::from_point_normal(Vec3::new(0.0, 0.0, z), Vec3::Z)
    }

    /// Positive above the plane, negative below
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// Shape in body-local space
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

/// A shape attached to a body at a local offset and orientation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeInstance {
    pub shape: Shape,
    pub offset: Vec3,
    pub orientation: Quat,
}

impl ShapeInstance {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            offset: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// World-space collider for a body at `position` / `orientation`
    ///
    /// Rotated boxes are approximated by the AABB of their eight corners.
    pub fn world_collider(&self, position: Vec3, orientation: Quat) -> Collider {
        let center = position + orientation.rotate(self.offset);
        match self.shape {
            Shape::Sphere { radius } => Collider::Sphere(Sphere::new(center, radius)),
            Shape::Box { half_extents } => {
                let rotation = orientation * self.orientation;
                let mut extent = Vec3::ZERO;
                for sx in [-1.0, 1.0] {
                    for sy in [-1.0, 1.0] {
                        for sz in [-1.0, 1.0] {
                            let corner = Vec3::new(
                                half_extents.x * sx,
                                half_extents.y * sy,
                                half_extents.z * sz,
                            );
                            extent = extent.max_components(rotation.rotate(corner).abs());
                        }
                    }
                }
                Collider::Aabb(Aabb::from_center_half_extents(center, extent))
            }
        }
    }
}

/// World-space collision geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Sphere(Sphere),
    Aabb(Aabb),
    Plane(Plane),
}

impl Collider {
    pub fn center(&self) -> Vec3 {
        match self {
            Collider::Sphere(s) => s.center,
            Collider::Aabb(b) => b.center(),
            Collider::Plane(p) => p.normal * p.distance,
        }
    }

    /// Bounding box, `None` for unbounded planes
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Collider::Sphere(s) => Some(Aabb::from_center_half_extents(s.center, Vec3::splat(s.radius))),
            Collider::Aabb(b) => Some(*b),
            Collider::Plane(_) => None,
        }
    }
}
