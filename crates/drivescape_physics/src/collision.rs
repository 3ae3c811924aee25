//! Collision detection and filtering
//!
//! Every test returns a [`Contact`] whose normal points from the second
//! shape toward the first, so pushing the first shape along the normal by
//! the penetration separates the pair.

use bitflags::bitflags;

use crate::shapes::{Aabb, Collider, Plane, Sphere};
use drivescape_math::Vec3;

bitflags! {
    /// Collision layers for filtering which objects can collide
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most objects
        const DEFAULT = 1 << 0;
        /// The player's vehicle
        const VEHICLE = 1 << 1;
        /// Buildings, walls and the floor
        const STATIC = 1 << 2;
        /// Zones that detect but don't push
        const TRIGGER = 1 << 3;
        /// Movable props such as the rocket
        const PROP = 1 << 4;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

/// Layer/mask pair
///
/// Two objects A and B collide if `(A.layer & B.mask) != 0` and
/// `(B.layer & A.mask) != 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    pub layer: CollisionLayer,
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// The vehicle hits everything except triggers
    pub fn vehicle() -> Self {
        Self {
            layer: CollisionLayer::VEHICLE,
            mask: CollisionLayer::ALL & !CollisionLayer::TRIGGER,
        }
    }

    /// Static world geometry
    pub fn static_world() -> Self {
        Self {
            layer: CollisionLayer::STATIC,
            mask: CollisionLayer::ALL,
        }
    }

    pub fn prop() -> Self {
        Self {
            layer: CollisionLayer::PROP,
            mask: CollisionLayer::ALL & !CollisionLayer::TRIGGER,
        }
    }

    /// Triggers detect `detects` without pushing them
    pub fn trigger(detects: CollisionLayer) -> Self {
        Self {
            layer: CollisionLayer::TRIGGER,
            mask: detects,
        }
    }
}

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point of contact
    pub point: Vec3,
    /// Normal pointing from the second shape toward the first
    pub normal: Vec3,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }

    fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// Sphere vs plane
pub fn sphere_vs_plane(sphere: &Sphere, plane: &Plane) -> Option<Contact> {
    let penetration = sphere.radius - plane.signed_distance(sphere.center);
    if penetration > 0.0 {
        let point = sphere.center - plane.normal * sphere.radius;
        Some(Contact::new(point, plane.normal, penetration))
    } else {
        None
    }
}

/// AABB vs plane, using the corner deepest along the plane normal
pub fn aabb_vs_plane(aabb: &Aabb, plane: &Plane) -> Option<Contact> {
    let h = aabb.half_extents();
    let n = plane.normal;
    let sign = |v: f32| if v >= 0.0 { 1.0 } else { -1.0 };
    let closest = aabb.center() - Vec3::new(h.x * sign(n.x), h.y * sign(n.y), h.z * sign(n.z));

    let signed_dist = plane.signed_distance(closest);
    if signed_dist < 0.0 {
        Some(Contact::new(closest, n, -signed_dist))
    } else {
        None
    }
}

/// Sphere vs AABB; the normal points from the box toward the sphere
pub fn sphere_vs_aabb(sphere: &Sphere, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.closest_point(sphere.center);
    let delta = sphere.center - closest;
    let dist_squared = delta.length_squared();

    if dist_squared >= sphere.radius * sphere.radius {
        return None;
    }

    if dist_squared > 1e-8 {
        let dist = dist_squared.sqrt();
        Some(Contact::new(closest, delta / dist, sphere.radius - dist))
    } else {
        // Center inside the box: push out through the nearest face
        let local = sphere.center - aabb.center();
        let h = aabb.half_extents();
        let faces = [
            (h.x - local.x.abs(), Vec3::new(local.x.signum(), 0.0, 0.0)),
            (h.y - local.y.abs(), Vec3::new(0.0, local.y.signum(), 0.0)),
            (h.z - local.z.abs(), Vec3::new(0.0, 0.0, local.z.signum())),
        ];
        let (depth, normal) = faces
            .iter()
            .copied()
            .fold(faces[0], |best, f| if f.0 < best.0 { f } else { best });
        Some(Contact::new(sphere.center, normal, depth + sphere.radius))
    }
}

/// AABB vs AABB; the normal points from `b` toward `a` along the axis of least overlap
pub fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if a.max.x < b.min.x || a.min.x > b.max.x {
        return None;
    }
    if a.max.y < b.min.y || a.min.y > b.max.y {
        return None;
    }
    if a.max.z < b.min.z || a.min.z > b.max.z {
        return None;
    }

    let overlap = a.max.min_components(b.max) - a.min.max_components(b.min);
    let (ca, cb) = (a.center(), b.center());

    let mut min_overlap = overlap.x;
    let mut normal = if ca.x < cb.x { -Vec3::X } else { Vec3::X };
    if overlap.y < min_overlap {
        min_overlap = overlap.y;
        normal = if ca.y < cb.y { -Vec3::Y } else { Vec3::Y };
    }
    if overlap.z < min_overlap {
        min_overlap = overlap.z;
        normal = if ca.z < cb.z { -Vec3::Z } else { Vec3::Z };
    }

    let point = (a.min.max_components(b.min) + a.max.min_components(b.max)) * 0.5;
    Some(Contact::new(point, normal, min_overlap.max(0.0)))
}

/// Sphere vs sphere; the normal points from `b` toward `a`
pub fn sphere_vs_sphere(a: &Sphere, b: &Sphere) -> Option<Contact> {
    let delta = a.center - b.center;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;

    if dist_sq < min_dist * min_dist && dist_sq > 1e-4 {
        let dist = dist_sq.sqrt();
        let normal = delta / dist;
        Some(Contact::new(b.center + normal * b.radius, normal, min_dist - dist))
    } else {
        None
    }
}

/// Dispatch on collider kinds
pub fn collide(a: &Collider, b: &Collider) -> Option<Contact> {
    match (a, b) {
        (Collider::Sphere(s), Collider::Plane(p)) => sphere_vs_plane(s, p),
        (Collider::Aabb(x), Collider::Plane(p)) => aabb_vs_plane(x, p),
        (Collider::Sphere(s), Collider::Aabb(x)) => sphere_vs_aabb(s, x),
        (Collider::Aabb(x), Collider::Sphere(s)) => sphere_vs_aabb(s, x).map(Contact::flipped),
        (Collider::Aabb(x), Collider::Aabb(y)) => aabb_vs_aabb(x, y),
        (Collider::Sphere(s), Collider::Sphere(t)) => sphere_vs_sphere(s, t),
        (Collider::Plane(_), Collider::Plane(_)) => None,
        (Collider::Plane(_), _) => collide(b, a).map(Contact::flipped),
    }
}
