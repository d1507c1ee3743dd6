//! Collision detection for boxes and circles
//!
//! Hazards are oriented boxes, the player and projectiles are circles, walls
//! are axis-aligned boxes. Every test returns the contact point, a normal that
//! points toward the *first* shape, and the penetration depth.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Aabb;

/// What a body is, for contact dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyCategory {
    Player,
    Hazard,
    Boundary,
    Projectile,
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Surface normal, pointing toward the first shape
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// An oriented box (hazard shape)
#[derive(Debug, Clone, Copy)]
pub struct Obb {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub angle: f32,
}

impl Obb {
    pub fn new(center: Vec2, half_extents: Vec2, angle: f32) -> Self {
        Self {
            center,
            half_extents,
            angle,
        }
    }

    /// Closest point on (or inside) the box to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let rot = Vec2::from_angle(self.angle);
        let d = self.to_local(rot, p);
        let clamped = d.clamp(-self.half_extents, self.half_extents);
        self.center + rot.rotate(clamped)
    }

    /// Closest point on the box surface to `p`, also when `p` is inside
    pub fn closest_surface_point(&self, p: Vec2) -> Vec2 {
        let rot = Vec2::from_angle(self.angle);
        let d = self.to_local(rot, p);
        let h = self.half_extents;
        let inside = d.x.abs() <= h.x && d.y.abs() <= h.y;
        let local = if inside {
            // Push out through the nearest face
            let dx = h.x - d.x.abs();
            let dy = h.y - d.y.abs();
            if dx < dy {
                Vec2::new(h.x.copysign(d.x), d.y)
            } else {
                Vec2::new(d.x, h.y.copysign(d.y))
            }
        } else {
            d.clamp(-h, h)
        };
        self.center + rot.rotate(local)
    }

    /// Unit vectors of the box's local X and Y axes
    pub fn axes(&self) -> [Vec2; 2] {
        let rot = Vec2::from_angle(self.angle);
        [rot, rot.perp()]
    }

    /// Half-length of the box's shadow on the unit axis `n`
    fn project_radius(&self, n: Vec2) -> f32 {
        let [ax, ay] = self.axes();
        self.half_extents.x * ax.dot(n).abs() + self.half_extents.y * ay.dot(n).abs()
    }

    /// `p` in box space (`rot` is the unit vector of the box angle)
    #[inline]
    fn to_local(&self, rot: Vec2, p: Vec2) -> Vec2 {
        Vec2::new(rot.x, -rot.y).rotate(p - self.center)
    }

    /// World-space bounding box
    pub fn aabb(&self) -> Aabb {
        let (s, c) = self.angle.sin_cos();
        let (s, c) = (s.abs(), c.abs());
        let h = self.half_extents;
        let extent = Vec2::new(c * h.x + s * h.y, s * h.x + c * h.y);
        Aabb::from_center(self.center, extent)
    }
}

/// Circle against an oriented box. Normal points toward the circle.
pub fn circle_obb_collision(center: Vec2, radius: f32, obb: &Obb) -> CollisionResult {
    let closest = obb.closest_point(center);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-12 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Circle center inside the box: exit through the nearest face
    let surface = obb.closest_surface_point(center);
    let out = surface - center;
    let depth = out.length();
    let normal = if depth > 1e-6 {
        out / depth
    } else {
        (center - obb.center).normalize_or(Vec2::X)
    };
    CollisionResult {
        hit: true,
        point: surface,
        normal,
        penetration: radius + depth,
    }
}

/// Circle against an axis-aligned box. Normal points toward the circle.
pub fn circle_aabb_collision(center: Vec2, radius: f32, aabb: &Aabb) -> CollisionResult {
    let obb = Obb::new(aabb.center(), (aabb.max - aabb.min) * 0.5, 0.0);
    circle_obb_collision(center, radius, &obb)
}

/// Oriented box against oriented box (separating axes). Normal points from `b`
/// toward `a` along the axis of least overlap.
pub fn obb_obb_collision(a: &Obb, b: &Obb) -> CollisionResult {
    let delta = a.center - b.center;
    let mut best: Option<(f32, Vec2)> = None;

    for axis in a.axes().into_iter().chain(b.axes()) {
        let distance = delta.dot(axis);
        let overlap = a.project_radius(axis) + b.project_radius(axis) - distance.abs();
        if overlap < 0.0 {
            return CollisionResult::miss();
        }
        if best.is_none_or(|(depth, _)| overlap < depth) {
            let normal = if distance < 0.0 { -axis } else { axis };
            best = Some((overlap, normal));
        }
    }

    let Some((penetration, normal)) = best else {
        return CollisionResult::miss();
    };
    // Midway between the two boxes' closest points to each other's centers
    let point = (a.closest_point(b.center) + b.closest_point(a.center)) * 0.5;
    CollisionResult {
        hit: true,
        point,
        normal,
        penetration,
    }
}

/// Box against a boundary wall whose interior side faces `inward` (an axis unit vector).
///
/// Penetration is measured along `inward`, so a box that has sunk deep into
/// the wall is still pushed back out on the interior side.
pub fn aabb_wall_collision(a: &Aabb, wall: &Aabb, inward: Vec2) -> CollisionResult {
    if !a.overlaps(wall) {
        return CollisionResult::miss();
    }

    let penetration = if inward.x > 0.0 {
        wall.max.x - a.min.x
    } else if inward.x < 0.0 {
        a.max.x - wall.min.x
    } else if inward.y > 0.0 {
        wall.max.y - a.min.y
    } else {
        a.max.y - wall.min.y
    };
    let region = Aabb::new(a.min.max(wall.min), a.max.min(wall.max));

    CollisionResult {
        hit: true,
        point: region.center(),
        normal: inward,
        penetration,
    }
}
