//! Rigid body integration and impulse response
//!
//! Just enough 2D dynamics for drifting hazards and the player ship:
//! linear + angular velocity, impulses, and elastic contact resolution.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_MASS;
use crate::normalize_angle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rotation (radians)
    pub angle: f32,
    /// Spin (radians/sec)
    pub angular_vel: f32,
    pub mass: f32,
    /// Moment of inertia about the center
    pub inertia: f32,
}

impl Body {
    /// Body at rest. Mass and inertia are floored at `MIN_MASS`.
    pub fn new(pos: Vec2, mass: f32, inertia: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            mass: floor_mass(mass),
            inertia: floor_mass(inertia),
        }
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        1.0 / self.mass
    }

    /// Instant velocity change: Δv = J / m
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse * self.inv_mass();
    }

    /// Instant spin change: Δω = τ / I
    pub fn apply_torque_impulse(&mut self, torque: f32) {
        self.angular_vel += torque / self.inertia;
    }

    /// Continuous force over one step: Δv = F / m · dt
    pub fn apply_force(&mut self, force: Vec2, dt: f32) {
        self.vel += force * self.inv_mass() * dt;
    }

    /// Clamp linear speed
    pub fn limit_speed(&mut self, max_speed: f32) {
        let max_speed = max_speed.max(0.0);
        if self.vel.length_squared() > max_speed * max_speed {
            self.vel = self.vel.normalize_or_zero() * max_speed;
        }
    }

    /// Semi-implicit Euler step (velocities already updated)
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.angle = normalize_angle(self.angle + self.angular_vel * dt);
    }
}

/// Replace NaN, zero, and negative masses with the epsilon floor
#[inline]
pub fn floor_mass(mass: f32) -> f32 {
    if mass.is_finite() && mass > MIN_MASS {
        mass
    } else {
        MIN_MASS
    }
}

/// Moment of inertia of a solid box with the given half extents
pub fn box_inertia(mass: f32, half_extents: Vec2) -> f32 {
    let size = half_extents * 2.0;
    floor_mass(mass * (size.x * size.x + size.y * size.y) / 12.0)
}

/// Moment of inertia of a solid disk
pub fn disk_inertia(mass: f32, radius: f32) -> f32 {
    floor_mass(0.5 * mass * radius * radius)
}

/// Resolve contact between two dynamic bodies.
///
/// `normal` points from `b` toward `a`. Returns the relative speed at impact
/// (measured before the response).
pub fn resolve_pair(
    a: &mut Body,
    b: &mut Body,
    normal: Vec2,
    penetration: f32,
    restitution: f32,
) -> f32 {
    let rel = a.vel - b.vel;
    let impact_speed = rel.length();

    let inv_a = a.inv_mass();
    let inv_b = b.inv_mass();
    let inv_sum = inv_a + inv_b;

    // Positional correction split by inverse mass
    if penetration > 0.0 {
        let correction = normal * (penetration / inv_sum);
        a.pos += correction * inv_a;
        b.pos -= correction * inv_b;
    }

    let vn = rel.dot(normal);
    if vn < 0.0 {
        let j = -(1.0 + restitution) * vn / inv_sum;
        a.vel += normal * (j * inv_a);
        b.vel -= normal * (j * inv_b);
    }

    impact_speed
}

/// Resolve contact against an immovable surface.
///
/// `normal` points from the surface toward the body. Returns the impact speed.
pub fn resolve_static(body: &mut Body, normal: Vec2, penetration: f32, restitution: f32) -> f32 {
    let impact_speed = body.vel.length();
    if penetration > 0.0 {
        body.pos += normal * penetration;
    }
    let vn = body.vel.dot(normal);
    if vn < 0.0 {
        body.vel -= normal * ((1.0 + restitution) * vn);
    }
    impact_speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_floor() {
        assert_eq!(Body::new(Vec2::ZERO, 0.0, 0.0).mass, MIN_MASS);
        assert_eq!(Body::new(Vec2::ZERO, -3.0, 1.0).mass, MIN_MASS);
        assert_eq!(Body::new(Vec2::ZERO, f32::NAN, 1.0).mass, MIN_MASS);
        assert_eq!(Body::new(Vec2::ZERO, 2.0, 1.0).mass, 2.0);
    }

    #[test]
    fn test_impulse_scales_with_mass() {
        let mut light = Body::new(Vec2::ZERO, 0.5, 1.0);
        let mut heavy = Body::new(Vec2::ZERO, 2.0, 1.0);
        light.apply_impulse(Vec2::X);
        heavy.apply_impulse(Vec2::X);
        assert!((light.vel.x - 2.0).abs() < 1e-6);
        assert!((heavy.vel.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_equal_mass_elastic_swap() {
        let mut a = Body::new(Vec2::new(-0.5, 0.0), 1.0, 1.0);
        let mut b = Body::new(Vec2::new(0.5, 0.0), 1.0, 1.0);
        a.vel = Vec2::new(1.0, 0.0);
        b.vel = Vec2::new(-1.0, 0.0);
        // normal from b to a
        let speed = resolve_pair(&mut a, &mut b, Vec2::NEG_X, 0.0, 1.0);
        assert!((speed - 2.0).abs() < 1e-6);
        assert!((a.vel.x + 1.0).abs() < 1e-5);
        assert!((b.vel.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_static_bounce_reflects() {
        let mut body = Body::new(Vec2::ZERO, 1.0, 1.0);
        body.vel = Vec2::new(0.0, -2.0);
        resolve_static(&mut body, Vec2::Y, 0.1, 1.0);
        assert!((body.vel.y - 2.0).abs() < 1e-5);
        assert!((body.pos.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_separating_pair_keeps_velocity() {
        let mut a = Body::new(Vec2::ZERO, 1.0, 1.0);
        let mut b = Body::new(Vec2::X, 1.0, 1.0);
        a.vel = Vec2::NEG_X;
        resolve_pair(&mut a, &mut b, Vec2::NEG_X, 0.0, 1.0);
        assert_eq!(a.vel, Vec2::NEG_X);
    }
}
