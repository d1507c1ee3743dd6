//! Player projectiles
//!
//! Short-lived circles with a pierce budget. A projectile remembers every
//! hazard it has hit, so several contacts with the same hazard (same step or
//! later steps while passing through) only count once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Aabb;
use super::hazard::HazardId;

pub type ProjectileId = u32;

/// Outcome of a projectile touching a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitReport {
    /// First contact with this hazard; it should be destroyed
    Hit {
        /// Projectile keeps flying
        pierced: bool,
    },
    /// Hazard already in the hit set (or projectile already spent)
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Hazards this projectile may still pass through
    pub pierce_remaining: u32,
    /// Hazards already hit, in hit order
    pub hit_set: Vec<HazardId>,
    pub age: f32,
    pub lifetime: f32,
    pub alive: bool,
}

impl Projectile {
    pub fn new(
        id: ProjectileId,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        pierce: u32,
        lifetime: f32,
    ) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            pierce_remaining: pierce,
            hit_set: Vec::new(),
            age: 0.0,
            lifetime,
            alive: true,
        }
    }

    /// Move and age. Dies at end of life or when outside `despawn`
    /// (the inset arena bounds; `None` when the arena couldn't be resolved).
    pub fn advance(&mut self, dt: f32, despawn: Option<&Aabb>) {
        if !self.alive {
            return;
        }
        self.pos += self.vel * dt;
        self.age += dt;

        if self.age >= self.lifetime {
            self.alive = false;
            return;
        }
        if let Some(bounds) = despawn {
            if !bounds.contains(self.pos) {
                self.alive = false;
            }
        }
    }

    /// Hit a wall: gone regardless of pierce
    pub fn on_boundary_contact(&mut self) {
        self.alive = false;
    }

    /// Whether contacts with this hazard are ignored
    pub fn ignores(&self, hazard: HazardId) -> bool {
        self.hit_set.contains(&hazard)
    }

    /// Register a contact with a hazard.
    ///
    /// The caller is responsible for calling the hazard's hit handler when this
    /// returns `HitReport::Hit`.
    pub fn on_hazard_contact(&mut self, hazard: HazardId) -> HitReport {
        if !self.alive || self.ignores(hazard) {
            return HitReport::Ignored;
        }
        self.hit_set.push(hazard);

        if self.pierce_remaining > 0 {
            self.pierce_remaining -= 1;
            HitReport::Hit { pierced: true }
        } else {
            self.alive = false;
            HitReport::Hit { pierced: false }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(pierce: u32) -> Projectile {
        Projectile::new(1, Vec2::ZERO, Vec2::new(10.0, 0.0), 0.08, pierce, 3.0)
    }

    #[test]
    fn test_pierce_n_destroys_n_plus_one() {
        for pierce in 0..5u32 {
            let mut p = shot(pierce);
            let mut destroyed = 0;
            let mut hazard = 0;
            while p.alive {
                hazard += 1;
                if matches!(p.on_hazard_contact(hazard), HitReport::Hit { .. }) {
                    destroyed += 1;
                }
            }
            assert_eq!(destroyed, pierce + 1);
            assert_eq!(p.hit_set.len() as u32, pierce + 1);
        }
    }

    #[test]
    fn test_same_hazard_counts_once() {
        let mut p = shot(2);
        assert_eq!(p.on_hazard_contact(7), HitReport::Hit { pierced: true });
        assert_eq!(p.on_hazard_contact(7), HitReport::Ignored);
        assert_eq!(p.on_hazard_contact(7), HitReport::Ignored);
        assert_eq!(p.pierce_remaining, 1);
        assert!(p.ignores(7));
    }

    #[test]
    fn test_boundary_ignores_pierce() {
        let mut p = shot(10);
        p.on_boundary_contact();
        assert!(!p.alive);
        assert_eq!(p.on_hazard_contact(1), HitReport::Ignored);
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut p = shot(0);
        for _ in 0..179 {
            p.advance(1.0 / 60.0, None);
        }
        assert!(p.alive);
        p.advance(1.0 / 60.0, None);
        p.advance(1.0 / 60.0, None);
        assert!(!p.alive);
    }

    #[test]
    fn test_leaving_bounds_despawns() {
        let bounds = Aabb::from_center(Vec2::ZERO, Vec2::splat(1.0));
        let mut p = shot(0);
        p.advance(0.05, Some(&bounds));
        assert!(p.alive);
        p.advance(0.1, Some(&bounds));
        assert!(!p.alive);

        // Unresolved arena: only lifetime applies
        let mut p = shot(0);
        p.advance(0.5, None);
        assert!(p.alive);
    }
}
