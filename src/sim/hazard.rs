//! Drifting hazards
//!
//! Each hazard is a randomly sized oriented box launched with a single impulse
//! and spin. Projectiles destroy them; everything else bounces.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Aabb;
use super::body::{Body, box_inertia, floor_mass};
use super::collision::{BodyCategory, Obb};
use crate::audio::SoundCue;
use crate::consts::MIN_ASPECT;
use crate::hooks::{EffectKind, Hooks};
use crate::tuning::HazardTuning;
use crate::{random_direction, random_in_disk, uniform};

pub type HazardId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: HazardId,
    pub body: Body,
    pub half_extents: Vec2,
    /// Cleared by the first projectile hit; dead hazards are swept at end of tick
    pub alive: bool,
    /// Sim time of the last contact sound
    pub last_contact_signal: Option<f32>,
}

/// Launch speed multiplier for a hazard created `elapsed` seconds into the session
pub fn difficulty_multiplier(elapsed: f32, tuning: &HazardTuning) -> f32 {
    (1.0 + elapsed.max(0.0) * tuning.growth_rate).min(tuning.max_multiplier)
}

/// Per-axis scale from an overall scale and an x/y aspect ratio
pub fn shape_scale(scale: f32, aspect: f32) -> Vec2 {
    let a = aspect.max(MIN_ASPECT).sqrt();
    Vec2::new(scale * a, scale / a)
}

/// Mass grows with the square root of the area
pub fn mass_for_scale(size: Vec2) -> f32 {
    floor_mass((size.x * size.y).abs().sqrt())
}

impl Hazard {
    /// Create a hazard with random shape and launch it
    pub fn spawn<R: Rng + ?Sized>(
        id: HazardId,
        pos: Vec2,
        elapsed: f32,
        tuning: &HazardTuning,
        rng: &mut R,
    ) -> Self {
        let scale = uniform(rng, tuning.min_scale, tuning.max_scale);
        let aspect = uniform(rng, tuning.min_aspect, tuning.max_aspect);
        let half_extents = (tuning.base_half_extents * shape_scale(scale, aspect)).abs();

        let mass = mass_for_scale(half_extents * 2.0);
        let mut body = Body::new(pos, mass, box_inertia(mass, half_extents));

        let multiplier = difficulty_multiplier(elapsed, tuning);
        let impulse = uniform(rng, tuning.min_speed, tuning.max_speed) / body.mass * multiplier;
        body.apply_impulse(random_direction(rng) * impulse);
        body.apply_torque_impulse(uniform(rng, -tuning.max_spin, tuning.max_spin));

        log::debug!(
            "Hazard {id} at ({:.2}, {:.2}) size {:.2}x{:.2} mass {:.3} x{multiplier:.2}",
            pos.x,
            pos.y,
            half_extents.x * 2.0,
            half_extents.y * 2.0,
            body.mass
        );

        Self {
            id,
            body,
            half_extents,
            alive: true,
            last_contact_signal: None,
        }
    }

    pub fn obb(&self) -> Obb {
        Obb::new(self.body.pos, self.half_extents, self.body.angle)
    }

    /// World-space bounds of the rotated box
    pub fn aabb(&self) -> Aabb {
        self.obb().aabb()
    }

    /// Radius of the circle through the box corners
    pub fn bounding_radius(&self) -> f32 {
        self.half_extents.length()
    }

    /// Closest point on the box outline to `p`, also when `p` is inside
    pub fn surface_point(&self, p: Vec2) -> Vec2 {
        self.obb().closest_surface_point(p)
    }

    /// Projectile hit. Returns the drop positions, or `None` if already dead.
    pub fn hit_by_projectile<R: Rng + ?Sized>(
        &mut self,
        point: Vec2,
        tuning: &HazardTuning,
        rng: &mut R,
        hooks: &mut Hooks,
    ) -> Option<Vec<Vec2>> {
        if !self.alive {
            return None;
        }
        self.alive = false;

        hooks.play(SoundCue::HazardHitByProjectile);
        hooks.effect(point, EffectKind::HazardDestroyed);

        let drops = (0..tuning.drop_count)
            .map(|_| self.body.pos + random_in_disk(rng) * tuning.drop_spread)
            .collect();
        Some(drops)
    }

    /// Physical contact with anything but a projectile
    pub fn on_body_contact(
        &mut self,
        other: BodyCategory,
        point: Vec2,
        impact_speed: f32,
        now: f32,
        tuning: &HazardTuning,
        hooks: &mut Hooks,
    ) {
        if !self.alive || other == BodyCategory::Projectile {
            return;
        }

        let cooled = self
            .last_contact_signal
            .is_none_or(|t| now - t >= tuning.contact_cooldown);
        if cooled && impact_speed >= tuning.min_impact_speed {
            let cue = match other {
                BodyCategory::Player => Some(SoundCue::HazardHitPlayer),
                BodyCategory::Hazard => Some(SoundCue::HazardHitHazard),
                _ => None,
            };
            if let Some(cue) = cue {
                hooks.play(cue);
                self.last_contact_signal = Some(now);
            }
        }

        hooks.effect(point, EffectKind::Bounce);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MIN_MASS;
    use crate::hooks::recording;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawn(seed: u64, tuning: &HazardTuning) -> Hazard {
        let mut rng = Pcg32::seed_from_u64(seed);
        Hazard::spawn(1, Vec2::ZERO, 0.0, tuning, &mut rng)
    }

    #[test]
    fn test_difficulty_ramp_caps() {
        let t = HazardTuning::default();
        assert_eq!(difficulty_multiplier(0.0, &t), 1.0);
        assert!((difficulty_multiplier(10.0, &t) - 1.8).abs() < 1e-5);
        assert_eq!(difficulty_multiplier(1000.0, &t), 5.0);
    }

    #[test]
    fn test_difficulty_fixed_at_creation() {
        let tuning = HazardTuning::default();
        let early = Hazard::spawn(1, Vec2::ZERO, 0.0, &tuning, &mut Pcg32::seed_from_u64(21));
        let late = Hazard::spawn(1, Vec2::ZERO, 10.0, &tuning, &mut Pcg32::seed_from_u64(21));

        assert_eq!(early.half_extents, late.half_extents);
        let ratio = late.body.vel.length() / early.body.vel.length();
        assert!((ratio - 1.8).abs() < 1e-4, "ratio {ratio}");
        assert!((late.body.vel.normalize() - early.body.vel.normalize()).length() < 1e-5);
    }

    #[test]
    fn test_shape_scale_preserves_area() {
        let s = shape_scale(2.0, 4.0);
        assert!((s.x - 4.0).abs() < 1e-5);
        assert!((s.y - 1.0).abs() < 1e-5);
        assert!((s.x * s.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_launches_within_range() {
        let tuning = HazardTuning::default();
        for seed in 0..20 {
            let h = spawn(seed, &tuning);
            assert!(h.alive);
            // Δv = J/m with J = speed/m
            let expected = 1.0 / (h.body.mass * h.body.mass);
            assert!((h.body.vel.length() - expected).abs() < expected * 1e-3);
            let size = h.half_extents * 2.0;
            assert!((h.body.mass - (size.x * size.y).sqrt()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_double_hit_destroys_once() {
        let tuning = HazardTuning::default();
        let mut h = spawn(5, &tuning);
        let mut rng = Pcg32::seed_from_u64(9);
        let (mut hooks, rec) = recording::hooks();

        let drops = h.hit_by_projectile(Vec2::ZERO, &tuning, &mut rng, &mut hooks);
        assert_eq!(drops.map(|d| d.len()), Some(1));
        assert!(h.hit_by_projectile(Vec2::ZERO, &tuning, &mut rng, &mut hooks).is_none());
        assert!(!h.alive);

        let log = rec.0.borrow();
        assert_eq!(log.effect_count(EffectKind::HazardDestroyed), 1);
        assert_eq!(log.cue_count(SoundCue::HazardHitByProjectile), 1);
    }

    #[test]
    fn test_drops_scatter_within_spread() {
        let tuning = HazardTuning {
            drop_count: 6,
            drop_spread: 0.5,
            ..Default::default()
        };
        let mut h = spawn(2, &tuning);
        let center = h.body.pos;
        let mut rng = Pcg32::seed_from_u64(1);
        let drops = h
            .hit_by_projectile(center, &tuning, &mut rng, &mut Hooks::new())
            .unwrap();
        assert_eq!(drops.len(), 6);
        assert!(drops.iter().all(|d| d.distance(center) <= 0.5 + 1e-5));
    }

    #[test]
    fn test_contact_sound_gate() {
        let tuning = HazardTuning::default();
        let mut h = spawn(3, &tuning);
        let (mut hooks, rec) = recording::hooks();

        // Too slow: bounce effect only
        h.on_body_contact(BodyCategory::Hazard, Vec2::ZERO, 0.1, 0.0, &tuning, &mut hooks);
        // Loud enough
        h.on_body_contact(BodyCategory::Player, Vec2::ZERO, 2.0, 0.0, &tuning, &mut hooks);
        // Still cooling down
        h.on_body_contact(BodyCategory::Hazard, Vec2::ZERO, 2.0, 0.05, &tuning, &mut hooks);
        // Walls never make a sound
        h.on_body_contact(BodyCategory::Boundary, Vec2::ZERO, 2.0, 1.0, &tuning, &mut hooks);
        h.on_body_contact(BodyCategory::Hazard, Vec2::ZERO, 2.0, 1.0, &tuning, &mut hooks);

        let log = rec.0.borrow();
        assert_eq!(log.cue_count(SoundCue::HazardHitPlayer), 1);
        assert_eq!(log.cue_count(SoundCue::HazardHitHazard), 1);
        assert_eq!(log.effect_count(EffectKind::Bounce), 5);
    }

    proptest! {
        #[test]
        fn prop_mass_positive_for_degenerate_shapes(
            min_scale in -2.0f32..2.0,
            max_scale in -2.0f32..2.0,
            min_aspect in -1.0f32..3.0,
            max_aspect in -1.0f32..3.0,
            seed in 0u64..1000,
        ) {
            let tuning = HazardTuning {
                min_scale,
                max_scale,
                min_aspect,
                max_aspect,
                ..Default::default()
            };
            let h = spawn(seed, &tuning);
            prop_assert!(h.body.mass >= MIN_MASS);
            prop_assert!(h.body.inertia >= MIN_MASS);
            prop_assert!(h.body.vel.is_finite());
            prop_assert!(h.body.angular_vel.is_finite());
        }
    }
}
