//! Currency pickups dropped by destroyed hazards

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::PickupTuning;

pub type PickupId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: PickupId,
    pub pos: Vec2,
    pub value: u32,
    pub age: f32,
    pub lifetime: f32,
    pub alive: bool,
}

impl Pickup {
    pub fn new(id: PickupId, pos: Vec2, tuning: &PickupTuning) -> Self {
        Self {
            id,
            pos,
            value: tuning.value,
            age: 0.0,
            lifetime: tuning.lifetime,
            alive: true,
        }
    }

    /// Age, home in on the player, and report collection.
    ///
    /// Returns the value collected this step (0 if none). Distance is measured
    /// before moving, so a pickup collected this step still moves first.
    pub fn update(&mut self, player: Option<Vec2>, tuning: &PickupTuning, dt: f32) -> u32 {
        if !self.alive {
            return 0;
        }
        self.age += dt;
        if self.age >= self.lifetime {
            self.alive = false;
            return 0;
        }

        let Some(target) = player else {
            return 0;
        };
        let d = self.pos.distance(target);
        if d <= tuning.magnet_range {
            self.pos = move_towards(self.pos, target, tuning.magnet_speed * dt);
        }
        if d <= tuning.pickup_range {
            self.alive = false;
            return self.value;
        }
        0
    }
}

/// Step from `from` toward `to` by at most `max_step` without overshooting
pub fn move_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_step || dist == 0.0 {
        to
    } else {
        from + delta / dist * max_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_move_towards_does_not_overshoot() {
        assert_eq!(move_towards(Vec2::ZERO, Vec2::X, 5.0), Vec2::X);
        let p = move_towards(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0);
        assert!((p - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_out_of_range_stays_put() {
        let tuning = PickupTuning::default();
        let mut p = Pickup::new(1, Vec2::new(5.0, 0.0), &tuning);
        assert_eq!(p.update(Some(Vec2::ZERO), &tuning, DT), 0);
        assert_eq!(p.pos, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_magnet_then_collect() {
        let tuning = PickupTuning::default();
        let mut p = Pickup::new(1, Vec2::new(2.5, 0.0), &tuning);
        let mut collected = 0;
        for _ in 0..60 {
            collected += p.update(Some(Vec2::ZERO), &tuning, DT);
            if !p.alive {
                break;
            }
        }
        assert_eq!(collected, 1);
        assert!(!p.alive);
    }

    #[test]
    fn test_expires() {
        let tuning = PickupTuning {
            lifetime: 0.5,
            ..Default::default()
        };
        let mut p = Pickup::new(1, Vec2::ZERO, &tuning);
        for _ in 0..40 {
            assert_eq!(p.update(None, &tuning, DT), 0);
        }
        assert!(!p.alive);
    }
}
