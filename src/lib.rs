//! Drift Hazard - hazard simulation and upgrade-draft core for a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arena, hazards, projectiles, spawner, upgrade draft)
//! - `audio`: Sound cue sink interface consumed by the simulation
//! - `hooks`: Visual effect sink and the collaborator bundle passed to `tick`
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod hooks;
pub mod sim;
pub mod tuning;

pub use hooks::{EffectKind, EffectSink, Hooks};
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Smallest mass any body may have (keeps impulses finite)
    pub const MIN_MASS: f32 = 0.0001;
    /// Aspect ratios are clamped to this before taking the square root
    pub const MIN_ASPECT: f32 = 0.0001;
    /// Directions shorter than this (squared) are replaced by +X
    pub const MIN_DIRECTION_SQ: f32 = 0.001;

    /// Lane width never exceeds this share of the interior span
    pub const LANE_SHARE: f32 = 0.45;

    /// Upgrade floors and caps
    pub const MIN_SHOT_INTERVAL: f32 = 0.03;
    pub const MIN_COOLDOWN: f32 = 0.1;
    pub const MAX_PIERCE: i32 = 50;
    pub const MAX_PROJECTILES_PER_SHOT: i32 = 5;
    /// Hard cap applied when firing (upgrades stop at MAX_PROJECTILES_PER_SHOT)
    pub const FIRE_SPREAD_CAP: u32 = 10;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Uniform sample in [min, max]. An empty or inverted range yields `min`.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}

/// Point inside the unit disk (rejection sampled, bounded attempts)
pub fn random_in_disk<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    for _ in 0..8 {
        let v = Vec2::new(uniform(rng, -1.0, 1.0), uniform(rng, -1.0, 1.0));
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
    Vec2::ZERO
}

/// Random unit vector; falls back to +X when the sample is degenerate
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let v = random_in_disk(rng);
    if v.length_squared() < consts::MIN_DIRECTION_SQ {
        Vec2::X
    } else {
        v.normalize()
    }
}
