//! Data-driven game balance
//!
//! Every knob the simulation reads lives here. All sections default to the
//! shipped balance, and `#[serde(default)]` lets a JSON file override only the
//! fields it names.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::draft::{UpgradeOption, default_pool};
use crate::sim::player::PlayerStats;

/// Tuning failed to load
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Arena layout used by `GameState::with_standard_arena`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Interior width between the side walls
    pub width: f32,
    /// Interior height between the top and bottom walls
    pub height: f32,
    /// Wall thickness
    pub wall_thickness: f32,
    /// Half size of the square used when the walls can't be resolved
    pub fallback_half_size: f32,
    /// Bounciness of body contacts
    pub restitution: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 12.0,
            wall_thickness: 1.0,
            fallback_half_size: 5.0,
            restitution: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    /// Delay before the first spawn (seconds)
    pub warmup: f32,
    /// Seconds between spawns
    pub interval: f32,
    /// Width of the band along each interior edge
    pub lane_width: f32,
    /// Extra shrink applied to the bounds before lane sampling
    pub inset: f32,
    /// Candidates closer than this to the player are rejected
    pub safe_radius: f32,
    /// Rejection attempts before spawning anyway
    pub max_attempts: u32,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            warmup: 0.5,
            interval: 1.5,
            lane_width: 1.0,
            inset: 0.05,
            safe_radius: 1.5,
            max_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    /// Half extents of the unscaled hazard shape
    pub base_half_extents: Vec2,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Aspect ratio range (x / y)
    pub min_aspect: f32,
    pub max_aspect: f32,
    /// Launch impulse range before mass and difficulty are applied
    pub min_speed: f32,
    pub max_speed: f32,
    /// Difficulty ramp per second of session time
    pub growth_rate: f32,
    /// Difficulty cap
    pub max_multiplier: f32,
    /// Spin torque impulse range (±)
    pub max_spin: f32,
    /// Pickups dropped on destruction
    pub drop_count: u32,
    /// Radius the drops scatter in
    pub drop_spread: f32,
    /// Minimum seconds between contact sounds from one hazard
    pub contact_cooldown: f32,
    /// Contacts slower than this stay silent
    pub min_impact_speed: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            base_half_extents: Vec2::splat(0.5),
            min_scale: 0.25,
            max_scale: 2.0,
            min_aspect: 0.5,
            max_aspect: 2.0,
            min_speed: 1.0,
            max_speed: 1.0,
            growth_rate: 0.08,
            max_multiplier: 5.0,
            max_spin: 0.2,
            drop_count: 1,
            drop_spread: 0.2,
            contact_cooldown: 0.08,
            min_impact_speed: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// World-space collision radius
    pub radius: f32,
    /// Seconds before the projectile is despawned
    pub lifetime: f32,
    /// Margin inside the arena bounds that still counts as "out"
    pub inset: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            radius: 0.08,
            lifetime: 3.0,
            inset: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    pub mass: f32,
    pub lives: u32,
    pub max_lives: u32,
    /// Invulnerability after taking damage (seconds)
    pub invulnerable_time: f32,
    /// Visibility toggle period while invulnerable
    pub blink_interval: f32,
    /// Lateral distance between projectiles of one volley
    pub multi_shot_spacing: f32,
    /// Score per second survived
    pub score_multiplier: f32,
    /// Starting upgradable parameters
    pub stats: PlayerStats,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 0.35,
            mass: 1.0,
            lives: 3,
            max_lives: 3,
            invulnerable_time: 1.0,
            blink_interval: 0.1,
            multi_shot_spacing: 0.18,
            score_multiplier: 10.0,
            stats: PlayerStats::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    /// Currency per pickup
    pub value: u32,
    /// Seconds before an uncollected pickup disappears
    pub lifetime: f32,
    /// Distance at which the pickup starts homing
    pub magnet_range: f32,
    /// Distance at which it is collected
    pub pickup_range: f32,
    /// Homing speed
    pub magnet_speed: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            value: 1,
            lifetime: 15.0,
            magnet_range: 3.0,
            pickup_range: 0.4,
            magnet_speed: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftTuning {
    /// Currency needed for the first draft
    pub first_threshold: u32,
    /// Threshold growth after the first draft
    pub increment_start: u32,
    /// Growth of the growth
    pub increment_step: u32,
    /// Choices offered per draft
    pub choices: usize,
    pub pool: Vec<UpgradeOption>,
}

impl Default for DraftTuning {
    fn default() -> Self {
        Self {
            first_threshold: 5,
            increment_start: 10,
            increment_step: 5,
            choices: 3,
            pool: default_pool(),
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub spawner: SpawnerTuning,
    pub hazard: HazardTuning,
    pub projectile: ProjectileTuning,
    pub player: PlayerTuning,
    pub pickup: PickupTuning,
    pub draft: DraftTuning,
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning from JSON");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
