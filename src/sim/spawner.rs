//! Hazard spawner
//!
//! Spawns one hazard per interval in a lane hugging the inside of the arena
//! walls, away from the player. Stops for good once the player is dead.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Aabb;
use super::schedule::{Scheduler, TimedAction};
use crate::consts::LANE_SHARE;
use crate::tuning::SpawnerTuning;
use crate::uniform;

/// Spawner lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnerState {
    /// Not started yet
    #[default]
    Idle,
    /// A `SpawnHazard` action is pending
    Active,
    /// Player died; never restarts
    Stopped,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    pub state: SpawnerState,
    /// Hazards spawned so far
    pub spawned: u32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the spawn loop after the warm-up delay. Ignored unless idle.
    pub fn activate(&mut self, scheduler: &mut Scheduler, tuning: &SpawnerTuning) -> bool {
        if self.state != SpawnerState::Idle {
            return false;
        }
        self.state = SpawnerState::Active;
        scheduler.schedule(tuning.warmup, TimedAction::SpawnHazard);
        log::debug!("Spawner active, first spawn in {:.2}s", tuning.warmup);
        true
    }

    /// Handle a due `SpawnHazard` action.
    ///
    /// Returns true when the caller should spawn a hazard now. The next spawn is
    /// scheduled at a fixed interval; a dead player stops the loop permanently.
    pub fn on_timer(
        &mut self,
        player_alive: bool,
        scheduler: &mut Scheduler,
        tuning: &SpawnerTuning,
    ) -> bool {
        if self.state != SpawnerState::Active {
            return false;
        }
        if !player_alive {
            self.state = SpawnerState::Stopped;
            log::info!("Player is gone, spawner stopped after {} hazards", self.spawned);
            return false;
        }
        self.spawned += 1;
        scheduler.schedule(tuning.interval, TimedAction::SpawnHazard);
        true
    }
}

/// Lane width limited to a share of the (inset) interior on both axes
pub fn clamp_lane_width(lane_width: f32, bounds: &Aabb) -> f32 {
    lane_width
        .min(bounds.width() * LANE_SHARE)
        .min(bounds.height() * LANE_SHARE)
}

/// Uniform point in the lane along one of the four edges (edge picked uniformly)
pub fn sample_inner_lane<R: Rng + ?Sized>(rng: &mut R, bounds: &Aabb, lane_width: f32) -> Vec2 {
    let lane = clamp_lane_width(lane_width, bounds);
    let Aabb { min, max } = *bounds;

    let (x, y) = match rng.random_range(0..4u8) {
        // top
        0 => (uniform(rng, min.x, max.x), uniform(rng, max.y - lane, max.y)),
        // bottom
        1 => (uniform(rng, min.x, max.x), uniform(rng, min.y, min.y + lane)),
        // left
        2 => (uniform(rng, min.x, min.x + lane), uniform(rng, min.y, max.y)),
        // right
        _ => (uniform(rng, max.x - lane, max.x), uniform(rng, min.y, max.y)),
    };
    Vec2::new(x, y)
}

/// Pick a spawn point away from the player.
///
/// Retries up to `max_attempts` times while the candidate is inside
/// `safe_radius`; after that the last candidate is used anyway.
pub fn pick_spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    arena: &Aabb,
    tuning: &SpawnerTuning,
    player: Option<Vec2>,
) -> Vec2 {
    let inner = arena.shrink(tuning.inset);
    let mut pos = inner.center();

    for _ in 0..tuning.max_attempts.max(1) {
        pos = sample_inner_lane(rng, &inner, tuning.lane_width);
        match player {
            None => break,
            Some(p) if pos.distance(p) >= tuning.safe_radius => break,
            Some(_) => {}
        }
    }
    pos
}
