//! Game state and core simulation types
//!
//! Everything that must survive a snapshot for determinism lives here.
//! Transient per-step bookkeeping (events, live contacts) is skipped by serde.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{Aabb, Arena};
use super::draft::{Progression, UpgradeKind};
use super::hazard::{Hazard, HazardId};
use super::pickup::{Pickup, PickupId};
use super::player::Player;
use super::projectile::{Projectile, ProjectileId};
use super::schedule::Scheduler;
use super::spawner::Spawner;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Time running
    Playing,
    /// Upgrade offer open, simulation time frozen
    Drafting,
    /// Player destroyed; hazards keep drifting
    GameOver,
}

/// Gameplay events for the host (UI, stats). Drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    HazardSpawned { id: HazardId, pos: Vec2 },
    HazardDestroyed { id: HazardId, pos: Vec2 },
    ProjectileFired { id: ProjectileId },
    PickupCollected { id: PickupId, value: u32 },
    PlayerHurt { lives: u32 },
    PlayerDied { score: u64 },
    DraftOpened { options: Vec<String> },
    UpgradeChosen { kind: UpgradeKind, label: String },
}

/// Participant in a body contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BodyRef {
    Player,
    Hazard(HazardId),
    /// Index into `Arena::walls`
    Wall(usize),
}

/// Unordered contact pair, stored with the smaller ref first
pub type ContactKey = (BodyRef, BodyRef);

pub fn contact_key(a: BodyRef, b: BodyRef) -> ContactKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub phase: GamePhase,
    /// Simulation tick counter (includes paused ticks)
    pub time_ticks: u64,
    /// Scaled session clock plus pending timed actions
    pub scheduler: Scheduler,
    pub spawner: Spawner,
    pub progression: Progression,
    pub player: Player,
    /// Active hazards (sorted by id for determinism)
    pub hazards: Vec<Hazard>,
    /// Active projectiles (sorted by id for determinism)
    pub projectiles: Vec<Projectile>,
    /// Active pickups (sorted by id for determinism)
    pub pickups: Vec<Pickup>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Body contacts touching at the end of the previous step
    #[serde(skip)]
    pub(crate) contacts: BTreeSet<ContactKey>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// New session inside the given boundary walls.
    ///
    /// Unusable walls fall back to a square of `arena.fallback_half_size`.
    /// The spawner starts immediately (first hazard after the warm-up).
    pub fn new(seed: u64, tuning: Tuning, walls: Vec<Aabb>) -> Self {
        let fallback = Aabb::from_center(Vec2::ZERO, Vec2::splat(tuning.arena.fallback_half_size));
        let arena = Arena::from_colliders(walls, fallback);
        let player = Player::new(arena.bounds.center(), &tuning.player);
        let progression = Progression::new(&tuning.draft);

        let mut scheduler = Scheduler::new();
        let mut spawner = Spawner::new();
        spawner.activate(&mut scheduler, &tuning.spawner);

        log::info!(
            "New session (seed {seed}), arena {:.1} x {:.1}",
            arena.bounds.width(),
            arena.bounds.height()
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            arena,
            phase: GamePhase::Playing,
            time_ticks: 0,
            scheduler,
            spawner,
            progression,
            player,
            hazards: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            events: Vec::new(),
            contacts: BTreeSet::new(),
            next_id: 1,
        }
    }

    /// New session in the rectangular arena described by `tuning.arena`
    pub fn with_standard_arena(seed: u64, tuning: Tuning) -> Self {
        let a = &tuning.arena;
        let walls = Arena::standard_walls(a.width, a.height, a.wall_thickness);
        Self::new(seed, tuning, walls)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Scaled seconds since the session started
    pub fn elapsed(&self) -> f32 {
        self.scheduler.now()
    }

    pub fn score(&self) -> u64 {
        self.player.score(self.tuning.player.score_multiplier)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a hazard at `pos`, scaled by the current difficulty
    pub fn spawn_hazard(&mut self, pos: Vec2) -> HazardId {
        let id = self.next_entity_id();
        let elapsed = self.elapsed();
        let hazard = Hazard::spawn(id, pos, elapsed, &self.tuning.hazard, &mut self.rng);
        self.hazards.push(hazard);
        self.events.push(GameEvent::HazardSpawned { id, pos });
        id
    }

    pub fn spawn_pickup(&mut self, pos: Vec2) -> PickupId {
        let id = self.next_entity_id();
        self.pickups.push(Pickup::new(id, pos, &self.tuning.pickup));
        id
    }

    pub fn spawn_projectile(&mut self, pos: Vec2, vel: Vec2, pierce: u32) -> ProjectileId {
        let id = self.next_entity_id();
        let t = &self.tuning.projectile;
        self.projectiles
            .push(Projectile::new(id, pos, vel, t.radius, pierce, t.lifetime));
        self.events.push(GameEvent::ProjectileFired { id });
        id
    }

    /// Drop dead entities
    pub fn sweep(&mut self) {
        self.hazards.retain(|h| h.alive);
        self.projectiles.retain(|p| p.alive);
        self.pickups.retain(|p| p.alive);
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.hazards.sort_by_key(|h| h.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawner::SpawnerState;

    #[test]
    fn test_new_session() {
        let state = GameState::with_standard_arena(42, Tuning::default());
        assert!(state.arena.resolved);
        assert_eq!(state.arena.bounds.width(), 20.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.body.pos, Vec2::ZERO);
        assert_eq!(state.spawner.state, SpawnerState::Active);
        assert_eq!(state.scheduler.len(), 1);
    }

    #[test]
    fn test_bad_walls_fall_back() {
        let state = GameState::new(1, Tuning::default(), Vec::new());
        assert!(!state.arena.resolved);
        assert_eq!(state.arena.bounds.width(), 10.0);
        assert!(state.arena.despawn_bounds(0.05).is_none());
    }

    #[test]
    fn test_ids_are_unique_and_sorted() {
        let mut state = GameState::with_standard_arena(3, Tuning::default());
        let a = state.spawn_hazard(Vec2::new(1.0, 1.0));
        let b = state.spawn_pickup(Vec2::ZERO);
        let c = state.spawn_hazard(Vec2::new(-1.0, 1.0));
        assert!(a < b && b < c);

        state.hazards.reverse();
        state.normalize_order();
        assert_eq!(state.hazards[0].id, a);

        let events = state.drain_events();
        assert_eq!(events.len(), 2);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_contact_key_is_unordered() {
        let k1 = contact_key(BodyRef::Hazard(3), BodyRef::Player);
        let k2 = contact_key(BodyRef::Player, BodyRef::Hazard(3));
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_state_snapshot_round_trip() {
        let mut state = GameState::with_standard_arena(9, Tuning::default());
        state.spawn_hazard(Vec2::new(2.0, 2.0));
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hazards.len(), 1);
        assert_eq!(back.seed, 9);
    }
}
