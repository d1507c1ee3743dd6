//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies; audio and effects go through `Hooks`

pub mod arena;
pub mod body;
pub mod collision;
pub mod draft;
pub mod hazard;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;

pub use arena::{Aabb, Arena, ArenaBounds, ArenaError, resolve_inner_bounds};
pub use body::Body;
pub use collision::{BodyCategory, CollisionResult, Obb};
pub use draft::{DraftError, Progression, UpgradeKind, UpgradeOption, default_pool, draw_weighted};
pub use hazard::{Hazard, HazardId};
pub use pickup::Pickup;
pub use player::{Player, PlayerStats};
pub use projectile::{HitReport, Projectile};
pub use schedule::{Scheduler, TimedAction};
pub use spawner::{Spawner, SpawnerState};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
