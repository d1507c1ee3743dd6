//! Player ship
//!
//! Thrust-driven movement toward the aim point, a magazine-and-cooldown gun,
//! and a life counter with a short blinking invulnerability window after each
//! hit. `PlayerStats` holds everything the upgrade draft can change.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, disk_inertia};
use super::draft::UpgradeKind;
use super::schedule::{Scheduler, TimedAction};
use crate::audio::SoundCue;
use crate::consts::{
    FIRE_SPREAD_CAP, MAX_PIERCE, MAX_PROJECTILES_PER_SHOT, MIN_COOLDOWN, MIN_SHOT_INTERVAL,
};
use crate::hooks::{EffectKind, Hooks};
use crate::tuning::PlayerTuning;

/// Aim directions shorter than this (squared) keep the current heading
const MIN_AIM_SQ: f32 = 0.0001;

/// Upgradable ship parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    /// Thrust force (N)
    pub thrust_force: f32,
    pub max_speed: f32,
    pub projectile_speed: f32,
    /// Seconds between shots
    pub shot_interval: f32,
    /// Magazine size
    pub shots_before_cooldown: u32,
    /// Reload time once the magazine is empty
    pub cooldown_time: f32,
    /// Hazards each projectile passes through
    pub pierce: u32,
    pub projectiles_per_shot: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            thrust_force: 8.0,
            max_speed: 5.0,
            projectile_speed: 12.0,
            shot_interval: 0.12,
            shots_before_cooldown: 10,
            cooldown_time: 1.5,
            pierce: 0,
            projectiles_per_shot: 1,
        }
    }
}

/// `base + round(value)` in signed space, clamped back into range
fn add_rounded(base: u32, value: f32, min: i64, max: i64) -> u32 {
    let v = base as i64 + value.round() as i64;
    v.clamp(min, max) as u32
}

impl PlayerStats {
    /// Apply a stat upgrade. `LifeUp` touches lives, not stats, and is handled
    /// by `Player::apply_upgrade`.
    pub fn apply_upgrade(&mut self, kind: UpgradeKind, value: f32) {
        match kind {
            UpgradeKind::ThrustUp => self.thrust_force *= 1.0 + value,
            UpgradeKind::MaxSpeedUp => self.max_speed *= 1.0 + value,
            UpgradeKind::BulletSpeedUp => self.projectile_speed *= 1.0 + value,
            UpgradeKind::FireRateUp => {
                self.shot_interval = (self.shot_interval * value).max(MIN_SHOT_INTERVAL)
            }
            UpgradeKind::MagSizeUp => {
                self.shots_before_cooldown =
                    add_rounded(self.shots_before_cooldown, value, 1, u32::MAX as i64)
            }
            UpgradeKind::CooldownDown => {
                self.cooldown_time = (self.cooldown_time * value).max(MIN_COOLDOWN)
            }
            UpgradeKind::PierceUp => {
                self.pierce = add_rounded(self.pierce, value, 0, MAX_PIERCE as i64)
            }
            UpgradeKind::MultiShot => {
                self.projectiles_per_shot = add_rounded(
                    self.projectiles_per_shot,
                    value,
                    1,
                    MAX_PROJECTILES_PER_SHOT as i64,
                )
            }
            UpgradeKind::LifeUp => {}
        }
    }
}

/// What a damage call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    /// Dead or invulnerable
    Ignored,
    Hurt,
    Died,
}

/// One projectile to spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub pierce: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub radius: f32,
    pub stats: PlayerStats,
    pub lives: u32,
    pub max_lives: u32,
    pub alive: bool,
    pub invulnerable: bool,
    /// Toggled while blinking
    pub visible: bool,
    pub shot_timer: f32,
    pub cooldown_timer: f32,
    pub shots_left: u32,
    /// Unpaused seconds survived
    pub elapsed: f32,
    /// Bumped on every hit so stale blink/end actions are ignored
    invuln_generation: u32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &PlayerTuning) -> Self {
        let max_lives = tuning.max_lives.max(1);
        let stats = tuning.stats.clone();
        Self {
            body: Body::new(pos, tuning.mass, disk_inertia(tuning.mass, tuning.radius)),
            radius: tuning.radius,
            shots_left: stats.shots_before_cooldown.max(1),
            stats,
            lives: tuning.lives.clamp(1, max_lives),
            max_lives,
            alive: true,
            invulnerable: false,
            visible: true,
            shot_timer: 0.0,
            cooldown_timer: 0.0,
            elapsed: 0.0,
            invuln_generation: 0,
        }
    }

    /// Unit heading
    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.body.angle)
    }

    /// Unit vector to the ship's right
    #[inline]
    pub fn right(&self) -> Vec2 {
        let f = self.forward();
        Vec2::new(f.y, -f.x)
    }

    pub fn score(&self, score_multiplier: f32) -> u64 {
        (self.elapsed * score_multiplier).floor().max(0.0) as u64
    }

    /// Face the aim point and, while thrusting, push toward it
    pub fn steer(&mut self, aim: Option<Vec2>, thrust: bool, dt: f32) {
        if !self.alive {
            return;
        }
        self.elapsed += dt;

        if let Some(target) = aim {
            let dir = target - self.body.pos;
            if dir.length_squared() > MIN_AIM_SQ {
                self.body.angle = dir.to_angle();
            }
        }

        if thrust {
            let force = self.forward() * self.stats.thrust_force;
            self.body.apply_force(force, dt);
            self.body.limit_speed(self.stats.max_speed);
        }
    }

    /// Advance the gun. Returns true when a volley should be fired this step.
    pub fn update_weapon(&mut self, fire: bool, dt: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.shot_timer = (self.shot_timer - dt).max(0.0);

        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
            if self.cooldown_timer <= 0.0 {
                self.shots_left = self.stats.shots_before_cooldown.max(1);
                self.shot_timer = 0.0;
            }
            return false;
        }

        if self.shots_left == 0 {
            self.cooldown_timer = self.stats.cooldown_time;
            return false;
        }

        if !fire || self.shot_timer > 0.0 {
            return false;
        }

        self.shot_timer = self.stats.shot_interval;
        self.shots_left -= 1;
        if self.shots_left == 0 {
            self.cooldown_timer = self.stats.cooldown_time;
            self.shot_timer = 0.0;
        }
        true
    }

    /// Projectiles for one volley, centered on the nose and spread sideways
    pub fn volley(&self, spacing: f32) -> Vec<Shot> {
        let n = self.stats.projectiles_per_shot.clamp(1, FIRE_SPREAD_CAP);
        let forward = self.forward();
        let right = self.right();
        let nose = self.body.pos + forward * self.radius;
        let vel = forward * self.stats.projectile_speed;

        (0..n)
            .map(|i| {
                let t = i as f32 - (n - 1) as f32 * 0.5;
                Shot {
                    pos: nose + right * (t * spacing),
                    vel,
                    pierce: self.stats.pierce,
                }
            })
            .collect()
    }

    /// Lose a life unless invulnerable. Starts the blink window on survival.
    pub fn take_damage(
        &mut self,
        scheduler: &mut Scheduler,
        tuning: &PlayerTuning,
        hooks: &mut Hooks,
    ) -> Damage {
        if !self.alive || self.invulnerable {
            return Damage::Ignored;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.alive = false;
            self.invulnerable = false;
            self.visible = true;
            hooks.play(SoundCue::PlayerDeath);
            hooks.effect(self.body.pos, EffectKind::PlayerDeath);
            log::info!("Player destroyed after {:.1}s", self.elapsed);
            return Damage::Died;
        }

        hooks.effect(self.body.pos, EffectKind::PlayerHurt);
        log::debug!("Player hit, {} lives left", self.lives);

        // Restart the window; actions from the previous one become stale
        let stale = self.invuln_generation;
        scheduler.cancel_where(|a| match *a {
            TimedAction::BlinkToggle { generation }
            | TimedAction::EndInvulnerability { generation } => generation == stale,
            TimedAction::SpawnHazard => false,
        });
        self.invuln_generation = self.invuln_generation.wrapping_add(1);
        let generation = self.invuln_generation;

        self.invulnerable = true;
        self.visible = !self.visible;
        scheduler.schedule(tuning.blink_interval, TimedAction::BlinkToggle { generation });
        scheduler.schedule(
            tuning.invulnerable_time,
            TimedAction::EndInvulnerability { generation },
        );
        Damage::Hurt
    }

    /// Due `BlinkToggle`
    pub fn on_blink(&mut self, generation: u32, scheduler: &mut Scheduler, tuning: &PlayerTuning) {
        if !self.alive || !self.invulnerable || generation != self.invuln_generation {
            return;
        }
        self.visible = !self.visible;
        scheduler.schedule(tuning.blink_interval, TimedAction::BlinkToggle { generation });
    }

    /// Due `EndInvulnerability`
    pub fn on_invulnerability_end(&mut self, generation: u32) {
        if !self.alive || generation != self.invuln_generation {
            return;
        }
        self.invulnerable = false;
        self.visible = true;
    }

    /// Raise both the cap and the current lives
    pub fn add_life_and_max(&mut self, amount: i32) {
        self.max_lives = (self.max_lives as i64 + amount as i64).max(1) as u32;
        self.lives = (self.lives as i64 + amount as i64).clamp(0, self.max_lives as i64) as u32;
    }

    pub fn apply_upgrade(&mut self, kind: UpgradeKind, value: f32) {
        match kind {
            UpgradeKind::LifeUp => self.add_life_and_max(value.round() as i32),
            _ => self.stats.apply_upgrade(kind, value),
        }
        log::info!("Upgrade applied: {kind:?} ({value})");
    }
}
