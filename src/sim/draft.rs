//! Currency-gated upgrade draft
//!
//! Collected currency accumulates until it crosses the next threshold. The
//! threshold is then spent, the cost curve steps up, simulation time stops,
//! and a few distinct upgrades are drawn by weight. Picking one applies it to
//! the player and resumes time.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::Player;
use crate::audio::SoundCue;
use crate::hooks::Hooks;
use crate::tuning::DraftTuning;

/// What an upgrade changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    ThrustUp,
    MaxSpeedUp,
    BulletSpeedUp,
    FireRateUp,
    MagSizeUp,
    CooldownDown,
    PierceUp,
    LifeUp,
    MultiShot,
}

/// One entry of the upgrade pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOption {
    pub kind: UpgradeKind,
    /// Multiplier or additive amount, depending on `kind`
    pub magnitude: f32,
    /// Relative draw weight, never negative
    pub weight: f32,
    pub label: String,
}

impl UpgradeOption {
    pub fn new(kind: UpgradeKind, magnitude: f32, weight: f32, label: impl Into<String>) -> Self {
        Self {
            kind,
            magnitude,
            weight: weight.max(0.0),
            label: label.into(),
        }
    }

    #[inline]
    fn draw_weight(&self) -> f32 {
        self.weight.max(0.0)
    }
}

/// Shipped upgrade pool: common stat bumps plus rare structural upgrades
pub fn default_pool() -> Vec<UpgradeOption> {
    use UpgradeKind::*;
    vec![
        UpgradeOption::new(ThrustUp, 0.20, 1.0, "Thrust +20%"),
        UpgradeOption::new(MaxSpeedUp, 0.20, 1.0, "Max Speed +20%"),
        UpgradeOption::new(BulletSpeedUp, 0.20, 1.0, "Bullet Speed +20%"),
        UpgradeOption::new(FireRateUp, 0.95, 1.0, "Firing Rate +5%"),
        UpgradeOption::new(CooldownDown, 0.90, 1.0, "Reload Speed +10%"),
        UpgradeOption::new(LifeUp, 1.0, 0.1, "Life +1"),
        UpgradeOption::new(PierceUp, 1.0, 0.1, "Pierce +1"),
        UpgradeOption::new(MagSizeUp, 1.0, 0.1, "Ammo Capacity +1"),
        UpgradeOption::new(MultiShot, 1.0, 0.1, "MultiShot +1"),
    ]
}

/// Draw `count` options, distinct while the pool lasts.
///
/// Each draw picks by weight from what is left (uniformly if every remaining
/// weight is zero). If the pool is smaller than `count`, the rest is padded by
/// uniform picks from the full pool, so repeats are possible only then.
pub fn draw_weighted<R: Rng + ?Sized>(
    pool: &[UpgradeOption],
    count: usize,
    rng: &mut R,
) -> Vec<UpgradeOption> {
    let mut remaining: Vec<&UpgradeOption> = pool.iter().collect();
    let mut picks = Vec::with_capacity(count);

    while picks.len() < count && !remaining.is_empty() {
        let total: f32 = remaining.iter().map(|o| o.draw_weight()).sum();

        let chosen = if total <= 0.0 {
            rng.random_range(0..remaining.len())
        } else {
            let r = rng.random::<f32>() * total;
            let mut acc = 0.0;
            let mut last_positive = None;
            let mut found = None;
            for (i, option) in remaining.iter().enumerate() {
                let w = option.draw_weight();
                if w <= 0.0 {
                    continue;
                }
                acc += w;
                last_positive = Some(i);
                if acc >= r {
                    found = Some(i);
                    break;
                }
            }
            // total > 0 guarantees a positive entry exists
            found.or(last_positive).unwrap_or(remaining.len() - 1)
        };

        picks.push(remaining.remove(chosen).clone());
    }

    while picks.len() < count && !pool.is_empty() {
        picks.push(pool[rng.random_range(0..pool.len())].clone());
    }

    picks
}

/// Draft misuse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("choice {index} is out of range (offer has {len} options)")]
    InvalidChoice { index: usize, len: usize },
    #[error("no upgrade draft is open")]
    NotOffering,
}

/// Currency balance, cost curve, and the open offer (if any)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    currency: u32,
    next_threshold: u32,
    next_increment: u32,
    increment_step: u32,
    /// Options on screen; empty while accumulating
    offer: Vec<UpgradeOption>,
    drafting: bool,
    /// Completed drafts
    pub drafts_taken: u32,
    warned_empty_pool: bool,
}

impl Progression {
    pub fn new(tuning: &DraftTuning) -> Self {
        Self {
            currency: 0,
            next_threshold: tuning.first_threshold.max(1),
            next_increment: tuning.increment_start.max(1),
            increment_step: tuning.increment_step.max(1),
            offer: Vec::new(),
            drafting: false,
            drafts_taken: 0,
            warned_empty_pool: false,
        }
    }

    pub fn currency(&self) -> u32 {
        self.currency
    }

    pub fn add_currency(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    pub fn next_threshold(&self) -> u32 {
        self.next_threshold
    }

    pub fn next_increment(&self) -> u32 {
        self.next_increment
    }

    pub fn is_drafting(&self) -> bool {
        self.drafting
    }

    /// 0 while an offer is open, 1 otherwise
    pub fn time_scale(&self) -> f32 {
        if self.drafting { 0.0 } else { 1.0 }
    }

    pub fn offer(&self) -> &[UpgradeOption] {
        &self.offer
    }

    /// Open a draft if the balance has reached the threshold. Returns true if
    /// an offer opened.
    pub fn try_open<R: Rng + ?Sized>(
        &mut self,
        player_alive: bool,
        tuning: &DraftTuning,
        rng: &mut R,
        hooks: &mut Hooks,
    ) -> bool {
        if self.drafting || !player_alive || self.currency < self.next_threshold {
            return false;
        }
        if tuning.pool.is_empty() {
            if !self.warned_empty_pool {
                log::warn!("Upgrade pool is empty; drafts are disabled");
                self.warned_empty_pool = true;
            }
            return false;
        }

        self.currency = self.currency.saturating_sub(self.next_threshold);
        self.next_threshold = self.next_threshold.saturating_add(self.next_increment);
        self.next_increment = self.next_increment.saturating_add(self.increment_step);

        self.offer = draw_weighted(&tuning.pool, tuning.choices.max(1), rng);
        self.drafting = true;
        hooks.play(SoundCue::DraftOpen);

        log::info!(
            "Draft opened: [{}] (next at {})",
            self.offer
                .iter()
                .map(|o| o.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            self.next_threshold
        );
        true
    }

    /// Take option `index` of the open offer and resume time
    pub fn choose(
        &mut self,
        index: usize,
        player: &mut Player,
        hooks: &mut Hooks,
    ) -> Result<UpgradeOption, DraftError> {
        if !self.drafting {
            return Err(DraftError::NotOffering);
        }
        let picked = self
            .offer
            .get(index)
            .cloned()
            .ok_or(DraftError::InvalidChoice {
                index,
                len: self.offer.len(),
            })?;

        if player.alive {
            player.apply_upgrade(picked.kind, picked.magnitude);
        }
        hooks.play(SoundCue::DraftChoose);

        self.offer.clear();
        self.drafting = false;
        self.drafts_taken += 1;
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::recording;
    use crate::tuning::PlayerTuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    #[test]
    fn test_threshold_curve() {
        let tuning = DraftTuning::default();
        let mut prog = Progression::new(&tuning);
        let mut player = Player::new(Vec2::ZERO, &PlayerTuning::default());
        let mut rng = rng(1);
        let mut hooks = Hooks::new();

        let mut seen = vec![(prog.next_threshold(), prog.next_increment())];
        for _ in 0..4 {
            prog.add_currency(prog.next_threshold());
            assert!(prog.try_open(true, &tuning, &mut rng, &mut hooks));
            assert_eq!(prog.currency(), 0);
            prog.choose(0, &mut player, &mut hooks).unwrap();
            seen.push((prog.next_threshold(), prog.next_increment()));
        }
        assert_eq!(seen, vec![(5, 10), (15, 15), (30, 20), (50, 25), (75, 30)]);
    }

    #[test]
    fn test_open_pauses_and_choose_resumes() {
        let tuning = DraftTuning::default();
        let mut prog = Progression::new(&tuning);
        let mut player = Player::new(Vec2::ZERO, &PlayerTuning::default());
        let (mut hooks, rec) = recording::hooks();

        prog.add_currency(4);
        assert!(!prog.try_open(true, &tuning, &mut rng(2), &mut hooks));
        prog.add_currency(3);
        assert!(prog.try_open(true, &tuning, &mut rng(2), &mut hooks));
        assert_eq!(prog.currency(), 2);
        assert_eq!(prog.time_scale(), 0.0);
        assert_eq!(prog.offer().len(), 3);

        assert_eq!(
            prog.choose(3, &mut player, &mut hooks),
            Err(DraftError::InvalidChoice { index: 3, len: 3 })
        );
        assert!(prog.is_drafting());

        let before = player.stats.clone();
        let picked = prog.choose(1, &mut player, &mut hooks).unwrap();
        assert_eq!(prog.time_scale(), 1.0);
        assert!(prog.offer().is_empty());
        if picked.kind != UpgradeKind::LifeUp {
            assert_ne!(player.stats, before);
        }
        assert_eq!(
            prog.choose(0, &mut player, &mut hooks),
            Err(DraftError::NotOffering)
        );

        let log = rec.0.borrow();
        assert_eq!(log.cue_count(SoundCue::DraftOpen), 1);
        assert_eq!(log.cue_count(SoundCue::DraftChoose), 1);
    }

    #[test]
    fn test_dead_player_blocks_draft() {
        let tuning = DraftTuning::default();
        let mut prog = Progression::new(&tuning);
        prog.add_currency(100);
        assert!(!prog.try_open(false, &tuning, &mut rng(3), &mut Hooks::new()));
        assert_eq!(prog.currency(), 100);
    }

    #[test]
    fn test_empty_pool_never_opens() {
        let tuning = DraftTuning {
            pool: Vec::new(),
            ..Default::default()
        };
        let mut prog = Progression::new(&tuning);
        prog.add_currency(100);
        assert!(!prog.try_open(true, &tuning, &mut rng(4), &mut Hooks::new()));
        assert!(!prog.try_open(true, &tuning, &mut rng(4), &mut Hooks::new()));
        assert_eq!(prog.time_scale(), 1.0);
        assert_eq!(prog.currency(), 100);
    }

    #[test]
    fn test_draw_is_distinct() {
        let pool = default_pool();
        let mut rng = rng(5);
        for _ in 0..500 {
            let picks = draw_weighted(&pool, 3, &mut rng);
            assert_eq!(picks.len(), 3);
            for i in 0..picks.len() {
                for j in i + 1..picks.len() {
                    assert_ne!(picks[i].kind, picks[j].kind);
                }
            }
        }
    }

    #[test]
    fn test_zero_weight_not_drawn_while_positive_remain() {
        let pool = vec![
            UpgradeOption::new(UpgradeKind::PierceUp, 1.0, 0.0, "zero a"),
            UpgradeOption::new(UpgradeKind::ThrustUp, 0.2, 1.0, "a"),
            UpgradeOption::new(UpgradeKind::LifeUp, 1.0, -3.0, "zero b"),
            UpgradeOption::new(UpgradeKind::MaxSpeedUp, 0.2, 0.5, "b"),
            UpgradeOption::new(UpgradeKind::MultiShot, 1.0, 0.2, "c"),
        ];
        assert_eq!(pool[2].weight, 0.0);

        let mut rng = rng(6);
        for _ in 0..500 {
            let picks = draw_weighted(&pool, 3, &mut rng);
            assert!(picks.iter().all(|o| o.weight > 0.0));
        }
        // Only once the positives run out do zero weights appear
        let picks = draw_weighted(&pool, 5, &mut rng);
        assert_eq!(picks.iter().filter(|o| o.weight > 0.0).count(), 3);
        assert!(picks[..3].iter().all(|o| o.weight > 0.0));
    }

    #[test]
    fn test_small_pool_is_padded() {
        let pool = vec![UpgradeOption::new(UpgradeKind::LifeUp, 1.0, 1.0, "Life +1")];
        let picks = draw_weighted(&pool, 3, &mut rng(7));
        assert_eq!(picks.len(), 3);
        assert!(picks.iter().all(|o| o.kind == UpgradeKind::LifeUp));
        assert!(draw_weighted(&[], 3, &mut rng(7)).is_empty());
    }
}
