//! Sound cue interface
//!
//! The simulation only names cues; the host decides how (and whether) to play
//! them. `Throttled` wraps any sink with per-cue and global minimum intervals so
//! a burst of contacts in one frame doesn't stack the same sample.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player fired a projectile
    Shoot,
    /// Two hazards bumped into each other
    HazardHitHazard,
    /// Hazard rammed the player
    HazardHitPlayer,
    /// Hazard destroyed by a projectile
    HazardHitByProjectile,
    /// Player lost the last life
    PlayerDeath,
    /// Upgrade draft opened
    DraftOpen,
    /// Upgrade picked
    DraftChoose,
}

impl SoundCue {
    pub const ALL: [SoundCue; 7] = [
        SoundCue::Shoot,
        SoundCue::HazardHitHazard,
        SoundCue::HazardHitPlayer,
        SoundCue::HazardHitByProjectile,
        SoundCue::PlayerDeath,
        SoundCue::DraftOpen,
        SoundCue::DraftChoose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::HazardHitHazard => "hazard_hit_hazard",
            SoundCue::HazardHitPlayer => "hazard_hit_player",
            SoundCue::HazardHitByProjectile => "hazard_hit_by_projectile",
            SoundCue::PlayerDeath => "player_death",
            SoundCue::DraftOpen => "draft_open",
            SoundCue::DraftChoose => "draft_choose",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Fire-and-forget sound sink. May be called many times per frame.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    /// Wall-clock time passed since the last call (unaffected by the draft pause)
    fn advance(&mut self, _real_dt: f32) {}
}

/// Sink that drops every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Sink that writes cues to the log (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        log::debug!("sfx: {}", cue.as_str());
    }
}

/// Rate limiter in front of another sink
#[derive(Debug, Clone)]
pub struct Throttled<S> {
    inner: S,
    clock: f32,
    min_interval_per_cue: f32,
    min_interval_global: f32,
    last_global: f32,
    last_by_cue: [f32; SoundCue::ALL.len()],
}

impl<S: AudioSink> Throttled<S> {
    pub fn new(inner: S, min_interval_per_cue: f32, min_interval_global: f32) -> Self {
        Self {
            inner,
            clock: 0.0,
            min_interval_per_cue: min_interval_per_cue.max(0.0),
            min_interval_global: min_interval_global.max(0.0),
            last_global: f32::NEG_INFINITY,
            last_by_cue: [f32::NEG_INFINITY; SoundCue::ALL.len()],
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: AudioSink> AudioSink for Throttled<S> {
    fn play(&mut self, cue: SoundCue) {
        let now = self.clock;
        if now - self.last_global < self.min_interval_global {
            return;
        }
        let last = &mut self.last_by_cue[cue.index()];
        if now - *last < self.min_interval_per_cue {
            return;
        }
        *last = now;
        self.last_global = now;
        self.inner.play(cue);
    }

    fn advance(&mut self, real_dt: f32) {
        self.clock += real_dt.max(0.0);
        self.inner.advance(real_dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Count(Vec<SoundCue>);

    impl AudioSink for Count {
        fn play(&mut self, cue: SoundCue) {
            self.0.push(cue);
        }
    }

    #[test]
    fn test_throttle_per_cue() {
        let mut sink = Throttled::new(Count::default(), 0.05, 0.0);
        sink.play(SoundCue::Shoot);
        sink.play(SoundCue::Shoot);
        sink.advance(0.06);
        sink.play(SoundCue::Shoot);
        assert_eq!(sink.inner().0.len(), 2);
    }

    #[test]
    fn test_throttle_global() {
        let mut sink = Throttled::new(Count::default(), 0.0, 0.01);
        sink.play(SoundCue::Shoot);
        sink.play(SoundCue::DraftOpen);
        assert_eq!(sink.inner().0, vec![SoundCue::Shoot]);
        sink.advance(0.02);
        sink.play(SoundCue::DraftOpen);
        assert_eq!(sink.inner().0.len(), 2);
    }

    #[test]
    fn test_cue_names_unique() {
        let mut names: Vec<_> = SoundCue::ALL.iter().map(|c| c.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SoundCue::ALL.len());
    }
}
