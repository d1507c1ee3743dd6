//! Collaborator hooks
//!
//! The simulation never owns audio playback or effect instantiation. Hosts
//! hand a `Hooks` bundle to every `tick`; a missing sink simply skips the
//! feature.

use glam::Vec2;

use crate::audio::{AudioSink, SoundCue};

/// Visual effects the simulation asks the host to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Projectile struck a hazard (at the hazard surface)
    ProjectileImpact,
    /// Hazard destroyed by a projectile
    HazardDestroyed,
    /// Hazard bounced off something
    Bounce,
    /// Player lost a life
    PlayerHurt,
    /// Player lost the last life
    PlayerDeath,
    /// Currency pickup reached the player
    PickupCollected,
}

/// Fire-and-forget effect spawner. Effects expire on their own.
pub trait EffectSink {
    fn spawn(&mut self, pos: Vec2, effect: EffectKind);
}

/// Optional collaborator bundle passed to the simulation
#[derive(Default)]
pub struct Hooks {
    audio: Option<Box<dyn AudioSink>>,
    effects: Option<Box<dyn EffectSink>>,
}

impl Hooks {
    /// No collaborators: every cue and effect is dropped
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(sink));
        self
    }

    pub fn with_effects(mut self, sink: impl EffectSink + 'static) -> Self {
        self.effects = Some(Box::new(sink));
        self
    }

    /// Forward a sound cue (skipped if no audio sink)
    pub fn play(&mut self, cue: SoundCue) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play(cue);
        }
    }

    /// Forward an effect request (skipped if no effect sink)
    pub fn effect(&mut self, pos: Vec2, effect: EffectKind) {
        if let Some(effects) = self.effects.as_mut() {
            effects.spawn(pos, effect);
        }
    }

    /// Advance wall-clock time for sinks that rate-limit themselves
    pub fn advance(&mut self, real_dt: f32) {
        if let Some(audio) = self.audio.as_mut() {
            audio.advance(real_dt);
        }
    }
}
