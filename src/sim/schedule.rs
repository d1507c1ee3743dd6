//! Timed action queue
//!
//! Replaces coroutine-style waits: callers schedule an action at a delay on
//! the simulation clock, the tick drains whatever is due, and each handler
//! checks its own cancellation condition (usually "is the player still alive")
//! before acting.

use serde::{Deserialize, Serialize};

/// Something that should happen later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedAction {
    /// Spawner wants its next hazard
    SpawnHazard,
    /// Flip player visibility during an invulnerability window
    BlinkToggle { generation: u32 },
    /// Invulnerability window is over
    EndInvulnerability { generation: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    due: f32,
    seq: u64,
    action: TimedAction,
}

/// Simulation clock plus pending actions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now: f32,
    seq: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds of (scaled) simulation time elapsed
    #[inline]
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Advance the clock. Negative steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.now += dt;
        }
    }

    /// Run `action` once `delay` seconds have passed
    pub fn schedule(&mut self, delay: f32, action: TimedAction) {
        let due = self.now + delay.max(0.0);
        self.pending.push(Pending {
            due,
            seq: self.seq,
            action,
        });
        self.seq += 1;
    }

    /// Remove and return every due action, earliest first (ties keep scheduling order)
    pub fn drain_due(&mut self) -> Vec<TimedAction> {
        let now = self.now;
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.action).collect()
    }

    /// Drop pending actions matching `pred`
    pub fn cancel_where(&mut self, pred: impl Fn(&TimedAction) -> bool) {
        self.pending.retain(|p| !pred(&p.action));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether an action of this exact value is waiting
    pub fn is_pending(&self, action: TimedAction) -> bool {
        self.pending.iter().any(|p| p.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_fire_when_due() {
        let mut s = Scheduler::new();
        s.schedule(0.5, TimedAction::SpawnHazard);
        s.advance(0.4);
        assert!(s.drain_due().is_empty());
        s.advance(0.1);
        assert_eq!(s.drain_due(), vec![TimedAction::SpawnHazard]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_drain_orders_by_due_then_insertion() {
        let mut s = Scheduler::new();
        s.schedule(0.3, TimedAction::EndInvulnerability { generation: 1 });
        s.schedule(0.1, TimedAction::BlinkToggle { generation: 1 });
        s.schedule(0.1, TimedAction::SpawnHazard);
        s.advance(1.0);
        assert_eq!(
            s.drain_due(),
            vec![
                TimedAction::BlinkToggle { generation: 1 },
                TimedAction::SpawnHazard,
                TimedAction::EndInvulnerability { generation: 1 },
            ]
        );
    }

    #[test]
    fn test_cancel_where() {
        let mut s = Scheduler::new();
        s.schedule(0.1, TimedAction::BlinkToggle { generation: 2 });
        s.schedule(0.1, TimedAction::SpawnHazard);
        s.cancel_where(|a| matches!(a, TimedAction::BlinkToggle { .. }));
        assert_eq!(s.len(), 1);
        assert!(s.is_pending(TimedAction::SpawnHazard));
    }

    #[test]
    fn test_zero_step_does_not_advance() {
        let mut s = Scheduler::new();
        s.schedule(0.0, TimedAction::SpawnHazard);
        s.advance(0.0);
        // Zero-delay actions are due immediately
        assert_eq!(s.drain_due().len(), 1);
        s.advance(-1.0);
        assert_eq!(s.now(), 0.0);
    }
}
