//! Scheduled-event queue driven by the simulation clock
//!
//! Replaces delayed callbacks: a timer is plain data naming what should
//! happen and which entity it belongs to. Destroying an entity cancels its
//! timers, and handlers still re-check liveness before mutating anything.

use super::state::EntityId;

/// Handle for cancelling a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Every enemy takes one decision
    EnemyAi,
    /// One second of ultimate time elapsed
    UltimateCountdown,
    /// Player grace window over
    InvulnerabilityEnd,
    /// Enemy lateral dash over
    LateralStop,
    /// Toggle player alpha; `remaining` toggles left after this one
    Blink { remaining: u8 },
    /// Death fade finished
    PlayerFadeComplete,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    due_ms: u64,
    period_ms: Option<u64>,
    owner: Option<EntityId>,
    kind: TimerKind,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub due_ms: u64,
    pub owner: Option<EntityId>,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Fire once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, owner: Option<EntityId>, kind: TimerKind) -> TimerId {
        self.push(delay_ms, None, owner, kind)
    }

    /// Fire every `period_ms`, first time one period from now
    pub fn every(&mut self, period_ms: u64, owner: Option<EntityId>, kind: TimerKind) -> TimerId {
        let period_ms = period_ms.max(1);
        self.push(period_ms, Some(period_ms), owner, kind)
    }

    fn push(
        &mut self,
        delay_ms: u64,
        period_ms: Option<u64>,
        owner: Option<EntityId>,
        kind: TimerKind,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            owner,
            kind,
        });
        id
    }

    /// Returns false if the timer already fired (one-shot) or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Drop every timer belonging to an entity; returns how many were dropped
    pub fn cancel_owned_by(&mut self, owner: EntityId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != Some(owner));
        before - self.timers.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its due time. Repeating timers are re-armed one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;

        let timer = &self.timers[idx];
        let fired = Fired {
            id: timer.id,
            due_ms: timer.due_ms,
            owner: timer.owner,
            kind: timer.kind,
        };
        let period = timer.period_ms;
        self.now_ms = self.now_ms.max(fired.due_ms);

        match period {
            Some(period) => self.timers[idx].due_ms += period,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(fired)
    }

    /// Move the clock forward once all due timers have been handled
    pub fn settle(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, until: u64) -> Vec<Fired> {
        let mut out = Vec::new();
        while let Some(f) = s.pop_due(until) {
            out.push(f);
        }
        s.settle(until);
        out
    }

    #[test]
    fn test_one_shot_fires_once_at_due_time() {
        let mut s = Scheduler::new();
        s.after(500, None, TimerKind::InvulnerabilityEnd);

        assert!(drain(&mut s, 499).is_empty());
        let fired = drain(&mut s, 600);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].due_ms, 500);
        assert!(drain(&mut s, 5000).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn test_repeating_fires_each_period_in_order() {
        let mut s = Scheduler::new();
        s.every(1000, None, TimerKind::EnemyAi);
        s.after(1500, None, TimerKind::InvulnerabilityEnd);

        let fired = drain(&mut s, 3000);
        let kinds: Vec<_> = fired.iter().map(|f| (f.due_ms, f.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (1000, TimerKind::EnemyAi),
                (1500, TimerKind::InvulnerabilityEnd),
                (2000, TimerKind::EnemyAi),
                (3000, TimerKind::EnemyAi),
            ]
        );
        assert_eq!(s.now_ms(), 3000);
    }

    #[test]
    fn test_cancel_owned_by_drops_only_that_entity() {
        let mut s = Scheduler::new();
        s.after(100, Some(EntityId(1)), TimerKind::LateralStop);
        s.after(100, Some(EntityId(2)), TimerKind::LateralStop);
        s.every(1000, None, TimerKind::EnemyAi);

        assert_eq!(s.cancel_owned_by(EntityId(1)), 1);
        let fired = drain(&mut s, 200);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].owner, Some(EntityId(2)));
    }

    #[test]
    fn test_cancel_by_id() {
        let mut s = Scheduler::new();
        let id = s.every(1000, None, TimerKind::UltimateCountdown);
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(drain(&mut s, 10_000).is_empty());
    }

    #[test]
    fn test_clock_is_at_due_time_while_handling() {
        let mut s = Scheduler::new();
        s.after(100, None, TimerKind::Blink { remaining: 1 });
        let fired = s.pop_due(250).expect("due");
        assert_eq!(s.now_ms(), 100);
        // A follow-up scheduled from the handler lands relative to the due time
        s.after(100, None, TimerKind::Blink { remaining: 0 });
        let next = s.pop_due(250).expect("follow-up due");
        assert_eq!(next.due_ms, 200);
        assert_eq!(fired.kind, TimerKind::Blink { remaining: 1 });
    }
}
