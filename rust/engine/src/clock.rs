//! Decision clock: the per-phase timer whose expiry lets the engine apply a default
//! action when a participant does not act.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock time source consumed by the engine.
pub trait TimeSource {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// What the clock is waiting for.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    Choice,
    Bets,
    Insurance,
    PlayerAction,
    WildChoice,
    DealerAction,
    DealerWildChoice,
    /// Informational pause after settlement
    RoundResult,
}

/// How long each kind of decision may take before its default applies.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClockPolicy {
    /// Any phase waiting on a human decision
    pub decision_secs: u32,
    /// The round result display pause
    pub result_pause_secs: u32,
}

impl Default for ClockPolicy {
    fn default() -> Self {
        Self {
            decision_secs: 30,
            result_pause_secs: 5,
        }
    }
}

impl ClockPolicy {
    pub fn duration(&self, kind: DecisionKind) -> Duration {
        let secs = match kind {
            DecisionKind::RoundResult => self.result_pause_secs,
            _ => self.decision_secs,
        };
        Duration::seconds(i64::from(secs))
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DecisionClock {
    started_at: Option<DateTime<Utc>>,
    kind: Option<DecisionKind>,
    is_waiting: bool,
}

impl DecisionClock {
    pub fn start(&mut self, kind: DecisionKind, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.kind = Some(kind);
        self.is_waiting = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_waiting(&self) -> bool {
        self.is_waiting
    }

    pub fn kind(&self) -> Option<DecisionKind> {
        self.kind.filter(|_| self.is_waiting)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at.filter(|_| self.is_waiting)
    }

    /// When the pending decision falls back to its default.
    pub fn deadline(&self, policy: &ClockPolicy) -> Option<DateTime<Utc>> {
        Some(self.started_at()? + policy.duration(self.kind()?))
    }

    pub fn has_expired(&self, now: DateTime<Utc>, policy: &ClockPolicy) -> bool {
        match (self.started_at(), self.kind()) {
            (Some(started), Some(kind)) => now - started > policy.duration(kind),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_strictly_after_duration() {
        let t0 = Utc::now();
        let policy = ClockPolicy::default();
        let mut clock = DecisionClock::default();
        clock.start(DecisionKind::PlayerAction, t0);
        assert!(!clock.has_expired(t0 + Duration::seconds(30), &policy));
        assert!(clock.has_expired(t0 + Duration::seconds(31), &policy));
    }

    #[test]
    fn result_pause_is_short() {
        let t0 = Utc::now();
        let policy = ClockPolicy::default();
        let mut clock = DecisionClock::default();
        clock.start(DecisionKind::RoundResult, t0);
        assert!(clock.has_expired(t0 + Duration::seconds(6), &policy));
        assert_eq!(clock.deadline(&policy), Some(t0 + Duration::seconds(5)));
    }

    #[test]
    fn cleared_clock_never_expires() {
        let t0 = Utc::now();
        let mut clock = DecisionClock::default();
        clock.start(DecisionKind::Bets, t0);
        clock.clear();
        assert!(!clock.is_waiting());
        assert!(!clock.has_expired(t0 + Duration::days(1), &ClockPolicy::default()));
    }
}
