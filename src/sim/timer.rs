//! Engine-owned periodic timers on a virtual clock
//!
//! Each engine owns exactly one `Timers` set. Cancelling bumps nothing
//! global: handles are plain ids that are never reused, so a handle from
//! before a restart can't match a timer scheduled after it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Which periodic callback fired. Most games only use `Step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Main simulation step
    Step,
    /// Target relocation (whack-a-mole)
    Relocate,
    /// Round countdown (whack-a-mole)
    Countdown,
}

/// A periodic callback a game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSpec {
    pub kind: TimerKind,
    pub period: Duration,
}

impl TimerSpec {
    pub fn new(kind: TimerKind, period: Duration) -> Self {
        Self { kind, period }
    }
}

/// Opaque handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    period: Duration,
    next_due: Duration,
}

/// Periodic timers driven by an externally advanced clock
#[derive(Debug, Clone, Default)]
pub struct Timers {
    now: Duration,
    next_id: u64,
    active: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a periodic timer whose first firing is one period from now
    pub fn schedule(&mut self, spec: TimerSpec) -> TimerId {
        debug_assert!(!spec.period.is_zero(), "zero-period timer would never yield");
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.active.push(Timer {
            id,
            kind: spec.kind,
            period: spec.period,
            next_due: self.now.saturating_add(spec.period),
        });
        id
    }

    pub fn cancel_all(&mut self) {
        self.active.clear();
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of active timers of one kind
    pub fn count_kind(&self, kind: TimerKind) -> usize {
        self.active.iter().filter(|t| t.kind == kind).count()
    }

    /// Take the earliest timer due at or before `until`, move the clock to its
    /// due time and reschedule it one period later. Ties go to the timer that
    /// was scheduled first.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerKind> {
        let timer = self
            .active
            .iter_mut()
            .filter(|t| t.next_due <= until)
            .min_by_key(|t| (t.next_due, t.id))?;

        self.now = self.now.max(timer.next_due);
        timer.next_due = timer.next_due.saturating_add(timer.period);
        Some(timer.kind)
    }

    /// Drop every firing due at or before `until` without running it.
    /// Returns how many firings were skipped, saturating at `u64::MAX`.
    /// Each timer keeps its phase: the next firing is the first one after
    /// `until` on its original schedule.
    pub fn skip_backlog(&mut self, until: Duration) -> u64 {
        let mut skipped: u64 = 0;
        for timer in &mut self.active {
            if timer.next_due <= until {
                let behind = (until - timer.next_due).as_nanos();
                let period = timer.period.as_nanos().max(1);
                let missed = behind / period + 1;
                skipped = skipped.saturating_add(u64::try_from(missed).unwrap_or(u64::MAX));

                // rem < period, so both parts fit
                let rem = behind % period;
                let rem = Duration::new((rem / NANOS_PER_SEC) as u64, (rem % NANOS_PER_SEC) as u32);
                timer.next_due = (until - rem).saturating_add(timer.period);
            }
        }
        skipped
    }

    /// Move the clock forward to `until` once every due timer has fired
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(timers: &mut Timers, until: Duration) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        while let Some(kind) = timers.pop_due(until) {
            fired.push(kind);
        }
        timers.settle(until);
        fired
    }

    #[test]
    fn test_periodic_firing() {
        let mut timers = Timers::new();
        timers.schedule(TimerSpec::new(TimerKind::Step, ms(20)));

        assert!(drain(&mut timers, ms(19)).is_empty());
        assert_eq!(drain(&mut timers, ms(20)).len(), 1);
        assert_eq!(drain(&mut timers, ms(1000)).len(), 49);
        assert_eq!(timers.now(), ms(1000));
    }

    #[test]
    fn test_interleaved_order() {
        let mut timers = Timers::new();
        timers.schedule(TimerSpec::new(TimerKind::Relocate, ms(800)));
        timers.schedule(TimerSpec::new(TimerKind::Countdown, ms(1000)));

        let fired = drain(&mut timers, ms(4000));
        use TimerKind::*;
        // 800 1000 1600 2000 2400 3000 3200 4000(relocate first, scheduled first) 4000
        assert_eq!(
            fired,
            vec![
                Relocate, Countdown, Relocate, Countdown, Relocate, Countdown, Relocate,
                Relocate, Countdown
            ]
        );
    }

    #[test]
    fn test_cancel_leaves_nothing_behind() {
        let mut timers = Timers::new();
        let old = timers.schedule(TimerSpec::new(TimerKind::Relocate, ms(20)));
        timers.cancel_all();
        let new = timers.schedule(TimerSpec::new(TimerKind::Step, ms(20)));

        assert_ne!(old, new);
        assert_eq!(timers.active_count(), 1);
        assert_eq!(timers.count_kind(TimerKind::Relocate), 0);
        assert_eq!(drain(&mut timers, ms(100)), vec![TimerKind::Step; 5]);
        timers.cancel_all();
        assert!(drain(&mut timers, ms(1000)).is_empty());
    }

    #[test]
    fn test_skip_backlog() {
        let mut timers = Timers::new();
        timers.schedule(TimerSpec::new(TimerKind::Step, ms(20)));
        assert_eq!(timers.skip_backlog(ms(100)), 5);
        timers.settle(ms(100));
        assert_eq!(drain(&mut timers, ms(120)).len(), 1);
    }

    #[test]
    fn test_skip_backlog_keeps_phase() {
        let mut timers = Timers::new();
        timers.schedule(TimerSpec::new(TimerKind::Step, ms(30)));
        // Due at 30, 60, 90; the next one after 100 is 120
        assert_eq!(timers.skip_backlog(ms(100)), 3);
        timers.settle(ms(100));
        assert!(drain(&mut timers, ms(119)).is_empty());
        assert_eq!(drain(&mut timers, ms(120)).len(), 1);
    }

    #[test]
    fn test_skip_huge_backlog_saturates() {
        let mut timers = Timers::new();
        timers.schedule(TimerSpec::new(TimerKind::Step, ms(20)));
        let until = Duration::from_secs(u64::MAX / 2);
        assert_eq!(timers.skip_backlog(until), u64::MAX);
        assert_eq!(timers.pop_due(until), None);
        timers.settle(until);
        assert_eq!(drain(&mut timers, until + ms(20)).len(), 1);
    }
}
