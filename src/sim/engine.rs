//! Tick engine lifecycle
//!
//! `Engine<G>` drives any [`TickGame`] policy through Idle -> Running ->
//! GameOver, with restart from any phase. The engine owns the only copy of
//! the game state and the only timer set, so every tick reads current state
//! and at most one periodic callback per timer kind exists at a time.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::timer::{TimerKind, TimerSpec, Timers};
use crate::SimRng;
use crate::consts::{MAX_CATCHUP_TICKS, MAX_PENDING_EVENTS};

/// Lifecycle phase of a tick engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Built but not started, or stopped
    Idle,
    Running,
    /// Terminal; frozen until restart
    GameOver,
}

/// What a tick decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// A termination rule matched; the engine freezes after this tick
    GameOver,
}

/// Notable transitions, queued for the presentation layer (sound cues etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    Started,
    Scored { points: u64, total: u64 },
    GameOver { score: u64 },
}

/// Per-game policy: entity model, collision rules, scoring
pub trait TickGame {
    /// Normalized player command
    type Intent: Copy + fmt::Debug;
    /// Read-only state exposed in snapshots
    type View: Clone + fmt::Debug + Serialize;

    /// Display name
    const NAME: &'static str;

    /// Periodic callbacks this game needs while running
    fn timers(&self) -> Vec<TimerSpec>;

    /// Return to the canonical initial state (score 0, no obstacles)
    fn reset(&mut self, rng: &mut SimRng);

    /// Latch or apply an intent. Returns false when it was rejected.
    fn handle_input(&mut self, intent: Self::Intent) -> bool;

    /// Advance one period of `timer`
    fn tick(&mut self, timer: TimerKind, rng: &mut SimRng) -> TickOutcome;

    fn score(&self) -> u64;

    fn view(&self) -> Self::View;
}

/// Read-only snapshot, queryable after every tick
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<V> {
    pub game: &'static str,
    pub phase: Phase,
    pub game_over: bool,
    pub score: u64,
    pub ticks: u64,
    pub elapsed_ms: u64,
    pub state: V,
}

/// Owns one game instance, its RNG and its timers
#[derive(Debug)]
pub struct Engine<G: TickGame> {
    game: G,
    phase: Phase,
    rng: SimRng,
    timers: Timers,
    ticks: u64,
    /// Virtual time of the last start
    started_at: Duration,
    ended_at: Option<Duration>,
    events: VecDeque<SimEvent>,
}

impl<G: TickGame> Engine<G> {
    /// Build an idle engine holding the canonical initial state
    pub fn new(mut game: G, seed: u64) -> Self {
        let mut rng = SimRng::seed_from_u64(seed);
        game.reset(&mut rng);
        Self {
            game,
            phase: Phase::Idle,
            rng,
            timers: Timers::new(),
            ticks: 0,
            started_at: Duration::ZERO,
            ended_at: None,
            events: VecDeque::new(),
        }
    }

    /// Reinitialize state and schedule the game's timers. Any timer from a
    /// previous run is cancelled before the new ones exist.
    pub fn start(&mut self) {
        self.timers.cancel_all();
        self.game.reset(&mut self.rng);
        self.ticks = 0;
        self.started_at = self.timers.now();
        self.ended_at = None;
        for spec in self.game.timers() {
            self.timers.schedule(spec);
        }
        self.phase = Phase::Running;
        self.push_event(SimEvent::Started);
        log::info!("{} started ({} timer(s))", G::NAME, self.timers.active_count());
    }

    /// Stop and start again. Safe from any phase.
    pub fn restart(&mut self) {
        log::info!("{} restarting from {:?}", G::NAME, self.phase);
        self.timers.cancel_all();
        self.start();
    }

    /// Cancel every timer without touching game state (container teardown)
    pub fn stop(&mut self) {
        self.timers.cancel_all();
        if self.phase == Phase::Running {
            self.phase = Phase::Idle;
        }
        log::debug!("{} stopped", G::NAME);
    }

    /// Forward an intent while running. Ignored otherwise.
    pub fn handle_input(&mut self, intent: G::Intent) -> bool {
        if self.phase != Phase::Running {
            log::debug!("{} ignoring {:?} while {:?}", G::NAME, intent, self.phase);
            return false;
        }
        let before = self.game.score();
        let accepted = self.game.handle_input(intent);
        self.note_score(before);
        accepted
    }

    /// Run one period of `timer`. A no-op unless running.
    pub fn tick(&mut self, timer: TimerKind) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::GameOver;
        }

        let before = self.game.score();
        let outcome = self.game.tick(timer, &mut self.rng);
        self.ticks += 1;
        self.note_score(before);

        if outcome == TickOutcome::GameOver {
            self.phase = Phase::GameOver;
            self.timers.cancel_all();
            self.ended_at = Some(self.timers.now());
            let score = self.game.score();
            self.push_event(SimEvent::GameOver { score });
            log::info!("{} game over, score {} after {} ticks", G::NAME, score, self.ticks);
        }
        outcome
    }

    /// Advance the virtual clock, firing due timers in order.
    /// Returns how many ticks ran.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let until = self.timers.now().saturating_add(elapsed);
        let mut fired = 0;
        while let Some(kind) = self.timers.pop_due(until) {
            self.tick(kind);
            fired += 1;
            if fired >= MAX_CATCHUP_TICKS {
                let skipped = self.timers.skip_backlog(until);
                if skipped > 0 {
                    log::warn!("{} fell behind, skipped {} tick(s)", G::NAME, skipped);
                }
                break;
            }
        }
        self.timers.settle(until);
        fired
    }

    fn note_score(&mut self, before: u64) {
        let total = self.game.score();
        if total > before {
            self.push_event(SimEvent::Scored {
                points: total - before,
                total,
            });
        }
    }

    fn push_event(&mut self, event: SimEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> Snapshot<G::View> {
        Snapshot {
            game: G::NAME,
            phase: self.phase,
            game_over: self.phase == Phase::GameOver,
            score: self.game.score(),
            ticks: self.ticks,
            elapsed_ms: self.elapsed().as_millis() as u64,
            state: self.game.view(),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.game.score()
    }

    /// Ticks run since the last start
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Virtual time since the engine was built
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    /// Virtual time since the last start, frozen at game over
    pub fn run_time(&self) -> Duration {
        self.ended_at
            .unwrap_or(self.timers.now())
            .saturating_sub(self.started_at)
    }

    /// Live periodic callbacks; never more than the game asked for
    pub fn active_timers(&self) -> usize {
        self.timers.active_count()
    }

    pub fn active_timers_of(&self, kind: TimerKind) -> usize {
        self.timers.count_kind(kind)
    }

    /// Read access to the policy (rendering hosts use `snapshot` instead)
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Mutable policy access for scenario setup in tests
    #[cfg(test)]
    pub(crate) fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }
}
