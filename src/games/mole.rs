//! Whack-a-mole reaction game
//!
//! Two independent timers: one relocates the mole, the other counts the round
//! down. Strikes resolve immediately against whatever cell holds the mole.

use rand::Rng;
use serde::Serialize;

use crate::SimRng;
use crate::sim::{TickGame, TickOutcome, TimerKind, TimerSpec};
use crate::tuning::{MoleTuning, cadence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoleView {
    /// Cell index holding the mole, row-major
    pub target: Option<usize>,
    pub time_left: u32,
    pub grid_size: usize,
}

#[derive(Debug, Clone)]
pub struct WhackAMole {
    tuning: MoleTuning,
    target: Option<usize>,
    time_left: u32,
    score: u64,
}

impl WhackAMole {
    pub fn new(tuning: MoleTuning) -> Self {
        Self {
            target: None,
            time_left: tuning.round_seconds,
            score: 0,
            tuning,
        }
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[cfg(test)]
    pub(crate) fn set_target(&mut self, target: Option<usize>) {
        self.target = target;
    }
}

impl TickGame for WhackAMole {
    /// Struck cell index
    type Intent = usize;
    type View = MoleView;
    const NAME: &'static str = "Whack-a-Mole";

    fn timers(&self) -> Vec<TimerSpec> {
        vec![
            TimerSpec::new(TimerKind::Relocate, cadence(self.tuning.relocate_ms)),
            TimerSpec::new(TimerKind::Countdown, cadence(self.tuning.countdown_ms)),
        ]
    }

    fn reset(&mut self, _rng: &mut SimRng) {
        self.target = None;
        self.time_left = self.tuning.round_seconds;
        self.score = 0;
    }

    /// Out-of-range cells are rejected; a miss is accepted but scores nothing
    fn handle_input(&mut self, cell: usize) -> bool {
        if cell >= self.tuning.cell_count() {
            log::warn!("Whack at cell {cell} outside a {}-cell board", self.tuning.cell_count());
            return false;
        }
        if self.target == Some(cell) {
            self.score += 1;
            self.target = None;
        }
        true
    }

    fn tick(&mut self, timer: TimerKind, rng: &mut SimRng) -> TickOutcome {
        match timer {
            TimerKind::Relocate => {
                self.target = Some(rng.random_range(0..self.tuning.cell_count()));
                TickOutcome::Continue
            }
            TimerKind::Countdown => {
                if self.time_left <= 1 {
                    self.time_left = 0;
                    TickOutcome::GameOver
                } else {
                    self.time_left -= 1;
                    TickOutcome::Continue
                }
            }
            TimerKind::Step => TickOutcome::Continue,
        }
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn view(&self) -> MoleView {
        MoleView {
            target: self.target,
            time_left: self.time_left,
            grid_size: self.tuning.grid_size,
        }
    }
}
