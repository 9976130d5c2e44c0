//! Grid-stepped snake
//!
//! The head advances one cell per step. Eating food grows the body by one;
//! otherwise the tail is dropped so the length stays constant.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::Serialize;

use crate::SimRng;
use crate::platform::input::Direction;
use crate::sim::{TickGame, TickOutcome, TimerKind, TimerSpec};
use crate::tuning::{SnakeTuning, cadence};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeView {
    /// Head first
    pub body: Vec<IVec2>,
    pub food: Option<IVec2>,
    pub heading: Direction,
    pub columns: i32,
    pub rows: i32,
}

#[derive(Debug, Clone)]
pub struct Snake {
    tuning: SnakeTuning,
    body: VecDeque<IVec2>,
    food: Option<IVec2>,
    heading: Direction,
    pending: Option<Direction>,
    score: u64,
}

impl Snake {
    pub fn new(tuning: SnakeTuning) -> Self {
        let start = IVec2::from(tuning.start);
        Self {
            body: VecDeque::from([start]),
            food: Some(IVec2::from(tuning.first_food)),
            heading: Direction::Right,
            pending: None,
            score: 0,
            tuning,
        }
    }

    fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.tuning.columns && cell.y < self.tuning.rows
    }

    /// Uniform pick among cells the body does not cover
    fn random_free_cell(&self, rng: &mut SimRng) -> Option<IVec2> {
        let free: Vec<IVec2> = (0..self.tuning.rows)
            .flat_map(|y| (0..self.tuning.columns).map(move |x| IVec2::new(x, y)))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        if free.is_empty() {
            None
        } else {
            Some(free[rng.random_range(0..free.len())])
        }
    }

    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn food(&self) -> Option<IVec2> {
        self.food
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, body: &[IVec2], heading: Direction, food: Option<IVec2>) {
        self.body = body.iter().copied().collect();
        self.heading = heading;
        self.food = food;
        self.pending = None;
    }
}

impl TickGame for Snake {
    type Intent = Direction;
    type View = SnakeView;
    const NAME: &'static str = "Snake";

    fn timers(&self) -> Vec<TimerSpec> {
        vec![TimerSpec::new(TimerKind::Step, cadence(self.tuning.cadence_ms))]
    }

    fn reset(&mut self, rng: &mut SimRng) {
        let start = IVec2::from(self.tuning.start);
        self.body = VecDeque::from([start]);
        self.heading = Direction::Right;
        self.pending = None;
        self.score = 0;
        // Canonical food cell, unless a custom tuning put it under the head
        let first = IVec2::from(self.tuning.first_food);
        self.food = if first != start {
            Some(first)
        } else {
            self.random_free_cell(rng)
        };
    }

    /// Only turns onto the perpendicular axis are accepted, judged against
    /// the current heading so two quick turns can't reverse the snake.
    fn handle_input(&mut self, intent: Direction) -> bool {
        if intent.is_orthogonal_to(self.heading) {
            self.pending = Some(intent);
            true
        } else {
            log::debug!("Snake rejected turn {intent:?} while heading {:?}", self.heading);
            false
        }
    }

    fn tick(&mut self, _timer: TimerKind, rng: &mut SimRng) -> TickOutcome {
        if let Some(turn) = self.pending.take() {
            self.heading = turn;
        }

        let next = self.head() + self.heading.delta();
        if !self.in_bounds(next) || self.body.contains(&next) {
            return TickOutcome::GameOver;
        }

        self.body.push_front(next);
        if self.food == Some(next) {
            self.score += self.tuning.food_points;
            self.food = self.random_free_cell(rng);
            log::debug!("Snake ate at {next}, length {}", self.body.len());
            if self.food.is_none() {
                log::info!("Snake filled the board");
                return TickOutcome::GameOver;
            }
        } else {
            self.body.pop_back();
        }
        TickOutcome::Continue
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn view(&self) -> SnakeView {
        SnakeView {
            body: self.body.iter().copied().collect(),
            food: self.food,
            heading: self.heading,
            columns: self.tuning.columns,
            rows: self.tuning.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Engine;
    use std::time::Duration;

    fn engine() -> Engine<Snake> {
        let mut e = Engine::new(Snake::new(SnakeTuning::default()), 3);
        e.start();
        e
    }

    fn step(e: &mut Engine<Snake>) {
        e.advance(Duration::from_millis(120));
    }

    #[test]
    fn test_initial_state() {
        let e = engine();
        let view = e.snapshot().state;
        assert_eq!(view.body, vec![IVec2::new(5, 5)]);
        assert_eq!(view.food, Some(IVec2::new(10, 10)));
        assert_eq!(view.heading, Direction::Right);
    }

    #[test]
    fn test_reverse_is_rejected() {
        let mut e = engine();
        assert!(!e.handle_input(Direction::Left));
        assert!(!e.handle_input(Direction::Right));
        step(&mut e);
        assert_eq!(e.game().heading(), Direction::Right);
        assert_eq!(e.game().head(), IVec2::new(6, 5));
    }

    #[test]
    fn test_turn_applies_on_next_step() {
        let mut e = engine();
        assert!(e.handle_input(Direction::Down));
        assert_eq!(e.game().heading(), Direction::Right);
        step(&mut e);
        assert_eq!(e.game().head(), IVec2::new(5, 6));
        // Down then immediately Up: Up is judged against the new heading
        assert!(!e.handle_input(Direction::Up));
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut e = engine();
        assert!(e.handle_input(Direction::Up));
        // Still heading right until the step, so Left is a reversal
        assert!(!e.handle_input(Direction::Left));
        step(&mut e);
        assert_eq!(e.game().head(), IVec2::new(5, 4));
    }

    #[test]
    fn test_eating_grows_and_relocates_food() {
        let mut e = engine();
        let body = [IVec2::new(4, 2), IVec2::new(3, 2), IVec2::new(2, 2)];
        e.game_mut().place(&body, Direction::Right, Some(IVec2::new(5, 2)));

        step(&mut e);
        let game = e.game();
        assert_eq!(game.length(), 4);
        assert_eq!(e.score(), 10);
        let food = game.food().unwrap();
        assert!(!e.snapshot().state.body.contains(&food));
        assert!(game.in_bounds(food));
    }

    #[test]
    fn test_moving_keeps_length() {
        let mut e = engine();
        let body = [IVec2::new(4, 2), IVec2::new(3, 2), IVec2::new(2, 2)];
        e.game_mut().place(&body, Direction::Right, Some(IVec2::new(20, 15)));
        step(&mut e);
        assert_eq!(
            e.snapshot().state.body,
            vec![IVec2::new(5, 2), IVec2::new(4, 2), IVec2::new(3, 2)]
        );
    }

    #[test]
    fn test_wall_ends_game() {
        let mut e = engine();
        // 5 -> 29 takes 24 steps, the 25th leaves the board
        e.advance(Duration::from_millis(120 * 24));
        assert!(!e.is_game_over());
        assert_eq!(e.game().head(), IVec2::new(29, 5));
        step(&mut e);
        assert!(e.is_game_over());
        assert_eq!(e.game().head(), IVec2::new(29, 5));
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut e = engine();
        // Head at (5,5) heading up, body curls so the cell above is occupied
        let body = [
            IVec2::new(5, 5),
            IVec2::new(6, 5),
            IVec2::new(6, 4),
            IVec2::new(5, 4),
            IVec2::new(4, 4),
        ];
        e.game_mut().place(&body, Direction::Left, None);
        assert!(e.handle_input(Direction::Up));
        step(&mut e);
        assert!(e.is_game_over());
    }

    #[test]
    fn test_frozen_after_game_over() {
        let mut e = engine();
        e.advance(Duration::from_secs(10));
        assert!(e.is_game_over());
        let before = e.snapshot();
        e.advance(Duration::from_secs(10));
        e.tick(TimerKind::Step);
        let after = e.snapshot();
        assert_eq!(before.state, after.state);
        assert_eq!(before.score, after.score);
        assert_eq!(before.ticks, after.ticks);
    }

    #[test]
    fn test_restart_runs_one_step_timer() {
        let mut e = engine();
        e.advance(Duration::from_millis(600));
        e.restart();
        assert_eq!(e.advance(Duration::from_millis(1200)), 10);
        assert_eq!(e.ticks(), 10);
        assert_eq!(e.game().head(), IVec2::new(15, 5));
    }
}
