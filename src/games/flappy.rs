//! Side-scrolling flappy bird
//!
//! The bird only moves vertically; pipes scroll left at a constant speed.
//! A flap replaces the current velocity. Each pipe pair scores once, when its
//! right edge clears the bird's left edge.

use rand::Rng;
use serde::Serialize;

use crate::SimRng;
use crate::sim::{TickGame, TickOutcome, TimerKind, TimerSpec};
use crate::tuning::{FlappyTuning, cadence};

/// A pipe pair: solid above `gap_top` and below `gap_top + gap`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    pub gap_top: f32,
    /// Already counted toward the score
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlappyIntent {
    Flap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlappyView {
    pub bird_y: f32,
    pub velocity: f32,
    pub pipes: Vec<Pipe>,
}

#[derive(Debug, Clone)]
pub struct FlappyBird {
    tuning: FlappyTuning,
    bird_y: f32,
    velocity: f32,
    pipes: Vec<Pipe>,
    flap_pending: bool,
    score: u64,
}

impl FlappyBird {
    pub fn new(tuning: FlappyTuning) -> Self {
        Self {
            bird_y: tuning.height / 2.0,
            tuning,
            velocity: 0.0,
            pipes: Vec::new(),
            flap_pending: false,
            score: 0,
        }
    }

    fn spawn_pipe(&mut self, rng: &mut SimRng) {
        let t = &self.tuning;
        let span = (t.height - t.pipe_gap - 2.0 * t.gap_margin).max(1.0) as u32;
        let gap_top = rng.random_range(0..span) as f32 + t.gap_margin;
        self.pipes.push(Pipe {
            x: t.width,
            gap_top,
            passed: false,
        });
        log::debug!("Flappy pipe spawned, gap at {gap_top}");
    }

    fn hits_pipe(&self, pipe: &Pipe) -> bool {
        let t = &self.tuning;
        let aligned = pipe.x < t.bird_right && pipe.x + t.pipe_width > t.bird_left;
        aligned && (self.bird_y < pipe.gap_top || self.bird_y > pipe.gap_top + t.pipe_gap)
    }

    pub fn bird_y(&self) -> f32 {
        self.bird_y
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    #[cfg(test)]
    pub(crate) fn set_pipes(&mut self, pipes: Vec<Pipe>) {
        self.pipes = pipes;
    }
}

impl TickGame for FlappyBird {
    type Intent = FlappyIntent;
    type View = FlappyView;
    const NAME: &'static str = "Flappy Bird";

    fn timers(&self) -> Vec<TimerSpec> {
        vec![TimerSpec::new(TimerKind::Step, cadence(self.tuning.cadence_ms))]
    }

    fn reset(&mut self, _rng: &mut SimRng) {
        self.bird_y = self.tuning.height / 2.0;
        self.velocity = 0.0;
        self.pipes.clear();
        self.flap_pending = false;
        self.score = 0;
    }

    fn handle_input(&mut self, intent: FlappyIntent) -> bool {
        match intent {
            FlappyIntent::Flap => self.flap_pending = true,
        }
        true
    }

    fn tick(&mut self, _timer: TimerKind, rng: &mut SimRng) -> TickOutcome {
        if std::mem::take(&mut self.flap_pending) {
            self.velocity = self.tuning.flap_strength;
        }

        // Position integrates a fifth of the velocity; gravity is halved per tick
        self.bird_y += self.velocity / 5.0;
        self.velocity += self.tuning.gravity / 2.0;

        let speed = self.tuning.pipe_speed;
        let width = self.tuning.pipe_width;
        for pipe in &mut self.pipes {
            pipe.x -= speed;
        }
        self.pipes.retain(|p| p.x + width > 0.0);

        let needs_pipe = self
            .pipes
            .last()
            .is_none_or(|p| p.x < self.tuning.width - self.tuning.pipe_spacing);
        if needs_pipe {
            self.spawn_pipe(rng);
        }

        if self.bird_y < 0.0 || self.bird_y > self.tuning.floor() {
            return TickOutcome::GameOver;
        }
        if self.pipes.iter().any(|p| self.hits_pipe(p)) {
            return TickOutcome::GameOver;
        }

        let bird_left = self.tuning.bird_left;
        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.x + width < bird_left {
                pipe.passed = true;
                self.score += 1;
            }
        }
        TickOutcome::Continue
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn view(&self) -> FlappyView {
        FlappyView {
            bird_y: self.bird_y,
            velocity: self.velocity,
            pipes: self.pipes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Engine;
    use std::time::Duration;

    fn engine() -> Engine<FlappyBird> {
        let mut e = Engine::new(FlappyBird::new(FlappyTuning::default()), 5);
        e.start();
        e
    }

    fn step(e: &mut Engine<FlappyBird>) {
        e.advance(Duration::from_millis(20));
    }

    /// A pipe whose gap is centred on the bird's start height
    fn open_pipe(x: f32) -> Pipe {
        Pipe {
            x,
            gap_top: 225.0,
            passed: false,
        }
    }

    #[test]
    fn test_gravity_and_flap() {
        let mut e = engine();
        step(&mut e);
        assert_eq!(e.game().bird_y(), 300.0);
        assert_eq!(e.game().velocity(), 1.0);
        step(&mut e);
        assert_eq!(e.game().bird_y(), 300.2);

        e.handle_input(FlappyIntent::Flap);
        step(&mut e);
        assert_eq!(e.game().bird_y(), 300.2 - 7.0);
        assert_eq!(e.game().velocity(), -34.0);
    }

    #[test]
    fn test_first_pipe_spawns_at_right_edge() {
        let mut e = engine();
        step(&mut e);
        let pipes = e.game().pipes();
        assert_eq!(pipes.len(), 1);
        assert_eq!(pipes[0].x, 400.0);
        assert!(pipes[0].gap_top >= 50.0 && pipes[0].gap_top < 400.0);
    }

    #[test]
    fn test_pipes_spaced_and_pruned() {
        let mut e = engine();
        e.game_mut().set_pipes(vec![open_pipe(-58.0), open_pipe(201.0)]);
        step(&mut e);
        let xs: Vec<f32> = e.game().pipes().iter().map(|p| p.x).collect();
        // -58 scrolled fully off, 201 -> 198 is past the spacing line, so a new one spawns
        assert_eq!(xs, vec![198.0, 400.0]);
    }

    #[test]
    fn test_floor_and_ceiling_end_game() {
        let mut e = engine();
        // Free fall from 300 reaches the floor at 570 well within 5 seconds
        e.advance(Duration::from_secs(5));
        assert!(e.is_game_over());

        let mut e = engine();
        // Each flapped tick climbs 7px, so 300px is gone within 43 ticks
        for _ in 0..50 {
            e.handle_input(FlappyIntent::Flap);
            step(&mut e);
        }
        assert!(e.is_game_over());
        assert!(e.game().bird_y() < 0.0);
    }

    #[test]
    fn test_pipe_wall_collision() {
        let mut e = engine();
        // Aligned horizontally, gap far below the bird
        e.game_mut().set_pipes(vec![Pipe {
            x: 50.0,
            gap_top: 380.0,
            passed: false,
        }]);
        step(&mut e);
        assert!(e.is_game_over());
    }

    #[test]
    fn test_passing_a_pipe_scores_once() {
        let mut e = engine();
        // Right edge at 32; one step moves it to 29, past the bird's left edge
        e.game_mut().set_pipes(vec![open_pipe(-28.0)]);
        step(&mut e);
        assert!(!e.is_game_over());
        assert_eq!(e.score(), 1);
        step(&mut e);
        assert_eq!(e.score(), 1);
    }

    #[test]
    fn test_restart_resets_bird() {
        let mut e = engine();
        e.advance(Duration::from_secs(5));
        e.restart();
        assert_eq!(e.game().bird_y(), 300.0);
        assert_eq!(e.game().velocity(), 0.0);
        assert!(e.game().pipes().is_empty());
        assert_eq!(e.score(), 0);
    }

    #[test]
    fn test_restart_runs_one_step_timer() {
        let mut e = engine();
        e.advance(Duration::from_millis(200));
        e.restart();
        // 50 ticks of free fall drop the bird 245px, still above the floor
        assert_eq!(e.advance(Duration::from_secs(1)), 50);
        assert!(!e.is_game_over());
        assert_eq!(e.ticks(), 50);
    }

    #[test]
    fn test_frozen_after_game_over() {
        let mut e = engine();
        e.advance(Duration::from_secs(5));
        assert!(e.is_game_over());

        let before = e.snapshot();
        e.handle_input(FlappyIntent::Flap);
        e.tick(TimerKind::Step);
        assert_eq!(e.advance(Duration::from_secs(1)), 0);
        let after = e.snapshot();
        assert_eq!(before.state, after.state);
        assert_eq!(before.score, after.score);
        assert_eq!(before.ticks, after.ticks);
    }
}
