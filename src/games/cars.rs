//! Lane-dodge driving game
//!
//! Obstacles fall from the top at a constant speed; the car slides along the
//! bottom band. Surviving a tick is worth one point.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::platform::input::Lateral;
use crate::sim::{Aabb, TickGame, TickOutcome, TimerKind, TimerSpec};
use crate::tuning::{CarsTuning, cadence};
use crate::{SimRng, clamp_to_field};

/// A falling obstacle, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obstacle {
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarsView {
    /// Left edge of the car
    pub car_x: f32,
    pub obstacles: Vec<Obstacle>,
}

#[derive(Debug, Clone)]
pub struct Cars {
    tuning: CarsTuning,
    car_x: f32,
    obstacles: Vec<Obstacle>,
    pending: Option<Lateral>,
    score: u64,
}

impl Cars {
    pub fn new(tuning: CarsTuning) -> Self {
        Self {
            car_x: Self::start_x(&tuning),
            tuning,
            obstacles: Vec::new(),
            pending: None,
            score: 0,
        }
    }

    fn start_x(tuning: &CarsTuning) -> f32 {
        tuning.width / 2.0 - tuning.car_width / 2.0
    }

    /// The car occupies the bottom band of the field
    pub fn car_box(&self) -> Aabb {
        let t = &self.tuning;
        Aabb::new(
            Vec2::new(self.car_x, t.height - t.car_height),
            Vec2::new(t.car_width, t.car_height),
        )
    }

    fn obstacle_box(&self, obstacle: &Obstacle) -> Aabb {
        Aabb::new(
            obstacle.pos,
            Vec2::new(self.tuning.obstacle_width, self.tuning.obstacle_height),
        )
    }

    pub fn car_x(&self) -> f32 {
        self.car_x
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[cfg(test)]
    pub(crate) fn push_obstacle(&mut self, pos: Vec2) {
        self.obstacles.push(Obstacle { pos });
    }
}

impl TickGame for Cars {
    type Intent = Lateral;
    type View = CarsView;
    const NAME: &'static str = "Cars";

    fn timers(&self) -> Vec<TimerSpec> {
        vec![TimerSpec::new(TimerKind::Step, cadence(self.tuning.cadence_ms))]
    }

    fn reset(&mut self, _rng: &mut SimRng) {
        self.car_x = Self::start_x(&self.tuning);
        self.obstacles.clear();
        self.pending = None;
        self.score = 0;
    }

    fn handle_input(&mut self, intent: Lateral) -> bool {
        self.pending = Some(intent);
        true
    }

    fn tick(&mut self, _timer: TimerKind, rng: &mut SimRng) -> TickOutcome {
        let t = &self.tuning;

        if let Some(side) = self.pending.take() {
            self.car_x = clamp_to_field(self.car_x + side.sign() * t.car_step, t.car_width, t.width);
        }

        for obstacle in &mut self.obstacles {
            obstacle.pos.y += t.obstacle_speed;
        }
        let height = t.height;
        self.obstacles.retain(|o| o.pos.y < height);

        if rng.random_bool(t.spawn_chance) {
            let lanes = (t.width - t.obstacle_width).max(1.0) as u32;
            let x = rng.random_range(0..lanes) as f32;
            self.obstacles.push(Obstacle {
                pos: Vec2::new(x, -t.obstacle_height),
            });
            log::debug!("Cars spawned obstacle at x={x}");
        }

        let car = self.car_box();
        if self.obstacles.iter().any(|o| self.obstacle_box(o).intersects(&car)) {
            return TickOutcome::GameOver;
        }

        self.score += 1;
        TickOutcome::Continue
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn view(&self) -> CarsView {
        CarsView {
            car_x: self.car_x,
            obstacles: self.obstacles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Engine;
    use std::time::Duration;

    fn engine_with(tuning: CarsTuning) -> Engine<Cars> {
        let mut e = Engine::new(Cars::new(tuning), 11);
        e.start();
        e
    }

    fn quiet() -> CarsTuning {
        CarsTuning {
            spawn_chance: 0.0,
            ..Default::default()
        }
    }

    fn step(e: &mut Engine<Cars>) {
        e.advance(Duration::from_millis(20));
    }

    #[test]
    fn test_starts_centered() {
        let e = engine_with(quiet());
        assert_eq!(e.game().car_x(), 175.0);
        assert!(e.game().obstacles().is_empty());
    }

    #[test]
    fn test_score_per_tick_while_alive() {
        let mut e = engine_with(quiet());
        e.advance(Duration::from_millis(1000));
        assert_eq!(e.score(), 50);
    }

    #[test]
    fn test_lateral_move_clamped() {
        let mut e = engine_with(quiet());
        e.handle_input(Lateral::Left);
        e.handle_input(Lateral::Left); // coalesced into one step
        step(&mut e);
        assert_eq!(e.game().car_x(), 155.0);

        for _ in 0..20 {
            e.handle_input(Lateral::Left);
            step(&mut e);
        }
        assert_eq!(e.game().car_x(), 0.0);

        for _ in 0..30 {
            e.handle_input(Lateral::Right);
            step(&mut e);
        }
        assert_eq!(e.game().car_x(), 350.0);
    }

    #[test]
    fn test_obstacles_fall_and_prune() {
        let mut e = engine_with(quiet());
        e.game_mut().push_obstacle(Vec2::new(0.0, 598.0));
        e.game_mut().push_obstacle(Vec2::new(0.0, 100.0));
        step(&mut e);
        let ys: Vec<f32> = e.game().obstacles().iter().map(|o| o.pos.y).collect();
        assert_eq!(ys, vec![105.0]);
    }

    #[test]
    fn test_collision_in_bottom_band() {
        let mut e = engine_with(quiet());
        // Directly above the car, about to enter the band
        e.game_mut().push_obstacle(Vec2::new(175.0, 395.0));
        step(&mut e);
        assert!(!e.is_game_over());
        step(&mut e);
        assert!(e.is_game_over());
        assert_eq!(e.score(), 1);
    }

    #[test]
    fn test_side_by_side_is_safe() {
        let mut e = engine_with(quiet());
        // Touching the car's left edge exactly is not a hit
        e.game_mut().push_obstacle(Vec2::new(125.0, 500.0));
        step(&mut e);
        assert!(!e.is_game_over());
    }

    #[test]
    fn test_spawns_enter_from_top() {
        let mut e = engine_with(CarsTuning {
            spawn_chance: 1.0,
            ..Default::default()
        });
        step(&mut e);
        let obstacles = e.game().obstacles();
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].pos.y, -100.0);
        assert!(obstacles[0].pos.x >= 0.0 && obstacles[0].pos.x < 350.0);
    }

    #[test]
    fn test_restart_clears_field() {
        let mut e = engine_with(CarsTuning {
            spawn_chance: 1.0,
            ..Default::default()
        });
        e.advance(Duration::from_millis(200));
        e.restart();
        assert!(e.game().obstacles().is_empty());
        assert_eq!(e.score(), 0);
        assert_eq!(e.active_timers(), 1);
    }

    #[test]
    fn test_restart_runs_one_step_timer() {
        let mut e = engine_with(CarsTuning {
            spawn_chance: 1.0,
            ..Default::default()
        });
        e.advance(Duration::from_millis(200));
        e.restart();
        // Spawned obstacles fall 250px in a second, nowhere near the car
        assert_eq!(e.advance(Duration::from_secs(1)), 50);
        assert_eq!(e.score(), 50);
    }

    #[test]
    fn test_frozen_after_game_over() {
        let mut e = engine_with(quiet());
        e.game_mut().push_obstacle(Vec2::new(175.0, 395.0));
        e.advance(Duration::from_millis(40));
        assert!(e.is_game_over());

        let before = e.snapshot();
        e.handle_input(Lateral::Left);
        e.tick(TimerKind::Step);
        assert_eq!(e.advance(Duration::from_secs(1)), 0);
        let after = e.snapshot();
        assert_eq!(before.state, after.state);
        assert_eq!(before.score, after.score);
        assert_eq!(before.ticks, after.ticks);
    }
}
