//! Paddle-and-ball bouncer
//!
//! One ball, one paddle along the bottom edge. The ball reflects off the side
//! walls, the ceiling and the paddle; every paddle return speeds it up.

use glam::Vec2;
use serde::Serialize;

use crate::platform::input::Lateral;
use crate::sim::{Aabb, TickGame, TickOutcome, TimerKind, TimerSpec, reflect_away};
use crate::tuning::{PongTuning, cadence};
use crate::{SimRng, clamp_to_field};

/// Ball position (top-left) and velocity in px per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PongView {
    pub ball: Ball,
    /// Left edge of the paddle
    pub paddle_x: f32,
}

#[derive(Debug, Clone)]
pub struct PingPong {
    tuning: PongTuning,
    ball: Ball,
    paddle_x: f32,
    pending: Option<Lateral>,
    score: u64,
}

impl PingPong {
    pub fn new(tuning: PongTuning) -> Self {
        Self {
            ball: Self::serve(&tuning),
            paddle_x: Self::paddle_start(&tuning),
            tuning,
            pending: None,
            score: 0,
        }
    }

    fn serve(tuning: &PongTuning) -> Ball {
        Ball {
            pos: Vec2::new(tuning.width / 2.0, tuning.height / 2.0),
            vel: Vec2::splat(tuning.ball_start_speed),
        }
    }

    fn paddle_start(tuning: &PongTuning) -> f32 {
        tuning.width / 2.0 - tuning.paddle_width / 2.0
    }

    pub fn paddle_box(&self) -> Aabb {
        let t = &self.tuning;
        Aabb::new(
            Vec2::new(self.paddle_x, t.height - t.paddle_height),
            Vec2::new(t.paddle_width, t.paddle_height),
        )
    }

    pub fn ball_box(&self) -> Aabb {
        Aabb::new(self.ball.pos, Vec2::splat(self.tuning.ball_size))
    }

    /// Reflect off side walls and ceiling, keeping the ball inside the field
    fn bounce_walls(&mut self) {
        let t = &self.tuning;
        let ball = &mut self.ball;
        if ball.pos.x <= 0.0 {
            ball.vel.x = reflect_away(ball.vel.x, 1.0);
        } else if ball.pos.x + t.ball_size >= t.width {
            ball.vel.x = reflect_away(ball.vel.x, -1.0);
        }
        ball.pos.x = clamp_to_field(ball.pos.x, t.ball_size, t.width);
        if ball.pos.y <= 0.0 {
            ball.vel.y = reflect_away(ball.vel.y, 1.0);
            ball.pos.y = 0.0;
        }
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn paddle_x(&self) -> f32 {
        self.paddle_x
    }

    #[cfg(test)]
    pub(crate) fn place_ball(&mut self, pos: Vec2, vel: Vec2) {
        self.ball = Ball { pos, vel };
    }
}

impl TickGame for PingPong {
    type Intent = Lateral;
    type View = PongView;
    const NAME: &'static str = "Ping pong";

    fn timers(&self) -> Vec<TimerSpec> {
        vec![TimerSpec::new(TimerKind::Step, cadence(self.tuning.cadence_ms))]
    }

    fn reset(&mut self, _rng: &mut SimRng) {
        self.ball = Self::serve(&self.tuning);
        self.paddle_x = Self::paddle_start(&self.tuning);
        self.pending = None;
        self.score = 0;
    }

    fn handle_input(&mut self, intent: Lateral) -> bool {
        self.pending = Some(intent);
        true
    }

    fn tick(&mut self, _timer: TimerKind, _rng: &mut SimRng) -> TickOutcome {
        if let Some(side) = self.pending.take() {
            let t = &self.tuning;
            self.paddle_x = clamp_to_field(
                self.paddle_x + side.sign() * t.paddle_step,
                t.paddle_width,
                t.width,
            );
        }

        let from = self.ball_box();
        self.ball.pos += self.ball.vel;
        self.bounce_walls();

        // Contact is tested over the whole move so a fast ball can't skip
        // the paddle. Only a descending ball is returned, so one contact
        // scores once.
        let path = Aabb::swept(&from, &self.ball_box());
        if self.ball.vel.y > 0.0 && path.touches(&self.paddle_box()) {
            let inc = self.tuning.speed_increment;
            let vel = self.ball.vel;
            self.ball.vel = Vec2::new(
                vel.x.signum() * (vel.x.abs() + inc),
                -(vel.y.abs() + inc),
            );
            self.ball.pos.y = self.paddle_box().min.y - self.tuning.ball_size;
            self.score += 1;
            log::debug!("Pong return #{}, speed {:?}", self.score, self.ball.vel);
        }

        if self.ball.pos.y + self.tuning.ball_size > self.tuning.height {
            return TickOutcome::GameOver;
        }
        TickOutcome::Continue
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn view(&self) -> PongView {
        PongView {
            ball: self.ball,
            paddle_x: self.paddle_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Engine;
    use std::time::Duration;

    fn engine() -> Engine<PingPong> {
        let mut e = Engine::new(PingPong::new(PongTuning::default()), 9);
        e.start();
        e
    }

    fn step(e: &mut Engine<PingPong>) {
        e.advance(Duration::from_millis(20));
    }

    #[test]
    fn test_serve() {
        let e = engine();
        let view = e.snapshot().state;
        assert_eq!(view.ball.pos, Vec2::new(200.0, 300.0));
        assert_eq!(view.ball.vel, Vec2::new(3.0, 3.0));
        assert_eq!(view.paddle_x, 150.0);
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let mut e = engine();
        e.handle_input(Lateral::Left);
        step(&mut e);
        assert_eq!(e.game().paddle_x(), 130.0);
        for _ in 0..10 {
            e.handle_input(Lateral::Left);
            step(&mut e);
        }
        assert_eq!(e.game().paddle_x(), 0.0);
        for _ in 0..20 {
            e.handle_input(Lateral::Right);
            step(&mut e);
        }
        assert_eq!(e.game().paddle_x(), 300.0);
    }

    #[test]
    fn test_side_wall_reflects_away() {
        let mut e = engine();
        e.game_mut().place_ball(Vec2::new(1.0, 100.0), Vec2::new(-3.0, 3.0));
        step(&mut e);
        let ball = e.game().ball();
        assert_eq!(ball.vel.x, 3.0);
        assert_eq!(ball.pos.x, 0.0);

        e.game_mut().place_ball(Vec2::new(379.0, 100.0), Vec2::new(3.0, 3.0));
        step(&mut e);
        assert_eq!(e.game().ball().vel.x, -3.0);
    }

    #[test]
    fn test_ceiling_reflects() {
        let mut e = engine();
        e.game_mut().place_ball(Vec2::new(100.0, 2.0), Vec2::new(3.0, -3.0));
        step(&mut e);
        assert_eq!(e.game().ball().vel.y, 3.0);
    }

    #[test]
    fn test_paddle_return_scores_and_speeds_up() {
        let mut e = engine();
        e.game_mut().place_ball(Vec2::new(190.0, 558.0), Vec2::new(3.0, 3.0));
        step(&mut e);

        let ball = e.game().ball();
        assert_eq!(e.score(), 1);
        assert!(!e.is_game_over());
        assert!(ball.vel.x > 3.0);
        assert!(ball.vel.y < -3.0);
        assert_eq!(ball.pos.y, 560.0);

        // Moving upward, the next tick cannot count the same contact again
        step(&mut e);
        assert_eq!(e.score(), 1);
    }

    #[test]
    fn test_speed_ramp_is_monotonic() {
        let mut e = engine();
        let mut speed = Vec2::new(3.0, 3.0);
        for hit in 1..=5 {
            e.game_mut().place_ball(Vec2::new(190.0, 558.0), speed);
            step(&mut e);
            let vel = e.game().ball().vel;
            assert_eq!(e.score(), hit);
            assert!(vel.x.abs() > speed.x.abs());
            assert!(vel.y.abs() > speed.y.abs());
            speed = Vec2::new(vel.x, vel.y.abs());
        }
    }

    #[test]
    fn test_fast_ball_cannot_skip_paddle() {
        let mut e = engine();
        // 550 -> 620 in one tick jumps clean over the 580..600 band
        e.game_mut().place_ball(Vec2::new(190.0, 550.0), Vec2::new(3.0, 70.0));
        step(&mut e);
        assert_eq!(e.score(), 1);
        assert!(!e.is_game_over());
        assert_eq!(e.game().ball().pos.y, 560.0);
        assert!(e.game().ball().vel.y < -70.0);
    }

    #[test]
    fn test_miss_ends_game() {
        let mut e = engine();
        e.game_mut().place_ball(Vec2::new(0.0, 579.0), Vec2::new(3.0, 3.0));
        step(&mut e);
        assert!(e.is_game_over());
        assert_eq!(e.score(), 0);
    }

    #[test]
    fn test_unattended_serve_is_missed() {
        let mut e = engine();
        e.advance(Duration::from_secs(3));
        assert!(e.is_game_over());
        assert_eq!(e.score(), 0);
    }

    #[test]
    fn test_restart_runs_one_step_timer() {
        let mut e = engine();
        e.advance(Duration::from_millis(500));
        e.restart();
        assert_eq!(e.advance(Duration::from_secs(1)), 50);
        assert_eq!(e.ticks(), 50);
        assert_eq!(e.game().ball().pos.y, 450.0);
    }

    #[test]
    fn test_frozen_after_game_over() {
        let mut e = engine();
        e.game_mut().place_ball(Vec2::new(0.0, 579.0), Vec2::new(3.0, 3.0));
        step(&mut e);
        assert!(e.is_game_over());

        let before = e.snapshot();
        e.handle_input(Lateral::Right);
        e.tick(TimerKind::Step);
        assert_eq!(e.advance(Duration::from_secs(1)), 0);
        let after = e.snapshot();
        assert_eq!(before.state, after.state);
        assert_eq!(before.score, after.score);
        assert_eq!(before.ticks, after.ticks);
    }
}
