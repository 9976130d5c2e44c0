//! Data-driven game balance
//!
//! Every constant the games use lives here so a host can reshape the games
//! from a JSON file without recompiling. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::grid::GridError;

/// Error raised while loading or validating a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read tuning file: {e}"),
            Self::Parse(e) => write!(f, "malformed tuning JSON: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning value `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<GridError> for TuningError {
    fn from(e: GridError) -> Self {
        invalid("grid.size", e.to_string())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn require_cadence(field: &'static str, ms: u64) -> Result<(), TuningError> {
    if ms == 0 {
        Err(invalid(field, "cadence must be at least 1ms"))
    } else {
        Ok(())
    }
}

fn require_probability(field: &'static str, p: f64) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(field, format!("probability must be in [0, 1], got {p}")))
    }
}

/// 2048 board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTuning {
    pub size: usize,
    pub two_probability: f64,
}

impl Default for GridTuning {
    fn default() -> Self {
        Self {
            size: GRID_SIZE,
            two_probability: TWO_TILE_PROBABILITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub columns: i32,
    pub rows: i32,
    pub cadence_ms: u64,
    pub food_points: u64,
    pub start: (i32, i32),
    pub first_food: (i32, i32),
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            columns: SNAKE_COLUMNS,
            rows: SNAKE_ROWS,
            cadence_ms: SNAKE_CADENCE_MS,
            food_points: SNAKE_FOOD_POINTS,
            start: (5, 5),
            first_food: (10, 10),
        }
    }
}

/// Lane-dodge driving game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarsTuning {
    pub width: f32,
    pub height: f32,
    pub car_width: f32,
    pub car_height: f32,
    pub car_step: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub obstacle_speed: f32,
    pub spawn_chance: f64,
    pub cadence_ms: u64,
}

impl Default for CarsTuning {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            car_width: CAR_WIDTH,
            car_height: CAR_HEIGHT,
            car_step: CAR_STEP,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            obstacle_speed: OBSTACLE_SPEED,
            spawn_chance: OBSTACLE_SPAWN_CHANCE,
            cadence_ms: PHYSICS_CADENCE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyTuning {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub flap_strength: f32,
    pub pipe_width: f32,
    pub pipe_gap: f32,
    pub pipe_speed: f32,
    /// A new pipe spawns once the newest one is this far from the right edge
    pub pipe_spacing: f32,
    /// Minimum distance between the gap and the top/bottom edges
    pub gap_margin: f32,
    pub bird_left: f32,
    pub bird_right: f32,
    pub floor_margin: f32,
    pub cadence_ms: u64,
}

impl Default for FlappyTuning {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            gravity: FLAP_GRAVITY,
            flap_strength: FLAP_STRENGTH,
            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_speed: PIPE_SPEED,
            pipe_spacing: PIPE_SPACING,
            gap_margin: 50.0,
            bird_left: BIRD_LEFT,
            bird_right: BIRD_RIGHT,
            floor_margin: BIRD_FLOOR_MARGIN,
            cadence_ms: PHYSICS_CADENCE_MS,
        }
    }
}

impl FlappyTuning {
    /// Lowest y a bird may reach before hitting the floor
    pub fn floor(&self) -> f32 {
        self.height - self.floor_margin
    }
}

/// Paddle-and-ball bouncer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongTuning {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_step: f32,
    pub ball_size: f32,
    pub ball_start_speed: f32,
    pub speed_increment: f32,
    pub cadence_ms: u64,
}

impl Default for PongTuning {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_step: PADDLE_STEP,
            ball_size: BALL_SIZE,
            ball_start_speed: BALL_START_SPEED,
            speed_increment: BALL_SPEED_INCREMENT,
            cadence_ms: PHYSICS_CADENCE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleTuning {
    pub grid_size: usize,
    pub round_seconds: u32,
    pub relocate_ms: u64,
    pub countdown_ms: u64,
}

impl Default for MoleTuning {
    fn default() -> Self {
        Self {
            grid_size: MOLE_GRID_SIZE,
            round_seconds: MOLE_ROUND_SECONDS,
            relocate_ms: MOLE_CADENCE_MS,
            countdown_ms: COUNTDOWN_CADENCE_MS,
        }
    }
}

impl MoleTuning {
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

/// Complete balance sheet for every game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub grid: GridTuning,
    pub snake: SnakeTuning,
    pub cars: CarsTuning,
    pub flappy: FlappyTuning,
    pub pong: PongTuning,
    pub mole: MoleTuning,
}

impl Tuning {
    /// Parse and validate tuning JSON
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.grid.size < 2 {
            return Err(invalid("grid.size", "board needs at least 2x2 cells"));
        }
        require_probability("grid.two_probability", self.grid.two_probability)?;

        let s = &self.snake;
        if s.columns <= 0 || s.rows <= 0 {
            return Err(invalid("snake.columns/rows", "board must be non-empty"));
        }
        let inside = |(x, y): (i32, i32)| x >= 0 && y >= 0 && x < s.columns && y < s.rows;
        if !inside(s.start) {
            return Err(invalid("snake.start", "start cell lies off the board"));
        }
        if !inside(s.first_food) {
            return Err(invalid("snake.first_food", "food cell lies off the board"));
        }
        require_cadence("snake.cadence_ms", s.cadence_ms)?;

        let c = &self.cars;
        for (field, v) in [
            ("cars.width", c.width),
            ("cars.height", c.height),
            ("cars.car_width", c.car_width),
            ("cars.car_height", c.car_height),
            ("cars.obstacle_width", c.obstacle_width),
            ("cars.obstacle_height", c.obstacle_height),
            ("cars.obstacle_speed", c.obstacle_speed),
        ] {
            require_positive(field, v)?;
        }
        if c.obstacle_width > c.width || c.car_width > c.width {
            return Err(invalid("cars.width", "field narrower than a car"));
        }
        require_probability("cars.spawn_chance", c.spawn_chance)?;
        require_cadence("cars.cadence_ms", c.cadence_ms)?;

        let f = &self.flappy;
        require_positive("flappy.pipe_width", f.pipe_width)?;
        require_positive("flappy.pipe_speed", f.pipe_speed)?;
        require_positive("flappy.pipe_gap", f.pipe_gap)?;
        if f.pipe_gap + 2.0 * f.gap_margin >= f.height {
            return Err(invalid("flappy.pipe_gap", "gap and margins exceed the field height"));
        }
        if f.bird_right <= f.bird_left {
            return Err(invalid("flappy.bird_right", "bird must have positive width"));
        }
        require_cadence("flappy.cadence_ms", f.cadence_ms)?;

        let p = &self.pong;
        require_positive("pong.ball_size", p.ball_size)?;
        require_positive("pong.ball_start_speed", p.ball_start_speed)?;
        require_positive("pong.speed_increment", p.speed_increment)?;
        if p.paddle_width > p.width {
            return Err(invalid("pong.paddle_width", "paddle wider than the field"));
        }
        require_cadence("pong.cadence_ms", p.cadence_ms)?;

        let m = &self.mole;
        if m.grid_size == 0 {
            return Err(invalid("mole.grid_size", "board must be non-empty"));
        }
        if m.round_seconds == 0 {
            return Err(invalid("mole.round_seconds", "round must last at least 1s"));
        }
        require_cadence("mole.relocate_ms", m.relocate_ms)?;
        require_cadence("mole.countdown_ms", m.countdown_ms)?;

        Ok(())
    }
}

/// Milliseconds to a timer period
#[inline]
pub fn cadence(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
