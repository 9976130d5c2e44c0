//! Mini Arcade - simulation core for a tabbed arcade
//!
//! Core modules:
//! - `grid`: 2048 grid transformation engine (pure, no time dimension)
//! - `sim`: Fixed-cadence tick engine (lifecycle, timers, collision helpers)
//! - `games`: Per-game policies driven by the tick engine
//! - `platform`: Raw input normalization
//! - `tuning`: Data-driven game balance
//! - `arcade`: Tab container that mounts one game at a time
//!
//! Rendering is not part of this crate. A presentation layer reads snapshots
//! and feeds normalized intents back in.

pub mod arcade;
pub mod games;
pub mod grid;
pub mod highscores;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use arcade::{Arcade, GameTab};
pub use highscores::HighScores;
pub use platform::input::Direction;
pub use tuning::{Tuning, TuningError};

/// RNG used by every engine. Seeded, so runs are reproducible.
pub type SimRng = rand_pcg::Pcg32;

/// Game configuration constants
///
/// These are the defaults baked into [`Tuning::default`]; engines read the
/// tuning values, not these constants directly.
pub mod consts {
    /// Upper bound on timer firings handled by a single `advance` call
    pub const MAX_CATCHUP_TICKS: u32 = 256;

    /// Maximum queued simulation events before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 64;

    /// 2048 board edge length
    pub const GRID_SIZE: usize = 4;
    /// Probability that a spawned tile is a 2 (otherwise 4)
    pub const TWO_TILE_PROBABILITY: f64 = 0.9;

    /// Physics games tick every 20ms
    pub const PHYSICS_CADENCE_MS: u64 = 20;
    /// Snake steps every 120ms
    pub const SNAKE_CADENCE_MS: u64 = 120;
    /// Mole relocation timer
    pub const MOLE_CADENCE_MS: u64 = 800;
    /// Whack-a-mole countdown timer
    pub const COUNTDOWN_CADENCE_MS: u64 = 1000;

    /// Shared playfield for the physics games (pixels)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Snake board (cells)
    pub const SNAKE_COLUMNS: i32 = 30;
    pub const SNAKE_ROWS: i32 = 20;
    pub const SNAKE_FOOD_POINTS: u64 = 10;

    /// Lane-dodge car and obstacle geometry
    pub const CAR_WIDTH: f32 = 50.0;
    pub const CAR_HEIGHT: f32 = 100.0;
    pub const CAR_STEP: f32 = 20.0;
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const OBSTACLE_HEIGHT: f32 = 100.0;
    pub const OBSTACLE_SPEED: f32 = 5.0;
    pub const OBSTACLE_SPAWN_CHANCE: f64 = 0.02;

    /// Flappy bird physics
    pub const FLAP_GRAVITY: f32 = 2.0;
    pub const FLAP_STRENGTH: f32 = -35.0;
    pub const PIPE_WIDTH: f32 = 60.0;
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_SPEED: f32 = 3.0;
    pub const PIPE_SPACING: f32 = 200.0;
    /// Bird occupies x in [BIRD_LEFT, BIRD_RIGHT)
    pub const BIRD_LEFT: f32 = 30.0;
    pub const BIRD_RIGHT: f32 = 80.0;
    /// Bird y must stay in [0, FIELD_HEIGHT - BIRD_FLOOR_MARGIN]
    pub const BIRD_FLOOR_MARGIN: f32 = 30.0;

    /// Ping pong geometry
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_STEP: f32 = 20.0;
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_START_SPEED: f32 = 3.0;
    /// Added to each velocity component's magnitude per paddle hit
    pub const BALL_SPEED_INCREMENT: f32 = 0.2;

    /// Whack-a-mole board edge length and round length
    pub const MOLE_GRID_SIZE: usize = 3;
    pub const MOLE_ROUND_SECONDS: u32 = 30;
}

/// Clamp a horizontal offset so a body of `width` stays inside `[0, field]`
#[inline]
pub fn clamp_to_field(x: f32, width: f32, field: f32) -> f32 {
    x.clamp(0.0, (field - width).max(0.0))
}
