//! 2048 session: acceptance rule, scoring, restart

use rand::SeedableRng;
use serde::Serialize;

use super::board::{Grid, GridError, is_terminal, move_grid, spawn_random_tile};
use crate::SimRng;
use crate::platform::input::Direction;
use crate::tuning::GridTuning;

/// Result of one move request, carrying the board the caller should render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// The board changed, so a tile was spawned and the score updated
    pub accepted: bool,
    /// Board after the move and spawn (unchanged when rejected)
    pub grid: Grid,
    pub score: u64,
    pub game_over: bool,
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub grid: Grid,
    pub score: u64,
    pub game_over: bool,
    pub moves: u32,
}

/// One 2048 game instance. Owns its board and RNG exclusively.
#[derive(Debug, Clone)]
pub struct MergeGame {
    tuning: GridTuning,
    grid: Grid,
    score: u64,
    game_over: bool,
    moves: u32,
    rng: SimRng,
}

impl MergeGame {
    /// Start a game with two random tiles. Boards under 2x2 are rejected.
    pub fn new(tuning: GridTuning, seed: u64) -> Result<Self, GridError> {
        if tuning.size < 2 {
            return Err(GridError::TooSmall(tuning.size));
        }
        let mut game = Self {
            grid: Grid::empty(tuning.size),
            tuning,
            score: 0,
            game_over: false,
            moves: 0,
            rng: SimRng::seed_from_u64(seed),
        };
        game.seed_board();
        Ok(game)
    }

    fn seed_board(&mut self) {
        let mut grid = Grid::empty(self.tuning.size);
        for _ in 0..2 {
            // A fresh board of 2x2 or larger always has room for two tiles
            let spawned = spawn_random_tile(&mut grid, &mut self.rng, self.tuning.two_probability);
            debug_assert!(spawned.is_ok(), "fresh board has no room for a tile");
        }
        self.grid = grid;
        self.score = 0;
        self.game_over = false;
        self.moves = 0;
    }

    /// Discard the board and start over with two fresh tiles
    pub fn restart(&mut self) {
        self.seed_board();
        log::info!("2048 restarted");
    }

    /// Apply a move. A move that changes nothing is rejected: no spawn, no
    /// score change. Moves after game over are ignored.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.game_over {
            return self.outcome(false);
        }

        let mut moved = move_grid(direction, &self.grid);
        if moved == self.grid {
            log::debug!("2048 move {direction:?} rejected (no change)");
            return self.outcome(false);
        }

        // A changed board always has an empty cell: sliding or merging frees one
        let spawned = spawn_random_tile(&mut moved, &mut self.rng, self.tuning.two_probability);
        debug_assert!(spawned.is_ok(), "accepted move left no empty cell");

        self.grid = moved;
        self.score = self.grid.sum();
        self.moves += 1;
        self.game_over = is_terminal(&self.grid);
        log::debug!("2048 move {direction:?} accepted, score {}", self.score);
        if self.game_over {
            log::info!(
                "2048 game over with score {} (largest tile {})",
                self.score,
                self.grid.max_tile()
            );
        }
        self.outcome(true)
    }

    fn outcome(&self, accepted: bool) -> MoveOutcome {
        MoveOutcome {
            accepted,
            grid: self.grid.clone(),
            score: self.score,
            game_over: self.game_over,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            grid: self.grid.clone(),
            score: self.score,
            game_over: self.game_over,
            moves: self.moves,
        }
    }

    /// Replace the board (scenario setup and tests). Score and terminal flag
    /// are recomputed from the new board.
    pub fn load_grid(&mut self, grid: Grid) {
        self.score = grid.sum();
        self.game_over = is_terminal(&grid);
        self.grid = grid;
    }
}
