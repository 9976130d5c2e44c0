//! Grid transformation engine (2048)
//!
//! Pure and synchronous: called once per accepted input, no time dimension.

pub mod board;
pub mod game;

pub use board::{
    Grid, GridError, compress, is_terminal, merge, move_grid, rotate_left, slide_left,
    spawn_random_tile,
};
pub use game::{GridSnapshot, MergeGame, MoveOutcome};
