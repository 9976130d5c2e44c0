//! Key/pointer normalization
//!
//! Hosts hand over key names as the browser reports them (`KeyboardEvent.key`
//! or `.code`). Anything unrecognized maps to `None` and is dropped.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A cardinal direction, shared by the grid engine and the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when `other` lies on the perpendicular axis
    #[inline]
    pub fn is_orthogonal_to(self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }

    /// Unit step in screen coordinates (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Arrow keys only (the 2048 board ignores WASD)
    pub fn from_arrow_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Arrow keys plus WASD, either case
    pub fn from_key(key: &str) -> Option<Self> {
        Self::from_arrow_key(key).or_else(|| match key {
            "w" | "W" | "KeyW" => Some(Direction::Up),
            "s" | "S" | "KeyS" => Some(Direction::Down),
            "a" | "A" | "KeyA" => Some(Direction::Left),
            "d" | "D" | "KeyD" => Some(Direction::Right),
            _ => None,
        })
    }
}

/// Horizontal-only movement for the paddle and the car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lateral {
    Left,
    Right,
}

impl Lateral {
    pub fn from_key(key: &str) -> Option<Self> {
        match Direction::from_arrow_key(key)? {
            Direction::Left => Some(Lateral::Left),
            Direction::Right => Some(Lateral::Right),
            _ => None,
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Lateral::Left => -1.0,
            Lateral::Right => 1.0,
        }
    }
}

/// Spacebar, by `key` or by `code`
pub fn is_jump_key(key: &str) -> bool {
    matches!(key, " " | "Space" | "Spacebar")
}
