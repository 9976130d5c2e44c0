//! Grid transformation primitives
//!
//! Every direction reduces to one primitive: slide-and-merge toward the left.
//! Right reflects each row around it; up and down rotate the board around it.
//! Nothing here touches time or RNG except [`spawn_random_tile`].

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::platform::input::Direction;

/// Board construction or spawning failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    NoEmptyCell,
    /// Boards need at least 2x2 cells so a fresh game can hold two tiles
    TooSmall(usize),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEmptyCell => write!(f, "no empty cell left to spawn a tile"),
            Self::TooSmall(size) => write!(f, "a {size}x{size} board is too small to play"),
        }
    }
}

impl std::error::Error for GridError {}

/// Square board of tiles, row-major. 0 is an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<u32>,
}

impl Grid {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build from nested rows. Returns `None` for empty, ragged or
    /// non-square input.
    pub fn from_rows(rows: &[Vec<u32>]) -> Option<Self> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row * self.size + col] = value;
    }

    pub fn row(&self, row: usize) -> &[u32] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    fn row_mut(&mut self, row: usize) -> &mut [u32] {
        &mut self.cells[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.size.max(1)).map(<[u32]>::to_vec).collect()
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Sum of every tile; this is the game's score after a move
    pub fn sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// Empty cells as (row, col), in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&0)
    }

    /// Largest tile on the board
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            let line: Vec<String> = row
                .iter()
                .map(|&v| if v == 0 { format!("{:>5}", ".") } else { format!("{v:>5}") })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}

/// Drop zeros, left-pack the rest, pad with zeros to the original length
pub fn compress(row: &[u32]) -> Vec<u32> {
    let mut packed: Vec<u32> = row.iter().copied().filter(|&v| v != 0).collect();
    packed.resize(row.len(), 0);
    packed
}

/// Single left-to-right pass: an equal non-zero pair doubles into the left
/// cell and zeroes the right one. A freshly doubled cell is never merged again
/// in the same pass because its right neighbour has just become 0.
pub fn merge(row: &mut [u32]) {
    for i in 0..row.len().saturating_sub(1) {
        if row[i] != 0 && row[i] == row[i + 1] {
            row[i] *= 2;
            row[i + 1] = 0;
        }
    }
}

/// The merge primitive: compress, then one merge pass. Merges can leave
/// gaps (`[2,2,2,2]` becomes `[4,0,4,0]`); the next move closes them.
pub fn slide_left(row: &[u32]) -> Vec<u32> {
    let mut row = compress(row);
    merge(&mut row);
    row
}

/// 90 degrees counter-clockwise: new[i][j] = old[j][n - 1 - i]
pub fn rotate_left(grid: &Grid) -> Grid {
    let n = grid.size;
    let mut rotated = Grid::empty(n);
    for i in 0..n {
        for j in 0..n {
            rotated.set(i, j, grid.get(j, n - 1 - i));
        }
    }
    rotated
}

fn rotate_left_times(grid: &Grid, times: usize) -> Grid {
    let mut out = grid.clone();
    for _ in 0..times % 4 {
        out = rotate_left(&out);
    }
    out
}

fn move_left(grid: &Grid) -> Grid {
    let mut out = grid.clone();
    for r in 0..grid.size {
        let slid = slide_left(grid.row(r));
        out.row_mut(r).copy_from_slice(&slid);
    }
    out
}

fn move_right(grid: &Grid) -> Grid {
    let mut out = grid.clone();
    for r in 0..grid.size {
        let mut reversed = grid.row(r).to_vec();
        reversed.reverse();
        let mut slid = slide_left(&reversed);
        slid.reverse();
        out.row_mut(r).copy_from_slice(&slid);
    }
    out
}

/// Apply a move without spawning. Rotation counts always sum to four, so the
/// board comes back in its original orientation.
pub fn move_grid(direction: Direction, grid: &Grid) -> Grid {
    match direction {
        Direction::Left => move_left(grid),
        Direction::Right => move_right(grid),
        // Counter-clockwise once puts the top row on the left
        Direction::Up => rotate_left_times(&move_left(&rotate_left_times(grid, 1)), 3),
        // Three times (clockwise once) puts the bottom row on the left
        Direction::Down => rotate_left_times(&move_left(&rotate_left_times(grid, 3)), 1),
    }
}

/// True when no cell is empty and no two orthogonal neighbours are equal
pub fn is_terminal(grid: &Grid) -> bool {
    if !grid.is_full() {
        return false;
    }
    let n = grid.size;
    for r in 0..n {
        for c in 0..n {
            let v = grid.get(r, c);
            if c + 1 < n && grid.get(r, c + 1) == v {
                return false;
            }
            if r + 1 < n && grid.get(r + 1, c) == v {
                return false;
            }
        }
    }
    true
}

/// Place a 2 (probability `two_probability`) or a 4 on a uniformly chosen
/// empty cell. Returns the cell that was filled.
pub fn spawn_random_tile<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    two_probability: f64,
) -> Result<(usize, usize), GridError> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return Err(GridError::NoEmptyCell);
    }
    let (row, col) = empty[rng.random_range(0..empty.len())];
    let value = if rng.random_bool(two_probability) { 2 } else { 4 };
    grid.set(row, col, value);
    Ok((row, col))
}
