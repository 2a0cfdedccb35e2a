//! Wrap-around arithmetic on the square board.
//!
//! Cells are addressed by a single index `0..side*side`, row-major:
//! `x = index % side`, `y = index / side`.

use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A single board location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell(pub usize);

impl Cell {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Adds `delta` to `value` and wraps into `0..size` using the non-negative modulus,
/// so stepping left from 0 lands on `size - 1`.
pub fn wrap(value: usize, delta: i32, size: usize) -> usize {
    (value as i64 + delta as i64).rem_euclid(size as i64) as usize
}

/// Square board with toroidal topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    side: usize,
}

impl Grid {
    pub fn new(side: usize) -> Self {
        Self { side }
    }

    /// Cells per row (and per column)
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn cell_count(&self) -> usize {
        self.side * self.side
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        Cell(y * self.side + x)
    }

    pub fn coords(&self, cell: Cell) -> (usize, usize) {
        (cell.0 % self.side, cell.0 / self.side)
    }

    /// The starting cell of a new snake
    pub fn center(&self) -> Cell {
        Cell(self.cell_count() / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 < self.cell_count()
    }

    /// Moves one cell in `direction`, wrapping around the edges.
    /// Only the axis the direction runs along changes.
    pub fn step(&self, cell: Cell, direction: Direction) -> Cell {
        let (x, y) = self.coords(cell);
        let (dx, dy) = direction.delta();

        match direction {
            Direction::Left | Direction::Right => self.cell(wrap(x, dx, self.side), y),
            Direction::Up | Direction::Down => self.cell(x, wrap(y, dy, self.side)),
        }
    }
}
