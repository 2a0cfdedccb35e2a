use serde::{Deserialize, Serialize};

use super::grid::Cell;

/// Render color as red, green, blue, alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }
}

/// Colors used by the board
pub mod palette {
    use super::Rgba;

    pub const HEAD: Rgba = Rgba::new(0, 255, 0, 0);
    pub const SEGMENT: Rgba = Rgba::new(255, 255, 255, 0);
    pub const HUNGRY: Rgba = Rgba::new(255, 165, 0, 0);
    pub const FOOD: Rgba = Rgba::new(255, 0, 0, 0);
    pub const OBSTACLE: Rgba = Rgba::new(169, 169, 169, 0);
    pub const TITLE: Rgba = Rgba::new(255, 100, 0, 255);
}

/// Anything that sits on a board cell
pub trait Positioned {
    fn position(&self) -> Cell;
}

impl Positioned for Cell {
    fn position(&self) -> Cell {
        *self
    }
}

/// A colored occupant of one cell: head, body segment, food or obstacle.
/// The role comes from where the entity is stored, not from the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Cell,
    pub color: Rgba,
}

impl Entity {
    pub fn new(position: Cell, color: Rgba) -> Self {
        Self { position, color }
    }

    pub fn head(position: Cell) -> Self {
        Self::new(position, palette::HEAD)
    }

    pub fn segment(position: Cell) -> Self {
        Self::new(position, palette::SEGMENT)
    }

    pub fn food(position: Cell) -> Self {
        Self::new(position, palette::FOOD)
    }

    pub fn obstacle(position: Cell) -> Self {
        Self::new(position, palette::OBSTACLE)
    }
}

impl Positioned for Entity {
    fn position(&self) -> Cell {
        self.position
    }
}
