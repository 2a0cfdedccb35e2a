//! Core game logic module for Snake
//!
//! This module contains all the game rules without any I/O or rendering dependencies:
//! wrap-around movement, obstacle and self collisions, growth, hunger and scoring.

pub mod action;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod grid;
pub mod organism;
pub mod world;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use collision::occupied_by;
pub use config::{GameConfig, PartialConfig};
pub use entity::{Entity, Positioned, Rgba, palette};
pub use error::GameError;
pub use grid::{Cell, Grid, wrap};
pub use organism::{DeathCause, LifeState, MoveReport, Movement, Organism};
pub use world::{Snapshot, TickOutcome, WorldState, place_free_cell};
