//! Snake Grid - Snake on a wrap-around board with obstacles, hunger and a ranking
//!
//! This library provides:
//! - Core game rules (game module)
//! - Per-player best scores with persistence (ranking module)
//! - Keyboard mapping and the intent mailbox (input module)
//! - Terminal rendering (render module)
//! - The interactive game session (session module)

pub mod game;
pub mod input;
pub mod ranking;
pub mod render;
pub mod session;
