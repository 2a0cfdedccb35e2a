use thiserror::Error;

/// Failures raised by the game engine.
///
/// Losing is not one of them: a dead snake is reported through
/// [`TickOutcome`](super::TickOutcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("({dx}, {dy}) is not a unit step along one axis")]
    InvalidDirection { dx: i32, dy: i32 },
    #[error("no free cell found after {attempts} attempts")]
    NoFreeCellAvailable { attempts: usize },
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
}
