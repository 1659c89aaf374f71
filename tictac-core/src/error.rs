use thiserror::Error;

use crate::board::{Player, Pos};

/// Reasons a move attempt was ignored.
///
/// None of these are failures of the engine: stale or duplicate input is
/// expected from a UI, and the state is left untouched in every case except
/// `TimedOut`, where the forfeit itself is recorded.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,

    #[error("position {0} is off the board")]
    OutOfBounds(Pos),

    #[error("cell {0} is already occupied")]
    Occupied(Pos),

    #[error("player {forfeited} ran out of time")]
    TimedOut { forfeited: Player },
}

/// Convenience Result type for move application
pub type Result<T> = std::result::Result<T, MoveError>;
