//! Tictac Core - 5x5 tic-tac-toe engine and opponent
//!
//! This crate provides the game logic, independent of any front end:
//! - Board geometry and line checks (rows, columns, two main diagonals)
//! - Game state with a per-move deadline that forfeits the player to move
//! - Single-ply heuristic opponent (win-or-block, corners, random)
//! - Session driver for restart, mode switch and the opponent's reply
//!
//! Time is always passed in explicitly as an [`std::time::Instant`], so the
//! host decides how often to poll.

pub mod board;
pub mod error;
pub mod game;
pub mod ai;
pub mod config;
pub mod session;

// Re-exports for convenient access
pub use board::{check_winner, is_full, Board, Cell, Player, Pos, BOARD_SIZE, CORNERS, NUM_CELLS};
pub use error::MoveError;
pub use game::{GameMode, GameState, MoveReport, Snapshot, Status, Winner, TIME_LIMIT};
pub use ai::{plan, HeuristicOpponent, Opponent, Plan, RandomOpponent, ScanOrder};
pub use config::{GameConfig, OpponentConfig};
pub use session::{Session, TurnReport};
