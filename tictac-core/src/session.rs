//! Driving loop: human input, opponent reply, restart and mode switch

use std::time::Instant;

use tracing::info;

use crate::ai::Opponent;
use crate::board::{Player, Pos};
use crate::config::GameConfig;
use crate::error::{MoveError, Result};
use crate::game::{GameMode, GameState, MoveReport};

/// Outcome of one human move, including the opponent's reply if any
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub human: MoveReport,
    pub reply: Option<Pos>,
}

/// One player's seat at the board: owns the current game and the opponent.
///
/// Restart and mode switch replace the [`GameState`] wholesale.
pub struct Session<P: Opponent> {
    config: GameConfig,
    state: GameState,
    opponent: P,
}

impl<P: Opponent> Session<P> {
    pub fn new(config: GameConfig, opponent: P, now: Instant) -> Self {
        let state = GameState::with_time_limit(config.mode, config.time_limit(), now);
        Self {
            config,
            state,
            opponent,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Discard the current game and start a fresh one in the same mode
    pub fn restart(&mut self, now: Instant) {
        info!(mode = %self.mode(), "restarting game");
        self.state = GameState::with_time_limit(self.mode(), self.config.time_limit(), now);
    }

    /// Switch mode; a change always starts a fresh game
    pub fn set_mode(&mut self, mode: GameMode, now: Instant) {
        if mode == self.mode() {
            return;
        }
        info!(from = %self.mode(), to = %mode, "switching mode");
        self.config.mode = mode;
        self.state = GameState::with_time_limit(mode, self.config.time_limit(), now);
    }

    /// Whether clicks from the human should currently be accepted
    pub fn human_can_move(&self) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        match self.mode() {
            GameMode::MultiPlayer => true,
            GameMode::SinglePlayer => self.state.turn() == Player::X,
        }
    }

    /// Periodic refresh: records a timeout forfeit if the deadline passed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.state.check_timeout(now)
    }

    /// Apply a human move, then let the opponent answer in single-player mode.
    ///
    /// An expired deadline is judged before the cell, so a late click forfeits
    /// even when it lands on an occupied or off-board cell.
    pub fn human_move(&mut self, row: usize, col: usize, now: Instant) -> Result<TurnReport> {
        let player = self.state.turn();
        if self.state.check_timeout(now) {
            return Err(MoveError::TimedOut { forfeited: player });
        }
        let human = self.state.try_apply_move(Pos::new(row, col), now)?;
        let reply = self.opponent_turn(now);
        Ok(TurnReport { human, reply })
    }

    /// Let the opponent move if it is O's turn in single-player mode
    pub fn opponent_turn(&mut self, now: Instant) -> Option<Pos> {
        self.state.opponent_turn(&mut self.opponent, now)
    }
}
