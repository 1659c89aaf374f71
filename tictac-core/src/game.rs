//! Game state, move application and timeout forfeiture

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::Opponent;
use crate::board::{check_winner, is_full, Board, Player, Pos};
use crate::error::{MoveError, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Per-move deadline
pub const TIME_LIMIT: Duration = Duration::from_secs(5);

// ============================================================================
// CORE TYPES
// ============================================================================

/// Who controls O
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Human plays X, the opponent heuristic plays O
    #[default]
    SinglePlayer,
    /// Two humans share the board
    MultiPlayer,
}

impl GameMode {
    pub fn toggled(self) -> Self {
        match self {
            GameMode::SinglePlayer => GameMode::MultiPlayer,
            GameMode::MultiPlayer => GameMode::SinglePlayer,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::SinglePlayer => write!(f, "Single Player"),
            GameMode::MultiPlayer => write!(f, "Multi Player"),
        }
    }
}

/// Recorded winner of a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    X,
    O,
    Tie,
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Winner::X,
            Player::O => Winner::O,
        }
    }
}

/// Position in the game state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    Won(Player),
    Tie,
    /// The player to move ran out of time; `winner` is the other side
    Forfeit { winner: Player },
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::InProgress
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::InProgress => write!(f, "In progress"),
            Status::Won(player) => write!(f, "Player {} wins!", player),
            Status::Tie => write!(f, "It's a tie!"),
            Status::Forfeit { winner } => write!(
                f,
                "Player {} wins! (Player {} ran out of time)",
                winner,
                winner.opponent()
            ),
        }
    }
}

/// Result of a successfully applied move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub pos: Pos,
    pub player: Player,
    pub status: Status,
}

/// Read-only view for hosts that render JSON
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub turn: Player,
    pub sign: u32,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub status: Status,
    pub mode: GameMode,
    pub remaining_secs: f64,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Complete state of one game.
///
/// Mutated only through [`GameState::apply_move`] (or its reporting twin
/// [`GameState::try_apply_move`]) and [`GameState::check_timeout`].
/// Restarting or switching mode replaces the whole value.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    turn: Player,
    /// Number of moves made so far
    sign: u32,
    game_over: bool,
    winner: Option<Winner>,
    forfeited: bool,
    last_move_at: Instant,
    mode: GameMode,
    time_limit: Duration,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Fresh game with the standard five-second deadline
    pub fn new(mode: GameMode, now: Instant) -> Self {
        Self::with_time_limit(mode, TIME_LIMIT, now)
    }

    pub fn with_time_limit(mode: GameMode, time_limit: Duration, now: Instant) -> Self {
        Self {
            board: Board::new(),
            turn: Player::X,
            sign: 0,
            game_over: false,
            winner: None,
            forfeited: false,
            last_move_at: now,
            mode,
            time_limit,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player whose move it is
    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn sign(&self) -> u32 {
        self.sign
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn last_move_at(&self) -> Instant {
        self.last_move_at
    }

    pub fn status(&self) -> Status {
        match (self.winner, self.forfeited) {
            (None, _) => Status::InProgress,
            (Some(Winner::Tie), _) => Status::Tie,
            (Some(Winner::X), true) => Status::Forfeit { winner: Player::X },
            (Some(Winner::O), true) => Status::Forfeit { winner: Player::O },
            (Some(Winner::X), false) => Status::Won(Player::X),
            (Some(Winner::O), false) => Status::Won(Player::O),
        }
    }

    /// Time since the last move; a clock that went backwards counts as zero
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_move_at)
    }

    /// Time left for the current move, never negative
    pub fn remaining(&self, now: Instant) -> Duration {
        self.time_limit.saturating_sub(self.elapsed(now))
    }

    pub fn snapshot(&self, now: Instant) -> Snapshot {
        Snapshot {
            board: self.board,
            turn: self.turn,
            sign: self.sign,
            game_over: self.game_over,
            winner: self.winner,
            status: self.status(),
            mode: self.mode,
            remaining_secs: self.remaining(now).as_secs_f64(),
        }
    }

    // ========================================================================
    // TIMEOUT
    // ========================================================================

    /// Forfeit the player to move if the deadline has passed.
    ///
    /// Returns true if this call ended the game. `sign` decides who was on
    /// the clock: even means X, odd means O.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        if self.game_over {
            return false;
        }
        if self.elapsed(now) <= self.time_limit {
            return false;
        }

        let forfeited = if self.sign % 2 == 0 { Player::X } else { Player::O };
        let winner = forfeited.opponent();
        self.winner = Some(winner.into());
        self.forfeited = true;
        self.game_over = true;

        info!(
            forfeited = %forfeited,
            winner = %winner,
            sign = self.sign,
            "move timer expired"
        );
        true
    }

    // ========================================================================
    // MOVE APPLICATION
    // ========================================================================

    /// Apply a move for the player to move, ignoring invalid attempts.
    ///
    /// Returns true if the move was placed. Off-board, occupied, late and
    /// post-game moves leave the state unchanged (apart from recording a
    /// timeout forfeit).
    pub fn apply_move(&mut self, row: usize, col: usize, now: Instant) -> bool {
        match self.try_apply_move(Pos::new(row, col), now) {
            Ok(_) => true,
            Err(err) => {
                debug!(row, col, reason = %err, "move ignored");
                false
            }
        }
    }

    /// Same as [`GameState::apply_move`] but reports why a move was ignored
    pub fn try_apply_move(&mut self, pos: Pos, now: Instant) -> Result<MoveReport> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        if !pos.is_valid() {
            return Err(MoveError::OutOfBounds(pos));
        }
        if !self.board.get(pos).is_some_and(|cell| cell.is_empty()) {
            return Err(MoveError::Occupied(pos));
        }

        let player = self.turn;
        if self.check_timeout(now) {
            return Err(MoveError::TimedOut { forfeited: player });
        }

        self.board.set(pos, player.into());
        self.sign += 1;
        self.last_move_at = now;
        debug!(player = %player, row = pos.row, col = pos.col, sign = self.sign, "move applied");

        self.resolve_after_move(player);

        Ok(MoveReport {
            pos,
            player,
            status: self.status(),
        })
    }

    fn resolve_after_move(&mut self, player: Player) {
        if check_winner(&self.board, player) {
            self.winner = Some(player.into());
            self.game_over = true;
            info!(winner = %player, sign = self.sign, "line completed");
            return;
        }
        if is_full(&self.board) {
            self.winner = Some(Winner::Tie);
            self.game_over = true;
            info!(sign = self.sign, "board full, tie");
            return;
        }
        self.turn = player.opponent();
    }

    /// Let `opponent` play O in single-player mode.
    ///
    /// Does nothing in multi-player mode, on X's turn, after the game ended,
    /// or when the opponent has no move. Returns the position played.
    pub fn opponent_turn<P: Opponent + ?Sized>(
        &mut self,
        opponent: &mut P,
        now: Instant,
    ) -> Option<Pos> {
        if self.game_over || self.mode != GameMode::SinglePlayer || self.turn != Player::O {
            return None;
        }

        let pos = opponent.choose_move(&self.board, Player::O)?;
        debug!(row = pos.row, col = pos.col, "opponent chose move");
        self.try_apply_move(pos, now).ok().map(|report| report.pos)
    }
}

// ============================================================================
// TESTS
// ============================================================================
