//! Single-ply heuristic opponent

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::board::{check_winner, Board, Player, Pos, CORNERS};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Seed used when none is supplied
const DEFAULT_SEED: u64 = 42;

/// Symbol order of the win-or-block scan under [`ScanOrder::Fixed`]
const FIXED_SCAN_ORDER: [Player; 2] = [Player::O, Player::X];

// ============================================================================
// OPPONENT TRAIT
// ============================================================================

/// A move-selection policy that can play either side
pub trait Opponent {
    /// Pick an empty cell for `me`, or None when the board is full
    fn choose_move(&mut self, board: &Board, me: Player) -> Option<Pos>;
}

// ============================================================================
// PLAN
// ============================================================================

/// Order in which symbols are tried during the win-or-block scan
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanOrder {
    /// O first, then X, whichever side is playing
    #[default]
    Fixed,
    /// The playing side first, then its opponent
    SelfFirst,
}

impl ScanOrder {
    fn symbols(self, me: Player, opponent: Player) -> [Player; 2] {
        match self {
            ScanOrder::Fixed => FIXED_SCAN_ORDER,
            ScanOrder::SelfFirst => [me, opponent],
        }
    }
}

/// Deterministic part of the heuristic: which cells are candidates
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    /// A cell that completes a line for one of the symbols
    Decisive(Pos),
    /// Empty corners, choose uniformly
    Corners(Vec<Pos>),
    /// All empty cells, choose uniformly
    Any(Vec<Pos>),
    /// Board is full
    NoMove,
}

impl Plan {
    /// Every cell this plan may return
    pub fn candidates(&self) -> Vec<Pos> {
        match self {
            Plan::Decisive(pos) => vec![*pos],
            Plan::Corners(cells) | Plan::Any(cells) => cells.clone(),
            Plan::NoMove => Vec::new(),
        }
    }
}

/// Compute the candidate set without consuming randomness.
///
/// Step 1 scans symbol by symbol in `order`, and for each symbol the empty
/// cells in row-major order; the first completing cell wins. Which side
/// gets priority when both a win and a block exist depends on `order`.
pub fn plan(board: &Board, me: Player, opponent: Player, order: ScanOrder) -> Plan {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return Plan::NoMove;
    }

    for symbol in order.symbols(me, opponent) {
        if let Some(&pos) = empty.iter().find(|&&pos| {
            board
                .with_move(pos, symbol)
                .is_some_and(|next| check_winner(&next, symbol))
        }) {
            return Plan::Decisive(pos);
        }
    }

    let corners: Vec<Pos> = CORNERS
        .iter()
        .copied()
        .filter(|pos| empty.contains(pos))
        .collect();
    if !corners.is_empty() {
        return Plan::Corners(corners);
    }

    Plan::Any(empty)
}

// ============================================================================
// HEURISTIC OPPONENT
// ============================================================================

/// Win-or-block, then corners, then any cell
pub struct HeuristicOpponent {
    pub scan_order: ScanOrder,
    rng: ChaCha8Rng,
}

impl HeuristicOpponent {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            scan_order: ScanOrder::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy, for interactive play
    pub fn from_entropy() -> Self {
        Self {
            scan_order: ScanOrder::default(),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_scan_order(mut self, scan_order: ScanOrder) -> Self {
        self.scan_order = scan_order;
        self
    }

    /// Choose a move for `me` against `opponent`
    pub fn choose(&mut self, board: &Board, me: Player, opponent: Player) -> Option<Pos> {
        let plan = plan(board, me, opponent, self.scan_order);
        trace!(?plan, "heuristic plan");
        match plan {
            Plan::Decisive(pos) => Some(pos),
            Plan::Corners(cells) | Plan::Any(cells) => cells.choose(&mut self.rng).copied(),
            Plan::NoMove => None,
        }
    }
}

impl Default for HeuristicOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for HeuristicOpponent {
    fn choose_move(&mut self, board: &Board, me: Player) -> Option<Pos> {
        self.choose(board, me, me.opponent())
    }
}

// ============================================================================
// RANDOM OPPONENT
// ============================================================================

/// Uniformly random empty cell; baseline for self-play
pub struct RandomOpponent {
    rng: ChaCha8Rng,
}

impl RandomOpponent {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Opponent for RandomOpponent {
    fn choose_move(&mut self, board: &Board, _me: Player) -> Option<Pos> {
        board.empty_cells().choose(&mut self.rng).copied()
    }
}

// ============================================================================
// TESTS
// ============================================================================
