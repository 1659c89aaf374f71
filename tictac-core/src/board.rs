//! 5x5 grid geometry and pure line checks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Board side length
pub const BOARD_SIZE: usize = 5;

/// Total number of cells
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Corner cells, in row-major order
pub const CORNERS: [Pos; 4] = [
    Pos::new(0, 0),
    Pos::new(0, BOARD_SIZE - 1),
    Pos::new(BOARD_SIZE - 1, 0),
    Pos::new(BOARD_SIZE - 1, BOARD_SIZE - 1),
];

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player symbol
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// Contents of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

/// Board coordinate (row, col), zero-based
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if this position is on the board
    pub fn is_valid(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    pub fn is_corner(&self) -> bool {
        CORNERS.contains(self)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Pos::new(row, col)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// 5x5 grid of cells (copy to simulate)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at `pos`, or None if off the board
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        if !pos.is_valid() {
            return None;
        }
        Some(self.cells[pos.row][pos.col])
    }

    /// Overwrite a cell. Callers are responsible for bounds.
    pub(crate) fn set(&mut self, pos: Pos, cell: Cell) {
        self.cells[pos.row][pos.col] = cell;
    }

    /// Copy of this board with `player` placed at `pos`, or None if off the board
    pub fn with_move(&self, pos: Pos, player: Player) -> Option<Self> {
        if !pos.is_valid() {
            return None;
        }
        let mut next = *self;
        next.set(pos, player.into());
        Some(next)
    }

    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Pos> {
        self.positions()
            .filter(|&pos| self.cells[pos.row][pos.col].is_empty())
            .collect()
    }

    /// Number of non-empty cells
    pub fn filled(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    fn positions(&self) -> impl Iterator<Item = Pos> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Pos::new(row, col)))
    }

    /// Build a board from rows of `X`, `O` and `.` characters (test helper and fixtures)
    pub fn from_rows(rows: [&str; BOARD_SIZE]) -> Option<Self> {
        let mut board = Board::new();
        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != BOARD_SIZE {
                return None;
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                let cell = match symbol {
                    'X' | 'x' => Cell::X,
                    'O' | 'o' => Cell::O,
                    '.' | '_' => Cell::Empty,
                    _ => return None,
                };
                board.cells[row][col] = cell;
            }
        }
        Some(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{} ", row)?;
            for cell in cells {
                write!(f, " {}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// LINE CHECKS
// ============================================================================

/// True iff `player` fills a whole row, column, or one of the two main diagonals
pub fn check_winner(board: &Board, player: Player) -> bool {
    let target = Cell::from(player);
    let cells = &board.cells;

    let row_win = cells.iter().any(|row| row.iter().all(|&c| c == target));
    let col_win = (0..BOARD_SIZE).any(|col| (0..BOARD_SIZE).all(|row| cells[row][col] == target));
    let diag_win = (0..BOARD_SIZE).all(|i| cells[i][i] == target);
    let anti_win = (0..BOARD_SIZE).all(|i| cells[i][BOARD_SIZE - 1 - i] == target);

    row_win || col_win || diag_win || anti_win
}

/// True iff no cell is empty
pub fn is_full(board: &Board) -> bool {
    board.cells.iter().flatten().all(|cell| !cell.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let board = Board::new();
        assert_eq!(board.empty_cells().len(), NUM_CELLS);
        assert_eq!(board.filled(), 0);
        assert!(!is_full(&board));
        assert!(!check_winner(&board, Player::X));
        assert!(!check_winner(&board, Player::O));
    }

    #[test]
    fn test_row_and_column_wins() {
        let row = Board::from_rows([".....", ".....", "XXXXX", ".....", "....."]).unwrap();
        assert!(check_winner(&row, Player::X));
        assert!(!check_winner(&row, Player::O));

        let col = Board::from_rows(["...O.", "...O.", "...O.", "...O.", "...O."]).unwrap();
        assert!(check_winner(&col, Player::O));
        assert!(!check_winner(&col, Player::X));
    }

    #[test]
    fn test_diagonal_wins() {
        let main = Board::from_rows(["X....", ".X...", "..X..", "...X.", "....X"]).unwrap();
        assert!(check_winner(&main, Player::X));

        let anti = Board::from_rows(["....O", "...O.", "..O..", ".O...", "O...."]).unwrap();
        assert!(check_winner(&anti, Player::O));
    }

    #[test]
    fn test_mixed_lines_do_not_win() {
        let board = Board::from_rows(["XXXXO", "O....", ".O...", "..O..", "...X."]).unwrap();
        assert!(!check_winner(&board, Player::X));
        assert!(!check_winner(&board, Player::O));
    }

    #[test]
    fn test_four_in_a_row_is_not_a_win() {
        let board = Board::from_rows(["XXXX.", ".....", ".....", ".....", "....."]).unwrap();
        assert!(!check_winner(&board, Player::X));
        let completed = board.with_move(Pos::new(0, 4), Player::X).unwrap();
        assert!(check_winner(&completed, Player::X));
    }

    #[test]
    fn test_with_move_off_board() {
        let board = Board::new();
        assert_eq!(board.with_move(Pos::new(5, 0), Player::X), None);
        assert_eq!(board.with_move(Pos::new(0, 5), Player::O), None);

        let next = board.with_move(Pos::new(4, 4), Player::O).unwrap();
        assert_eq!(next.get(Pos::new(4, 4)), Some(Cell::O));
        // Source board is untouched
        assert_eq!(board.filled(), 0);
    }

    #[test]
    fn test_off_diagonal_is_not_a_win() {
        // Shifted diagonal of length 4 plus one stray cell
        let board = Board::from_rows([".X...", "..X..", "...X.", "....X", "X...."]).unwrap();
        assert!(!check_winner(&board, Player::X));
    }

    #[test]
    fn test_is_full() {
        let board = Board::from_rows(["XOXOX", "XOXOX", "OXOXO", "OXOXO", "XOXOX"]).unwrap();
        assert!(is_full(&board));
        assert_eq!(board.filled(), NUM_CELLS);
        assert!(board.empty_cells().is_empty());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.get(Pos::new(0, 0)), Some(Cell::Empty));
        assert_eq!(board.get(Pos::new(5, 0)), None);
        assert_eq!(board.get(Pos::new(0, 5)), None);
    }

    #[test]
    fn test_corners() {
        assert!(Pos::new(0, 0).is_corner());
        assert!(Pos::new(4, 4).is_corner());
        assert!(!Pos::new(2, 2).is_corner());
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert!(Board::from_rows(["XXXX", ".....", ".....", ".....", "....."]).is_none());
        assert!(Board::from_rows(["XXXXZ", ".....", ".....", ".....", "....."]).is_none());
    }
}
