// 8x8 signed-integer board mirrored from engine moves. No legality checks: the engine owns the rules.
pub mod notation;

use crate::error::BoardError;
use log::{info, warn};
use serde::Serialize;
use std::fmt;

pub use notation::{Square, UciMove};

pub const SIZE: usize = 8;
/// Index of the evaluation slot in [`BoardState::snapshot_flat`].
pub const EVAL_SLOT: usize = 64;

pub type Grid = [[i8; SIZE]; SIZE];
pub type FlatBoard = [i32; SIZE * SIZE + 1];

pub const EMPTY: i8 = 0;
pub const EMPTY_CHAR: char = '*';

const START: Grid = [
    [-2, -3, -4, -5, -6, -4, -3, -2],
    [-1, -1, -1, -1, -1, -1, -1, -1],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [2, 3, 4, 5, 6, 4, 3, 2],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum PieceKind {
    Pawn = 1,
    Rook = 2,
    Knight = 3,
    Bishop = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    pub fn code(self) -> i8 { self as i8 }

    pub fn from_code(code: i8) -> Option<Self> {
        match code.unsigned_abs() {
            1 => Some(Self::Pawn),
            2 => Some(Self::Rook),
            3 => Some(Self::Knight),
            4 => Some(Self::Bishop),
            5 => Some(Self::Queen),
            6 => Some(Self::King),
            _ => None,
        }
    }

    /// Lowercase letter, as used both by the renderer and by UCI promotion suffixes.
    pub fn letter(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Rook => 'r',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Self::Pawn),
            'r' => Some(Self::Rook),
            'n' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'q' => Some(Self::Queen),
            'k' => Some(Self::King),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self { Self::White => Self::Black, Self::Black => Self::White }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Self::White => "White", Self::Black => "Black" })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Normal,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion,
}

/// What [`BoardState::make_move_uci`] did to the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedMove {
    pub mv: UciMove,
    pub piece: i8,
    pub captured: Option<i8>,
    pub kind: MoveKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    grid: Grid,
    turn: Player,
}

impl Default for BoardState {
    fn default() -> Self { Self::startpos() }
}

fn check(row: usize, col: usize) -> Result<(), BoardError> {
    if row < SIZE && col < SIZE { Ok(()) } else { Err(BoardError::InvalidCoordinates { row, col }) }
}

fn piece_char(code: i8) -> char {
    match PieceKind::from_code(code) {
        Some(kind) if code > 0 => kind.letter().to_ascii_uppercase(),
        Some(kind) => kind.letter(),
        None => EMPTY_CHAR,
    }
}

/// One line per row, uppercase White, lowercase Black, `*` for empty squares.
pub fn render_grid(grid: &Grid) -> String {
    let mut s = String::with_capacity(SIZE * (SIZE + 1));
    for cells in grid {
        s.extend(cells.iter().map(|&c| piece_char(c)));
        s.push('\n');
    }
    s
}

impl BoardState {
    pub fn startpos() -> Self { Self { grid: START, turn: Player::White } }

    pub fn empty() -> Self { Self { grid: [[EMPTY; SIZE]; SIZE], turn: Player::White } }

    /// Replays a move history from the starting position, stopping at the first rejected move.
    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, BoardError> {
        let mut board = Self::startpos();
        for m in moves {
            board.make_move_uci(m)?;
            board.advance_turn();
        }
        Ok(board)
    }

    /// Independent copy of the grid.
    pub fn snapshot(&self) -> Grid { self.grid }

    /// Row-major squares in 0..64; slot 64 is reserved for an external evaluation and left at zero.
    pub fn snapshot_flat(&self) -> FlatBoard {
        let mut flat = [0i32; SIZE * SIZE + 1];
        for (row, cells) in self.grid.iter().enumerate() {
            for (col, &code) in cells.iter().enumerate() {
                flat[row * SIZE + col] = code as i32;
            }
        }
        flat
    }

    pub fn piece_at(&self, row: usize, col: usize) -> Result<i8, BoardError> {
        check(row, col)?;
        Ok(self.grid[row][col])
    }

    /// Relocates the piece on (from_row, from_col). A king leaving file 4 for file 6 or 2 on
    /// the same row castles: the corner rook lands next to it. The destination is overwritten.
    pub fn move_piece(&mut self, from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> Result<MoveKind, BoardError> {
        if let Err(e) = check(from_row, from_col).and_then(|_| check(to_row, to_col)) {
            warn!("move ({from_row},{from_col})->({to_row},{to_col}) rejected: {e}");
            return Err(e);
        }
        let piece = self.grid[from_row][from_col];
        if piece == EMPTY {
            let e = BoardError::EmptySquare { row: from_row, col: from_col };
            warn!("{e}");
            return Err(e);
        }

        if piece.abs() == PieceKind::King.code() && from_col == 4 && from_row == to_row && (to_col == 6 || to_col == 2) {
            let (rook_from, rook_to, kind) = if to_col == 6 {
                (7, 5, MoveKind::CastleKingside)
            } else {
                (0, 3, MoveKind::CastleQueenside)
            };
            let row = &mut self.grid[from_row];
            row[4] = EMPTY;
            row[to_col] = piece;
            row[rook_from] = EMPTY;
            row[rook_to] = PieceKind::Rook.code() * piece.signum();
            info!("castling executed: {kind:?} on row {from_row}");
            return Ok(kind);
        }

        self.grid[from_row][from_col] = EMPTY;
        self.grid[to_row][to_col] = piece;
        Ok(MoveKind::Normal)
    }

    /// Clears a square, returning what was on it.
    pub fn remove_piece(&mut self, row: usize, col: usize) -> Result<i8, BoardError> {
        if let Err(e) = check(row, col) {
            warn!("remove rejected: {e}");
            return Err(e);
        }
        Ok(std::mem::replace(&mut self.grid[row][col], EMPTY))
    }

    pub fn add_piece(&mut self, row: usize, col: usize, code: i8) -> Result<(), BoardError> {
        let res = check(row, col).and_then(|_| {
            if (-6..=6).contains(&code) { Ok(()) } else { Err(BoardError::InvalidPiece(code)) }
        });
        if let Err(e) = res {
            warn!("add rejected: {e}");
            return Err(e);
        }
        self.grid[row][col] = code;
        Ok(())
    }

    pub fn advance_turn(&mut self) { self.turn = self.turn.opponent(); }

    pub fn current_turn(&self) -> Player { self.turn }

    /// Applies an engine move such as `e2e4`, `e1g1` or `e7e8q`.
    ///
    /// Besides [`move_piece`](Self::move_piece) this completes the two compound pawn moves an
    /// engine can emit: a diagonal pawn step onto an empty square removes the pawn passed
    /// (en passant), and a promotion suffix swaps the pawn for the named piece.
    /// The turn indicator is not touched.
    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<AppliedMove, BoardError> {
        let mv: UciMove = match mv_uci.parse() {
            Ok(mv) => mv,
            Err(e) => {
                warn!("{e}");
                return Err(e);
            }
        };
        let (from, to) = (mv.from, mv.to);
        let piece = self.grid[from.row][from.col];
        let target = self.grid[to.row][to.col];
        let is_pawn = piece.abs() == PieceKind::Pawn.code();
        let en_passant = is_pawn && from.col != to.col && target == EMPTY;

        let mut kind = self.move_piece(from.row, from.col, to.row, to.col)?;
        let mut captured = (target != EMPTY).then_some(target);

        if en_passant {
            let passed = self.grid[from.row][to.col];
            if passed == -piece {
                self.grid[from.row][to.col] = EMPTY;
                captured = Some(passed);
                kind = MoveKind::EnPassant;
            }
        }
        if let (Some(promo), true) = (mv.promotion, is_pawn) {
            self.grid[to.row][to.col] = promo.code() * piece.signum();
            kind = MoveKind::Promotion;
        }
        Ok(AppliedMove { mv, piece, captured, kind })
    }

    pub fn render(&self) -> String { render_grid(&self.grid) }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.render()) }
}
