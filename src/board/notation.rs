use super::{PieceKind, SIZE};
use crate::error::BoardError;
use std::fmt;
use std::str::FromStr;

/// Grid coordinates of a square. Rank 8 is row 0, rank 1 is row 7; file a is column 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < SIZE && col < SIZE).then_some(Self { row, col })
    }

    fn from_chars(file: char, rank: char) -> Option<Self> {
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) { return None; }
        let col = file as usize - 'a' as usize;
        let row = SIZE - (rank as usize - '0' as usize);
        Some(Self { row, col })
    }

    pub fn file_char(self) -> char { (b'a' + self.col as u8) as char }

    pub fn rank_char(self) -> char { (b'0' + (SIZE - self.row) as u8) as char }
}

impl FromStr for Square {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => Self::from_chars(f, r),
            _ => None,
        }
        .ok_or_else(|| BoardError::InvalidNotation(s.to_string()))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// Coordinate move as exchanged with the engine: `e2e4`, or `e7e8q` with a promotion suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl FromStr for UciMove {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BoardError::InvalidNotation(s.to_string());
        let c: Vec<char> = s.trim().chars().collect();
        if c.len() != 4 && c.len() != 5 { return Err(bad()); }
        let from = Square::from_chars(c[0], c[1]).ok_or_else(bad)?;
        let to = Square::from_chars(c[2], c[3]).ok_or_else(bad)?;
        let promotion = match c.get(4) {
            None => None,
            Some(&p) => match PieceKind::from_letter(p) {
                Some(k @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => Some(k),
                _ => return Err(bad()),
            },
        };
        if from == to { return Err(bad()); }
        Ok(Self { from, to, promotion })
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion { write!(f, "{}", p.letter())?; }
        Ok(())
    }
}
