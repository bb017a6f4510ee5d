//! Board square representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a square name cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid square: '{0}'")]
pub struct SquareError(pub String);

/// A square on the 8×8 board, addressed by row and column.
///
/// Row 0 is the top edge of the board (Black's back rank, rank 8 in
/// algebraic notation) and column 0 is the a-file. White pawns therefore
/// advance towards row 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Number of rows and columns on the board.
    pub const SIZE: u8 = 8;

    /// Creates a square from row and column, returning `None` when off-board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < Self::SIZE && col < Self::SIZE {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// Creates a square from an index (0-63, row-major from the top-left).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square {
                row: index / 8,
                col: index % 8,
            })
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Square::new(b'8' - rank, file - b'a')
    }

    /// Returns the row (0 = top).
    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Returns the column (0 = a-file).
    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the row-major index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Returns the square reached by stepping `(dr, dc)`, if it is on the board.
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row < 0 || col < 0 {
            return None;
        }
        Square::new(row as u8, col as u8)
    }

    /// Returns true when the square lies on the outer ring of the board.
    #[inline]
    pub const fn is_edge(self) -> bool {
        self.row == 0 || self.row == 7 || self.col == 0 || self.col == 7
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.col) as char, (b'8' - self.row) as char)
    }

    /// Iterates over all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(|i| Square {
            row: i / 8,
            col: i % 8,
        })
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl std::str::FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| SquareError(s.to_string()))
    }
}

impl TryFrom<String> for Square {
    type Error = SquareError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_algebraic()
    }
}

/// Where a piece currently lives.
///
/// Pieces held in a Crazyhouse reserve, and the duck before its first
/// placement, are `InReserve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    OnBoard(Square),
    InReserve,
}

impl Location {
    /// Returns the square if the location is on the board.
    #[inline]
    pub const fn square(self) -> Option<Square> {
        match self {
            Location::OnBoard(sq) => Some(sq),
            Location::InReserve => None,
        }
    }

    /// Returns true if the location is on the board.
    #[inline]
    pub const fn is_on_board(self) -> bool {
        matches!(self, Location::OnBoard(_))
    }
}

impl From<Square> for Location {
    fn from(sq: Square) -> Self {
        Location::OnBoard(sq)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::OnBoard(sq) => write!(f, "{}", sq),
            Location::InReserve => write!(f, "@"),
        }
    }
}
