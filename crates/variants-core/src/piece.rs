//! Chess piece representation.

use crate::{Color, Location, Square};
use serde::{Deserialize, Serialize};

/// The kinds of pieces used across the variants.
///
/// `Boat` is the Chaturaji rook analogue (it slides like a rook but never
/// castles) and `Duck` is the Duck Chess blocker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Rook = 1,
    Knight = 2,
    Bishop = 3,
    Queen = 4,
    King = 5,
    Boat = 6,
    Duck = 7,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 8] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Boat,
        PieceKind::Duck,
    ];

    /// Piece kinds that can be held in a Crazyhouse reserve.
    pub const RESERVE: [PieceKind; 5] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    /// Returns the index of this piece kind (0-7).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the placement character for this piece with the given color.
    ///
    /// White pieces are uppercase, everything else lowercase. The duck is `*`.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
            PieceKind::Boat => 'o',
            PieceKind::Duck => return '*',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            _ => c,
        }
    }

    /// Parses a placement character into a piece kind and color.
    ///
    /// Uppercase letters are White, lowercase Black, `*` is the duck.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        if c == '*' {
            return Some((PieceKind::Duck, Color::Special));
        }
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'r' => PieceKind::Rook,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            'o' => PieceKind::Boat,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Returns true if this piece slides along lines.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(
            self,
            PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen | PieceKind::Boat
        )
    }

    /// Returns the piece a pawn of the given color promotes to by default.
    #[inline]
    pub const fn default_promotion(color: Color) -> PieceKind {
        if color.is_four_player() {
            PieceKind::Boat
        } else {
            PieceKind::Queen
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Rook => "Rook",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
            PieceKind::Boat => "Boat",
            PieceKind::Duck => "Duck",
        };
        write!(f, "{}", name)
    }
}

/// A piece together with its owner, location, and movement history.
///
/// Pieces are plain values owned by the board grid. The board keeps
/// `location` in step with the square the piece occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub location: Location,
    pub has_moved: bool,
}

impl Piece {
    /// Creates an unmoved piece standing on `square`.
    pub const fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Piece {
            kind,
            color,
            location: Location::OnBoard(square),
            has_moved: false,
        }
    }

    /// Creates a piece that is held off-board.
    pub const fn in_reserve(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            location: Location::InReserve,
            has_moved: false,
        }
    }

    /// Returns the square the piece stands on, if any.
    #[inline]
    pub const fn square(&self) -> Option<Square> {
        self.location.square()
    }

    /// Returns true if the piece is held off-board.
    #[inline]
    pub const fn is_in_reserve(&self) -> bool {
        matches!(self.location, Location::InReserve)
    }

    /// Moves the piece to `square` and marks it as moved.
    #[inline]
    pub fn move_to(&mut self, square: Square) {
        self.location = Location::OnBoard(square);
        self.has_moved = true;
    }

    /// Returns the placement character for this piece.
    #[inline]
    pub const fn to_fen_char(&self) -> char {
        self.kind.to_fen_char(self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_to_fen() {
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::White), 'P');
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::Black), 'p');
        assert_eq!(PieceKind::Boat.to_fen_char(Color::Red), 'o');
        assert_eq!(PieceKind::Duck.to_fen_char(Color::Special), '*');
    }

    #[test]
    fn piece_from_fen() {
        assert_eq!(
            PieceKind::from_fen_char('K'),
            Some((PieceKind::King, Color::White))
        );
        assert_eq!(
            PieceKind::from_fen_char('n'),
            Some((PieceKind::Knight, Color::Black))
        );
        assert_eq!(
            PieceKind::from_fen_char('*'),
            Some((PieceKind::Duck, Color::Special))
        );
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }

    #[test]
    fn is_slider() {
        assert!(!PieceKind::Pawn.is_slider());
        assert!(!PieceKind::Knight.is_slider());
        assert!(PieceKind::Bishop.is_slider());
        assert!(PieceKind::Boat.is_slider());
        assert!(!PieceKind::King.is_slider());
        assert!(!PieceKind::Duck.is_slider());
    }

    #[test]
    fn default_promotion() {
        assert_eq!(PieceKind::default_promotion(Color::White), PieceKind::Queen);
        assert_eq!(PieceKind::default_promotion(Color::Green), PieceKind::Boat);
    }

    #[test]
    fn move_to_marks_moved() {
        let e2 = Square::from_algebraic("e2").unwrap();
        let e4 = Square::from_algebraic("e4").unwrap();
        let mut pawn = Piece::new(PieceKind::Pawn, Color::White, e2);
        assert!(!pawn.has_moved);
        pawn.move_to(e4);
        assert_eq!(pawn.square(), Some(e4));
        assert!(pawn.has_moved);
    }

    #[test]
    fn reserve_piece() {
        let knight = Piece::in_reserve(PieceKind::Knight, Color::Black);
        assert!(knight.is_in_reserve());
        assert_eq!(knight.square(), None);
    }
}
