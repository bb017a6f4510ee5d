//! Player color representation.

use serde::{Deserialize, Serialize};

/// Piece ownership.
///
/// The six player colors are split between the variants: the two-player
/// variants use White and Black, Chaturaji uses Red, Blue, Yellow and Green.
/// `Grey` marks the surviving pieces of an eliminated Chaturaji player and
/// `Special` is the Duck Chess duck, which belongs to nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
    Red = 2,
    Blue = 3,
    Yellow = 4,
    Green = 5,
    Grey = 6,
    Special = 7,
}

impl Color {
    /// All colors in order.
    pub const ALL: [Color; 8] = [
        Color::White,
        Color::Black,
        Color::Red,
        Color::Blue,
        Color::Yellow,
        Color::Green,
        Color::Grey,
        Color::Special,
    ];

    /// Players of the two-player variants, in turn order.
    pub const TWO_PLAYER: [Color; 2] = [Color::White, Color::Black];

    /// Players of Chaturaji, in turn order.
    pub const FOUR_PLAYER: [Color; 4] = [Color::Red, Color::Blue, Color::Yellow, Color::Green];

    /// Returns the index of this color (0-7).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the opponent in a two-player game.
    ///
    /// Colors without a single opponent are returned unchanged.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            other => other,
        }
    }

    /// Returns true for colors that take turns (everything except Grey and Special).
    #[inline]
    pub const fn is_player(self) -> bool {
        !matches!(self, Color::Grey | Color::Special)
    }

    /// Returns true for the four Chaturaji player colors.
    #[inline]
    pub const fn is_four_player(self) -> bool {
        matches!(
            self,
            Color::Red | Color::Blue | Color::Yellow | Color::Green
        )
    }

    /// Returns the `(row, col)` step a pawn of this color advances by.
    ///
    /// White and Red move up the board, Black and Yellow move down, Blue moves
    /// right and Green moves left. Grey and Special pieces never move as pawns.
    #[inline]
    pub const fn pawn_direction(self) -> (i8, i8) {
        match self {
            Color::White | Color::Red => (-1, 0),
            Color::Black | Color::Yellow => (1, 0),
            Color::Blue => (0, 1),
            Color::Green => (0, -1),
            Color::Grey | Color::Special => (0, 0),
        }
    }

    /// Returns the back row for the two-player colors (7 for White, 0 for Black).
    #[inline]
    pub const fn back_rank(self) -> Option<u8> {
        match self {
            Color::White => Some(7),
            Color::Black => Some(0),
            _ => None,
        }
    }

    /// Returns the lowercase name used in records and configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Grey => "grey",
            Color::Special => "special",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::White => "White",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::Grey => "Grey",
            Color::Special => "Special",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_color() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
        assert_eq!(Color::Red.opposite(), Color::Red);
    }

    #[test]
    fn pawn_direction() {
        assert_eq!(Color::White.pawn_direction(), (-1, 0));
        assert_eq!(Color::Red.pawn_direction(), (-1, 0));
        assert_eq!(Color::Black.pawn_direction(), (1, 0));
        assert_eq!(Color::Yellow.pawn_direction(), (1, 0));
        assert_eq!(Color::Blue.pawn_direction(), (0, 1));
        assert_eq!(Color::Green.pawn_direction(), (0, -1));
    }

    #[test]
    fn players() {
        assert!(Color::White.is_player());
        assert!(Color::Green.is_player());
        assert!(!Color::Grey.is_player());
        assert!(!Color::Special.is_player());
        assert!(Color::Blue.is_four_player());
        assert!(!Color::Black.is_four_player());
    }

    #[test]
    fn back_rank() {
        assert_eq!(Color::White.back_rank(), Some(7));
        assert_eq!(Color::Black.back_rank(), Some(0));
        assert_eq!(Color::Red.back_rank(), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Color::White), "White");
        assert_eq!(format!("{}", Color::Grey), "Grey");
        assert_eq!(Color::Yellow.name(), "yellow");
    }
}
