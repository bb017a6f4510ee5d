//! Move representation.

use crate::{Color, Location, Piece, PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tags for the kinds of transitions a move can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MoveKind {
    /// Ordinary move or capture.
    Normal = 0,
    /// King move of two squares with the rook hopping over.
    Castling = 1,
    /// Pawn capture of a pawn that just advanced two squares.
    EnPassant = 2,
    /// Pawn reaching the far edge.
    Promotion = 3,
    /// Duck relocation (Duck Chess second phase).
    Duck = 4,
    /// Reserve piece placed on the board (Crazyhouse).
    Drop = 5,
    /// A player's flag fell.
    Timeout = 6,
    /// A player resigned.
    Resign = 7,
    /// The game was drawn by agreement.
    Draw = 8,
}

impl MoveKind {
    /// Returns true for kinds that end a turn without touching the board.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, MoveKind::Timeout | MoveKind::Resign | MoveKind::Draw)
    }
}

/// One transition of the game.
///
/// `piece` is a snapshot of the mover taken before the move, so it still
/// carries its origin and its old `has_moved` flag. `captured` is the piece
/// removed by the move (for en passant it does not stand on `to`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: Piece,
    pub from: Location,
    pub to: Location,
    pub kind: MoveKind,
    pub captured: Option<Piece>,
    pub first_move: bool,
    pub promotion: Option<PieceKind>,
    pub drop: Option<PieceKind>,
}

impl Move {
    /// Creates a board move of `piece` from its current square to `to`.
    ///
    /// Returns `None` when the piece is not on the board.
    pub fn new(piece: Piece, to: Square, kind: MoveKind, captured: Option<Piece>) -> Option<Self> {
        let from = piece.square()?;
        Some(Move {
            piece,
            from: Location::OnBoard(from),
            to: Location::OnBoard(to),
            kind,
            captured,
            first_move: !piece.has_moved,
            promotion: None,
            drop: None,
        })
    }

    /// Creates a promotion of `pawn` to `target` on `to`.
    pub fn promotion(
        pawn: Piece,
        to: Square,
        target: PieceKind,
        captured: Option<Piece>,
    ) -> Option<Self> {
        let mut m = Move::new(pawn, to, MoveKind::Promotion, captured)?;
        m.promotion = Some(target);
        Some(m)
    }

    /// Creates a drop of a reserve piece onto an empty square.
    pub fn drop(kind: PieceKind, color: Color, to: Square) -> Self {
        Move {
            piece: Piece::in_reserve(kind, color),
            from: Location::InReserve,
            to: Location::OnBoard(to),
            kind: MoveKind::Drop,
            captured: None,
            first_move: true,
            promotion: None,
            drop: Some(kind),
        }
    }

    /// Creates a duck relocation. An unplaced duck moves from the reserve.
    pub fn duck(duck: Piece, to: Square) -> Self {
        Move {
            piece: duck,
            from: duck.location,
            to: Location::OnBoard(to),
            kind: MoveKind::Duck,
            captured: None,
            first_move: !duck.has_moved,
            promotion: None,
            drop: None,
        }
    }

    /// Creates a terminal entry (timeout, resignation, agreed draw) for `color`.
    ///
    /// The mover is recorded as an off-board king of that color.
    pub fn terminal(kind: MoveKind, color: Color) -> Self {
        debug_assert!(kind.is_terminal());
        Move {
            piece: Piece::in_reserve(PieceKind::King, color),
            from: Location::InReserve,
            to: Location::InReserve,
            kind,
            captured: None,
            first_move: false,
            promotion: None,
            drop: None,
        }
    }

    /// Returns a copy of this promotion with a different target piece.
    pub fn with_promotion(mut self, target: PieceKind) -> Self {
        if self.kind == MoveKind::Promotion {
            self.promotion = Some(target);
        }
        self
    }

    /// Returns the origin square, if the move starts on the board.
    #[inline]
    pub const fn from_square(&self) -> Option<Square> {
        self.from.square()
    }

    /// Returns the destination square, if the move ends on the board.
    #[inline]
    pub const fn to_square(&self) -> Option<Square> {
        self.to.square()
    }

    /// Returns the color of the mover.
    #[inline]
    pub const fn color(&self) -> Color {
        self.piece.color
    }

    /// Returns true if the move removes a piece from the board.
    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns true if the move ends a turn without touching the board.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// Returns the compact notation for this move (e.g., "e2e4", "e7e8q", "N@f3").
    pub fn to_notation(&self) -> String {
        match self.kind {
            MoveKind::Timeout => "timeout".to_string(),
            MoveKind::Resign => "resign".to_string(),
            MoveKind::Draw => "draw".to_string(),
            MoveKind::Drop => {
                let kind = self.drop.unwrap_or(self.piece.kind);
                format!("{}@{}", kind.to_fen_char(Color::White), self.to)
            }
            MoveKind::Duck => format!("*{}{}", self.from, self.to),
            _ => {
                let promo = match self.promotion {
                    Some(kind) => kind.to_fen_char(Color::Black).to_string(),
                    None => String::new(),
                };
                format!("{}{}{}", self.from, self.to, promo)
            }
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self.to_notation(), self.kind)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}
