//! Crazyhouse: captured pieces change sides and may be dropped back in.

use variants_core::{Color, Move, MoveKind, Piece, PieceKind, Square};

use super::common::{
    any_piece_has_legal_move, classical_candidates, is_king_attacked, retain_king_safe,
};
use super::GameVariant;
use crate::Board;

#[derive(Debug, Clone, Copy, Default)]
pub struct CrazyhouseVariant;

impl CrazyhouseVariant {
    /// Drops of a reserve piece onto every empty square, before the
    /// king-safety filter. Pawns never drop onto the first or last row.
    fn drop_candidates(board: &Board, piece: &Piece) -> Vec<Move> {
        if board.reserve(piece.color, piece.kind) == 0 {
            return Vec::new();
        }
        Square::all()
            .filter(|sq| board.is_empty(*sq))
            .filter(|sq| piece.kind != PieceKind::Pawn || !matches!(sq.row(), 0 | 7))
            .map(|sq| Move::drop(piece.kind, piece.color, sq))
            .collect()
    }
}

impl GameVariant for CrazyhouseVariant {
    fn name(&self) -> &'static str {
        "Crazyhouse"
    }

    fn players(&self) -> &'static [Color] {
        &Color::TWO_PLAYER
    }

    fn initial_board(&self) -> Board {
        let mut board = Board::standard();
        board.set_crazyhouse_mode(true);
        board
    }

    fn legal_moves(&self, board: &mut Board, piece: &Piece) -> Vec<Move> {
        let candidates = if piece.is_in_reserve() {
            Self::drop_candidates(board, piece)
        } else {
            classical_candidates(board, piece)
        };
        retain_king_safe(board, candidates)
    }

    fn is_check(&self, board: &Board, color: Color) -> bool {
        is_king_attacked(board, color)
    }

    fn is_checkmate(&self, board: &mut Board, color: Color) -> bool {
        self.is_check(board, color) && !self.has_legal_moves(board, color)
    }

    fn is_stalemate(&self, board: &mut Board, color: Color) -> bool {
        !self.is_check(board, color) && !self.has_legal_moves(board, color)
    }

    fn has_legal_moves(&self, board: &mut Board, color: Color) -> bool {
        if any_piece_has_legal_move(self, board, color) {
            return true;
        }
        board.reserve_of(color).into_iter().any(|(kind, _)| {
            let piece = Piece::in_reserve(kind, color);
            !self.legal_moves(board, &piece).is_empty()
        })
    }

    fn apply_post_move(&self, board: &mut Board, mv: &Move) {
        if !board.is_crazyhouse_mode() {
            return;
        }
        if let Some(captured) = mv.captured {
            board.add_to_reserve(mv.color(), captured.kind);
        }
        if mv.kind == MoveKind::Drop {
            let kind = mv.drop.unwrap_or(mv.piece.kind);
            let removed = board.remove_from_reserve(mv.color(), kind);
            debug_assert!(removed, "drop without reserve piece");
        }
    }
}
