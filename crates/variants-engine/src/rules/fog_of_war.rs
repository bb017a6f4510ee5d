//! Fog of War: chess without check.
//!
//! Visibility is a presentation concern. The rules differ from standard
//! chess only in that kings may move into or stay in attack; the game ends
//! when a king is captured.

use variants_core::{Color, Move, Piece};

use super::common::classical_candidates;
use super::GameVariant;
use crate::Board;

#[derive(Debug, Clone, Copy, Default)]
pub struct FogOfWarVariant;

impl GameVariant for FogOfWarVariant {
    fn name(&self) -> &'static str {
        "Fog of War"
    }

    fn players(&self) -> &'static [Color] {
        &Color::TWO_PLAYER
    }

    fn initial_board(&self) -> Board {
        Board::standard()
    }

    fn legal_moves(&self, board: &mut Board, piece: &Piece) -> Vec<Move> {
        if piece.is_in_reserve() {
            return Vec::new();
        }
        classical_candidates(board, piece)
    }

    fn is_check(&self, _board: &Board, _color: Color) -> bool {
        false
    }

    fn is_checkmate(&self, _board: &mut Board, _color: Color) -> bool {
        false
    }

    fn is_stalemate(&self, board: &mut Board, color: Color) -> bool {
        !self.has_legal_moves(board, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use variants_core::{MoveKind, PieceKind, Square};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn king_may_step_into_attack() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/r7/4K3").unwrap();
        let king = board.piece_at(sq("e1")).unwrap();
        let moves = FogOfWarVariant.legal_moves(&mut board, &king);
        assert!(moves.iter().any(|m| m.to_square() == Some(sq("e2"))));
        assert_eq!(moves.len(), 5);
    }

    #[test]
    fn king_can_be_captured() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/r3K3").unwrap();
        let rook = board.piece_at(sq("a1")).unwrap();
        let moves = FogOfWarVariant.legal_moves(&mut board, &rook);
        let capture = moves
            .iter()
            .find(|m| m.to_square() == Some(sq("e1")))
            .unwrap();
        assert_eq!(capture.captured.map(|p| p.kind), Some(PieceKind::King));
    }

    #[test]
    fn king_may_castle_while_attacked() {
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/8/4K2R").unwrap();
        let king = board.piece_at(sq("e1")).unwrap();
        let moves = FogOfWarVariant.legal_moves(&mut board, &king);
        assert!(moves
            .iter()
            .any(|m| m.kind == MoveKind::Castling && m.to_square() == Some(sq("g1"))));
    }

    #[test]
    fn no_check_concept() {
        let mut board =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR").unwrap();
        assert!(!FogOfWarVariant.is_check(&board, Color::White));
        assert!(!FogOfWarVariant.is_checkmate(&mut board, Color::White));
        assert!(!FogOfWarVariant.is_stalemate(&mut board, Color::White));
    }

    #[test]
    fn stalemate_only_without_any_move() {
        // The lone black pawn is blocked and black has no king.
        let mut board = Board::from_fen("8/8/8/8/8/p7/P7/K7").unwrap();
        assert!(FogOfWarVariant.is_stalemate(&mut board, Color::Black));
        assert!(!FogOfWarVariant.is_stalemate(&mut board, Color::White));
    }
}
