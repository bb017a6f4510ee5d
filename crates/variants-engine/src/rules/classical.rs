//! Standard two-player chess rules.

use variants_core::{Color, Move, Piece};

use super::common::{classical_candidates, is_king_attacked, retain_king_safe};
use super::GameVariant;
use crate::Board;

/// Standard chess: castling, en passant, promotion and full king safety.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalVariant;

impl GameVariant for ClassicalVariant {
    fn name(&self) -> &'static str {
        "Classical"
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
        let candidates = classical_candidates(board, piece);
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use variants_core::{MoveKind, PieceKind, Square};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn legal(board: &mut Board, from: &str) -> Vec<Move> {
        let piece = board.piece_at(sq(from)).unwrap();
        ClassicalVariant.legal_moves(board, &piece)
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let mut board = ClassicalVariant.initial_board();
        let total: usize = board
            .pieces_of(Color::White)
            .iter()
            .map(|p| ClassicalVariant.legal_moves(&mut board, p).len())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn kingside_castling_when_clear() {
        let mut board = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R").unwrap();
        let moves = legal(&mut board, "e1");
        let castle = moves.iter().find(|m| m.kind == MoveKind::Castling).unwrap();
        assert_eq!(castle.to_square(), Some(sq("g1")));
    }

    #[test]
    fn castling_blocked_by_occupied_square() {
        let mut board = Board::standard();
        assert!(legal(&mut board, "e1").is_empty());
    }

    #[test]
    fn castling_refused_into_attack() {
        // g1 is covered by the rook on g8.
        let mut board = Board::from_fen("4k1r1/8/8/8/8/8/8/4K2R").unwrap();
        let moves = legal(&mut board, "e1");
        assert!(!moves.iter().any(|m| m.kind == MoveKind::Castling));
    }

    #[test]
    fn castling_refused_out_of_check() {
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/8/4K2R").unwrap();
        let moves = legal(&mut board, "e1");
        assert!(!moves.is_empty());
        assert!(!moves.iter().any(|m| m.kind == MoveKind::Castling));
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3").unwrap();
        assert!(legal(&mut board, "e2").is_empty());
    }

    #[test]
    fn reserve_piece_has_no_moves() {
        let mut board = Board::standard();
        let knight = Piece::in_reserve(PieceKind::Knight, Color::White);
        assert!(ClassicalVariant.legal_moves(&mut board, &knight).is_empty());
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut board =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR").unwrap();
        assert!(ClassicalVariant.is_check(&board, Color::White));
        assert!(ClassicalVariant.is_checkmate(&mut board, Color::White));
        assert!(!ClassicalVariant.is_stalemate(&mut board, Color::White));
    }

    #[test]
    fn cornered_king_is_stalemate() {
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8").unwrap();
        assert!(!ClassicalVariant.is_check(&board, Color::Black));
        assert!(ClassicalVariant.is_stalemate(&mut board, Color::Black));
        assert!(!ClassicalVariant.is_checkmate(&mut board, Color::Black));
    }

    #[test]
    fn legal_moves_never_leave_king_attacked() {
        let mut board =
            Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR").unwrap();
        for piece in board.pieces_of(Color::Black) {
            for mv in ClassicalVariant.legal_moves(&mut board, &piece) {
                board.execute_move(mv);
                assert!(!is_king_attacked(&board, Color::Black), "{:?}", mv);
                board.undo_move();
            }
        }
    }
}
