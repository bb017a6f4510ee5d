//! Duck Chess.
//!
//! Every turn has two phases: a normal chess move without king safety,
//! then a relocation of the shared duck to any empty square. The duck
//! blocks every piece and can never be captured. Kings are captured
//! outright, and a player with no move that keeps their king safe is
//! stalemated, which wins them the game.

use variants_core::{Color, Move, MoveKind, Piece, PieceKind};

use super::common::{classical_candidates, is_king_attacked};
use super::GameVariant;
use crate::movegen::pseudo_legal_moves;
use crate::Board;

#[derive(Debug, Clone, Copy, Default)]
pub struct DuckChessVariant;

impl DuckChessVariant {
    /// Normal-phase moves of a board piece, ignoring the phase flag.
    fn piece_moves(board: &Board, piece: &Piece) -> Vec<Move> {
        if piece.kind == PieceKind::Duck || piece.is_in_reserve() {
            return Vec::new();
        }
        let mut moves = classical_candidates(board, piece);
        moves.retain(|mv| !captures_duck(mv));
        moves
    }
}

fn captures_duck(mv: &Move) -> bool {
    mv.captured.is_some_and(|p| p.kind == PieceKind::Duck)
}

impl GameVariant for DuckChessVariant {
    fn name(&self) -> &'static str {
        "Duck Chess"
    }

    fn players(&self) -> &'static [Color] {
        &Color::TWO_PLAYER
    }

    fn initial_board(&self) -> Board {
        Board::standard()
    }

    fn legal_moves(&self, board: &mut Board, piece: &Piece) -> Vec<Move> {
        if board.waiting_for_duck() {
            if piece.kind == PieceKind::Duck && piece.color == Color::Special {
                pseudo_legal_moves(board, piece)
            } else {
                Vec::new()
            }
        } else {
            Self::piece_moves(board, piece)
        }
    }

    fn is_check(&self, _board: &Board, _color: Color) -> bool {
        false
    }

    fn is_checkmate(&self, _board: &mut Board, _color: Color) -> bool {
        false
    }

    /// True when none of `color`'s moves leaves their king unattacked.
    ///
    /// A stalemated player wins; that decision belongs to the caller.
    fn is_stalemate(&self, board: &mut Board, color: Color) -> bool {
        let pieces = board.pieces_of(color);
        let escapes = pieces.iter().any(|piece| {
            Self::piece_moves(board, piece)
                .into_iter()
                .any(|mv| board.simulate(mv, |after| !is_king_attacked(after, color)))
        });
        !escapes
    }

    fn has_legal_moves(&self, board: &mut Board, color: Color) -> bool {
        board
            .pieces_of(color)
            .iter()
            .any(|piece| !Self::piece_moves(board, piece).is_empty())
    }

    fn apply_post_move(&self, board: &mut Board, mv: &Move) {
        match mv.kind {
            MoveKind::Duck => board.set_waiting_for_duck(false),
            kind if kind.is_terminal() => {}
            _ => board.set_waiting_for_duck(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use variants_core::Square;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn only_the_duck_moves_during_duck_phase() {
        let mut board = DuckChessVariant.initial_board();
        board.set_waiting_for_duck(true);
        for piece in board.pieces_of(Color::White) {
            assert!(DuckChessVariant.legal_moves(&mut board, &piece).is_empty());
        }
        let duck = Piece::in_reserve(PieceKind::Duck, Color::Special);
        let moves = DuckChessVariant.legal_moves(&mut board, &duck);
        assert_eq!(moves.len(), 32);
        assert!(moves.iter().all(|m| m.kind == MoveKind::Duck));
    }

    #[test]
    fn duck_cannot_be_captured() {
        let mut board = Board::from_fen("4k3/8/8/8/R2*4/8/8/4K3").unwrap();
        let rook = board.piece_at(sq("a4")).unwrap();
        let moves = DuckChessVariant.legal_moves(&mut board, &rook);
        assert!(!moves.iter().any(|m| m.to_square() == Some(sq("d4"))));
        assert!(moves.iter().any(|m| m.to_square() == Some(sq("c4"))));
        assert!(!moves.iter().any(|m| m.to_square() == Some(sq("e4"))));
    }

    #[test]
    fn duck_does_not_move_in_piece_phase() {
        let mut board = Board::from_fen("4k3/8/8/8/3*4/8/8/4K3").unwrap();
        let duck = board.piece_at(sq("d4")).unwrap();
        assert!(DuckChessVariant.legal_moves(&mut board, &duck).is_empty());
    }

    #[test]
    fn king_may_move_into_attack() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/r7/4K3").unwrap();
        let king = board.piece_at(sq("e1")).unwrap();
        let moves = DuckChessVariant.legal_moves(&mut board, &king);
        assert!(moves.iter().any(|m| m.to_square() == Some(sq("e2"))));
        assert!(!DuckChessVariant.is_check(&board, Color::White));
    }

    #[test]
    fn phase_flag_follows_committed_moves() {
        let mut board = DuckChessVariant.initial_board();
        let pawn = board.piece_at(sq("e2")).unwrap();
        let push = Move::new(pawn, sq("e4"), MoveKind::Normal, None).unwrap();
        board.execute_move(push);
        DuckChessVariant.apply_post_move(&mut board, &push);
        assert!(board.waiting_for_duck());

        let duck = Move::duck(Piece::in_reserve(PieceKind::Duck, Color::Special), sq("e5"));
        board.execute_move(duck);
        DuckChessVariant.apply_post_move(&mut board, &duck);
        assert!(!board.waiting_for_duck());
        assert_eq!(board.find_duck(), Some(sq("e5")));
    }

    #[test]
    fn stalemate_when_every_move_leaves_king_attacked() {
        // The black king on a8 can only step to squares the white queen covers.
        let mut board = Board::from_fen("k7/2Q5/1K6/8/8/8/8/8").unwrap();
        assert!(DuckChessVariant.is_stalemate(&mut board, Color::Black));
        assert!(DuckChessVariant.has_legal_moves(&mut board, Color::Black));
        assert!(!DuckChessVariant.is_stalemate(&mut board, Color::White));
    }
}
