//! Algorithms shared by the variant engines.
//!
//! Square-attacked scans, castling and en passant generation, the
//! king-safety filter and the "any legal move" scan are plain functions so
//! each engine can combine them as its rules require.

use variants_core::{Color, Move, MoveKind, Piece, PieceKind, Square};

use super::GameVariant;
use crate::movegen::{attacks_square, pseudo_legal_moves};
use crate::Board;

/// Returns true if `sq` is attacked by any piece whose color satisfies `attacker`.
///
/// This rescans the whole board; no attack maps are maintained.
pub fn is_square_attacked<F>(board: &Board, sq: Square, attacker: F) -> bool
where
    F: Fn(Color) -> bool,
{
    board
        .pieces()
        .filter(|piece| attacker(piece.color))
        .any(|piece| attacks_square(board, &piece, sq))
}

/// Returns a predicate matching the players hostile to `color` in a
/// two-player game (never the duck or grey pieces).
pub fn enemy_of(color: Color) -> impl Fn(Color) -> bool {
    move |other| other != color && other.is_player()
}

/// Returns true if `color`'s king stands on an attacked square.
///
/// A missing king is never in check.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_attacked(board, king, enemy_of(color)),
        None => false,
    }
}

/// Generates the castling moves available to an unmoved king.
///
/// Requires an unmoved rook of the same color in the corner, every square
/// between them empty and the square the king passes over not attacked.
/// Castling out of check and onto an attacked square are refused by
/// [`retain_king_safe`], so variants without check may still castle.
pub fn castling_moves(board: &Board, king: &Piece) -> Vec<Move> {
    let mut moves = Vec::new();
    if king.kind != PieceKind::King || king.has_moved || king.color.back_rank().is_none() {
        return moves;
    }
    let Some(from) = king.square() else {
        return moves;
    };

    for (rook_col, step) in [(7u8, 1i8), (0u8, -1i8)] {
        let Some(rook_sq) = Square::new(from.row(), rook_col) else {
            continue;
        };
        let rook_ready = board.piece_at(rook_sq).is_some_and(|rook| {
            rook.kind == PieceKind::Rook && rook.color == king.color && !rook.has_moved
        });
        if !rook_ready {
            continue;
        }

        let (low, high) = if rook_col > from.col() {
            (from.col() + 1, rook_col)
        } else {
            (rook_col + 1, from.col())
        };
        let path_clear = (low..high)
            .filter_map(|col| Square::new(from.row(), col))
            .all(|sq| board.is_empty(sq));
        if !path_clear {
            continue;
        }

        let (Some(transit), Some(target)) = (from.offset(0, step), from.offset(0, 2 * step)) else {
            continue;
        };
        if is_square_attacked(board, transit, enemy_of(king.color)) {
            continue;
        }
        moves.extend(Move::new(*king, target, MoveKind::Castling, None));
    }

    moves
}

/// Generates the en passant capture available to `pawn`, if any.
///
/// Legal only when the most recent piece move was an enemy pawn advancing
/// two squares to land directly beside this pawn, and the square it passed
/// over is empty.
pub fn en_passant_moves(board: &Board, pawn: &Piece) -> Vec<Move> {
    let mut moves = Vec::new();
    if pawn.kind != PieceKind::Pawn {
        return moves;
    }
    let Some(from) = pawn.square() else {
        return moves;
    };
    let Some(last) = board.last_piece_move() else {
        return moves;
    };
    if last.piece.kind != PieceKind::Pawn || last.color() == pawn.color {
        return moves;
    }
    let (Some(last_from), Some(last_to)) = (last.from_square(), last.to_square()) else {
        return moves;
    };

    let double_step =
        last_from.col() == last_to.col() && last_from.row().abs_diff(last_to.row()) == 2;
    let beside = last_to.row() == from.row() && last_to.col().abs_diff(from.col()) == 1;
    if !double_step || !beside {
        return moves;
    }

    let Some(victim) = board.piece_at(last_to) else {
        return moves;
    };
    if victim.kind != PieceKind::Pawn || victim.color != last.color() {
        return moves;
    }

    let (dr, dc) = pawn.color.pawn_direction();
    if let Some(target) = last_to.offset(dr, dc) {
        if board.is_empty(target) {
            moves.extend(Move::new(*pawn, target, MoveKind::EnPassant, Some(victim)));
        }
    }
    moves
}

/// Generates the two-player candidate moves of a board piece: geometric
/// moves plus castling and en passant. Promotions are already tagged by
/// the geometric generator.
pub fn classical_candidates(board: &Board, piece: &Piece) -> Vec<Move> {
    let mut moves = pseudo_legal_moves(board, piece);
    match piece.kind {
        PieceKind::King => moves.extend(castling_moves(board, piece)),
        PieceKind::Pawn => moves.extend(en_passant_moves(board, piece)),
        _ => {}
    }
    moves
}

/// Keeps only the moves after which the mover's king is not attacked.
/// Castling is also dropped while the mover is in check.
///
/// Each candidate is executed, tested and undone on `board`.
pub fn retain_king_safe(board: &mut Board, moves: Vec<Move>) -> Vec<Move> {
    moves
        .into_iter()
        .filter(|mv| {
            let color = mv.color();
            if mv.kind == MoveKind::Castling && is_king_attacked(board, color) {
                return false;
            }
            board.simulate(*mv, |after| !is_king_attacked(after, color))
        })
        .collect()
}

/// Returns true if any board piece of `color` has a legal move under `variant`.
pub fn any_piece_has_legal_move<V>(variant: &V, board: &mut Board, color: Color) -> bool
where
    V: GameVariant + ?Sized,
{
    let pieces = board.pieces_of(color);
    pieces
        .iter()
        .any(|piece| !variant.legal_moves(board, piece).is_empty())
}
