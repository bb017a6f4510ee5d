//! Geometric move generation.
//!
//! This module produces pseudo-legal moves for a single piece: every move
//! its movement pattern allows on the current board, respecting blockers
//! and captures, but ignoring king safety and all variant-specific rules.
//! Castling and en passant depend on history and live in
//! [`rules::common`](crate::rules::common).

mod attacks;
pub mod perft;

use crate::Board;
use variants_core::{Color, Move, MoveKind, Piece, PieceKind, Square};

pub use attacks::{
    attacks_square, pawn_attacks, slide_directions, step_offsets, ALL_DIRECTIONS, DIAGONAL,
    KNIGHT_OFFSETS, ORTHOGONAL,
};

/// Generates the pseudo-legal moves of `piece`.
///
/// Board pieces move by their pattern; the neutral duck may be placed on
/// any empty square. A duck owned by a player never moves. Other off-board
/// pieces have no geometric moves (drops are a variant rule).
pub fn pseudo_legal_moves(board: &Board, piece: &Piece) -> Vec<Move> {
    let mut moves = Vec::new();

    if piece.kind == PieceKind::Duck {
        if piece.color == Color::Special {
            generate_duck_moves(board, piece, &mut moves);
        }
        return moves;
    }

    let Some(from) = piece.square() else {
        return moves;
    };

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, piece, from, &mut moves),
        PieceKind::Knight | PieceKind::King => {
            generate_step_moves(board, piece, from, step_offsets(piece.kind), &mut moves)
        }
        kind => generate_slide_moves(board, piece, from, slide_directions(kind), &mut moves),
    }

    moves
}

/// Returns true if `target` can be entered by a piece of `color`, recording
/// the occupant if it would be captured.
#[inline]
fn target_state(board: &Board, color: Color, target: Square) -> Option<Option<Piece>> {
    match board.piece_at(target) {
        None => Some(None),
        Some(occupant) if occupant.color != color => Some(Some(occupant)),
        Some(_) => None,
    }
}

/// Generates moves for sliding pieces (rook, bishop, queen, boat).
fn generate_slide_moves(
    board: &Board,
    piece: &Piece,
    from: Square,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            match target_state(board, piece.color, next) {
                Some(captured) => {
                    moves.extend(Move::new(*piece, next, MoveKind::Normal, captured));
                    if captured.is_some() {
                        break;
                    }
                }
                None => break,
            }
            current = next;
        }
    }
}

/// Generates moves for single-step pieces (knight, king).
fn generate_step_moves(
    board: &Board,
    piece: &Piece,
    from: Square,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in offsets {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        if let Some(captured) = target_state(board, piece.color, to) {
            moves.extend(Move::new(*piece, to, MoveKind::Normal, captured));
        }
    }
}

/// Generates pawn pushes and captures, tagging edge arrivals as promotions.
fn generate_pawn_moves(board: &Board, pawn: &Piece, from: Square, moves: &mut Vec<Move>) {
    let (dr, dc) = pawn.color.pawn_direction();
    if (dr, dc) == (0, 0) {
        return;
    }

    if let Some(one) = from.offset(dr, dc) {
        if board.is_empty(one) {
            push_pawn_move(pawn, one, None, moves);

            let can_double = matches!(pawn.color, Color::White | Color::Black) && !pawn.has_moved;
            if can_double {
                if let Some(two) = one.offset(dr, dc) {
                    if board.is_empty(two) {
                        push_pawn_move(pawn, two, None, moves);
                    }
                }
            }
        }
    }

    for to in pawn_attacks(from, pawn.color) {
        if let Some(victim) = board.piece_at(to) {
            if victim.color != pawn.color && victim.color != Color::Special {
                push_pawn_move(pawn, to, Some(victim), moves);
            }
        }
    }
}

fn push_pawn_move(pawn: &Piece, to: Square, captured: Option<Piece>, moves: &mut Vec<Move>) {
    let mv = if is_promotion_square(to, pawn.color) {
        Move::promotion(
            *pawn,
            to,
            PieceKind::default_promotion(pawn.color),
            captured,
        )
    } else {
        Move::new(*pawn, to, MoveKind::Normal, captured)
    };
    moves.extend(mv);
}

/// Generates duck relocations: every empty square other than its own.
fn generate_duck_moves(board: &Board, duck: &Piece, moves: &mut Vec<Move>) {
    for to in Square::all() {
        if board.is_empty(to) && duck.square() != Some(to) {
            moves.push(Move::duck(*duck, to));
        }
    }
}

/// Returns true if a pawn of `color` promotes on `sq`: the far edge along
/// its direction of travel.
pub fn is_promotion_square(sq: Square, color: Color) -> bool {
    match color.pawn_direction() {
        (-1, 0) => sq.row() == 0,
        (1, 0) => sq.row() == 7,
        (0, 1) => sq.col() == 7,
        (0, -1) => sq.col() == 0,
        _ => false,
    }
}
