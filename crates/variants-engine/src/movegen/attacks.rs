//! Direction tables and attack sets for all piece kinds.

use crate::Board;
use variants_core::{Color, Piece, PieceKind, Square};

/// Rook and boat directions.
pub const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Bishop directions.
pub const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Queen and king directions.
pub const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Knight jumps.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Returns the directions a sliding piece moves along.
pub const fn slide_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Rook | PieceKind::Boat => &ORTHOGONAL,
        PieceKind::Bishop => &DIAGONAL,
        PieceKind::Queen => &ALL_DIRECTIONS,
        _ => &[],
    }
}

/// Returns the offsets a single-step piece moves by.
pub const fn step_offsets(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Knight => &KNIGHT_OFFSETS,
        PieceKind::King => &ALL_DIRECTIONS,
        _ => &[],
    }
}

/// Returns the two diagonal squares a pawn of `color` on `from` captures on.
///
/// These are the squares beside the pawn's forward square.
pub fn pawn_attacks(from: Square, color: Color) -> impl Iterator<Item = Square> {
    let (dr, dc) = color.pawn_direction();
    let offsets = if dr != 0 {
        [(dr, -1), (dr, 1)]
    } else if dc != 0 {
        [(-1, dc), (1, dc)]
    } else {
        [(0, 0), (0, 0)]
    };
    offsets
        .into_iter()
        .filter(|&offset| offset != (0, 0))
        .filter_map(move |(r, c)| from.offset(r, c))
}

/// Returns true if `piece` attacks `target`.
///
/// Attacks follow the pseudo-legal move patterns, except that pawns attack
/// their diagonals whether or not they are occupied (never their forward
/// squares) and the duck attacks nothing.
pub fn attacks_square(board: &Board, piece: &Piece, target: Square) -> bool {
    let Some(from) = piece.square() else {
        return false;
    };
    if from == target {
        return false;
    }

    match piece.kind {
        PieceKind::Duck => false,
        PieceKind::Pawn => pawn_attacks(from, piece.color).any(|sq| sq == target),
        PieceKind::Knight | PieceKind::King => step_offsets(piece.kind)
            .iter()
            .any(|&(dr, dc)| from.offset(dr, dc) == Some(target)),
        kind => slide_directions(kind)
            .iter()
            .any(|&(dr, dc)| ray_reaches(board, from, (dr, dc), target)),
    }
}

/// Walks from `from` along `dir` and reports whether `target` is reached
/// before the ray is blocked.
fn ray_reaches(board: &Board, from: Square, (dr, dc): (i8, i8), target: Square) -> bool {
    let mut current = from;
    while let Some(next) = current.offset(dr, dc) {
        if next == target {
            return true;
        }
        if !board.is_empty(next) {
            return false;
        }
        current = next;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn pawn_attacks_by_direction() {
        let white: Vec<Square> = pawn_attacks(sq("e4"), Color::White).collect();
        assert_eq!(white, vec![sq("d5"), sq("f5")]);

        let black: Vec<Square> = pawn_attacks(sq("a5"), Color::Black).collect();
        assert_eq!(black, vec![sq("b4")]);

        // Blue advances along columns: from e4 towards f4.
        let blue: Vec<Square> = pawn_attacks(sq("e4"), Color::Blue).collect();
        assert_eq!(blue, vec![sq("f5"), sq("f3")]);

        let green: Vec<Square> = pawn_attacks(sq("e4"), Color::Green).collect();
        assert_eq!(green, vec![sq("d5"), sq("d3")]);

        assert_eq!(pawn_attacks(sq("e4"), Color::Grey).count(), 0);
    }

    #[test]
    fn slider_attacks_stop_at_blockers() {
        let board = Board::from_fen("4k3/8/8/8/R2p3q/8/8/4K3").unwrap();
        let rook = board.piece_at(sq("a4")).unwrap();
        assert!(attacks_square(&board, &rook, sq("c4")));
        assert!(attacks_square(&board, &rook, sq("d4")));
        assert!(!attacks_square(&board, &rook, sq("e4")));
        assert!(attacks_square(&board, &rook, sq("a8")));
    }

    #[test]
    fn pawn_attacks_empty_diagonals_only() {
        let board = Board::from_fen("4k3/8/8/8/4P3/8/8/4K3").unwrap();
        let pawn = board.piece_at(sq("e4")).unwrap();
        assert!(attacks_square(&board, &pawn, sq("d5")));
        assert!(!attacks_square(&board, &pawn, sq("e5")));
    }

    #[test]
    fn duck_attacks_nothing() {
        let board = Board::from_fen("4k3/8/8/8/3*4/8/8/4K3").unwrap();
        let duck = board.piece_at(sq("d4")).unwrap();
        assert!(!attacks_square(&board, &duck, sq("d5")));
    }
}
