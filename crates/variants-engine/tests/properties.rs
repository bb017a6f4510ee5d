//! Property tests over random legal move sequences.

use proptest::prelude::*;
use variants_core::{Color, Move, PieceKind};
use variants_engine::rules::common::is_king_attacked;
use variants_engine::{pseudo_legal_moves, Game, Variant};

/// Plays up to `choices.len()` moves, picking each by index from the legal
/// move list, and calls `check` with the game before every move.
fn walk<F>(variant: Variant, choices: &[u16], mut check: F) -> Game
where
    F: FnMut(&Game, &Move),
{
    let mut game = Game::new(variant);
    for &choice in choices {
        let moves = game.all_legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[choice as usize % moves.len()];
        check(&game, &mv);
        game.make_move(mv)
            .unwrap_or_else(|e| panic!("{:?} rejected: {}", mv, e));
    }
    game
}

fn any_variant() -> impl Strategy<Value = Variant> {
    prop::sample::select(Variant::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn execute_undo_round_trips(variant in any_variant(), choices in prop::collection::vec(any::<u16>(), 0..40)) {
        walk(variant, &choices, |game, mv| {
            let before = game.board().clone();
            let mut board = before.clone();
            board.execute_move(*mv);
            assert_ne!(board, before);
            assert_eq!(board.undo_move(), Some(*mv));
            assert_eq!(board, before, "undo of {:?} did not restore the board", mv);
        });
    }

    #[test]
    fn pseudo_legal_targets_never_hold_own_pieces(variant in any_variant(), choices in prop::collection::vec(any::<u16>(), 0..30)) {
        let game = walk(variant, &choices, |_, _| {});
        let board = game.board();
        for piece in board.pieces() {
            for mv in pseudo_legal_moves(board, &piece) {
                let Some(to) = mv.to_square() else {
                    prop_assert!(false, "board move without destination: {:?}", mv);
                    continue;
                };
                if let Some(occupant) = board.piece_at(to) {
                    prop_assert_ne!(occupant.color, piece.color);
                }
            }
        }
    }

    #[test]
    fn classical_moves_keep_king_safe(choices in prop::collection::vec(any::<u16>(), 0..40)) {
        walk(Variant::Classical, &choices, |game, mv| {
            let mut board = game.board().clone();
            let color = mv.color();
            board.execute_move(*mv);
            assert!(!is_king_attacked(&board, color), "{:?} leaves {} in check", mv, color);
        });
    }

    #[test]
    fn duck_is_never_captured(choices in prop::collection::vec(any::<u16>(), 0..40)) {
        let game = walk(Variant::DuckChess, &choices, |_, mv| {
            assert_ne!(mv.captured.map(|p| p.kind), Some(PieceKind::Duck), "{:?}", mv);
        });
        let placed = game.moves().any(|m| m.kind == variants_core::MoveKind::Duck);
        prop_assert_eq!(game.board().find_duck().is_some(), placed);
    }

    #[test]
    fn chaturaji_grey_pieces_never_move(choices in prop::collection::vec(any::<u16>(), 0..60)) {
        walk(Variant::Chaturaji, &choices, |game, mv| {
            assert!(mv.color().is_four_player(), "{:?}", mv);
            assert!(!game.board().is_player_dead(mv.color()));
            assert_eq!(mv.color(), game.side_to_move());
        });
    }

    #[test]
    fn crazyhouse_reserves_match_captures_minus_drops(choices in prop::collection::vec(any::<u16>(), 0..40)) {
        let game = walk(Variant::Crazyhouse, &choices, |_, _| {});
        for color in Color::TWO_PLAYER {
            let captured = game
                .moves()
                .filter(|m| m.color() == color && m.is_capture())
                .count();
            let dropped = game
                .moves()
                .filter(|m| m.color() == color && m.kind == variants_core::MoveKind::Drop)
                .count();
            let held: u32 = game.board().reserve_of(color).iter().map(|(_, n)| n).sum();
            prop_assert_eq!(held as usize, captured - dropped);
        }
    }
}
