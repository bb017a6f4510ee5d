//! Chaturaji, the four-player variant.
//!
//! Red, Blue, Yellow and Green play in turn with boats in place of rooks.
//! There is no check or mate: kings are captured outright, capturing a
//! living king eliminates its player, and the game is decided by points.

use tracing::info;
use variants_core::{Color, Move, MoveKind, Piece, PieceKind};

use super::common::is_square_attacked;
use super::{DrawReason, GameResult, GameVariant};
use crate::movegen::pseudo_legal_moves;
use crate::Board;

/// Bonus for attacking two living enemy kings at once.
const DOUBLE_CHECK_BONUS: u32 = 1;

/// Bonus for attacking three living enemy kings at once.
const TRIPLE_CHECK_BONUS: u32 = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChaturajiVariant;

impl ChaturajiVariant {
    /// Returns the points scored for capturing `piece`.
    ///
    /// Grey pieces are worth nothing, except a grey king which keeps its
    /// value of 3.
    pub fn point_value(piece: &Piece) -> u32 {
        let value = match piece.kind {
            PieceKind::Pawn => 1,
            PieceKind::King | PieceKind::Knight => 3,
            PieceKind::Bishop | PieceKind::Boat => 5,
            _ => 0,
        };
        if piece.color == Color::Grey && piece.kind != PieceKind::King {
            0
        } else {
            value
        }
    }

    /// Returns the players still in the game.
    pub fn living_players(board: &Board) -> Vec<Color> {
        Color::FOUR_PLAYER
            .into_iter()
            .filter(|&color| !board.is_player_dead(color))
            .collect()
    }

    /// Returns the color with the highest score; the first in turn order wins ties.
    pub fn leader(board: &Board) -> Color {
        Color::FOUR_PLAYER
            .into_iter()
            .fold(Color::Red, |best, color| {
                if board.score(color) > board.score(best) {
                    color
                } else {
                    best
                }
            })
    }

    /// Returns true when no living player other than the leader can still
    /// reach the leader's score.
    ///
    /// Each challenger is credited, optimistically, with the value of every
    /// opposing piece still on the board.
    pub fn is_impossible_to_catch_up(board: &Board) -> bool {
        let leader = Self::leader(board);
        let lead = board.score(leader);

        Self::living_players(board)
            .into_iter()
            .filter(|&color| color != leader)
            .all(|color| {
                let available: u32 = board
                    .pieces()
                    .filter(|piece| piece.color != color)
                    .map(|piece| Self::point_value(&piece))
                    .sum();
                board.score(color) + available < lead
            })
    }

    /// Returns the outcome by score: the single highest score wins, a tie
    /// at the top is a shared-lead draw.
    pub fn final_result(board: &Board) -> GameResult {
        let leader = Self::leader(board);
        let lead = board.score(leader);
        let tied = Color::FOUR_PLAYER
            .into_iter()
            .filter(|&color| board.score(color) == lead)
            .count();
        if tied > 1 {
            GameResult::Draw(DrawReason::SharedLead)
        } else {
            GameResult::Winner(leader)
        }
    }

    /// Counts the living enemy kings `color` currently attacks.
    fn kings_attacked_by(board: &Board, color: Color) -> usize {
        Color::FOUR_PLAYER
            .into_iter()
            .filter(|&enemy| enemy != color && !board.is_player_dead(enemy))
            .filter_map(|enemy| board.find_king(enemy))
            .filter(|&king| is_square_attacked(board, king, |attacker| attacker == color))
            .count()
    }
}

impl GameVariant for ChaturajiVariant {
    fn name(&self) -> &'static str {
        "Chaturaji"
    }

    fn players(&self) -> &'static [Color] {
        &Color::FOUR_PLAYER
    }

    fn initial_board(&self) -> Board {
        Board::chaturaji()
    }

    fn legal_moves(&self, board: &mut Board, piece: &Piece) -> Vec<Move> {
        if !piece.color.is_four_player() || board.is_player_dead(piece.color) {
            return Vec::new();
        }
        pseudo_legal_moves(board, piece)
    }

    fn is_check(&self, board: &Board, color: Color) -> bool {
        let Some(king) = board.find_king(color) else {
            return false;
        };
        is_square_attacked(board, king, |attacker| {
            attacker != color && attacker.is_four_player() && !board.is_player_dead(attacker)
        })
    }

    fn is_checkmate(&self, _board: &mut Board, _color: Color) -> bool {
        false
    }

    fn is_stalemate(&self, _board: &mut Board, _color: Color) -> bool {
        false
    }

    fn apply_post_move(&self, board: &mut Board, mv: &Move) {
        let mover = mv.color();

        if matches!(mv.kind, MoveKind::Resign | MoveKind::Timeout) {
            if !board.is_player_dead(mover) {
                info!(player = %mover, reason = ?mv.kind, "player eliminated");
                board.kill_player(mover);
            }
            return;
        }
        if mv.is_terminal() {
            return;
        }

        if let Some(captured) = mv.captured {
            board.add_score(mover, Self::point_value(&captured));
            let living_king = captured.kind == PieceKind::King
                && captured.color.is_four_player()
                && !board.is_player_dead(captured.color);
            if living_king {
                info!(
                    player = %captured.color,
                    by = %mover,
                    "king captured, player eliminated"
                );
                board.kill_player(captured.color);
            }
        }

        match Self::kings_attacked_by(board, mover) {
            2 => board.add_score(mover, DOUBLE_CHECK_BONUS),
            3 => board.add_score(mover, TRIPLE_CHECK_BONUS),
            _ => {}
        }
    }
}
