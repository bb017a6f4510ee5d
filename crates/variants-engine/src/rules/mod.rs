//! Rule set abstraction for chess variants.
//!
//! This module provides the [`GameVariant`] trait which abstracts over the
//! supported variants, and the [`Variant`] tag used to select one. The
//! engines share their common algorithms through the free functions in
//! [`common`] rather than through each other.

mod chaturaji;
pub mod common;
mod classical;
mod crazyhouse;
mod duck;
mod fog_of_war;

pub use chaturaji::ChaturajiVariant;
pub use classical::ClassicalVariant;
pub use crazyhouse::CrazyhouseVariant;
pub use duck::DuckChessVariant;
pub use fog_of_war::FogOfWarVariant;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use variants_core::{Color, Move, Piece};

use crate::Board;

/// Half-move clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    /// The given player won.
    Winner(Color),
    /// Draw with a specific reason.
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    /// Stalemate - no legal moves but not in check.
    Stalemate,
    /// 50-move rule (100 half-moves without pawn move or capture).
    FiftyMoveRule,
    /// Draw by agreement.
    Agreement,
    /// Chaturaji ended with several players sharing the top score.
    SharedLead,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Winner(color) => write!(f, "{} wins", color),
            GameResult::Draw(reason) => {
                let reason = match reason {
                    DrawReason::Stalemate => "stalemate",
                    DrawReason::FiftyMoveRule => "fifty-move rule",
                    DrawReason::Agreement => "agreement",
                    DrawReason::SharedLead => "shared lead",
                };
                write!(f, "draw ({})", reason)
            }
        }
    }
}

/// Capability interface implemented by every variant.
///
/// Legality queries take the board mutably because they try candidate
/// moves with [`Board::simulate`]; every trial move is undone before returning.
///
/// # Example
///
/// ```
/// use variants_engine::rules::{GameVariant, Variant};
///
/// let rules = Variant::Classical.rules();
/// let mut board = rules.initial_board();
/// let knight = board.piece_at("g1".parse().unwrap()).unwrap();
/// assert_eq!(rules.legal_moves(&mut board, &knight).len(), 2);
/// ```
pub trait GameVariant {
    /// Returns the variant's display name.
    fn name(&self) -> &'static str;

    /// Returns the players in turn order.
    fn players(&self) -> &'static [Color];

    /// Returns the starting board for this variant.
    fn initial_board(&self) -> Board;

    /// Generates the legal moves of one piece.
    fn legal_moves(&self, board: &mut Board, piece: &Piece) -> Vec<Move>;

    /// Returns true if `color`'s king is in check.
    fn is_check(&self, board: &Board, color: Color) -> bool;

    /// Returns true if `color` is checkmated.
    fn is_checkmate(&self, board: &mut Board, color: Color) -> bool;

    /// Returns true if `color` is stalemated.
    fn is_stalemate(&self, board: &mut Board, color: Color) -> bool;

    /// Returns true once 100 half-moves passed without a capture or pawn move.
    fn is_draw_by_fifty_move_rule(&self, board: &Board) -> bool {
        board.half_move_clock() >= FIFTY_MOVE_LIMIT
    }

    /// Returns true if any piece of `color` has a legal move.
    fn has_legal_moves(&self, board: &mut Board, color: Color) -> bool {
        common::any_piece_has_legal_move(self, board, color)
    }

    /// Applies the variant's side effects after a committed move.
    ///
    /// Never called during legality probing.
    fn apply_post_move(&self, _board: &mut Board, _mv: &Move) {}
}

/// Error returned when a variant name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown variant: '{0}'")]
pub struct UnknownVariant(pub String);

/// The closed set of supported variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    Classical,
    FogOfWar,
    DuckChess,
    Crazyhouse,
    Chaturaji,
}

impl Variant {
    /// All variants in order.
    pub const ALL: [Variant; 5] = [
        Variant::Classical,
        Variant::FogOfWar,
        Variant::DuckChess,
        Variant::Crazyhouse,
        Variant::Chaturaji,
    ];

    /// Returns the rule engine for this variant.
    pub fn rules(self) -> &'static dyn GameVariant {
        match self {
            Variant::Classical => &ClassicalVariant,
            Variant::FogOfWar => &FogOfWarVariant,
            Variant::DuckChess => &DuckChessVariant,
            Variant::Crazyhouse => &CrazyhouseVariant,
            Variant::Chaturaji => &ChaturajiVariant,
        }
    }

    /// Returns the kebab-case identifier used in records and configuration.
    pub const fn id(self) -> &'static str {
        match self {
            Variant::Classical => "classical",
            Variant::FogOfWar => "fog-of-war",
            Variant::DuckChess => "duck-chess",
            Variant::Crazyhouse => "crazyhouse",
            Variant::Chaturaji => "chaturaji",
        }
    }

    /// Returns true for the two-player variants.
    pub const fn is_two_player(self) -> bool {
        !matches!(self, Variant::Chaturaji)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rules().name())
    }
}

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "classical" | "standard" => Ok(Variant::Classical),
            "fog-of-war" | "fog" => Ok(Variant::FogOfWar),
            "duck-chess" | "duck" => Ok(Variant::DuckChess),
            "crazyhouse" => Ok(Variant::Crazyhouse),
            "chaturaji" => Ok(Variant::Chaturaji),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}
