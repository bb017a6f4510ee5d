//! FEN piece-placement parsing and serialization.
//!
//! Only the first FEN field is used: the variants keep castling, en passant
//! and clock state on the pieces and the move history, so a placement string
//! is enough to describe a test or puzzle position.

use crate::{Color, PieceKind, Square};
use thiserror::Error;

/// Errors that can occur when parsing placement strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid piece placement: expected 8 ranks, got {0}")]
    InvalidRankCount(usize),

    #[error("invalid character '{character}' in rank {rank}")]
    InvalidCharacter { character: char, rank: usize },

    #[error("rank {rank} has {squares} squares, expected 8")]
    InvalidRankLength { rank: usize, squares: u32 },
}

/// A parsed piece placement: every occupied square with its piece.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Placement {
    pub pieces: Vec<(Square, PieceKind, Color)>,
}

impl Placement {
    /// The standard starting placement.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    /// Parses a placement string (the first FEN field).
    ///
    /// A full FEN string is accepted too; everything after the first
    /// whitespace is ignored.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let placement = fen.split_whitespace().next().unwrap_or("");
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount(ranks.len()));
        }

        let mut pieces = Vec::new();
        for (row, rank) in ranks.iter().enumerate() {
            let mut squares = 0u32;
            for c in rank.chars() {
                if let Some(digit) = c.to_digit(10) {
                    squares += digit;
                    continue;
                }
                let Some((kind, color)) = PieceKind::from_fen_char(c) else {
                    return Err(FenError::InvalidCharacter {
                        character: c,
                        rank: 8 - row,
                    });
                };
                if let Some(sq) = Square::new(row as u8, squares as u8) {
                    pieces.push((sq, kind, color));
                }
                squares += 1;
            }
            if squares != 8 {
                return Err(FenError::InvalidRankLength {
                    rank: 8 - row,
                    squares,
                });
            }
        }

        Ok(Placement { pieces })
    }

    /// Serializes a grid lookup into a placement string.
    pub fn to_fen<F>(piece_at: F) -> String
    where
        F: Fn(Square) -> Option<char>,
    {
        let mut fen = String::new();
        for row in 0..8u8 {
            let mut empty_count = 0;
            for col in 0..8u8 {
                match Square::new(row, col).and_then(&piece_at) {
                    Some(c) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(c);
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }
}
