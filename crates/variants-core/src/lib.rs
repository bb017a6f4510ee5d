//! Core types for the chess variants engine.
//!
//! This crate provides the fundamental types shared by every variant:
//! - [`Color`] for piece ownership (players, eliminated pieces, the duck)
//! - [`PieceKind`] and [`Piece`] for piece identity and movement state
//! - [`Square`] and [`Location`] for board coordinates
//! - [`Move`] and [`MoveKind`] for move representation
//! - FEN piece-placement parsing

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, Placement};
pub use mov::{Move, MoveKind};
pub use piece::{Piece, PieceKind};
pub use square::{Location, Square, SquareError};
