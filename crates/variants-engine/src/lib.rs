//! Rules engine for five chess variants sharing one board model.
//!
//! This crate provides:
//! - [`Board`] - 8×8 grid with reversible execute/undo and variant bookkeeping
//! - [`movegen`] - geometric (pseudo-legal) move generation and perft
//! - [`GameVariant`] - trait implemented by Classical, Fog of War, Duck
//!   Chess, Crazyhouse and Chaturaji
//! - [`Game`] - turn order, validation and game-end detection
//! - [`GameRecord`] - JSON game records with lenient loading
//! - [`GameConfig`] - TOML configuration
//!
//! # Architecture
//!
//! Legality is decided by executing a candidate move, probing the board and
//! undoing it again ([`Board::simulate`]). Reserves, scores and eliminations
//! change only in [`GameVariant::apply_post_move`], which the [`Game`]
//! calls on committed moves, so probing never disturbs them.
//!
//! # Example
//!
//! ```
//! use variants_engine::{Game, Variant};
//!
//! let mut game = Game::new(Variant::Crazyhouse);
//! println!("Legal moves from starting position: {}", game.all_legal_moves().len());
//!
//! game.make_move_notation("e2e4").unwrap();
//! game.make_move_notation("d7d5").unwrap();
//! game.make_move_notation("e4d5").unwrap();
//! println!("{}", game.board());
//! ```

mod board;
pub mod config;
mod game;
pub mod movegen;
pub mod record;
pub mod rules;

pub use board::{castling_rook_squares, en_passant_victim, Board};
pub use config::{ClockConfig, ConfigError, GameConfig, TimeControl};
pub use game::{Game, GameError};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::pseudo_legal_moves;
pub use record::{GameRecord, MoveRecord, RecordError};
pub use rules::{DrawReason, GameResult, GameVariant, Variant};
