//! Turn-by-turn game management.
//!
//! The [`Game`] struct owns a [`Board`] and drives it through a variant's
//! rules:
//! - Legal move queries for the side to move
//! - Move validation and commit, including variant side effects
//! - Turn order (duck phase, eliminated Chaturaji players)
//! - Game-end detection, resignation, timeouts and agreed draws

use thiserror::Error;
use tracing::{debug, info};
use variants_core::{Color, Location, Move, MoveKind, Piece, PieceKind, Square};

use crate::rules::{ChaturajiVariant, DrawReason, GameResult, GameVariant, Variant};
use crate::Board;

/// Error type for game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// The game has already ended.
    #[error("game has already ended")]
    GameAlreadyOver,
    /// A piece of the wrong player was moved.
    #[error("not {got}'s turn: {expected} to move")]
    NotYourTurn { expected: Color, got: Color },
}

/// Promotion targets a pawn of `color` may choose from.
fn promotion_choices(color: Color) -> &'static [PieceKind] {
    if color.is_four_player() {
        &[PieceKind::Boat]
    } else {
        &[
            PieceKind::Queen,
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Knight,
        ]
    }
}

/// Returns true if `requested` is `candidate`, possibly with another
/// permitted promotion target.
fn matches_legal(candidate: &Move, requested: &Move) -> bool {
    if candidate == requested {
        return true;
    }
    match requested.promotion {
        Some(target) if candidate.kind == MoveKind::Promotion => {
            promotion_choices(candidate.color()).contains(&target)
                && candidate.with_promotion(target) == *requested
        }
        _ => false,
    }
}

/// A game of one variant in progress.
#[derive(Debug, Clone)]
pub struct Game {
    variant: Variant,
    board: Board,
    side_to_move: Color,
    result: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Variant::Classical)
    }
}

impl Game {
    /// Creates a new game from the variant's starting position.
    pub fn new(variant: Variant) -> Self {
        let rules = variant.rules();
        Game {
            variant,
            board: rules.initial_board(),
            side_to_move: rules.players()[0],
            result: None,
        }
    }

    /// Creates a game from a prepared board.
    ///
    /// The position is checked for an immediate end, as after a move.
    pub fn from_board(variant: Variant, board: Board, side_to_move: Color) -> Self {
        let mut game = Game {
            variant,
            board,
            side_to_move,
            result: None,
        };
        if variant == Variant::Chaturaji {
            game.settle_chaturaji_turn(false);
        } else {
            game.evaluate_position();
        }
        game
    }

    /// Returns the variant being played.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the variant's rule engine.
    pub fn rules(&self) -> &'static dyn GameVariant {
        self.variant.rules()
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn it is.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.rules().is_check(&self.board, self.side_to_move)
    }

    /// Iterates over the committed moves, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = &Move> + '_ {
        self.board.moves()
    }

    /// Returns the number of committed moves, including duck moves and
    /// terminal entries.
    pub fn ply_count(&self) -> usize {
        self.board.history_len()
    }

    /// Returns the legal moves of the piece on `sq`.
    ///
    /// Empty unless the piece belongs to the side to move, or is the duck
    /// during the duck phase.
    pub fn legal_moves_at(&mut self, sq: Square) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        let Some(piece) = self.board.piece_at(sq) else {
            return Vec::new();
        };
        let movable = piece.color == self.side_to_move
            || (piece.kind == PieceKind::Duck && self.board.waiting_for_duck());
        if !movable {
            return Vec::new();
        }
        self.rules().legal_moves(&mut self.board, &piece)
    }

    /// Returns the legal drops of a reserve piece of the side to move.
    ///
    /// The duck belongs to no player, so it is never dropped from a reserve.
    pub fn reserve_drops(&mut self, kind: PieceKind) -> Vec<Move> {
        if self.is_game_over() || kind == PieceKind::Duck {
            return Vec::new();
        }
        let piece = Piece::in_reserve(kind, self.side_to_move);
        self.rules().legal_moves(&mut self.board, &piece)
    }

    /// Returns the legal duck relocations (Duck Chess only).
    pub fn duck_moves(&mut self) -> Vec<Move> {
        if self.is_game_over() || self.variant != Variant::DuckChess {
            return Vec::new();
        }
        let duck = self
            .board
            .find_duck()
            .and_then(|sq| self.board.piece_at(sq))
            .unwrap_or(Piece::in_reserve(PieceKind::Duck, Color::Special));
        self.rules().legal_moves(&mut self.board, &duck)
    }

    /// Returns every legal move available right now.
    pub fn all_legal_moves(&mut self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        if self.board.waiting_for_duck() {
            return self.duck_moves();
        }

        let rules = self.rules();
        let side = self.side_to_move;
        let mut moves = Vec::new();
        for piece in self.board.pieces_of(side) {
            moves.extend(rules.legal_moves(&mut self.board, &piece));
        }
        for (kind, _) in self.board.reserve_of(side) {
            moves.extend(self.reserve_drops(kind));
        }
        moves
    }

    /// Looks up the legal move matching the given endpoints.
    ///
    /// `from` is `InReserve` for drops (with `drop` set) and for the first
    /// duck placement. A promotion target other than the default is
    /// applied when permitted.
    pub fn find_legal_move(
        &mut self,
        from: Location,
        to: Square,
        promotion: Option<PieceKind>,
        drop: Option<PieceKind>,
    ) -> Option<Move> {
        let candidates = match (from, drop) {
            (Location::InReserve, Some(kind)) => self.reserve_drops(kind),
            (Location::InReserve, None) => self.duck_moves(),
            (Location::OnBoard(sq), _) => self.legal_moves_at(sq),
        };
        let mv = candidates
            .into_iter()
            .find(|mv| mv.to_square() == Some(to))?;
        match promotion {
            Some(target) if mv.kind == MoveKind::Promotion => promotion_choices(mv.color())
                .contains(&target)
                .then(|| mv.with_promotion(target)),
            _ => Some(mv),
        }
    }

    /// Validates and commits a move.
    pub fn make_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameAlreadyOver);
        }

        let candidates = match mv.kind {
            MoveKind::Duck => self.duck_moves(),
            MoveKind::Drop => {
                if mv.color() != self.side_to_move {
                    return Err(self.wrong_turn(mv.color()));
                }
                match mv.drop {
                    Some(kind) => self.reserve_drops(kind),
                    None => Vec::new(),
                }
            }
            kind if kind.is_terminal() => {
                return Err(GameError::IllegalMove(format!(
                    "{} must go through resign, timeout or agree_draw",
                    mv
                )));
            }
            _ => {
                if mv.color() != self.side_to_move {
                    return Err(self.wrong_turn(mv.color()));
                }
                match mv.from_square() {
                    Some(sq) => self.legal_moves_at(sq),
                    None => Vec::new(),
                }
            }
        };

        if !candidates
            .iter()
            .any(|candidate| matches_legal(candidate, &mv))
        {
            return Err(GameError::IllegalMove(mv.to_notation()));
        }

        self.commit(mv);
        Ok(())
    }

    /// Parses a move in coordinate notation and commits it.
    ///
    /// Accepts `e2e4`, `e7e8n` (promotion), `N@f3` (drop), and `*@d5` or
    /// `*e5d5` (duck move).
    pub fn make_move_notation(&mut self, text: &str) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let illegal = || GameError::IllegalMove(text.to_string());
        let text = text.trim();

        let mv = if let Some(rest) = text.strip_prefix('*') {
            // the origin is wherever the duck currently stands
            let target = rest
                .get(rest.len().saturating_sub(2)..)
                .ok_or_else(illegal)?;
            let to = Square::from_algebraic(target).ok_or_else(illegal)?;
            let from = self
                .board
                .find_duck()
                .map_or(Location::InReserve, Location::OnBoard);
            self.find_legal_move(from, to, None, None)
        } else if let Some((piece, target)) = text.split_once('@') {
            let to = Square::from_algebraic(target).ok_or_else(illegal)?;
            let mut chars = piece.chars();
            let kind = match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    PieceKind::from_fen_char(c.to_ascii_uppercase()).map(|(kind, _)| kind)
                }
                _ => None,
            }
            .ok_or_else(illegal)?;
            self.find_legal_move(Location::InReserve, to, None, Some(kind))
        } else {
            if text.len() < 4 || !text.is_ascii() {
                return Err(illegal());
            }
            let from = Square::from_algebraic(&text[0..2]).ok_or_else(illegal)?;
            let to = Square::from_algebraic(&text[2..4]).ok_or_else(illegal)?;
            let promotion = match text[4..].chars().next() {
                Some(c) => Some(
                    PieceKind::from_fen_char(c.to_ascii_uppercase())
                        .map(|(kind, _)| kind)
                        .ok_or_else(illegal)?,
                ),
                None => None,
            };
            if let Some(piece) = self.board.piece_at(from) {
                if piece.kind != PieceKind::Duck && piece.color != self.side_to_move {
                    return Err(self.wrong_turn(piece.color));
                }
            }
            self.find_legal_move(Location::OnBoard(from), to, promotion, None)
        };

        let mv = mv.ok_or_else(illegal)?;
        self.commit(mv);
        Ok(())
    }

    /// Records that `color` ran out of time.
    pub fn timeout(&mut self, color: Color) -> Result<(), GameError> {
        self.concede(MoveKind::Timeout, color)
    }

    /// Records that `color` resigned.
    pub fn resign(&mut self, color: Color) -> Result<(), GameError> {
        self.concede(MoveKind::Resign, color)
    }

    /// Ends the game as a draw by agreement.
    pub fn agree_draw(&mut self) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let mv = Move::terminal(MoveKind::Draw, self.side_to_move);
        self.board.execute_move(mv);
        self.finish(GameResult::Draw(DrawReason::Agreement));
        Ok(())
    }

    fn concede(&mut self, kind: MoveKind, color: Color) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameAlreadyOver);
        }
        if !self.rules().players().contains(&color) || self.board.is_player_dead(color) {
            return Err(GameError::IllegalMove(format!(
                "{} is not in the game",
                color
            )));
        }

        let mv = Move::terminal(kind, color);
        self.board.execute_move(mv);
        self.rules().apply_post_move(&mut self.board, &mv);
        debug!(player = %color, kind = ?kind, "concede");

        if self.variant == Variant::Chaturaji {
            let advance = color == self.side_to_move;
            self.settle_chaturaji_turn(advance);
        } else {
            self.finish(GameResult::Winner(color.opposite()));
        }
        Ok(())
    }

    fn wrong_turn(&self, got: Color) -> GameError {
        GameError::NotYourTurn {
            expected: self.side_to_move,
            got,
        }
    }

    /// Executes a move taken from [`Game::all_legal_moves`] without
    /// validating it again, then moves the game forward.
    pub(crate) fn commit(&mut self, mv: Move) {
        self.board.execute_move(mv);
        self.rules().apply_post_move(&mut self.board, &mv);
        debug!(
            variant = self.variant.id(),
            side = %self.side_to_move,
            notation = %mv,
            "move committed"
        );

        if self.variant == Variant::Chaturaji {
            self.settle_chaturaji_turn(true);
            return;
        }

        if let Some(captured) = mv.captured.filter(|p| p.kind == PieceKind::King) {
            debug!(king = %captured.color, "king captured");
            self.finish(GameResult::Winner(mv.color()));
            return;
        }

        // the mover still has to place the duck
        if self.board.waiting_for_duck() {
            return;
        }

        self.side_to_move = self.side_to_move.opposite();
        self.evaluate_position();
    }

    /// Checks the two-player end conditions for the side to move.
    fn evaluate_position(&mut self) {
        if self.board.waiting_for_duck() {
            return;
        }
        let rules = self.rules();
        let side = self.side_to_move;

        let result = match self.variant {
            Variant::Classical | Variant::Crazyhouse => {
                if rules.is_checkmate(&mut self.board, side) {
                    Some(GameResult::Winner(side.opposite()))
                } else if rules.is_stalemate(&mut self.board, side) {
                    Some(GameResult::Draw(DrawReason::Stalemate))
                } else {
                    None
                }
            }
            Variant::FogOfWar => rules
                .is_stalemate(&mut self.board, side)
                .then_some(GameResult::Draw(DrawReason::Stalemate)),
            Variant::DuckChess => rules
                .is_stalemate(&mut self.board, side)
                .then_some(GameResult::Winner(side)),
            Variant::Chaturaji => None,
        };

        let result = result.or_else(|| {
            rules
                .is_draw_by_fifty_move_rule(&self.board)
                .then_some(GameResult::Draw(DrawReason::FiftyMoveRule))
        });

        if let Some(result) = result {
            self.finish(result);
        }
    }

    /// Ends a Chaturaji game if it is decided, otherwise hands the turn to
    /// the next living player with a legal move.
    fn settle_chaturaji_turn(&mut self, advance: bool) {
        let living = ChaturajiVariant::living_players(&self.board);
        if living.len() <= 1 || ChaturajiVariant::is_impossible_to_catch_up(&self.board) {
            self.finish(ChaturajiVariant::final_result(&self.board));
            return;
        }

        let rules = self.rules();
        let players = rules.players();
        let start = players
            .iter()
            .position(|&color| color == self.side_to_move)
            .unwrap_or(0);
        let offsets = if advance {
            1..=players.len()
        } else {
            0..=players.len() - 1
        };

        for offset in offsets {
            let candidate = players[(start + offset) % players.len()];
            if self.board.is_player_dead(candidate) {
                continue;
            }
            if rules.has_legal_moves(&mut self.board, candidate) {
                if candidate != self.side_to_move {
                    debug!(from = %self.side_to_move, to = %candidate, "turn passes");
                }
                self.side_to_move = candidate;
                return;
            }
        }

        self.finish(ChaturajiVariant::final_result(&self.board));
    }

    fn finish(&mut self, result: GameResult) {
        info!(variant = self.variant.id(), result = %result, "game over");
        self.result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn play(game: &mut Game, moves: &[&str]) {
        for text in moves {
            game.make_move_notation(text)
                .unwrap_or_else(|e| panic!("{}: {}", text, e));
        }
    }

    #[test]
    fn new_game() {
        let mut game = Game::new(Variant::Classical);
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.side_to_move(), Color::White);
        assert!(!game.is_game_over());
        assert!(!game.is_check());
        assert_eq!(game.all_legal_moves().len(), 20);
    }

    #[test]
    fn make_move_by_value() {
        let mut game = Game::new(Variant::Classical);
        let mv = game
            .legal_moves_at(sq("g1"))
            .into_iter()
            .find(|m| m.to_square() == Some(sq("f3")))
            .unwrap();
        game.make_move(mv).unwrap();
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.moves().count(), 1);
    }

    #[test]
    fn illegal_move() {
        let mut game = Game::new(Variant::Classical);
        assert!(matches!(
            game.make_move_notation("e2e5"),
            Err(GameError::IllegalMove(_))
        ));
        assert!(matches!(
            game.make_move_notation("e9e4"),
            Err(GameError::IllegalMove(_))
        ));
    }

    #[test]
    fn not_your_turn() {
        let mut game = Game::new(Variant::Classical);
        assert_eq!(
            game.make_move_notation("e7e5"),
            Err(GameError::NotYourTurn {
                expected: Color::White,
                got: Color::Black
            })
        );
        assert!(game.legal_moves_at(sq("e7")).is_empty());
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut game = Game::new(Variant::Classical);
        play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(game.is_game_over());
        assert_eq!(game.result(), Some(GameResult::Winner(Color::Black)));
        assert!(game.all_legal_moves().is_empty());
    }

    #[test]
    fn stalemate() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8").unwrap();
        let game = Game::from_board(Variant::Classical, board, Color::Black);
        assert_eq!(game.result(), Some(GameResult::Draw(DrawReason::Stalemate)));
    }

    #[test]
    fn fifty_move_rule() {
        let mut board = Board::from_fen("7k/8/8/8/8/8/8/R3K3").unwrap();
        board.set_half_move_clock(99);
        let mut game = Game::from_board(Variant::Classical, board, Color::White);
        assert!(!game.is_game_over());
        play(&mut game, &["a1a2"]);
        assert_eq!(
            game.result(),
            Some(GameResult::Draw(DrawReason::FiftyMoveRule))
        );
    }

    #[test]
    fn under_promotion() {
        let board = Board::from_fen("8/P6k/8/8/8/8/8/4K3").unwrap();
        let mut game = Game::from_board(Variant::Classical, board, Color::White);
        play(&mut game, &["a7a8n"]);
        assert_eq!(
            game.board().piece_at(sq("a8")).map(|p| p.kind),
            Some(PieceKind::Knight)
        );
        assert_eq!(
            game.moves().last().and_then(|m| m.promotion),
            Some(PieceKind::Knight)
        );
    }

    #[test]
    fn resign() {
        let mut game = Game::new(Variant::Classical);
        game.resign(Color::White).unwrap();
        assert_eq!(game.result(), Some(GameResult::Winner(Color::Black)));
        assert_eq!(game.moves().last().map(|m| m.kind), Some(MoveKind::Resign));
        assert_eq!(
            game.make_move_notation("e2e4"),
            Err(GameError::GameAlreadyOver)
        );
    }

    #[test]
    fn timeout() {
        let mut game = Game::new(Variant::FogOfWar);
        game.timeout(Color::Black).unwrap();
        assert_eq!(game.result(), Some(GameResult::Winner(Color::White)));
        assert_eq!(game.timeout(Color::White), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn agree_draw() {
        let mut game = Game::new(Variant::Classical);
        game.agree_draw().unwrap();
        assert_eq!(game.result(), Some(GameResult::Draw(DrawReason::Agreement)));
    }

    #[test]
    fn fog_of_war_ends_on_king_capture() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2r").unwrap();
        let mut game = Game::from_board(Variant::FogOfWar, board, Color::Black);
        play(&mut game, &["h1e1"]);
        assert_eq!(game.result(), Some(GameResult::Winner(Color::Black)));
    }

    #[test]
    fn duck_chess_turn_has_two_phases() {
        let mut game = Game::new(Variant::DuckChess);
        play(&mut game, &["e2e4"]);
        assert_eq!(game.side_to_move(), Color::White);
        assert!(game.board().waiting_for_duck());
        assert!(matches!(
            game.make_move_notation("d2d4"),
            Err(GameError::IllegalMove(_))
        ));
        assert!(game
            .all_legal_moves()
            .iter()
            .all(|m| m.kind == MoveKind::Duck));
        assert!(game.reserve_drops(PieceKind::Duck).is_empty());

        play(&mut game, &["*@e5"]);
        assert_eq!(game.side_to_move(), Color::Black);
        assert!(!game.board().waiting_for_duck());

        // The duck blocks the double step.
        assert!(game.make_move_notation("e7e5").is_err());
        play(&mut game, &["e7e6", "*@d4"]);
        assert_eq!(game.board().find_duck(), Some(sq("d4")));
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn duck_chess_king_capture_wins_before_duck_phase() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2r").unwrap();
        let mut game = Game::from_board(Variant::DuckChess, board, Color::Black);
        play(&mut game, &["h1e1"]);
        assert_eq!(game.result(), Some(GameResult::Winner(Color::Black)));
    }

    #[test]
    fn crazyhouse_captures_feed_drops() {
        let mut game = Game::new(Variant::Crazyhouse);
        play(&mut game, &["e2e4", "d7d5", "e4d5", "d8d5"]);
        assert_eq!(game.board().reserve(Color::White, PieceKind::Pawn), 1);
        assert_eq!(game.board().reserve(Color::Black, PieceKind::Pawn), 1);

        assert!(!game.reserve_drops(PieceKind::Pawn).is_empty());
        assert!(game.reserve_drops(PieceKind::Knight).is_empty());
        play(&mut game, &["P@e3"]);
        assert_eq!(game.board().reserve(Color::White, PieceKind::Pawn), 0);
        assert_eq!(
            game.board().piece_at(sq("e3")).map(|p| p.kind),
            Some(PieceKind::Pawn)
        );
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn chaturaji_turn_order() {
        let mut game = Game::new(Variant::Chaturaji);
        assert_eq!(game.side_to_move(), Color::Red);
        play(&mut game, &["a2a3"]);
        assert_eq!(game.side_to_move(), Color::Blue);
    }

    #[test]
    fn chaturaji_resignations_skip_players() {
        let mut game = Game::new(Variant::Chaturaji);
        game.resign(Color::Blue).unwrap();
        assert_eq!(game.side_to_move(), Color::Red);
        assert!(game.board().is_player_dead(Color::Blue));

        game.resign(Color::Red).unwrap();
        assert_eq!(game.side_to_move(), Color::Yellow);
        assert_eq!(
            game.resign(Color::Red),
            Err(GameError::IllegalMove("Red is not in the game".to_string()))
        );

        game.resign(Color::Green).unwrap();
        assert_eq!(
            game.result(),
            Some(GameResult::Draw(DrawReason::SharedLead))
        );
    }

    #[test]
    fn player_ducks_are_never_offered() {
        let mut game = Game::new(Variant::DuckChess);
        assert!(game.reserve_drops(PieceKind::Duck).is_empty());
        play(&mut game, &["e2e4", "*@e5"]);
        assert!(game.reserve_drops(PieceKind::Duck).is_empty());

        let mut game = Game::new(Variant::Chaturaji);
        assert!(game.reserve_drops(PieceKind::Duck).is_empty());
        assert!(game.duck_moves().is_empty());
    }
}
