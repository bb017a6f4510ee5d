//! Mutable 8×8 board with reversible move history.

use std::fmt;

use tracing::trace;
use variants_core::{
    Color, FenError, Location, Move, MoveKind, Piece, PieceKind, Placement, Square,
};

/// Number of colors tracked by per-color tables.
const COLORS: usize = Color::ALL.len();

/// Number of piece kinds tracked by reserve tables.
const KINDS: usize = PieceKind::ALL.len();

/// One executed move together with the clock it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    mv: Move,
    half_move_clock: u32,
}

/// Complete board state shared by every variant.
///
/// Besides the grid the board carries the bookkeeping some variants need:
/// Crazyhouse reserves, Chaturaji scores and eliminations, and the Duck
/// Chess phase flag. [`Board::execute_move`] and [`Board::undo_move`] only
/// touch the grid, the history and the half-move clock; reserves, scores and
/// eliminations are changed by the variant's post-move step on committed
/// moves, which keeps undo exact for legality probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
    history: Vec<HistoryEntry>,
    reserves: [[u32; KINDS]; COLORS],
    crazyhouse_mode: bool,
    scores: [u32; COLORS],
    dead: [bool; COLORS],
    waiting_for_duck: bool,
    half_move_clock: u32,
}

impl Board {
    /// Creates an empty board.
    pub fn empty() -> Self {
        Board {
            grid: [[None; 8]; 8],
            history: Vec::new(),
            reserves: [[0; KINDS]; COLORS],
            crazyhouse_mode: false,
            scores: [0; COLORS],
            dead: [false; COLORS],
            waiting_for_duck: false,
            half_move_clock: 0,
        }
    }

    /// Creates a board with the standard two-player starting position.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        board.reset_board();
        board
    }

    /// Creates a board with the Chaturaji starting position.
    pub fn chaturaji() -> Self {
        let mut board = Board::empty();
        board.reset_chaturaji();
        board
    }

    /// Creates a board from a FEN piece placement.
    ///
    /// Pawns away from their home row, and kings or rooks away from their
    /// starting squares, are marked as having moved.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let placement = Placement::parse(fen)?;
        let mut board = Board::empty();
        for (sq, kind, color) in placement.pieces {
            let mut piece = Piece::new(kind, color, sq);
            piece.has_moved = !Self::on_home_square(kind, color, sq);
            board.set(sq, Some(piece));
        }
        Ok(board)
    }

    fn on_home_square(kind: PieceKind, color: Color, sq: Square) -> bool {
        let Some(back) = color.back_rank() else {
            return true;
        };
        match kind {
            PieceKind::Pawn => match color {
                Color::White => sq.row() == 6,
                Color::Black => sq.row() == 1,
                _ => true,
            },
            PieceKind::King => sq.row() == back && sq.col() == 4,
            PieceKind::Rook => sq.row() == back && (sq.col() == 0 || sq.col() == 7),
            _ => true,
        }
    }

    /// Clears all state and sets up the standard starting position.
    pub fn reset_board(&mut self) {
        *self = Board::empty();
        const BACK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, kind) in BACK.iter().enumerate() {
            let col = col as u8;
            self.put(Color::Black, *kind, 0, col);
            self.put(Color::Black, PieceKind::Pawn, 1, col);
            self.put(Color::White, PieceKind::Pawn, 6, col);
            self.put(Color::White, *kind, 7, col);
        }
    }

    /// Clears all state and sets up the four-player Chaturaji position.
    ///
    /// Each player holds one corner: Red bottom-left, Blue top-left, Yellow
    /// top-right and Green bottom-right, with pawns facing their direction
    /// of travel.
    pub fn reset_chaturaji(&mut self) {
        *self = Board::empty();
        const ARMY: [PieceKind; 4] = [
            PieceKind::Boat,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::King,
        ];
        for (i, kind) in ARMY.iter().enumerate() {
            let i = i as u8;
            self.put(Color::Red, *kind, 7, i);
            self.put(Color::Red, PieceKind::Pawn, 6, i);
            self.put(Color::Blue, *kind, i, 0);
            self.put(Color::Blue, PieceKind::Pawn, i, 1);
            self.put(Color::Yellow, *kind, 0, 7 - i);
            self.put(Color::Yellow, PieceKind::Pawn, 1, 7 - i);
            self.put(Color::Green, *kind, 7 - i, 7);
            self.put(Color::Green, PieceKind::Pawn, 7 - i, 6);
        }
    }

    fn put(&mut self, color: Color, kind: PieceKind, row: u8, col: u8) {
        if let Some(sq) = Square::new(row, col) {
            self.set(sq, Some(Piece::new(kind, color, sq)));
        }
    }

    #[inline]
    fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.grid[sq.row() as usize][sq.col() as usize] = piece;
    }

    #[inline]
    fn take(&mut self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize].take()
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize]
    }

    /// Returns true if the square is empty.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Places a piece on a square, returning whatever stood there before.
    pub fn place_piece(&mut self, mut piece: Piece, sq: Square) -> Option<Piece> {
        piece.location = Location::OnBoard(sq);
        let previous = self.take(sq);
        self.set(sq, Some(piece));
        previous
    }

    /// Removes and returns the piece on a square.
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        self.take(sq)
    }

    /// Iterates over every piece on the board in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.grid.iter().flatten().flatten().copied()
    }

    /// Collects the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> Vec<Piece> {
        self.pieces().filter(|p| p.color == color).collect()
    }

    /// Returns the square of the given color's king, if it is still on the board.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|p| p.kind == PieceKind::King && p.color == color)
            .and_then(|p| p.square())
    }

    /// Returns the square of the duck, if it has been placed.
    pub fn find_duck(&self) -> Option<Square> {
        self.pieces()
            .find(|p| p.kind == PieceKind::Duck)
            .and_then(|p| p.square())
    }

    /// Executes a move, pushing it onto the history.
    ///
    /// The move must come from a variant's legal move list; it is not
    /// validated here. Reserves, scores and eliminations are left untouched.
    pub fn execute_move(&mut self, mv: Move) {
        let clock_before = self.half_move_clock;
        trace!(notation = %mv, "execute");

        if let Location::OnBoard(to) = mv.to {
            match mv.kind {
                MoveKind::Drop => {
                    let kind = mv.drop.unwrap_or(mv.piece.kind);
                    let mut piece = Piece::new(kind, mv.color(), to);
                    // a dropped pawn may still advance two squares; nothing else may castle
                    piece.has_moved = kind != PieceKind::Pawn;
                    debug_assert!(self.is_empty(to), "drop onto occupied square {}", to);
                    self.set(to, Some(piece));
                    self.bump_clock(kind == PieceKind::Pawn);
                }
                MoveKind::Duck => {
                    if let Some(from) = mv.from_square() {
                        self.take(from);
                    }
                    let mut duck = mv.piece;
                    duck.move_to(to);
                    self.set(to, Some(duck));
                }
                _ => self.execute_board_move(&mv, to),
            }
        } else {
            debug_assert!(mv.is_terminal(), "non-terminal move without destination");
        }

        self.history.push(HistoryEntry {
            mv,
            half_move_clock: clock_before,
        });
    }

    fn execute_board_move(&mut self, mv: &Move, to: Square) {
        let Some(from) = mv.from_square() else {
            debug_assert!(false, "board move without origin");
            return;
        };
        let mut piece = self.take(from).unwrap_or(mv.piece);
        debug_assert_eq!(piece.kind, mv.piece.kind);

        if mv.kind == MoveKind::EnPassant {
            if let Some(victim) = en_passant_victim(to, piece.color) {
                self.take(victim);
            }
        }

        piece.move_to(to);
        if mv.kind == MoveKind::Promotion {
            piece.kind = mv
                .promotion
                .unwrap_or_else(|| PieceKind::default_promotion(piece.color));
        }
        self.set(to, Some(piece));

        if mv.kind == MoveKind::Castling {
            let (rook_from, rook_to) = castling_rook_squares(from, to);
            if let Some(mut rook) = self.take(rook_from) {
                rook.move_to(rook_to);
                self.set(rook_to, Some(rook));
            }
        }

        self.bump_clock(mv.piece.kind == PieceKind::Pawn || mv.is_capture());
    }

    fn bump_clock(&mut self, reset: bool) {
        if reset {
            self.half_move_clock = 0;
        } else {
            self.half_move_clock += 1;
        }
    }

    /// Reverts the most recent move. Returns `None` when the history is empty.
    pub fn undo_move(&mut self) -> Option<Move> {
        let HistoryEntry {
            mv,
            half_move_clock,
        } = self.history.pop()?;
        self.half_move_clock = half_move_clock;
        trace!(notation = %mv, "undo");

        let Location::OnBoard(to) = mv.to else {
            return Some(mv);
        };

        match mv.kind {
            MoveKind::Drop => {
                self.take(to);
            }
            MoveKind::Duck => {
                self.take(to);
                if let Some(from) = mv.from_square() {
                    self.set(from, Some(mv.piece));
                }
            }
            _ => {
                let Some(from) = mv.from_square() else {
                    return Some(mv);
                };
                let moved = self.take(to);
                let mut piece = match moved {
                    Some(p) if mv.kind != MoveKind::Promotion => p,
                    _ => mv.piece,
                };
                piece.location = Location::OnBoard(from);
                if mv.first_move {
                    piece.has_moved = false;
                }
                self.set(from, Some(piece));

                if mv.kind == MoveKind::EnPassant {
                    if let Some(victim) = en_passant_victim(to, mv.color()) {
                        self.set(victim, mv.captured);
                    }
                } else {
                    self.set(to, mv.captured);
                }

                if mv.kind == MoveKind::Castling {
                    let (rook_from, rook_to) = castling_rook_squares(from, to);
                    if let Some(mut rook) = self.take(rook_to) {
                        rook.location = Location::OnBoard(rook_from);
                        rook.has_moved = false;
                        self.set(rook_from, Some(rook));
                    }
                }
            }
        }

        Some(mv)
    }

    /// Executes `mv`, runs `inspect` on the resulting board, then undoes the move.
    ///
    /// This is the only way rule engines mutate the board while testing
    /// legality. Calls must not be nested.
    pub fn simulate<R, F>(&mut self, mv: Move, inspect: F) -> R
    where
        F: FnOnce(&Board) -> R,
    {
        let depth = self.history.len();
        self.execute_move(mv);
        let result = inspect(self);
        self.undo_move();
        debug_assert_eq!(depth, self.history.len());
        result
    }

    /// Returns the most recently executed move.
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last().map(|entry| &entry.mv)
    }

    /// Returns the most recent move of a player's piece, skipping duck moves
    /// and terminal entries.
    pub fn last_piece_move(&self) -> Option<&Move> {
        self.history
            .iter()
            .rev()
            .map(|entry| &entry.mv)
            .find(|mv| mv.kind != MoveKind::Duck && !mv.is_terminal())
    }

    /// Iterates over the executed moves, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = &Move> + '_ {
        self.history.iter().map(|entry| &entry.mv)
    }

    /// Returns the number of executed moves.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Returns the number of half-moves since the last capture or pawn move.
    #[inline]
    pub fn half_move_clock(&self) -> u32 {
        self.half_move_clock
    }

    /// Sets the half-move clock, for positions set up mid-game.
    pub fn set_half_move_clock(&mut self, clock: u32) {
        self.half_move_clock = clock;
    }

    // -- Crazyhouse reserves --

    /// Enables or disables crediting captures to reserves.
    pub fn set_crazyhouse_mode(&mut self, enabled: bool) {
        self.crazyhouse_mode = enabled;
    }

    /// Returns true if captures are credited to reserves.
    pub fn is_crazyhouse_mode(&self) -> bool {
        self.crazyhouse_mode
    }

    /// Adds one piece of `kind` to `color`'s reserve.
    pub fn add_to_reserve(&mut self, color: Color, kind: PieceKind) {
        self.reserves[color.index()][kind.index()] += 1;
    }

    /// Takes one piece of `kind` from `color`'s reserve. Returns false if none was held.
    pub fn remove_from_reserve(&mut self, color: Color, kind: PieceKind) -> bool {
        let count = &mut self.reserves[color.index()][kind.index()];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Returns how many pieces of `kind` `color` holds in reserve.
    pub fn reserve(&self, color: Color, kind: PieceKind) -> u32 {
        self.reserves[color.index()][kind.index()]
    }

    /// Returns the non-empty reserve entries of `color`.
    pub fn reserve_of(&self, color: Color) -> Vec<(PieceKind, u32)> {
        PieceKind::ALL
            .iter()
            .map(|&kind| (kind, self.reserve(color, kind)))
            .filter(|&(_, count)| count > 0)
            .collect()
    }

    // -- Chaturaji scores and eliminations --

    /// Adds points to a color's score.
    pub fn add_score(&mut self, color: Color, points: u32) {
        self.scores[color.index()] += points;
    }

    /// Returns a color's score.
    pub fn score(&self, color: Color) -> u32 {
        self.scores[color.index()]
    }

    /// Eliminates a player, turning their remaining pieces grey in place.
    pub fn kill_player(&mut self, color: Color) {
        self.dead[color.index()] = true;
        for piece in self.grid.iter_mut().flatten().flatten() {
            if piece.color == color {
                piece.color = Color::Grey;
            }
        }
    }

    /// Returns true if the player has been eliminated.
    pub fn is_player_dead(&self, color: Color) -> bool {
        self.dead[color.index()]
    }

    // -- Duck Chess phase --

    /// Returns true while the current player still has to move the duck.
    pub fn waiting_for_duck(&self) -> bool {
        self.waiting_for_duck
    }

    /// Sets the duck phase flag.
    pub fn set_waiting_for_duck(&mut self, waiting: bool) {
        self.waiting_for_duck = waiting;
    }

    /// Returns the FEN piece placement of the grid.
    pub fn to_fen(&self) -> String {
        Placement::to_fen(|sq| self.piece_at(sq).map(|p| p.to_fen_char()))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8u8 {
                let cell = Square::new(row, col).and_then(|sq| self.piece_at(sq));
                match cell {
                    Some(piece) => {
                        write!(f, " {}{}", color_tag(piece.color), piece_tag(piece.kind))?
                    }
                    None => write!(f, " ..")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for file in 'a'..='h' {
            write!(f, " {} ", file)?;
        }
        Ok(())
    }
}

fn color_tag(color: Color) -> char {
    match color {
        Color::White => 'w',
        Color::Black => 'b',
        Color::Red => 'r',
        Color::Blue => 'u',
        Color::Yellow => 'y',
        Color::Green => 'g',
        Color::Grey => 'x',
        Color::Special => '*',
    }
}

fn piece_tag(kind: PieceKind) -> char {
    match kind {
        PieceKind::Duck => 'D',
        other => other.to_fen_char(Color::White),
    }
}

/// Returns the square of the pawn captured en passant when a pawn of
/// `color` lands on `to`: one step behind the landing square.
pub fn en_passant_victim(to: Square, color: Color) -> Option<Square> {
    let (dr, dc) = color.pawn_direction();
    to.offset(-dr, -dc)
}

/// Returns `(rook_from, rook_to)` for a castling king move `from -> to`.
pub fn castling_rook_squares(from: Square, to: Square) -> (Square, Square) {
    let row = from.row();
    let (rook_from, rook_to) = if to.col() > from.col() {
        (7, 5)
    } else {
        (0, 3)
    };
    match (Square::new(row, rook_from), Square::new(row, rook_to)) {
        (Some(a), Some(b)) => (a, b),
        _ => (from, to),
    }
}
