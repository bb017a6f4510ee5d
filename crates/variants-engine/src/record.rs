//! Saved games.
//!
//! A [`GameRecord`] keeps what is needed to rebuild a game: the variant,
//! the textual result and the ordered moves as endpoints plus a kind tag.
//! Loading is lenient; malformed or illegal move entries are skipped one
//! by one and reported alongside the replayed game.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use variants_core::{Color, Location, Move, MoveKind, PieceKind, Square};

use crate::rules::Variant;
use crate::{Game, GameError};

/// Errors raised while loading or replaying a record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Failed to read or write the record file.
    #[error("failed to access record file: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid JSON or has no usable header.
    #[error("failed to parse record: {0}")]
    Parse(#[from] serde_json::Error),
    /// The `variant` field is missing or unknown.
    #[error("record has no valid variant")]
    MissingVariant,
    /// A move entry could not be decoded.
    #[error("move {index}: malformed entry: {reason}")]
    MalformedMove { index: usize, reason: String },
    /// A move entry decoded but was rejected when replayed.
    #[error("move {index}: {source}")]
    Rejected { index: usize, source: GameError },
}

/// One persisted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Origin square; absent for drops and the first duck placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Square>,
    /// Destination square; absent only for terminal kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Square>,
    pub kind: MoveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop: Option<PieceKind>,
    /// The conceding player, for timeouts and resignations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Color>,
}

impl MoveRecord {
    /// Captures the persisted fields of a move.
    pub fn from_move(mv: &Move) -> Self {
        MoveRecord {
            from: mv.from_square(),
            to: mv.to_square(),
            kind: mv.kind,
            promotion: mv.promotion,
            drop: mv.drop,
            player: mv.is_terminal().then(|| mv.color()),
        }
    }

    /// Checks the field combinations a move of this kind requires.
    fn validate(&self) -> Result<(), String> {
        match self.kind {
            MoveKind::Timeout | MoveKind::Resign if self.player.is_none() => {
                Err(format!("{:?} without player", self.kind))
            }
            kind if kind.is_terminal() => Ok(()),
            _ if self.to.is_none() => Err("missing destination".to_string()),
            MoveKind::Drop if self.drop.is_none() => Err("drop without piece".to_string()),
            MoveKind::Drop | MoveKind::Duck => Ok(()),
            _ if self.from.is_none() => Err("missing origin".to_string()),
            _ => Ok(()),
        }
    }

    /// Applies this entry to `game`.
    ///
    /// The resolved move must have the recorded kind; an omitted promotion
    /// target resolves to the default one.
    fn replay(&self, game: &mut Game) -> Result<(), GameError> {
        match (self.kind, self.player) {
            (MoveKind::Resign, Some(player)) => return game.resign(player),
            (MoveKind::Timeout, Some(player)) => return game.timeout(player),
            (MoveKind::Draw, _) => return game.agree_draw(),
            _ => {}
        }

        let illegal = || GameError::IllegalMove(format!("{:?}", self));
        let to = self.to.ok_or_else(illegal)?;
        let from = self.from.map_or(Location::InReserve, Location::OnBoard);
        let mv = game
            .find_legal_move(from, to, self.promotion, self.drop)
            .ok_or_else(illegal)?;
        if mv.kind != self.kind {
            return Err(illegal());
        }
        game.make_move(mv)
    }
}

/// A saved game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub variant: Variant,
    /// Human-readable result, absent for unfinished games.
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub moves: Vec<MoveRecord>,
}

impl GameRecord {
    /// Builds a record from a game's committed moves.
    pub fn from_game(game: &Game) -> Self {
        GameRecord {
            variant: game.variant(),
            result: game.result().map(|r| r.to_string()),
            moves: game.moves().map(MoveRecord::from_move).collect(),
        }
    }

    /// Serializes the record as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a record, skipping move entries that cannot be decoded.
    ///
    /// The skipped entries are returned next to the record.
    pub fn from_json(json: &str) -> Result<(Self, Vec<RecordError>), RecordError> {
        let document: Value = serde_json::from_str(json)?;

        let variant = document
            .get("variant")
            .cloned()
            .and_then(|v| serde_json::from_value::<Variant>(v).ok())
            .ok_or(RecordError::MissingVariant)?;
        let result = document
            .get("result")
            .and_then(Value::as_str)
            .map(str::to_string);

        let entries: &[Value] = match document.get("moves") {
            Some(Value::Array(entries)) => entries.as_slice(),
            _ => &[],
        };

        let mut moves = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let decoded = serde_json::from_value::<MoveRecord>(entry.clone())
                .map_err(|e| e.to_string())
                .and_then(|record| record.validate().map(|()| record));
            match decoded {
                Ok(record) => moves.push(record),
                Err(reason) => {
                    warn!(index, %reason, "skipping malformed move record");
                    skipped.push(RecordError::MalformedMove { index, reason });
                }
            }
        }

        Ok((
            GameRecord {
                variant,
                result,
                moves,
            },
            skipped,
        ))
    }

    /// Reads and parses a record file.
    pub fn load(path: &Path) -> Result<(Self, Vec<RecordError>), RecordError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Writes the record to a file as JSON.
    pub fn save(&self, path: &Path) -> Result<(), RecordError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Replays the moves from the variant's starting position.
    ///
    /// Entries the game rejects are skipped and returned.
    pub fn replay(&self) -> (Game, Vec<RecordError>) {
        let mut game = Game::new(self.variant);
        let mut rejected = Vec::new();
        for (index, record) in self.moves.iter().enumerate() {
            if let Err(source) = record.replay(&mut game) {
                warn!(index, error = %source, "skipping rejected move record");
                rejected.push(RecordError::Rejected { index, source });
            }
        }
        (game, rejected)
    }
}
