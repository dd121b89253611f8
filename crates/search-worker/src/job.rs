//! Search job wire types and their execution.
//!
//! A job carries a position snapshot in the host's square layout. The host
//! numbers squares top-down (a8 = 0, h1 = 63) unless the snapshot says
//! otherwise; the engine numbers them from a1. Conversion happens here, in
//! both directions, so the host only ever sees its own numbering.

use crate::config::WorkerConfig;
use chess_core::{Color, Piece, Square};
use chess_engine::{
    Bitboard, CastlingRights, EngineError, GameState, PieceBoards, Position, SearchEngine,
};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// The only job kind the worker understands.
pub const SEARCH_MESSAGE: &str = "search";

#[derive(Debug, Error)]
pub enum JobError {
    #[error("malformed job: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("job is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("unknown message {0:?}")]
    UnknownMessage(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("search panicked: {0}")]
    Panicked(String),
}

/// Player color as written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Color {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Side {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

/// How square indices in a snapshot map onto the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// a8 = 0, h8 = 7, a1 = 56, h1 = 63.
    #[default]
    TopDown,
    /// a1 = 0, h1 = 7, a8 = 56, h8 = 63.
    LittleEndian,
}

impl Layout {
    fn square_to_engine(self, index: u8) -> Option<Square> {
        let sq = Square::from_index(index)?;
        Some(match self {
            Layout::TopDown => sq.flip_vertical(),
            Layout::LittleEndian => sq,
        })
    }

    fn square_from_engine(self, sq: Square) -> u8 {
        match self {
            Layout::TopDown => sq.flip_vertical().index(),
            Layout::LittleEndian => sq.index(),
        }
    }

    fn mask_to_engine(self, mask: u64) -> Bitboard {
        let bb = Bitboard::new(mask);
        match self {
            Layout::TopDown => bb.flip_vertical(),
            Layout::LittleEndian => bb,
        }
    }

    fn mask_from_engine(self, bb: Bitboard) -> u64 {
        match self {
            Layout::TopDown => bb.flip_vertical().0,
            Layout::LittleEndian => bb.0,
        }
    }
}

/// A 64-bit square mask. Accepts a JSON number or a string holding a decimal
/// or `0x` hexadecimal value, with an optional BigInt `n` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "MaskRepr", into = "u64")]
pub struct Mask(pub u64);

#[derive(Deserialize)]
#[serde(untagged)]
enum MaskRepr {
    Number(u64),
    Text(String),
}

impl TryFrom<MaskRepr> for Mask {
    type Error = String;

    fn try_from(repr: MaskRepr) -> Result<Self, String> {
        let text = match repr {
            MaskRepr::Number(n) => return Ok(Mask(n)),
            MaskRepr::Text(text) => text,
        };
        let digits = text.trim().trim_end_matches('n');
        let parsed = match digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => digits.parse::<u64>(),
        };
        parsed
            .map(Mask)
            .map_err(|_| format!("invalid square mask {text:?}"))
    }
}

impl From<Mask> for u64 {
    fn from(mask: Mask) -> u64 {
        mask.0
    }
}

/// The twelve piece masks, keyed by color letter and piece letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct SnapshotMasks {
    pub wP: Mask,
    pub wN: Mask,
    pub wB: Mask,
    pub wR: Mask,
    pub wQ: Mask,
    pub wK: Mask,
    pub bP: Mask,
    pub bN: Mask,
    pub bB: Mask,
    pub bR: Mask,
    pub bQ: Mask,
    pub bK: Mask,
}

impl SnapshotMasks {
    fn get(&self, color: Color, piece: Piece) -> Mask {
        match (color, piece) {
            (Color::White, Piece::Pawn) => self.wP,
            (Color::White, Piece::Knight) => self.wN,
            (Color::White, Piece::Bishop) => self.wB,
            (Color::White, Piece::Rook) => self.wR,
            (Color::White, Piece::Queen) => self.wQ,
            (Color::White, Piece::King) => self.wK,
            (Color::Black, Piece::Pawn) => self.bP,
            (Color::Black, Piece::Knight) => self.bN,
            (Color::Black, Piece::Bishop) => self.bB,
            (Color::Black, Piece::Rook) => self.bR,
            (Color::Black, Piece::Queen) => self.bQ,
            (Color::Black, Piece::King) => self.bK,
        }
    }

    fn slot(&mut self, color: Color, piece: Piece) -> &mut Mask {
        match (color, piece) {
            (Color::White, Piece::Pawn) => &mut self.wP,
            (Color::White, Piece::Knight) => &mut self.wN,
            (Color::White, Piece::Bishop) => &mut self.wB,
            (Color::White, Piece::Rook) => &mut self.wR,
            (Color::White, Piece::Queen) => &mut self.wQ,
            (Color::White, Piece::King) => &mut self.wK,
            (Color::Black, Piece::Pawn) => &mut self.bP,
            (Color::Black, Piece::Knight) => &mut self.bN,
            (Color::Black, Piece::Bishop) => &mut self.bB,
            (Color::Black, Piece::Rook) => &mut self.bR,
            (Color::Black, Piece::Queen) => &mut self.bQ,
            (Color::Black, Piece::King) => &mut self.bK,
        }
    }
}

/// Board state as the host sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSnapshot {
    pub bitboards: SnapshotMasks,
    pub current_turn: Side,
    /// The human's color. The engine always plays the other one.
    #[serde(rename = "Player")]
    pub player: Side,
    #[serde(default)]
    pub castling_rights: u8,
    /// `-1` or absent when there is none.
    #[serde(default)]
    pub en_passant_square: Option<i64>,
    /// Display board; carried for the host and otherwise ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<serde_json::Value>,
    #[serde(default)]
    pub layout: Layout,
}

impl PositionSnapshot {
    /// Describes `position` in `layout`, with `player` as the human's color.
    pub fn from_position(position: &Position, player: Color, layout: Layout) -> Self {
        let mut bitboards = SnapshotMasks::default();
        for color in Color::ALL {
            for piece in Piece::ALL {
                let mask = layout.mask_from_engine(position.pieces_of(piece, color));
                *bitboards.slot(color, piece) = Mask(mask);
            }
        }
        PositionSnapshot {
            bitboards,
            current_turn: position.side_to_move.into(),
            player: player.into(),
            castling_rights: position.castling.bits(),
            en_passant_square: Some(
                position
                    .en_passant
                    .map_or(-1, |sq| i64::from(layout.square_from_engine(sq))),
            ),
            board: None,
            layout,
        }
    }

    /// Builds the engine position. Only the shape of the data is checked
    /// here; chess validity is checked before searching.
    pub fn to_position(&self) -> Result<Position, JobError> {
        if self.castling_rights > 0b1111 {
            return Err(JobError::InvalidSnapshot(format!(
                "castling rights {} out of range",
                self.castling_rights
            )));
        }
        let en_passant = match self.en_passant_square {
            None => None,
            Some(index) if index < 0 => None,
            Some(index) => {
                let sq = u8::try_from(index)
                    .ok()
                    .and_then(|index| self.layout.square_to_engine(index))
                    .ok_or_else(|| {
                        JobError::InvalidSnapshot(format!("en passant square {index} off the board"))
                    })?;
                Some(sq)
            }
        };

        let mut pieces: PieceBoards = [[Bitboard::EMPTY; 6]; 2];
        for color in Color::ALL {
            for piece in Piece::ALL {
                let mask = self.bitboards.get(color, piece).0;
                pieces[color.index()][piece.index()] = self.layout.mask_to_engine(mask);
            }
        }

        Ok(Position::from_parts(
            pieces,
            self.current_turn.into(),
            CastlingRights::new(self.castling_rights),
            en_passant,
        ))
    }

    /// The color the engine searches for.
    pub fn engine_side(&self) -> Color {
        Color::from(self.player).opposite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub message: String,
    pub game_state: PositionSnapshot,
    #[serde(default)]
    pub level: Option<i64>,
}

impl JobRequest {
    pub fn search(game_state: PositionSnapshot, level: Option<i64>) -> Self {
        JobRequest {
            message: SEARCH_MESSAGE.to_string(),
            game_state,
            level,
        }
    }
}

/// A move in the snapshot's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMove {
    pub from: u8,
    pub to: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobResponse {
    /// `None` when the engine has no legal move.
    Move {
        #[serde(rename = "move")]
        mv: Option<WireMove>,
    },
    Error { error: String },
}

impl From<JobError> for JobResponse {
    fn from(err: JobError) -> Self {
        JobResponse::Error {
            error: err.to_string(),
        }
    }
}

/// Runs search jobs with one configuration and one tie-break source.
pub struct Worker<R = StdRng> {
    engine: SearchEngine<R>,
    config: WorkerConfig,
}

impl Worker<StdRng> {
    pub fn from_config(config: WorkerConfig) -> Self {
        let engine = match config.seed {
            Some(seed) => SearchEngine::seeded(seed),
            None => SearchEngine::new(),
        };
        Worker { engine, config }
    }
}

impl<R: Rng> Worker<R> {
    pub fn with_rng(config: WorkerConfig, rng: R) -> Self {
        Worker {
            engine: SearchEngine::with_rng(rng),
            config,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Decodes one JSON job and runs it. Never fails: every problem becomes
    /// an error response.
    pub fn handle_line(&mut self, line: &str) -> JobResponse {
        match serde_json::from_str::<JobRequest>(line) {
            Ok(request) => self.run_job(&request),
            Err(err) => {
                tracing::warn!(error = %err, "rejecting malformed job");
                JobError::from(err).into()
            }
        }
    }

    /// Like [`Worker::handle_line`], for a raw line that may not be UTF-8.
    pub fn handle_bytes(&mut self, line: &[u8]) -> JobResponse {
        match std::str::from_utf8(line) {
            Ok(text) => self.handle_line(text),
            Err(err) => {
                tracing::warn!(error = %err, "rejecting job that is not UTF-8");
                JobError::from(err).into()
            }
        }
    }

    /// Runs one job, turning errors and panics into error responses.
    pub fn run_job(&mut self, request: &JobRequest) -> JobResponse {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.search(request)))
            .unwrap_or_else(|payload| Err(JobError::Panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(mv) => JobResponse::Move { mv },
            Err(err) => {
                tracing::warn!(error = %err, "job failed");
                err.into()
            }
        }
    }

    fn search(&mut self, request: &JobRequest) -> Result<Option<WireMove>, JobError> {
        if request.message != SEARCH_MESSAGE {
            return Err(JobError::UnknownMessage(request.message.clone()));
        }

        let snapshot = &request.game_state;
        let position = snapshot.to_position()?;
        let side = snapshot.engine_side();
        let depth = self.config.depth_for(request.level);
        tracing::info!(%side, depth, fen = %position.to_fen(), "search job");

        let mut state = GameState::from_position(position);
        let outcome = self.engine.best_move(&mut state, depth, side)?;

        Ok(outcome.map(|outcome| {
            tracing::info!(
                mv = %outcome.mv,
                score = outcome.score,
                candidates = outcome.candidates,
                nodes = outcome.nodes,
                "search done"
            );
            WireMove {
                from: snapshot.layout.square_from_engine(outcome.mv.from()),
                to: snapshot.layout.square_from_engine(outcome.mv.to()),
            }
        }))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
