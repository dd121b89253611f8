//! Mutable game state with a snapshot journal.
//!
//! [`GameState`] owns the current [`Position`], the pieces each side has
//! captured, and a journal of full snapshots. Every journaled move pushes the
//! complete state before mutating it, so [`GameState::undo_move`] restores by
//! overwrite instead of replaying the move backwards.

use crate::movegen::{self, GameStatus, MoveList};
use crate::{Bitboard, EngineError, Position};
use chess_core::{Color, Move, Piece, Square};

/// Options controlling a single [`GameState::apply_move`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    /// Reject the move unless it is legal in the current position.
    pub validate: bool,
    /// Piece a pawn becomes on its last rank. `None` means Queen.
    pub promotion: Option<Piece>,
    /// Journal the move so it can be undone, and record its capture.
    pub save_history: bool,
}

impl MoveOptions {
    /// Options used inside search: no validation, journaled.
    pub const UNCHECKED: MoveOptions = MoveOptions {
        validate: false,
        promotion: None,
        save_history: true,
    };

    pub fn with_promotion(mut self, piece: Piece) -> Self {
        self.promotion = Some(piece);
        self
    }
}

impl Default for MoveOptions {
    fn default() -> Self {
        MoveOptions {
            validate: true,
            promotion: None,
            save_history: true,
        }
    }
}

/// What happened to a requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// False when the move was rejected; the state is then untouched.
    pub applied: bool,
    /// Kind of the enemy piece removed from the destination.
    pub captured: Option<Piece>,
}

impl MoveOutcome {
    pub const REJECTED: MoveOutcome = MoveOutcome {
        applied: false,
        captured: None,
    };
}

/// Everything [`GameState::undo_move`] needs to restore one ply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    position: Position,
    captured: [Vec<Piece>; 2],
}

/// A position plus capture lists and an undo journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    position: Position,
    captured: [Vec<Piece>; 2],
    journal: Vec<HistoryEntry>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A game at the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    pub fn from_position(position: Position) -> Self {
        GameState {
            position,
            captured: [Vec::new(), Vec::new()],
            journal: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Pieces captured by `color` so far, oldest first.
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// Number of journaled moves that can still be undone.
    pub fn history_len(&self) -> usize {
        self.journal.len()
    }

    /// Legal destinations of the piece on `from`.
    pub fn legal_moves(&self, from: Square) -> Bitboard {
        movegen::legal_moves(&self.position, from)
    }

    /// Every legal move of the side to move.
    pub fn generate_moves(&self) -> MoveList {
        movegen::generate_moves(&self.position)
    }

    pub fn in_check(&self) -> Result<bool, EngineError> {
        movegen::in_check(&self.position)
    }

    pub fn game_status(&self) -> Result<GameStatus, EngineError> {
        movegen::game_status(&self.position)
    }

    /// Moves the piece on `from` to `to`.
    ///
    /// Rejected requests return [`MoveOutcome::REJECTED`] and leave the
    /// state and journal exactly as they were. A request is rejected when
    /// `from` holds no piece of the side to move, when `to` holds one of the
    /// mover's own pieces, when the promotion choice is not a piece a pawn
    /// may become, or, with `validate`, when the move is not legal.
    pub fn apply_move(&mut self, from: Square, to: Square, options: MoveOptions) -> MoveOutcome {
        let us = self.position.side_to_move;
        let Some(piece) = self.position.piece_of(us, from) else {
            return MoveOutcome::REJECTED;
        };
        if self.position.color_occupancy(us).contains(to) {
            return MoveOutcome::REJECTED;
        }
        let promotion = options.promotion.unwrap_or(Piece::Queen);
        if !promotion.is_promotion_target() {
            return MoveOutcome::REJECTED;
        }
        if options.validate && !self.legal_moves(from).contains(to) {
            return MoveOutcome::REJECTED;
        }

        if options.save_history {
            self.journal.push(HistoryEntry {
                position: self.position,
                captured: self.captured.clone(),
            });
        }

        let captured = self.position.play(piece, from, to, promotion);
        if options.save_history {
            if let Some(kind) = captured {
                self.captured[us.index()].push(kind);
            }
        }

        MoveOutcome {
            applied: true,
            captured,
        }
    }

    /// Applies `mv`. A promotion carried by the move takes precedence over
    /// the one in `options`.
    pub fn apply(&mut self, mv: Move, options: MoveOptions) -> MoveOutcome {
        let options = MoveOptions {
            promotion: mv.promotion().or(options.promotion),
            ..options
        };
        self.apply_move(mv.from(), mv.to(), options)
    }

    /// Restores the state saved by the most recent journaled move.
    ///
    /// Returns false, changing nothing, when the journal is empty.
    pub fn undo_move(&mut self) -> bool {
        match self.journal.pop() {
            Some(entry) => {
                self.position = entry.position;
                self.captured = entry.captured;
                true
            }
            None => false,
        }
    }
}
