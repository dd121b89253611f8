//! Bitboard chess engine with fixed-depth alpha-beta search.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets
//! - [`Position`] - twelve piece masks, side to move, castling rights and the
//!   en-passant slot
//! - [`GameState`] - apply/undo over a snapshot journal, plus capture lists
//! - Attack tables, sliding attacks, check detection and legal move
//!   generation in [`movegen`]
//! - [`evaluate`] - material balance
//! - [`SearchEngine`] - minimax with alpha-beta pruning and a random
//!   tie-break among equally scored root moves
//!
//! # Architecture
//!
//! Squares are numbered little-endian (a1 = 0, h8 = 63). Legal moves are
//! found by playing each candidate on a copy of the position and rejecting
//! those that leave the mover's king attacked. Search walks the tree through
//! [`GameState::apply_move`] and [`GameState::undo_move`].
//!
//! # Example
//!
//! ```
//! use chess_core::{Color, Square};
//! use chess_engine::{GameState, MoveOptions, SearchEngine};
//!
//! let mut state = GameState::new();
//! println!("Legal moves from starting position: {}", state.generate_moves().len());
//!
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! assert!(state.apply_move(e2, e4, MoveOptions::default()).applied);
//!
//! let mut engine = SearchEngine::seeded(7);
//! let reply = engine.best_move(&mut state, 2, Color::Black).unwrap();
//! println!("Black answers with {:?}", reply.map(|outcome| outcome.mv));
//! ```

mod bitboard;
mod castling;
mod error;
pub mod eval;
mod game;
pub mod movegen;
mod position;
pub mod search;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::{CastlePath, CastleSide, CastlingRights};
pub use chess_core::STARTPOS_FEN;
pub use error::EngineError;
pub use eval::{evaluate, material, piece_value};
pub use game::{GameState, HistoryEntry, MoveOptions, MoveOutcome};
pub use movegen::{
    bishop_attacks, game_status, generate_moves, has_legal_move, in_check, init_attack_tables,
    is_king_attacked, is_square_attacked, king_attacks, knight_attacks, legal_moves,
    pawn_attacks, pseudo_moves, queen_attacks, rook_attacks, slider_attacks, GameStatus,
    MoveList,
};
pub use position::{PieceBoards, Position};
pub use search::{clamp_depth, SearchEngine, SearchOutcome, DEFAULT_DEPTH, MATE_SCORE};
