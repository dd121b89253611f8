//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! Scores are always from White's point of view: White maximizes, Black
//! minimizes. A mate is worth `MATE_SCORE + depth`, where `depth` is the
//! remaining depth at the mated node, so faster mates score further from
//! zero. Among root moves that share the best score exactly, one is picked at
//! random.

use crate::eval::evaluate;
use crate::game::{GameState, MoveOptions};
use crate::movegen::{generate_moves, has_legal_move, is_king_attacked};
use crate::{EngineError, Position};
use chess_core::{Color, Move};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Base magnitude of a checkmate score.
pub const MATE_SCORE: i32 = 100_000;

pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 5;
pub const DEFAULT_DEPTH: u8 = 3;

/// Maps a difficulty level onto a search depth in `MIN_DEPTH..=MAX_DEPTH`.
pub fn clamp_depth(level: i64) -> u8 {
    level.clamp(i64::from(MIN_DEPTH), i64::from(MAX_DEPTH)) as u8
}

/// The move chosen at the root and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub mv: Move,
    pub score: i32,
    /// Root moves whose score tied `score`; `mv` is one of them.
    pub candidates: usize,
    /// Nodes visited, root children included.
    pub nodes: u64,
}

/// Alpha-beta searcher with an injectable tie-break source.
pub struct SearchEngine<R = StdRng> {
    rng: R,
    nodes: u64,
}

impl SearchEngine<StdRng> {
    /// A searcher seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A searcher whose tie-breaks repeat for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SearchEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SearchEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        SearchEngine { rng, nodes: 0 }
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches `depth` plies for `side` and returns the chosen move.
    ///
    /// Returns `Ok(None)` when `side` has no legal move. Fails if the
    /// position is not valid or `side` is not the side to move. `state` is
    /// back to its original contents when this returns.
    pub fn best_move(
        &mut self,
        state: &mut GameState,
        depth: u8,
        side: Color,
    ) -> Result<Option<SearchOutcome>, EngineError> {
        let position = *state.position();
        position.validate()?;
        if side != position.side_to_move {
            return Err(EngineError::NotSideToMove {
                requested: side,
                to_move: position.side_to_move,
            });
        }

        let depth = depth.max(MIN_DEPTH);
        self.nodes = 0;

        let moves = generate_moves(&position);
        let maximizing = side == Color::White;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut candidates: Vec<Move> = Vec::new();

        for m in &moves {
            // One point of slack keeps an equal child exact instead of a bound.
            let (alpha, beta) = match (maximizing, best) {
                (true, i32::MIN) | (false, i32::MAX) => (i32::MIN, i32::MAX),
                (true, _) => (best - 1, i32::MAX),
                (false, _) => (i32::MIN, best + 1),
            };

            state.apply(*m, MoveOptions::UNCHECKED);
            let score = self.alpha_beta(state, depth - 1, alpha, beta);
            state.undo_move();

            let improves = if maximizing { score > best } else { score < best };
            if improves {
                best = score;
                candidates.clear();
                candidates.push(*m);
            } else if score == best {
                candidates.push(*m);
            }
        }

        let Some(&mv) = candidates.choose(&mut self.rng) else {
            tracing::debug!(%side, depth, "no legal move at root");
            return Ok(None);
        };

        tracing::debug!(
            %side,
            depth,
            best = %mv,
            score = best,
            candidates = candidates.len(),
            nodes = self.nodes,
            "search finished"
        );

        Ok(Some(SearchOutcome {
            mv,
            score: best,
            candidates: candidates.len(),
            nodes: self.nodes,
        }))
    }

    /// Fail-soft alpha-beta below the root.
    ///
    /// Returns the exact minimax value when it lies strictly inside
    /// `(alpha, beta)`, otherwise a bound on the same side of the window.
    pub fn alpha_beta(
        &mut self,
        state: &mut GameState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;
        let position = *state.position();

        if depth == 0 {
            if !has_legal_move(&position) {
                return terminal_score(&position, depth);
            }
            return evaluate(&position);
        }

        let moves = generate_moves(&position);
        if moves.is_empty() {
            return terminal_score(&position, depth);
        }

        let maximizing = position.side_to_move == Color::White;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for m in &moves {
            state.apply(*m, MoveOptions::UNCHECKED);
            let score = self.alpha_beta(state, depth - 1, alpha, beta);
            state.undo_move();

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// Score of a position where the side to move has no legal move.
fn terminal_score(position: &Position, depth: u8) -> i32 {
    let us = position.side_to_move;
    if !is_king_attacked(position, us) {
        return 0;
    }
    let mate = MATE_SCORE + i32::from(depth);
    match us {
        Color::White => -mate,
        Color::Black => mate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::in_check;
    use chess_core::Square;
    use std::collections::HashSet;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    /// Plain minimax without pruning.
    fn minimax(state: &mut GameState, depth: u8) -> i32 {
        let position = *state.position();
        let moves = state.generate_moves();
        if moves.is_empty() {
            if !in_check(&position).unwrap() {
                return 0;
            }
            let mate = MATE_SCORE + i32::from(depth);
            return if position.side_to_move == Color::White {
                -mate
            } else {
                mate
            };
        }
        if depth == 0 {
            return evaluate(&position);
        }
        let scores = moves.iter().map(|m| {
            state.apply(*m, MoveOptions::UNCHECKED);
            let score = minimax(state, depth - 1);
            state.undo_move();
            score
        });
        let scores: Vec<i32> = scores.collect();
        if position.side_to_move == Color::White {
            scores.into_iter().max().unwrap()
        } else {
            scores.into_iter().min().unwrap()
        }
    }

    #[test]
    fn depth_levels_are_clamped() {
        assert_eq!(clamp_depth(-3), 1);
        assert_eq!(clamp_depth(0), 1);
        assert_eq!(clamp_depth(3), 3);
        assert_eq!(clamp_depth(5), 5);
        assert_eq!(clamp_depth(99), 5);
    }

    #[test]
    fn finds_back_rank_mate_for_white() {
        for depth in [1, 2, 3] {
            let mut state = GameState::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
            let outcome = SearchEngine::seeded(1)
                .best_move(&mut state, depth, Color::White)
                .unwrap()
                .unwrap();
            assert_eq!(outcome.mv, Move::new(Square::A1, Square::A8), "depth {depth}");
            assert_eq!(outcome.score, MATE_SCORE + i32::from(depth) - 1);
            assert_eq!(outcome.candidates, 1);
        }
    }

    #[test]
    fn finds_back_rank_mate_for_black() {
        let mut state = GameState::from_fen("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
        let outcome = SearchEngine::seeded(1)
            .best_move(&mut state, 2, Color::Black)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.mv, Move::new(Square::A8, Square::A1));
        assert_eq!(outcome.score, -(MATE_SCORE + 1));
    }

    #[test]
    fn wins_a_hanging_queen() {
        let mut state = GameState::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").unwrap();
        let outcome = SearchEngine::seeded(3)
            .best_move(&mut state, 2, Color::White)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.mv, Move::new(sq("d2"), sq("d5")));
        assert_eq!(outcome.score, 5);
    }

    #[test]
    fn alpha_beta_matches_minimax() {
        let cases = [
            (crate::STARTPOS_FEN, 3),
            ("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 2 3", 2),
            ("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", 3),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
        ];
        for (fen, depth) in cases {
            let mut state = GameState::from_fen(fen).unwrap();
            let mut engine = SearchEngine::seeded(0);
            let pruned = engine.alpha_beta(&mut state, depth, i32::MIN, i32::MAX);
            assert_eq!(pruned, minimax(&mut state, depth), "{fen}");
        }
    }

    #[test]
    fn root_ties_are_exact() {
        // Scholar's mate threat: only some moves hold the balance.
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR b KQkq - 3 3";
        let mut state = GameState::from_fen(fen).unwrap();
        let outcome = SearchEngine::seeded(5)
            .best_move(&mut state, 2, Color::Black)
            .unwrap()
            .unwrap();

        let mut exact = Vec::new();
        for m in &state.generate_moves() {
            state.apply(*m, MoveOptions::UNCHECKED);
            exact.push((*m, minimax(&mut state, 1)));
            state.undo_move();
        }
        let best = exact.iter().map(|&(_, s)| s).min().unwrap();
        let tied: Vec<Move> = exact
            .iter()
            .filter(|&&(_, s)| s == best)
            .map(|&(m, _)| m)
            .collect();

        assert_eq!(outcome.score, best);
        assert_eq!(outcome.candidates, tied.len());
        assert!(tied.contains(&outcome.mv));
    }

    #[test]
    fn quiet_opening_ties_every_move() {
        for depth in [1, 2] {
            let mut state = GameState::new();
            let outcome = SearchEngine::seeded(9)
                .best_move(&mut state, depth, Color::White)
                .unwrap()
                .unwrap();
            assert_eq!(outcome.score, 0);
            assert_eq!(outcome.candidates, 20);
        }
    }

    #[test]
    fn same_seed_same_move() {
        let pick = |seed| {
            let mut state = GameState::new();
            SearchEngine::seeded(seed)
                .best_move(&mut state, 2, Color::White)
                .unwrap()
                .unwrap()
                .mv
        };
        assert_eq!(pick(42), pick(42));
        let distinct: HashSet<Move> = (0..32).map(pick).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn search_restores_the_state() {
        let mut state = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let before = state.clone();
        let mut engine = SearchEngine::seeded(0);
        let outcome = engine.best_move(&mut state, 2, Color::White).unwrap();
        assert!(outcome.is_some());
        assert!(engine.nodes() > 48);
        assert_eq!(state, before);
    }

    #[test]
    fn no_move_means_none() {
        let mut stalemate = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(
            SearchEngine::seeded(0).best_move(&mut stalemate, 3, Color::Black),
            Ok(None)
        );

        let mut mated = GameState::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        assert_eq!(
            SearchEngine::seeded(0).best_move(&mut mated, 3, Color::White),
            Ok(None)
        );
    }

    #[test]
    fn stalemate_scores_zero_at_any_depth() {
        let mut state = GameState::from_fen("7k/8/6K1/8/8/8/8/5Q2 w - - 0 1").unwrap();
        let stalemating = Move::new(sq("f1"), sq("f7"));
        assert!(state.apply(stalemating, MoveOptions::default()).applied);
        assert_ne!(evaluate(state.position()), 0);

        let mut engine = SearchEngine::seeded(0);
        for depth in 0..=2 {
            assert_eq!(engine.alpha_beta(&mut state, depth, i32::MIN, i32::MAX), 0);
        }
        assert!(state.undo_move());

        for depth in 1..=2 {
            let outcome = engine
                .best_move(&mut state, depth, Color::White)
                .unwrap()
                .unwrap();
            assert_ne!(outcome.mv, stalemating, "depth {depth}");
            assert!(outcome.score > MATE_SCORE, "depth {depth}");
        }
    }

    #[test]
    fn wrong_side_or_invalid_position_is_an_error() {
        let mut state = GameState::new();
        assert_eq!(
            SearchEngine::seeded(0).best_move(&mut state, 2, Color::Black),
            Err(EngineError::NotSideToMove {
                requested: Color::Black,
                to_move: Color::White
            })
        );

        let mut kingless = GameState::from_fen("4k3/8/8/8/8/8/4P3/8 w - - 0 1").unwrap();
        assert_eq!(
            SearchEngine::seeded(0).best_move(&mut kingless, 2, Color::White),
            Err(EngineError::MissingKing(Color::White))
        );
    }
}
