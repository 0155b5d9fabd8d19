//! Alpha-beta minimax with a wall-clock deadline
//!
//! This module implements the core search algorithm of the engine.
//! It is a plain minimax (maximizing for the engine's side, minimizing for
//! the opponent) with alpha-beta pruning over a caller-owned board that is
//! mutated in place and restored before every return.
//!
//! # Features
//!
//! - One-ply heuristic move ordering (place, evaluate, undo) for better pruning
//! - Optional shuffle before the stable ordering sort to break ties randomly
//! - Iterative deepening with the previous best move searched first
//! - Deadline and stop-flag checks at every node and before every root move,
//!   so a legal move is always available (anytime search)
//! - Decided positions scored by distance, so quicker wins rank higher
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use connectk::board::{Board, Player, Pos};
//! use connectk::eval::PatternTable;
//! use connectk::search::{SearchParams, Searcher};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut board = Board::parse("XX.\nOO.\n...", 3).unwrap();
//! let table = PatternTable::default();
//! let params = SearchParams::new(3, Duration::from_millis(500));
//!
//! let result = Searcher::new(Player::O, &table, &params, StdRng::seed_from_u64(7)).search(&mut board);
//! assert_eq!(result.best_move, Some(Pos::new(1, 2)));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::board::{Board, Player, Pos};
use crate::eval::{evaluate, PatternTable, WIN_SCORE, WIN_THRESHOLD};

use super::movegen;

/// Infinity score for alpha-beta bounds
const INF: i32 = WIN_SCORE * 4;

/// Knobs for a single search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Plies to search (at least 1)
    pub depth: u8,
    /// Wall-clock budget measured from the start of `search`
    pub time_budget: Duration,
    /// Chebyshev radius of the candidate generator
    pub radius: usize,
    /// Keep only the best-ordered moves at each node
    pub max_candidates: Option<usize>,
    /// Search depths 1..=depth, keeping the deepest completed result
    pub iterative_deepening: bool,
    /// Shuffle candidates before ordering so equal scores break randomly
    pub shuffle_ties: bool,
}

impl SearchParams {
    #[must_use]
    pub fn new(depth: u8, time_budget: Duration) -> Self {
        Self {
            depth,
            time_budget,
            radius: movegen::DEFAULT_RADIUS,
            max_candidates: None,
            iterative_deepening: true,
            shuffle_ties: true,
        }
    }
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered below the root
    pub nodes: u64,
    /// Static evaluations (one per ordered candidate)
    pub evaluations: u64,
    /// Total beta cutoffs
    pub beta_cutoffs: u64,
    /// Cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    /// Deepest fully searched iteration, 0 if none completed
    pub completed_depth: u8,
    /// The deadline or stop flag cut the search short
    pub timed_out: bool,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found; `None` only when the board is full
    pub best_move: Option<Pos>,
    /// Minimax score of the best move from the searching side's view
    pub score: i32,
    /// Depth of the iteration that produced `best_move`
    pub depth: u8,
    pub stats: SearchStats,
}

/// Outcome of one root iteration
struct RootOutcome {
    best: Option<(Pos, i32)>,
    complete: bool,
}

/// One search from one side's point of view.
///
/// Holds no state beyond a single `search` call: build one per move.
pub struct Searcher<'a> {
    me: Player,
    table: &'a PatternTable,
    params: &'a SearchParams,
    rng: StdRng,
    stop_flag: Option<&'a AtomicBool>,
    deadline: Option<Instant>,
    stopped: bool,
    stats: SearchStats,
}

impl<'a> Searcher<'a> {
    /// Searcher playing `me`, which is the maximizing side.
    #[must_use]
    pub fn new(me: Player, table: &'a PatternTable, params: &'a SearchParams, rng: StdRng) -> Self {
        Self {
            me,
            table,
            params,
            rng,
            stop_flag: None,
            deadline: None,
            stopped: false,
            stats: SearchStats::default(),
        }
    }

    /// Also abort when `flag` becomes true
    #[must_use]
    pub fn with_stop_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// Check the deadline and stop flag; latches once tripped.
    #[inline]
    fn out_of_time(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d)
            || self.stop_flag.is_some_and(|f| f.load(Ordering::Relaxed));
        if expired {
            self.stopped = true;
            self.stats.timed_out = true;
        }
        expired
    }

    /// Map a decided evaluation to `±(WIN_SCORE + depth)` so faster wins and
    /// slower losses are preferred. Undecided evaluations pass through.
    #[inline]
    fn settle(eval: i32, depth: u8) -> i32 {
        if eval >= WIN_THRESHOLD {
            WIN_SCORE + i32::from(depth)
        } else if eval <= -WIN_THRESHOLD {
            -(WIN_SCORE + i32::from(depth))
        } else {
            eval
        }
    }

    /// Candidates for `to_move`, each paired with the static evaluation of
    /// the position after playing it, best first for the side to move.
    fn ordered_moves(&mut self, board: &mut Board, to_move: Player) -> Vec<(Pos, i32)> {
        let mut moves = movegen::candidates(board, self.params.radius);
        if self.params.shuffle_ties {
            moves.shuffle(&mut self.rng);
        }

        let me = self.me;
        let table = self.table;
        let mut scored: Vec<(Pos, i32)> = moves
            .into_iter()
            .map(|mv| {
                let placed = board.place(mv, to_move);
                (mv, evaluate(&placed, me, table))
            })
            .collect();
        self.stats.evaluations += scored.len() as u64;

        // Stable sort keeps the shuffled order among equal scores
        if to_move == me {
            scored.sort_by(|a, b| b.1.cmp(&a.1));
        } else {
            scored.sort_by(|a, b| a.1.cmp(&b.1));
        }
        if let Some(cap) = self.params.max_candidates {
            scored.truncate(cap.max(1));
        }
        scored
    }

    /// Run the search. The board is left exactly as it was passed in.
    pub fn search(mut self, board: &mut Board) -> SearchResult {
        let start = Instant::now();
        self.deadline = start.checked_add(self.params.time_budget);

        let mut root_moves = self.ordered_moves(board, self.me);
        let Some(&(first, first_eval)) = root_moves.first() else {
            return SearchResult {
                best_move: None,
                score: 0,
                depth: 0,
                stats: self.stats,
            };
        };

        // Seed with the best-ordered move so a deadline on the very first
        // candidate still returns a legal answer
        let mut best_move = first;
        let mut best_score = Self::settle(first_eval, 0);
        let mut best_depth = 0u8;

        let target = self.params.depth.max(1);
        let first_depth = if self.params.iterative_deepening { 1 } else { target };

        for depth in first_depth..=target {
            let outcome = self.search_root(board, &root_moves, depth);

            if !outcome.complete {
                if best_depth == 0 {
                    if let Some((mv, score)) = outcome.best {
                        best_move = mv;
                        best_score = score;
                    }
                }
                log::warn!(
                    "search for {} stopped during depth {} after {:?}",
                    self.me,
                    depth,
                    start.elapsed()
                );
                break;
            }

            if let Some((mv, score)) = outcome.best {
                best_move = mv;
                best_score = score;
                best_depth = depth;
                self.stats.completed_depth = depth;
            }

            log::trace!(
                "depth {} best {} score {} nodes {}",
                depth,
                best_move,
                best_score,
                self.stats.nodes
            );

            // Proven win or loss: deeper search cannot change the verdict
            if best_score.abs() >= WIN_THRESHOLD {
                break;
            }

            // Previous best goes first in the next iteration
            if let Some(idx) = root_moves.iter().position(|(mv, _)| *mv == best_move) {
                let entry = root_moves.remove(idx);
                root_moves.insert(0, entry);
            }
        }

        SearchResult {
            best_move: Some(best_move),
            score: best_score,
            depth: best_depth,
            stats: self.stats,
        }
    }

    /// Root-level search with full alpha-beta window.
    fn search_root(&mut self, board: &mut Board, moves: &[(Pos, i32)], depth: u8) -> RootOutcome {
        let mut alpha = -INF;
        let beta = INF;
        let mut best: Option<(Pos, i32)> = None;

        for &(mv, eval) in moves {
            if self.out_of_time() {
                return RootOutcome {
                    best,
                    complete: false,
                };
            }

            let score = {
                let mut placed = board.place(mv, self.me);
                self.minimax(&mut placed, depth - 1, alpha, beta, false, eval)
            };

            // An interrupted subtree only holds a partial estimate
            if self.stopped {
                return RootOutcome {
                    best,
                    complete: false,
                };
            }

            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        RootOutcome {
            best,
            complete: true,
        }
    }

    /// Recursive minimax with alpha-beta pruning.
    ///
    /// `eval` is the static evaluation of `board`, computed by the caller
    /// while ordering moves.
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        eval: i32,
    ) -> i32 {
        self.stats.nodes += 1;

        // Deadline: heuristic cutoff
        if self.out_of_time() {
            return Self::settle(eval, depth);
        }
        if depth == 0 {
            return Self::settle(eval, 0);
        }
        // Do not search past a decided position
        if eval.abs() >= WIN_THRESHOLD {
            return Self::settle(eval, depth);
        }

        let to_move = if maximizing { self.me } else { self.me.opponent() };
        let moves = self.ordered_moves(board, to_move);
        if moves.is_empty() {
            return 0; // Full board, no line: draw
        }

        let mut best = if maximizing { -INF } else { INF };

        for (i, (mv, child_eval)) in moves.into_iter().enumerate() {
            let score = {
                let mut placed = board.place(mv, to_move);
                self.minimax(&mut placed, depth - 1, alpha, beta, !maximizing, child_eval)
            };

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if self.stopped {
                break;
            }

            if beta <= alpha {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const T: PatternTable = PatternTable::DEFAULT;

    fn params(depth: u8) -> SearchParams {
        SearchParams::new(depth, Duration::from_secs(30))
    }

    fn run(board: &mut Board, me: Player, params: &SearchParams) -> SearchResult {
        Searcher::new(me, &T, params, StdRng::seed_from_u64(42)).search(board)
    }

    fn gomoku_with(stones: &[(u8, u8, Player)]) -> Board {
        let mut board = Board::new(15, 5).unwrap();
        for &(r, c, p) in stones {
            board.set(Pos::new(r, c), p.cell()).unwrap();
        }
        board
    }

    #[test]
    fn test_search_empty_board() {
        let mut board = Board::new(15, 5).unwrap();
        let result = run(&mut board, Player::X, &params(2));
        assert_eq!(result.best_move, Some(Pos::new(7, 7)));
        assert!(board.is_board_empty());
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut board = Board::parse("XOX\nXOO\nOXX", 3).unwrap();
        let result = run(&mut board, Player::X, &params(3));
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_search_finds_winning_move() {
        let mut board = gomoku_with(&[
            (7, 3, Player::X),
            (7, 4, Player::X),
            (7, 5, Player::X),
            (7, 6, Player::X),
            (7, 2, Player::O),
            (8, 3, Player::O),
            (8, 4, Player::O),
        ]);
        let result = run(&mut board, Player::X, &params(3));
        assert_eq!(result.best_move, Some(Pos::new(7, 7)));
        assert!(result.score >= WIN_THRESHOLD, "Should detect winning position");
    }

    #[test]
    fn test_search_blocks_closed_four() {
        let mut board = gomoku_with(&[
            (7, 3, Player::O),
            (7, 4, Player::O),
            (7, 5, Player::O),
            (7, 6, Player::O),
            (7, 2, Player::X),
            (9, 9, Player::X),
        ]);
        let before = board.clone();
        let result = run(&mut board, Player::X, &params(3));
        assert_eq!(result.best_move, Some(Pos::new(7, 7)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_prefers_immediate_win_over_slower_win() {
        // X can win now at (0,2) or later; the immediate win must rank first
        let mut board = Board::parse("XX.\nOO.\nX..", 3).unwrap();
        let result = run(&mut board, Player::X, &params(5));
        assert_eq!(result.best_move, Some(Pos::new(0, 2)));
        // Deepening stops at the first proven iteration
        assert_eq!(result.depth, 1);
        assert_eq!(result.score, WIN_SCORE);

        let mut fixed = params(5);
        fixed.iterative_deepening = false;
        let result = run(&mut board, Player::X, &fixed);
        assert_eq!(result.best_move, Some(Pos::new(0, 2)));
        assert_eq!(result.score, WIN_SCORE + 4);
    }

    #[test]
    fn test_losing_position_still_returns_move() {
        // O has two open threats; X cannot stop both
        let mut board = Board::parse("OO.\n.X.\nO.X", 3).unwrap();
        let result = run(&mut board, Player::X, &params(4));
        assert!(result.best_move.is_some());
        assert!(result.score <= -WIN_THRESHOLD, "got {}", result.score);
    }

    #[test]
    fn test_zero_budget_returns_seeded_move() {
        let mut board = gomoku_with(&[(7, 7, Player::X), (7, 8, Player::O)]);
        let before = board.clone();
        let p = SearchParams::new(5, Duration::ZERO);
        let result = run(&mut board, Player::X, &p);

        let mv = result.best_move.expect("must always return a move");
        assert_eq!(board.get(mv).unwrap(), crate::board::Cell::Empty);
        assert!(result.stats.timed_out);
        assert_eq!(result.stats.completed_depth, 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_stop_flag_aborts() {
        let mut board = gomoku_with(&[(7, 7, Player::X), (7, 8, Player::O)]);
        let flag = AtomicBool::new(true);
        let p = params(5);
        let result = Searcher::new(Player::O, &T, &p, StdRng::seed_from_u64(1))
            .with_stop_flag(&flag)
            .search(&mut board);
        assert!(result.best_move.is_some());
        assert!(result.stats.timed_out);
    }

    #[test]
    fn test_iterative_deepening_reports_depth() {
        let mut board = gomoku_with(&[
            (7, 7, Player::X),
            (7, 8, Player::O),
            (8, 7, Player::X),
            (8, 8, Player::O),
        ]);
        let result = run(&mut board, Player::X, &params(2));
        assert_eq!(result.depth, 2);
        assert_eq!(result.stats.completed_depth, 2);
        assert!(result.stats.nodes > 0);
        assert!(result.stats.evaluations > 0);
    }

    #[test]
    fn test_fixed_depth_matches_iterative() {
        let mut board = Board::parse("X..\n.O.\n..X", 3).unwrap();
        let mut fixed = params(6);
        fixed.iterative_deepening = false;
        fixed.shuffle_ties = false;
        let mut deepening = fixed.clone();
        deepening.iterative_deepening = true;

        let a = run(&mut board, Player::O, &fixed);
        let b = run(&mut board, Player::O, &deepening);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_pruning_happens() {
        let mut board = gomoku_with(&[
            (7, 7, Player::X),
            (7, 8, Player::O),
            (8, 8, Player::X),
            (6, 6, Player::O),
        ]);
        let result = run(&mut board, Player::X, &params(3));
        assert!(result.stats.beta_cutoffs > 0);
        assert!(result.stats.first_move_rate() > 0.0);
    }

    #[test]
    fn test_max_candidates_limits_root() {
        let mut board = gomoku_with(&[(7, 7, Player::X)]);
        let mut p = params(1);
        p.max_candidates = Some(3);
        let result = run(&mut board, Player::O, &p);
        // depth 1: root evaluates its candidates once, then each child is a leaf
        assert_eq!(result.stats.evaluations, 24);
        assert_eq!(result.stats.nodes, 3);
    }

    #[test]
    fn test_settle_orders_decided_scores() {
        assert!(Searcher::settle(WIN_SCORE, 3) > Searcher::settle(WIN_SCORE + 500, 1));
        assert!(Searcher::settle(-WIN_SCORE, 3) < Searcher::settle(-WIN_SCORE, 1));
        assert_eq!(Searcher::settle(1234, 7), 1234);
    }
}
