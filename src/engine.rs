//! Move selection integrating difficulty policy and search
//!
//! This module provides the engine callers talk to. Given a board, the side
//! to play and a difficulty, it picks a move in this order:
//!
//! 1. **Full board**: no move
//! 2. **Random override**: with the profile's probability (Easy by default),
//!    a uniformly random empty cell
//! 3. **Classic**: on 3x3 with three in a row, Normal and Hard use the exact
//!    rule solver
//! 4. **Alpha-Beta**: time-bounded minimax at the profile's depth
//! 5. **Fallback**: if the search produced nothing usable on a board that
//!    still has room, the first empty cell in row-major order
//!
//! # Example
//!
//! ```
//! use connectk::{Board, Difficulty, Engine, Player, Pos};
//!
//! let mut engine = Engine::new();
//! let mut board = Board::parse("XX.\nOO.\n...", 3).unwrap();
//!
//! // O completes the middle row
//! let result = engine.find_best_move_with_stats(&mut board, Player::O, Difficulty::Hard);
//! assert_eq!(result.best_move, Some(Pos::new(1, 2)));
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Player, Pos};
use crate::config::{Difficulty, EngineConfig};
use crate::error::Result;
use crate::search::{classic_move, SearchResult, Searcher};

/// Type of search that produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Random override of the difficulty profile
    Random,
    /// Exact 3x3 rule solver
    Classic,
    /// Regular alpha-beta search result
    AlphaBeta,
    /// Row-major scan after the search came back empty-handed
    Fallback,
    /// Board was already full
    NoMove,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Best move found, `None` only on a full board
    pub best_move: Option<Pos>,
    /// Search score from the mover's point of view (0 when not searched)
    pub score: i32,
    /// Which stage picked the move
    pub search_type: SearchType,
    /// Deepest completed search iteration
    pub depth: u8,
    /// Number of nodes searched
    pub nodes: u64,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl MoveResult {
    #[inline]
    fn no_move(time_ms: u64) -> Self {
        Self {
            best_move: None,
            score: 0,
            search_type: SearchType::NoMove,
            depth: 0,
            nodes: 0,
            time_ms,
        }
    }

    #[inline]
    fn shortcut(pos: Pos, search_type: SearchType, time_ms: u64) -> Self {
        Self {
            best_move: Some(pos),
            score: 0,
            search_type,
            depth: 0,
            nodes: 0,
            time_ms,
        }
    }

    #[inline]
    fn from_alphabeta(result: &SearchResult, time_ms: u64) -> Self {
        Self {
            best_move: result.best_move,
            score: result.score,
            search_type: SearchType::AlphaBeta,
            depth: result.depth,
            nodes: result.stats.nodes,
            time_ms,
        }
    }
}

/// Cancels a running search from another thread.
///
/// Cloned handles share one flag. The engine clears it when a new search
/// starts, so a stop only affects the search in progress.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Ask the current search to return as soon as possible
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Connect-K engine.
///
/// Holds configuration, a random source and a stop flag; no game state
/// carries over between calls. The board passed in is mutated during the
/// search and restored before returning.
pub struct Engine {
    config: EngineConfig,
    rng: StdRng,
    stop: StopHandle,
    fallbacks: u64,
}

impl Engine {
    /// Create an engine with the default configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use connectk::Engine;
    ///
    /// let engine = Engine::new();
    /// assert_eq!(engine.fallback_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create an engine with a custom configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if any profile, limit or pattern score is out of range.
    ///
    /// ```
    /// use connectk::{Engine, EngineConfig};
    ///
    /// let mut config = EngineConfig::seeded(7);
    /// config.hard.depth = 0;
    /// assert!(Engine::with_config(config).is_err());
    /// ```
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            stop: StopHandle::default(),
            fallbacks: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle for cancelling searches from another thread
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// How many times the row-major fallback had to pick the move.
    /// Anything above zero points at a search defect.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks
    }

    /// Best move for `player`, or `None` when the board is full.
    #[must_use]
    pub fn find_best_move(&mut self, board: &mut Board, player: Player, difficulty: Difficulty) -> Option<Pos> {
        self.find_best_move_with_stats(board, player, difficulty).best_move
    }

    /// Best move for `player` with details on how it was found.
    ///
    /// The returned move, when present, is always an empty cell of `board`.
    pub fn find_best_move_with_stats(
        &mut self,
        board: &mut Board,
        player: Player,
        difficulty: Difficulty,
    ) -> MoveResult {
        let start = Instant::now();
        let elapsed_ms = |start: Instant| start.elapsed().as_millis() as u64;
        self.stop.reset();

        if board.is_full() {
            log::debug!("board is full, no move for {}", player);
            return MoveResult::no_move(elapsed_ms(start));
        }

        let profile = *self.config.profile(difficulty);

        // 1. Random override
        if profile.random_move_probability > 0.0 && self.rng.gen_bool(profile.random_move_probability) {
            let empties: Vec<Pos> = board.empty_cells().collect();
            if let Some(&pos) = empties.choose(&mut self.rng) {
                log::debug!("{} plays random move {} at {}", player, pos, difficulty);
                return MoveResult::shortcut(pos, SearchType::Random, elapsed_ms(start));
            }
        }

        // 2. Exact play on the classic board
        if self.config.classic_fast_path && difficulty >= Difficulty::Normal && board.is_classic() {
            if let Some(pos) = classic_move(board, player) {
                log::debug!("{} plays classic move {}", player, pos);
                return MoveResult::shortcut(pos, SearchType::Classic, elapsed_ms(start));
            }
        }

        // 3. Alpha-Beta search
        let params = self.config.search_params(difficulty);
        let search_rng = StdRng::seed_from_u64(self.rng.gen());
        let result = Searcher::new(player, &self.config.patterns, &params, search_rng)
            .with_stop_flag(&self.stop.0)
            .search(board);

        log::debug!(
            "{} at {}: move {:?} score {} depth {}/{} nodes {} cutoffs {} ({:.0}% first) in {:?}",
            player,
            difficulty,
            result.best_move,
            result.score,
            result.depth,
            params.depth,
            result.stats.nodes,
            result.stats.beta_cutoffs,
            result.stats.first_move_rate(),
            start.elapsed()
        );

        match result.best_move {
            Some(pos) if matches!(board.is_empty(pos), Ok(true)) => {
                MoveResult::from_alphabeta(&result, elapsed_ms(start))
            }
            bad => {
                let mut fallback = self.fallback(board, bad);
                fallback.nodes = result.stats.nodes;
                fallback.time_ms = elapsed_ms(start);
                fallback
            }
        }
    }

    /// Last resort: first empty cell in row-major order.
    fn fallback(&mut self, board: &Board, bad: Option<Pos>) -> MoveResult {
        self.fallbacks += 1;
        log::error!(
            "search returned {:?} with {} empty cells left; using row-major fallback (#{})",
            bad,
            board.size() * board.size() - board.stone_count(),
            self.fallbacks
        );
        match board.empty_cells().next() {
            Some(pos) => MoveResult::shortcut(pos, SearchType::Fallback, 0),
            None => MoveResult::no_move(0),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
