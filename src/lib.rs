//! Connect-K game engine
//!
//! A move-selection engine for N×N boards where K marks in a row win:
//! - Classic 3x3 tic-tac-toe (three in a row)
//! - Gomoku-style boards such as 15x15 with five in a row
//! - Overlines count as wins
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation and scoped placement
//! - [`rules`]: Win and draw detection
//! - [`eval`]: Run-based pattern evaluation
//! - [`search`]: Candidate generation, alpha-beta search, 3x3 rule solver
//! - [`config`]: Difficulty profiles and tunables
//! - [`engine`]: Move selector integrating all components
//!
//! # Quick Start
//!
//! ```
//! use connectk::{Board, Difficulty, Engine, EngineConfig, Player, Pos};
//!
//! let mut engine = Engine::with_config(EngineConfig::seeded(1)).unwrap();
//! let mut board = Board::gomoku(15).unwrap();
//!
//! // Set up position (faster than empty board)
//! board.set(Pos::new(7, 7), Player::X.cell()).unwrap();
//!
//! // Engine responds as O
//! if let Some(pos) = engine.find_best_move(&mut board, Player::O, Difficulty::Normal) {
//!     board.set(pos, Player::O.cell()).unwrap();
//!     println!("Engine plays at {}", pos);
//! }
//! ```
//!
//! # Move Priority
//!
//! 1. Random override (Easy)
//! 2. Exact rule solver on 3x3 (Normal, Hard)
//! 3. Alpha-Beta search within the time budget
//! 4. Row-major fallback, logged as an error

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Player, Pos};
pub use config::{Difficulty, DifficultyProfile, EngineConfig};
pub use engine::{Engine, MoveResult, SearchType, StopHandle};
pub use error::{EngineError, Result};
pub use rules::{game_status, winner, GameStatus};
