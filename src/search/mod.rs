//! Move search for connect-K
//!
//! Contains:
//! - Proximity-filtered candidate generation
//! - Alpha-Beta minimax with a deadline and iterative deepening
//! - Exact rule-based play for the classic 3x3 board

pub mod alphabeta;
pub mod classic;
pub mod movegen;

pub use alphabeta::{SearchParams, SearchResult, SearchStats, Searcher};
pub use classic::classic_move;
pub use movegen::{candidates, near_occupied, DEFAULT_RADIUS};
