//! Game rules for connect-K
//!
//! Only one rule matters to the engine: `win_length` marks in a row win,
//! and a full board without such a line is a draw.

pub mod win;

// Re-exports for convenient access
pub use win::{game_status, has_line_at, winner, winning_line, winning_moves, GameStatus};
