//! Error types for the connect-K engine

use thiserror::Error;

/// Errors raised by board construction, board access and configuration.
///
/// The search itself never fails: a full board is reported as `None`,
/// not as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("position ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
