//! Evaluation module for connect-K positions
//!
//! This module provides pattern recognition and scoring for board positions.
//! The evaluation considers maximal same-mark runs along four directions,
//! classified by length relative to the win length and by open ends.

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate, for_each_run, runs, Run};
pub use patterns::{PatternTable, MAX_PATTERN_SCORE, WIN_SCORE, WIN_THRESHOLD};
