//! Pattern scores for connect-K evaluation
//!
//! A run is classified by how many marks it still lacks to win and how many
//! of its ends are open. On a five-in-a-row board that is the familiar
//! four/three/two ladder; on 3x3 a two-in-a-row is "one short" and scores
//! like a four.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A completed line. Dominates every non-winning score.
pub const WIN_SCORE: i32 = 10_000_000;

/// Evaluations at or beyond this magnitude are decided positions.
pub const WIN_THRESHOLD: i32 = WIN_SCORE / 2;

/// Upper bound for a single non-winning pattern.
pub const MAX_PATTERN_SCORE: i32 = 1_000_000;

/// Magnitudes for non-winning runs, plus the weight applied to the
/// opponent's runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternTable {
    /// One short, both ends open: unstoppable next move
    pub open_four: i32,
    /// One short, one end open
    pub closed_four: i32,
    /// Two short, both ends open
    pub open_three: i32,
    /// Two short, one end open
    pub closed_three: i32,
    /// Three short, both ends open
    pub open_two: i32,
    /// Three short, one end open
    pub closed_two: i32,
    /// Percentage applied to the opponent's non-winning runs.
    /// 100 is a flat sign flip; above 100 biases play toward defence.
    pub opponent_weight_percent: i32,
}

impl PatternTable {
    pub const DEFAULT: PatternTable = PatternTable {
        open_four: 100_000,
        closed_four: 50_000,
        open_three: 10_000,
        closed_three: 1_500,
        open_two: 1_000,
        closed_two: 200,
        opponent_weight_percent: 100,
    };

    /// Magnitude of a run of `length` marks with `open_ends` (0-2) open ends
    /// on a board where `win_length` in a row wins.
    #[inline]
    pub fn score(&self, length: usize, open_ends: u8, win_length: usize) -> i32 {
        if length >= win_length {
            return WIN_SCORE;
        }
        if length < 2 || open_ends == 0 {
            return 0;
        }
        match (win_length - length, open_ends) {
            (1, 2) => self.open_four,
            (1, _) => self.closed_four,
            (2, 2) => self.open_three,
            (2, _) => self.closed_three,
            (3, 2) => self.open_two,
            (3, _) => self.closed_two,
            _ => 0,
        }
    }

    /// Scale an opponent's non-winning magnitude by the defence weight
    #[inline]
    pub fn weigh_opponent(&self, magnitude: i32) -> i32 {
        if magnitude >= WIN_SCORE {
            magnitude
        } else {
            magnitude * self.opponent_weight_percent / 100
        }
    }

    /// Check the ladder is monotonic and bounded.
    pub fn validate(&self) -> Result<()> {
        let ladder = [
            ("open_four", self.open_four),
            ("closed_four", self.closed_four),
            ("open_three", self.open_three),
            ("closed_three", self.closed_three),
            ("open_two", self.open_two),
            ("closed_two", self.closed_two),
        ];
        if self.open_four > MAX_PATTERN_SCORE {
            return Err(EngineError::InvalidConfig(format!(
                "open_four {} exceeds {}",
                self.open_four, MAX_PATTERN_SCORE
            )));
        }
        for pair in ladder.windows(2) {
            let ((hi_name, hi), (lo_name, lo)) = (pair[0], pair[1]);
            if hi < lo {
                return Err(EngineError::InvalidConfig(format!(
                    "{hi_name} ({hi}) must be at least {lo_name} ({lo})"
                )));
            }
        }
        if self.closed_two < 0 {
            return Err(EngineError::InvalidConfig("pattern scores must be non-negative".into()));
        }
        if !(1..=400).contains(&self.opponent_weight_percent) {
            return Err(EngineError::InvalidConfig(format!(
                "opponent_weight_percent {} outside [1, 400]",
                self.opponent_weight_percent
            )));
        }
        Ok(())
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}
