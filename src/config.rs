//! Engine configuration
//!
//! Every tunable lives here: per-difficulty search profiles, move
//! generation limits and the pattern score table. A partial document
//! deserializes with defaults for the missing fields.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::MAX_BOARD_SIZE;
use crate::error::{EngineError, Result};
use crate::eval::PatternTable;
use crate::search::{SearchParams, DEFAULT_RADIUS};

/// Deepest search a profile may request
pub const MAX_DEPTH: u8 = 12;

/// User-facing strength label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "medium" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(EngineError::InvalidConfig(format!("unknown difficulty '{other}'"))),
        }
    }
}

/// Search parameters for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Plies of minimax
    pub depth: u8,
    /// Chance in [0, 1] of playing a uniformly random legal move instead
    pub random_move_probability: f64,
    /// Wall-clock budget per move
    pub time_budget_ms: u64,
}

impl DifficultyProfile {
    pub const EASY: DifficultyProfile = DifficultyProfile {
        depth: 1,
        random_move_probability: 0.40,
        time_budget_ms: 1000,
    };
    pub const NORMAL: DifficultyProfile = DifficultyProfile {
        depth: 3,
        random_move_probability: 0.0,
        time_budget_ms: 1500,
    };
    pub const HARD: DifficultyProfile = DifficultyProfile {
        depth: 5,
        random_move_probability: 0.0,
        time_budget_ms: 2500,
    };

    #[inline]
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    fn validate(&self, name: Difficulty) -> Result<()> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(EngineError::InvalidConfig(format!(
                "{name}: depth {} outside [1, {MAX_DEPTH}]",
                self.depth
            )));
        }
        if !(0.0..=1.0).contains(&self.random_move_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "{name}: random_move_probability {} outside [0, 1]",
                self.random_move_probability
            )));
        }
        Ok(())
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub easy: DifficultyProfile,
    pub normal: DifficultyProfile,
    pub hard: DifficultyProfile,
    /// Chebyshev radius of candidate moves around existing marks
    pub candidate_radius: usize,
    /// Keep at most this many ordered candidates per node
    pub max_candidates: Option<usize>,
    pub iterative_deepening: bool,
    /// Shuffle candidates before ordering to vary play among equal moves
    pub shuffle_ties: bool,
    /// Use the rule-based solver on 3x3 for Normal and Hard
    pub classic_fast_path: bool,
    /// Fixed RNG seed for reproducible play
    pub seed: Option<u64>,
    pub patterns: PatternTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            easy: DifficultyProfile::EASY,
            normal: DifficultyProfile::NORMAL,
            hard: DifficultyProfile::HARD,
            candidate_radius: DEFAULT_RADIUS,
            max_candidates: None,
            iterative_deepening: true,
            shuffle_ties: true,
            classic_fast_path: true,
            seed: None,
            patterns: PatternTable::DEFAULT,
        }
    }
}

impl EngineConfig {
    /// Default configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn profile(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn profile_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyProfile {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Normal => &mut self.normal,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Search parameters for `difficulty`
    pub fn search_params(&self, difficulty: Difficulty) -> SearchParams {
        let profile = self.profile(difficulty);
        SearchParams {
            depth: profile.depth,
            time_budget: profile.time_budget(),
            radius: self.candidate_radius,
            max_candidates: self.max_candidates,
            iterative_deepening: self.iterative_deepening,
            shuffle_ties: self.shuffle_ties,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for difficulty in Difficulty::ALL {
            self.profile(difficulty).validate(difficulty)?;
        }
        if self.candidate_radius == 0 {
            return Err(EngineError::InvalidConfig("candidate_radius must be at least 1".into()));
        }
        if self.candidate_radius > MAX_BOARD_SIZE {
            return Err(EngineError::InvalidConfig(format!(
                "candidate_radius {} exceeds the largest board side {}",
                self.candidate_radius, MAX_BOARD_SIZE
            )));
        }
        if self.max_candidates == Some(0) {
            return Err(EngineError::InvalidConfig("max_candidates must be at least 1".into()));
        }
        self.patterns.validate()
    }
}
