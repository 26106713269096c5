//! High score leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 runs.

use serde::{Deserialize, Serialize};

use crate::persistence;

/// Rows kept on the leaderboard
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Pipes cleared
    pub score: u32,
    /// Quiz questions answered correctly during the run
    pub questions_answered: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScoreEntry {
    /// Sort key: more pipes first, then more questions answered
    fn rank_key(&self) -> (u32, u32) {
        (self.score, self.questions_answered)
    }
}

impl HighScores {
    const STORAGE_KEY: &'static str = "flappy_quiz_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Index a run would be inserted at, if it makes the table.
    ///
    /// Runs that tie an existing entry rank below it. A scoreless run never
    /// makes the table.
    fn slot_for(&self, score: u32, questions_answered: u32) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let key = (score, questions_answered);
        let slot = self.entries.partition_point(|e| e.rank_key() >= key);
        (slot < MAX_HIGH_SCORES).then_some(slot)
    }

    pub fn qualifies(&self, score: u32, questions_answered: u32) -> bool {
        self.slot_for(score, questions_answered).is_some()
    }

    /// Record a finished run. Returns its 1-based rank, or `None` if it did
    /// not make the table.
    pub fn add_score(&mut self, score: u32, questions_answered: u32, timestamp: f64) -> Option<usize> {
        let slot = self.slot_for(score, questions_answered)?;
        self.entries.insert(
            slot,
            HighScoreEntry {
                score,
                questions_answered,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score on the table
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load() -> Self {
        match persistence::load_json::<HighScores>(Self::STORAGE_KEY) {
            Some(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self) {
        if persistence::save_json(Self::STORAGE_KEY, self) {
            log::info!("High scores saved ({} entries)", self.entries.len());
        }
    }
}
