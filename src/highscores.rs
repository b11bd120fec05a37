//! High score leaderboard
//!
//! Persisted as a bare JSON array of `{name, score}` under one storage key.
//! The stored list is kept sorted by score (descending); only the top
//! entries are shown.

use serde::{Deserialize, Serialize};

use crate::consts::HIGH_SCORE_DISPLAY;
use crate::persistence::KeyValueStore;

/// Name recorded when the player submits a blank name
pub const DEFAULT_NAME: &str = "Anonymous";

/// Longest name kept (characters)
pub const MAX_NAME_LEN: usize = 16;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "road_rush_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a persisted list; anything malformed yields an empty board
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<HighScores>(json) {
            Ok(mut scores) => {
                scores.sort();
                scores
            }
            Err(e) => {
                log::warn!("Discarding malformed high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // A Vec of plain structs always serializes
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    /// Add a score, returning the rank achieved (1-indexed)
    ///
    /// Ties rank below existing entries with the same score.
    pub fn add_score(&mut self, name: &str, score: u64) -> usize {
        let entry = HighScoreEntry {
            name: clean_name(name),
            score,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        pos + 1
    }

    /// Entries shown on the high score screen
    pub fn top(&self) -> &[HighScoreEntry] {
        &self.entries[..self.entries.len().min(HIGH_SCORE_DISPLAY)]
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from a store
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Some(json) => {
                let scores = Self::from_json(&json);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save high scores to a store
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        if store.set_item(Self::STORAGE_KEY, &self.to_json()) {
            log::info!("High scores saved ({} entries)", self.entries.len());
        } else {
            log::warn!("High scores could not be saved");
        }
    }

    fn sort(&mut self) {
        // Stable, so equal scores keep their stored order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }
}

fn clean_name(name: &str) -> String {
    let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_first_score_persists_as_json_array() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::load(&store);
        assert!(scores.is_empty());

        assert_eq!(scores.add_score("Alice", 500), 1);
        scores.save(&mut store);

        assert_eq!(
            store.get_item(HighScores::STORAGE_KEY).as_deref(),
            Some(r#"[{"name":"Alice","score":500}]"#)
        );
        let reloaded = HighScores::load(&store);
        assert_eq!(reloaded.top()[0].name, "Alice");
        assert_eq!(reloaded.top_score(), Some(500));
    }

    #[test]
    fn test_ranks_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("a", 100), 1);
        assert_eq!(scores.add_score("b", 300), 1);
        assert_eq!(scores.add_score("c", 200), 2);
        assert_eq!(scores.add_score("d", 200), 3);
        assert_eq!(scores.add_score("e", 50), 5);

        let names: Vec<_> = scores.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "d", "a", "e"]);
    }

    #[test]
    fn test_top_is_capped_but_storage_is_not() {
        let mut scores = HighScores::new();
        for i in 0..8 {
            scores.add_score("p", i * 10);
        }
        assert_eq!(scores.entries.len(), 8);
        assert_eq!(scores.top().len(), HIGH_SCORE_DISPLAY);
        assert_eq!(scores.top()[0].score, 70);
    }

    #[test]
    fn test_malformed_storage_defaults_to_empty() {
        let mut store = MemoryStore::new();
        store.set_item(HighScores::STORAGE_KEY, "{not json");
        assert!(HighScores::load(&store).is_empty());

        store.set_item(HighScores::STORAGE_KEY, r#"[{"name":"x"}]"#);
        assert!(HighScores::load(&store).is_empty());
    }

    #[test]
    fn test_unsorted_storage_is_sorted_on_load() {
        let scores = HighScores::from_json(
            r#"[{"name":"lo","score":10},{"name":"hi","score":90}]"#,
        );
        assert_eq!(scores.top()[0].name, "hi");
    }

    #[test]
    fn test_names_trimmed_and_defaulted() {
        let mut scores = HighScores::new();
        scores.add_score("   ", 10);
        scores.add_score("  Bob  ", 5);
        scores.add_score("abcdefghijklmnopqrstuvwxyz", 1);
        assert_eq!(scores.entries[0].name, DEFAULT_NAME);
        assert_eq!(scores.entries[1].name, "Bob");
        assert_eq!(scores.entries[2].name.len(), MAX_NAME_LEN);
    }
}
