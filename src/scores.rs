//! High-score table and its JSON persistence.
//!
//! The file is a plain JSON array of `{ "name": ..., "score": ... }`.
//! Reading never fails: a missing or broken file is an empty table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Entries kept on disk and shown on the high-score screen.
pub const TABLE_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Clone, Debug, Default)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
    /// Where to persist; `None` keeps the table in memory only.
    path: Option<PathBuf>,
}

impl HighScores {
    pub fn in_memory() -> HighScores {
        HighScores::default()
    }

    /// Load from `path`, falling back to an empty table on any error.
    pub fn load(path: &Path) -> HighScores {
        let entries = match read_entries(path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("no high scores loaded: {err:#}");
                Vec::new()
            }
        };
        let mut table = HighScores {
            entries,
            path: Some(path.to_path_buf()),
        };
        table.normalize();
        table
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// Would `score` earn a place in the table?
    pub fn qualifies(&self, score: u32) -> bool {
        score > 0
            && (self.entries.len() < TABLE_SIZE
                || self.entries.last().map_or(true, |e| score > e.score))
    }

    /// Insert a finished round.  Returns the 1-based rank, or `None` when the
    /// score did not make the table.  Equal scores rank below older ones.
    pub fn insert(&mut self, name: &str, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            rank,
            ScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(TABLE_SIZE);
        debug!("{name} placed #{} with {score}", rank + 1);
        Some(rank + 1)
    }

    /// Write the table back to its file, if it has one.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing high scores to {}", path.display()))?;
        Ok(())
    }

    fn normalize(&mut self) {
        // stable: ties keep file order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(TABLE_SIZE);
    }
}

fn read_entries(path: &Path) -> Result<Vec<ScoreEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let entries = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(entries)
}

/// `$HOME/.invaders_term_scores.json`, or the working directory without HOME.
pub fn default_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".invaders_term_scores.json")
}
