use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{LEADERBOARD_CAPACITY, data_dir};

const SCORE_FILE_NAME: &str = "scores.json";

/// One finished game on the leaderboard.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Best scores, highest first, at most [`LEADERBOARD_CAPACITY`] entries.
///
/// Equal scores keep their insertion order. Serializes as a bare JSON array of
/// entries; deserializing sorts and caps whatever array it is given.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ScoreEntry>", into = "Vec<ScoreEntry>")]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a leaderboard from arbitrary entries, sorting and capping them.
    #[must_use]
    pub fn from_entries(entries: Vec<ScoreEntry>) -> Self {
        let mut leaderboard = Self { entries };
        leaderboard.normalize();
        leaderboard
    }

    /// Appends `entry`, re-sorts and truncates.
    ///
    /// Returns the zero-based rank the entry landed on, or `None` when it fell
    /// off the end.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .filter(|existing| existing.score >= entry.score)
            .count();

        self.entries.push(entry);
        self.normalize();

        (rank < LEADERBOARD_CAPACITY).then_some(rank)
    }

    /// Highest recorded score.
    #[must_use]
    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }

    #[must_use]
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn normalize(&mut self) {
        // `sort_by` is stable, ties keep insertion order.
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_CAPACITY);
    }
}

impl From<Vec<ScoreEntry>> for Leaderboard {
    fn from(entries: Vec<ScoreEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Leaderboard> for Vec<ScoreEntry> {
    fn from(leaderboard: Leaderboard) -> Self {
        leaderboard.entries
    }
}

/// Failures while reading or writing persisted scores.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("malformed score file {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistence seam for the leaderboard.
pub trait ScoreStore {
    /// Loads the stored leaderboard, degrading to an empty one on any failure.
    fn load(&mut self) -> Leaderboard;

    /// Replaces the stored leaderboard completely.
    fn save(&mut self, leaderboard: &Leaderboard) -> Result<(), ScoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load(&mut self) -> Leaderboard {
        (**self).load()
    }

    fn save(&mut self, leaderboard: &Leaderboard) -> Result<(), ScoreError> {
        (**self).save(leaderboard)
    }
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    data_dir().join(SCORE_FILE_NAME)
}

/// Leaderboard stored as pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`scores_path`].
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(scores_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the leaderboard.
    ///
    /// Returns an empty leaderboard when the file does not yet exist (first
    /// run) and `Err` when it exists but cannot be read or parsed.
    pub fn try_load(&self) -> Result<Leaderboard, ScoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Leaderboard::new()),
            Err(source) => {
                return Err(ScoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str::<Leaderboard>(&raw).map_err(|source| ScoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Leaderboard {
        self.try_load().unwrap_or_else(|error| {
            warn!(%error, "starting with an empty leaderboard");
            Leaderboard::new()
        })
    }

    fn save(&mut self, leaderboard: &Leaderboard) -> Result<(), ScoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ScoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(leaderboard)?;
        fs::write(&self.path, json).map_err(|source| ScoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), entries = leaderboard.len(), "leaderboard saved");
        Ok(())
    }
}

/// Store kept in memory, for tests and `--no-save` style sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub leaderboard: Leaderboard,
    pub save_count: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn with_leaderboard(leaderboard: Leaderboard) -> Self {
        Self {
            leaderboard,
            save_count: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Leaderboard {
        self.leaderboard.clone()
    }

    fn save(&mut self, leaderboard: &Leaderboard) -> Result<(), ScoreError> {
        self.leaderboard = leaderboard.clone();
        self.save_count += 1;
        Ok(())
    }
}
