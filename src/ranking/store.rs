//! Durable storage for the ranking
//!
//! The ranking is a flat map from player name to best score, saved as JSON:
//!
//! ```json
//! {"Scores": {"alice": 50, "bob": 60}}
//! ```

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use thiserror::Error;

/// Best score per player
pub type Scores = BTreeMap<String, i64>;

/// File name used under the home directory
pub const RANKING_FILE_NAME: &str = ".snake_grid-ranking.json";

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("failed to access ranking file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed ranking document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ranking store unavailable: {0}")]
    Unavailable(String),
}

/// Where ranking scores are loaded from and saved to
pub trait RankingStore: Send {
    fn load(&self) -> Result<Scores, RankingError>;
    fn save(&mut self, scores: &Scores) -> Result<(), RankingError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RankingDocument {
    #[serde(rename = "Scores", default)]
    scores: Scores,
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RankingError {
        RankingError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RankingStore for JsonFileStore {
    /// A missing file is an empty ranking
    fn load(&self) -> Result<Scores, RankingError> {
        if !self.path.exists() {
            return Ok(Scores::new());
        }

        let json = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let document: RankingDocument = serde_json::from_str(&json)?;
        Ok(document.scores)
    }

    fn save(&mut self, scores: &Scores) -> Result<(), RankingError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let document = RankingDocument {
            scores: scores.clone(),
        };
        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// Shared in-memory store. Clones see the same scores.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: Arc<Mutex<Scores>>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(scores: Scores) -> Self {
        Self {
            scores: Arc::new(Mutex::new(scores)),
            fail_saves: false,
        }
    }

    /// A store whose saves always fail
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Scores as last saved
    pub fn saved(&self) -> Scores {
        self.scores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RankingStore for MemoryStore {
    fn load(&self) -> Result<Scores, RankingError> {
        Ok(self.saved())
    }

    fn save(&mut self, scores: &Scores) -> Result<(), RankingError> {
        if self.fail_saves {
            return Err(RankingError::Unavailable("saves disabled".to_string()));
        }

        *self.scores.lock().unwrap_or_else(PoisonError::into_inner) = scores.clone();
        Ok(())
    }
}

/// `<home>/.snake_grid-ranking.json`, if a home directory is known
pub fn default_ranking_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(RANKING_FILE_NAME))
}

/// Name of the logged-in user, used as the ranking key
pub fn current_player() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "player".to_string())
}
