//! High score leaderboard service
//!
//! Handles the two JSON actions of the remote leaderboard (`list` and
//! `save`) independently of any HTTP server: a transport hands over the
//! method, the `action` query value and the body, and gets back a status code
//! and a JSON document. Records live behind [`ScoreStore`]; [`HighScores`] is
//! the in-memory table and [`JsonFileStore`] persists it to disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ScoreError;

/// Number of entries returned by `list`
pub const MAX_HIGH_SCORES: usize = 10;

/// A stored score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub id: u64,
    pub initials: String,
    pub score: i64,
    /// Wave reached
    pub wave: u32,
    pub device_id: String,
    /// When the score was submitted
    pub timestamp: DateTime<Utc>,
}

impl HighScoreEntry {
    /// Leaderboard order: higher score first, earlier submission wins ties
    fn ranks_above(&self, other: &HighScoreEntry) -> bool {
        self.score > other.score
            || (self.score == other.score && (self.timestamp, self.id) < (other.timestamp, other.id))
    }
}

/// A validated submission
#[derive(Debug, Clone, PartialEq)]
pub struct NewScore {
    pub initials: String,
    pub score: i64,
    pub wave: u32,
    pub device_id: String,
}

/// Backing storage for scores
pub trait ScoreStore {
    /// Insert a record stamped with `at`
    fn insert(&mut self, score: NewScore, at: DateTime<Utc>) -> Result<HighScoreEntry, ScoreError>;

    /// Every stored record, in no particular order
    fn entries(&self) -> Result<Vec<HighScoreEntry>, ScoreError>;
}

/// In-memory score table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    next_id: u64,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i64> {
        self.entries.iter().map(|e| e.score).max()
    }

    /// Rank a score submitted now would achieve (1-indexed). Existing equal
    /// scores are earlier, so they rank above it.
    pub fn potential_rank(&self, score: i64) -> usize {
        1 + self.entries.iter().filter(|e| e.score >= score).count()
    }

    /// Check if a score would make the top ten
    pub fn qualifies(&self, score: i64) -> bool {
        score > 0 && self.potential_rank(score) <= MAX_HIGH_SCORES
    }

    /// Leaderboard position of a stored entry (1-indexed)
    pub fn rank_of(&self, entry: &HighScoreEntry) -> usize {
        1 + self.entries.iter().filter(|e| e.ranks_above(entry)).count()
    }

    /// The best `n` entries in leaderboard order
    pub fn top(&self, n: usize) -> Vec<HighScoreEntry> {
        sorted(self.entries.clone()).into_iter().take(n).collect()
    }

    /// Load a table from a JSON file; a missing file is an empty table
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoreError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let scores: HighScores =
                    serde_json::from_str(&json).map_err(|e| ScoreError::Storage(e.to_string()))?;
                log::info!("Loaded {} high scores", scores.entries.len());
                Ok(scores)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Ok(Self::new())
            }
            Err(e) => Err(ScoreError::Storage(e.to_string())),
        }
    }

    /// Write the table to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScoreError> {
        let json = serde_json::to_string(self).map_err(|e| ScoreError::Storage(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| ScoreError::Storage(e.to_string()))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScoreStore for HighScores {
    fn insert(&mut self, score: NewScore, at: DateTime<Utc>) -> Result<HighScoreEntry, ScoreError> {
        let entry = HighScoreEntry {
            id: self.next_id,
            initials: score.initials,
            score: score.score,
            wave: score.wave,
            device_id: score.device_id,
            timestamp: at,
        };
        self.next_id += 1;
        self.entries.push(entry.clone());
        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<HighScoreEntry>, ScoreError> {
        Ok(self.entries.clone())
    }
}

/// Score table persisted to a JSON file after every insert
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    table: HighScores,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScoreError> {
        let path = path.into();
        let table = HighScores::load(&path)?;
        Ok(Self { path, table })
    }

    pub fn table(&self) -> &HighScores {
        &self.table
    }
}

impl ScoreStore for JsonFileStore {
    fn insert(&mut self, score: NewScore, at: DateTime<Utc>) -> Result<HighScoreEntry, ScoreError> {
        // Only commit once the file write succeeds
        let mut staged = self.table.clone();
        let entry = staged.insert(score, at)?;
        staged.save(&self.path)?;
        self.table = staged;
        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<HighScoreEntry>, ScoreError> {
        self.table.entries()
    }
}

fn sorted(mut entries: Vec<HighScoreEntry>) -> Vec<HighScoreEntry> {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.timestamp.cmp(&b.timestamp))
            .then(a.id.cmp(&b.id))
    });
    entries
}

/// Body of a `save` request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub initials: Option<String>,
    pub score: Option<i64>,
    pub wave: Option<u32>,
    pub device_id: Option<String>,
}

impl SaveRequest {
    /// Check fields and build the record to insert
    pub fn validate(self) -> Result<NewScore, ScoreError> {
        let (Some(initials), Some(score), Some(wave)) = (self.initials, self.score, self.wave) else {
            return Err(ScoreError::MissingFields);
        };
        if initials.len() != 3 || !initials.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ScoreError::InvalidInitials);
        }
        if score <= 0 {
            return Err(ScoreError::InvalidScore);
        }
        Ok(NewScore {
            initials,
            score,
            wave,
            device_id: self.device_id.unwrap_or_default(),
        })
    }
}

/// One leaderboard row as sent to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicScore {
    pub initials: String,
    pub score: i64,
    pub wave: u32,
    /// `YYYY-MM-DD`
    pub date: String,
}

impl From<&HighScoreEntry> for PublicScore {
    fn from(entry: &HighScoreEntry) -> Self {
        Self {
            initials: entry.initials.clone(),
            score: entry.score,
            wave: entry.wave,
            date: entry.timestamp.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub scores: Vec<PublicScore>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub id: u64,
    pub rank: usize,
    pub is_top_ten: bool,
    pub message: String,
}

/// Request method as seen by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Status code and JSON body for the transport to send
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: Value,
}

/// Leaderboard request handler
#[derive(Debug, Clone)]
pub struct ScoreService<S> {
    store: S,
}

impl<S: ScoreStore> ScoreService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one request. Every failure becomes `{success: false, error}`.
    pub fn handle(&mut self, method: Method, action: Option<&str>, body: &str, now: DateTime<Utc>) -> ServiceResponse {
        match self.route(method, action, body, now) {
            Ok(body) => ServiceResponse { status: 200, body },
            Err(err) => {
                if err.status() >= 500 {
                    log::error!("Score service failure: {}", err);
                } else {
                    log::warn!("Rejected score request: {}", err);
                }
                ServiceResponse {
                    status: err.status(),
                    body: json!({ "success": false, "error": err.public_message() }),
                }
            }
        }
    }

    fn route(&mut self, method: Method, action: Option<&str>, body: &str, now: DateTime<Utc>) -> Result<Value, ScoreError> {
        match (action, method) {
            (Some("list"), Method::Get) => to_value(&self.list()?),
            (Some("save"), Method::Post) => {
                let request: SaveRequest =
                    serde_json::from_str(body).map_err(|e| ScoreError::MalformedBody(e.to_string()))?;
                to_value(&self.save(request, now)?)
            }
            (Some("list" | "save"), _) => Err(ScoreError::MethodNotAllowed),
            _ => Err(ScoreError::UnknownAction),
        }
    }

    /// Top ten scores
    pub fn list(&self) -> Result<ListResponse, ScoreError> {
        let scores: Vec<PublicScore> = sorted(self.store.entries()?)
            .iter()
            .take(MAX_HIGH_SCORES)
            .map(PublicScore::from)
            .collect();
        Ok(ListResponse {
            success: true,
            count: scores.len(),
            scores,
        })
    }

    /// Validate and store a submission, reporting its rank
    pub fn save(&mut self, request: SaveRequest, now: DateTime<Utc>) -> Result<SaveResponse, ScoreError> {
        let score = request.validate()?;
        let entry = self.store.insert(score, now)?;
        let entries = self.store.entries()?;
        let rank = 1 + entries.iter().filter(|e| e.ranks_above(&entry)).count();
        let is_top_ten = rank <= MAX_HIGH_SCORES;

        log::info!("Saved score {} for {} at rank {}", entry.score, entry.initials, rank);
        Ok(SaveResponse {
            success: true,
            id: entry.id,
            rank,
            is_top_ten,
            message: if is_top_ten {
                format!("Score saved! You placed #{rank} on the leaderboard")
            } else {
                "Score saved!".to_string()
            },
        })
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ScoreError> {
    serde_json::to_value(value).map_err(|e| ScoreError::Storage(e.to_string()))
}
