use crate::game::screen::NAME_MAX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CAPACITY: usize = 5;
pub const DEFAULT_FILE: &str = "leaderboard.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry
{
    pub name: String,
    pub score: f64,
}

impl Entry
{
    pub fn new(name: &str, score: f64) -> Self
    {
        Self {
            name: name.chars().take(NAME_MAX).collect(),
            score,
        }
    }
}

/// Older files hold bare scores, newer ones hold `{name, score}` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum Stored
{
    Named(Entry),
    Bare(f64),
}

impl From<Stored> for Entry
{
    fn from(stored: Stored) -> Self
    {
        match stored {
            Stored::Named(entry) => Entry::new(&entry.name, entry.score),
            Stored::Bare(score) => Entry {
                name: String::new(),
                score,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError
{
    #[error("no leaderboard at {}", .0.display())]
    Missing(PathBuf),
    #[error("leaderboard at {} is not valid: {source}", path.display())]
    Corrupt
    {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("leaderboard I/O failed for {}: {source}", path.display())]
    Io
    {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct Leaderboard
{
    path: PathBuf,
}

impl Leaderboard
{
    pub fn new(path: impl Into<PathBuf>) -> Self
    {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }

    pub fn try_load(&self) -> Result<Vec<Entry>, StoreError>
    {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()));
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let stored: Vec<Stored> =
            serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        let mut entries: Vec<Entry> = stored.into_iter().map(Entry::from).collect();
        rank(&mut entries);
        Ok(entries)
    }

    /// Best-effort read: anything short of a well-formed file is an empty board.
    pub fn load(&self) -> Vec<Entry>
    {
        match self.try_load() {
            Ok(entries) => entries,
            Err(err @ StoreError::Missing(_)) => {
                debug!("{err}");
                Vec::new()
            }
            Err(err) => {
                warn!("{err}, treating as empty");
                Vec::new()
            }
        }
    }

    /// Adds `entry`, keeps the best [`CAPACITY`] and writes the board back.
    /// Returns the board as ranked, even when the write fails.
    pub fn record(&self, entry: Entry) -> Result<Vec<Entry>, (Vec<Entry>, StoreError)>
    {
        let mut entries = self.load();
        info!(name = %entry.name, score = entry.score, "recording score");
        entries.push(entry);
        rank(&mut entries);

        match self.save(&entries) {
            Ok(()) => Ok(entries),
            Err(err) => Err((entries, err)),
        }
    }

    fn save(&self, entries: &[Entry]) -> Result<(), StoreError>
    {
        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Stable descending sort, truncated to [`CAPACITY`]. Equal scores keep the
/// order they were recorded in.
pub fn rank(entries: &mut Vec<Entry>)
{
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    entries.truncate(CAPACITY);
}
