//! Append-only JSON log of processed photos (`photos.json`).
//!
//! The file holds a single JSON array of `{"file_name", "size"}` objects. It
//! is truncated to `[]` at the start of every fetch and rewritten after each
//! appended entry, so an interrupted run still leaves valid JSON behind.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::photos::LogEntry;

pub const DEFAULT_LOG_FILE: &str = "photos.json";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Failed to write photo log {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Destination for per-photo log entries.
pub trait PhotoLog: Send {
    /// Start a fresh, empty log.
    fn reset(&mut self) -> Result<(), LogError>;

    fn append(&mut self, entry: &LogEntry) -> Result<(), LogError>;
}

#[derive(Debug)]
pub struct JsonPhotoLog {
    path: PathBuf,
}

impl JsonPhotoLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries. A missing or unparsable file reads as empty.
    pub fn read_entries(&self) -> Vec<LogEntry> {
        match std::fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        "Photo log {} is not a JSON array, starting over: {}",
                        self.path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        }
    }

    fn write_entries(&self, entries: &[LogEntry]) -> Result<(), LogError> {
        let json = serde_json::to_vec(entries)?;
        std::fs::write(&self.path, json).map_err(|source| LogError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl PhotoLog for JsonPhotoLog {
    fn reset(&mut self) -> Result<(), LogError> {
        tracing::debug!("Resetting photo log at {}", self.path().display());
        self.write_entries(&[])
    }

    fn append(&mut self, entry: &LogEntry) -> Result<(), LogError> {
        let mut entries = self.read_entries();
        entries.push(entry.clone());
        self.write_entries(&entries)
    }
}
