//! Persistent transcript history as append-only JSONL.
//!
//! Every emitted transcript is appended to `history.jsonl` as one JSON
//! object per line with a local RFC 3339 timestamp.  Writes are best-effort:
//! a full disk or missing permissions must never disturb the dictation
//! pipeline, so failures are logged at debug level and swallowed.
//!
//! The file is truncated to the newest [`HistoryLog::DEFAULT_MAX_ENTRIES`]
//! records after each append so it cannot grow without bound.

use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

/// One persisted transcript record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Local RFC 3339 timestamp of when the text was emitted.
    pub timestamp: String,
    /// The emitted transcript.
    pub text: String,
    /// Interaction mode the clip was recorded under ("hold" / "toggle").
    #[serde(default)]
    pub mode: String,
}

// ---------------------------------------------------------------------------
// HistoryLog
// ---------------------------------------------------------------------------

/// Append-only JSONL transcript log with bounded size.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
    max_entries: usize,
}

impl HistoryLog {
    /// Newest records kept after truncation.
    pub const DEFAULT_MAX_ENTRIES: usize = 1000;

    /// Create a log backed by `path`.  The file and its parent directories
    /// are created lazily on first append.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    /// Override the truncation bound (useful for tests).
    pub fn with_max_entries(path: PathBuf, max_entries: usize) -> Self {
        Self { path, max_entries }
    }

    /// Append one record, best-effort.
    ///
    /// Empty (post-trim) text is skipped.  I/O errors are logged and
    /// swallowed — history must never fail the pipeline.
    pub fn append(&self, text: &str, mode: &str) {
        let cleaned = text.trim();
        if cleaned.is_empty() {
            return;
        }

        let entry = HistoryEntry {
            timestamp: chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            text: cleaned.to_string(),
            mode: mode.to_string(),
        };

        if let Err(e) = self.try_append(&entry) {
            log::debug!("history append failed (ignored): {e}");
            return;
        }

        self.truncate();
    }

    /// Read the newest `limit` records, newest first.
    ///
    /// Unreadable or unparsable lines are skipped; a missing file yields an
    /// empty list.
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        if limit == 0 {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        let mut tail: VecDeque<HistoryEntry> = VecDeque::with_capacity(limit);
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Ok(entry) = serde_json::from_str::<HistoryEntry>(line) {
                if tail.len() == limit {
                    tail.pop_front();
                }
                tail.push_back(entry);
            }
        }

        tail.into_iter().rev().collect()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn try_append(&self, entry: &HistoryEntry) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Rewrite the file keeping only the newest `max_entries` lines.
    /// Best-effort like everything else here.
    fn truncate(&self) {
        if self.max_entries == 0 {
            return;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return,
        };

        let mut kept: VecDeque<&str> = VecDeque::with_capacity(self.max_entries);
        let mut total = 0usize;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            total += 1;
            if kept.len() == self.max_entries {
                kept.pop_front();
            }
            kept.push_back(line);
        }

        if total <= self.max_entries {
            return;
        }

        let mut rewritten = String::with_capacity(content.len());
        for line in kept {
            rewritten.push_str(line);
            rewritten.push('\n');
        }
        if let Err(e) = fs::write(&self.path, rewritten) {
            log::debug!("history truncation failed (ignored): {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
