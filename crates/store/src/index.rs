//! The durable run index.
//!
//! An ordered sequence of run identifiers; insertion order is
//! chronological order is eviction priority order. The on-disk record is
//! a JSON array of strings at a well-known path — a published contract
//! readable by external reporting tools.
//!
//! `persist` writes the whole sequence to a sibling temporary file,
//! fsyncs, and renames it over the record, so a concurrent reader only
//! ever sees the previous or the new complete array.

use runvault_core::{Error, Result, RunId};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Ordered record of published run identifiers, oldest first.
#[derive(Debug)]
pub struct RunIndex {
    ids: Vec<RunId>,
    path: PathBuf,
}

impl RunIndex {
    /// Load the index from `path`.
    ///
    /// A missing record is the first-ever run: an empty index. A record
    /// that exists but does not parse is [`Error::IndexCorrupted`] —
    /// never silently discarded.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ids = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| Error::IndexCorrupted(e.to_string()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(RunIndex { ids, path })
    }

    /// Append `id` as the newest entry.
    pub fn append(&mut self, id: RunId) -> Result<()> {
        if self.ids.contains(&id) {
            return Err(Error::DuplicateEntry(id));
        }
        self.ids.push(id);
        Ok(())
    }

    /// Atomically replace the durable record with the current sequence.
    pub fn persist(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.ids)
            .map_err(|e| Error::IndexCorrupted(e.to_string()))?;
        let tmp = self.path.with_file_name(".index.json.tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        debug!(entries = self.ids.len(), "persisted run index");
        Ok(())
    }

    /// Remove `id` from the sequence; returns whether it was present.
    pub fn remove(&mut self, id: &RunId) -> bool {
        match self.ids.iter().position(|e| e == id) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Whether `id` is already published.
    pub fn contains(&self, id: &RunId) -> bool {
        self.ids.contains(id)
    }

    /// Number of published runs.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing has ever been published.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The newest published identifier.
    pub fn newest(&self) -> Option<&RunId> {
        self.ids.last()
    }

    /// Entries oldest first.
    pub fn ids(&self) -> &[RunId] {
        &self.ids
    }
}
