use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::models::error::StoreError;
use crate::models::location_record::{LocationRecord, NewLocation};

/// Oldest records are evicted once the log grows past this.
pub const LOG_CAPACITY: usize = 100;

/// Window returned by [`LocationStore::recent`] when the caller gives none.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Bounded, insertion-ordered log of fixes, written through to a JSON file.
///
/// The store does no locking of its own; it is meant to be owned by a single
/// writer (see [`StoreActor`](crate::store::store_actor::StoreActor)).
pub struct LocationStore {
    log: VecDeque<LocationRecord>,
    next_id: u64,
    path: PathBuf,
}

impl LocationStore {
    /// Binds a store to `path` and loads whatever is there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            log: VecDeque::with_capacity(LOG_CAPACITY + 1),
            next_id: 1,
            path: path.into(),
        };
        store.load();
        store
    }

    /// Replaces the in-memory log with the file contents. A missing file is an
    /// empty log; an unreadable or corrupt one is logged and also treated as
    /// empty.
    pub fn load(&mut self) {
        let records = match self.read_file() {
            Ok(Some(records)) => {
                info!("Loaded {} locations from {}", records.len(), self.path.display());
                records
            }
            Ok(None) => {
                info!("No data file at {}, starting with an empty log", self.path.display());
                Vec::new()
            }
            Err(e) => {
                warn!("{}; starting with an empty log", e);
                Vec::new()
            }
        };

        let skip = records.len().saturating_sub(LOG_CAPACITY);
        self.log = records.into_iter().skip(skip).collect();
        self.next_id = self.log.iter().map(|r| r.id).max().map_or(1, |id| id + 1);
    }

    fn read_file(&self) -> Result<Option<Vec<LocationRecord>>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read { path: self.path.clone(), source });
            }
        };

        let entries: Vec<Value> = serde_json::from_str(&data)
            .map_err(|source| StoreError::Parse { path: self.path.clone(), source })?;

        // A bad entry costs only itself, not the rest of the history.
        let records = entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping entry {} in {}: {}", idx, self.path.display(), e);
                    None
                }
            })
            .collect();
        Ok(Some(records))
    }

    /// Stores the fix at the tail and writes the log out. A failed write is
    /// logged and the record is returned regardless.
    pub fn append(&mut self, fix: NewLocation) -> LocationRecord {
        let record = fix.into_record(self.next_id, Utc::now());
        self.next_id += 1;

        self.log.push_back(record.clone());
        while self.log.len() > LOG_CAPACITY {
            self.log.pop_front();
        }

        if let Err(e) = self.persist() {
            error!("Error saving location data: {}", e);
        }
        record
    }

    /// Overwrites the backing file with the whole log.
    pub fn persist(&self) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(&self.log).map_err(StoreError::Serialize)?;
        fs::write(&self.path, data)
            .map_err(|source| StoreError::Write { path: self.path.clone(), source })
    }

    /// The last `limit` records (10 when `None`), oldest first.
    pub fn recent(&self, limit: Option<usize>) -> Vec<LocationRecord> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        let skip = self.log.len().saturating_sub(limit);
        self.log.iter().skip(skip).cloned().collect()
    }

    pub fn latest(&self) -> Option<LocationRecord> {
        self.log.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
