//! History store - ordered, persisted list of past calculations
//!
//! Newest record first. Every append persists the full history immediately.
//! Storage failures never invalidate the in-memory history: load fails open
//! to an empty history, append/clear return a recoverable error.

use crate::domain::types::{CalculationRecord, HistoryState};
use crate::io::export::{self, ExportFormat};
use crate::io::storage::{KeyValueStorage, PersistenceError};
use chrono::{FixedOffset, Local, Offset};
use tracing::{debug, info, warn};

/// Default storage key for the persisted history blob
pub const DEFAULT_HISTORY_KEY: &str = "barrelCalculations";

pub struct HistoryStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    records: Vec<CalculationRecord>,
    /// Offset used for locale-formatted dates in CSV
    display_offset: FixedOffset,
}

impl<S: KeyValueStorage> HistoryStore<S> {
    /// Create a store and load any persisted history
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            records: Vec::new(),
            display_offset: Local::now().offset().fix(),
        };
        store.load();
        store
    }

    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    /// Reload history from storage. Absent or malformed state yields an empty history.
    pub fn load(&mut self) -> &[CalculationRecord] {
        self.records = match self.read_persisted() {
            Ok(records) => records,
            Err(e) => {
                warn!(key = %self.key, error = %e, "history_load_failed");
                Vec::new()
            }
        };
        info!(key = %self.key, records = self.records.len(), "history_loaded");
        &self.records
    }

    fn read_persisted(&self) -> Result<Vec<CalculationRecord>, PersistenceError> {
        match self.storage.get_item(&self.key)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(&self.records)?;
        self.storage.set_item(&self.key, &blob)
    }

    /// Prepend a record and persist. On error the record stays in memory.
    pub fn append(&mut self, record: CalculationRecord) -> Result<(), PersistenceError> {
        debug!(id = %record.id, height = %record.height, "history_append");
        self.records.insert(0, record);

        if let Err(e) = self.persist() {
            warn!(key = %self.key, records = self.records.len(), error = %e, "history_persist_failed");
            return Err(e);
        }
        Ok(())
    }

    /// Remove persisted state, then empty the history. Idempotent.
    ///
    /// If removal fails the in-memory history is kept, so memory never
    /// disagrees with what the next `open` would load.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        if let Err(e) = self.storage.remove_item(&self.key) {
            warn!(key = %self.key, records = self.records.len(), error = %e, "history_clear_failed");
            return Err(e);
        }
        let cleared = self.records.len();
        self.records.clear();
        info!(key = %self.key, cleared = cleared, "history_cleared");
        Ok(())
    }

    /// Serialize the current history. Returns `None` when there is nothing to export.
    pub fn export_as(&self, format: ExportFormat) -> Option<Vec<u8>> {
        if self.records.is_empty() {
            debug!(format = %format.extension(), "export_skipped_empty_history");
            return None;
        }

        match format {
            ExportFormat::Csv => match export::to_csv(&self.records, &self.display_offset) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(error = %e, "csv_export_failed");
                    None
                }
            },
            ExportFormat::Json => match export::to_json(&self.records) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(error = %e, "json_export_failed");
                    None
                }
            },
        }
    }

    pub fn records(&self) -> &[CalculationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn state(&self) -> HistoryState {
        HistoryState::of_len(self.records.len())
    }

    pub fn display_offset(&self) -> &FixedOffset {
        &self.display_offset
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
