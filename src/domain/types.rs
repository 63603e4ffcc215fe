//! Shared types for calculations and history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable) record id
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

/// Output of a successful calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculationResult {
    /// Validated input height (cm)
    pub height_cm: f64,
    pub volume_liters: f64,
    pub percentage: f64,
}

/// A persisted history entry
///
/// Field names are the persisted blob layout; do not rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: String,
    pub height: f64,
    pub volume: f64,
    pub percentage: f64,
    pub timestamp: DateTime<Utc>,
}

impl CalculationRecord {
    pub fn new(result: &CalculationResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: new_record_id(),
            height: result.height_cm,
            volume: result.volume_liters,
            percentage: result.percentage,
            timestamp,
        }
    }

    /// Record stamped with the current time
    pub fn from_result(result: &CalculationResult) -> Self {
        Self::new(result, Utc::now())
    }
}

/// Observable history states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Empty,
    NonEmpty,
}

impl HistoryState {
    pub fn of_len(len: usize) -> Self {
        if len == 0 {
            HistoryState::Empty
        } else {
            HistoryState::NonEmpty
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryState::Empty => "empty",
            HistoryState::NonEmpty => "non_empty",
        }
    }
}

impl std::fmt::Display for HistoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
