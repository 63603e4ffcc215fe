//! Domain models - barrel geometry and calculation types
//!
//! - `BarrelProfile` / `FormulaMode` - configured barrel and formula
//! - `CalculationResult` - output of one calculation
//! - `CalculationRecord` - persisted history entry
//! - `HistoryState` - empty / non-empty history

pub mod profile;
pub mod types;

pub use profile::{BarrelProfile, FormulaMode};
pub use types::{CalculationRecord, CalculationResult, HistoryState};
