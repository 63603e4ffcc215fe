//! Services - calculation and history management
//!
//! - `calculator` - Height validation and volume formula
//! - `history` - Persisted, newest-first calculation history
//! - `session` - Form controller tying calculator and history together
//! - `presenter` - User-facing result and history messages

pub mod calculator;
pub mod history;
pub mod presenter;
pub mod session;

pub use calculator::{ValidationError, VolumeCalculator};
pub use history::HistoryStore;
pub use session::{Session, Submission};
