//! IO modules - persistence and export delivery
//!
//! - `storage` - Key/value blob storage (file and in-memory backends)
//! - `export` - CSV/JSON serialization and export file writing

pub mod export;
pub mod storage;

pub use export::{write_export, ExportFormat};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, PersistenceError};
