//! Calculator session - the form controller
//!
//! Submits a height to the calculator and records successful results in the
//! history store. Rejected input never reaches the store.

use crate::domain::types::{CalculationRecord, CalculationResult};
use crate::io::export::ExportFormat;
use crate::io::storage::{KeyValueStorage, PersistenceError};
use crate::services::calculator::{ValidationError, VolumeCalculator};
use crate::services::history::HistoryStore;
use crate::services::presenter::{self, ResultMessage};
use tracing::{debug, info};

/// Outcome of one submit action
#[derive(Debug)]
pub struct Submission {
    pub outcome: Result<CalculationResult, ValidationError>,
    /// Set when the result was computed but could not be persisted
    pub persistence_error: Option<PersistenceError>,
}

impl Submission {
    pub fn message(&self) -> ResultMessage {
        presenter::present(&self.outcome)
    }

    pub fn is_recorded(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub struct Session<S: KeyValueStorage> {
    calculator: VolumeCalculator,
    history: HistoryStore<S>,
}

impl<S: KeyValueStorage> Session<S> {
    pub fn new(calculator: VolumeCalculator, history: HistoryStore<S>) -> Self {
        Self { calculator, history }
    }

    pub fn submit(&mut self, height_input: &str) -> Submission {
        let outcome = self.calculator.calculate(height_input);

        let persistence_error = match &outcome {
            Ok(result) => {
                let record = CalculationRecord::from_result(result);
                info!(
                    id = %record.id,
                    height_cm = %result.height_cm,
                    volume_liters = %result.volume_liters,
                    percentage = %result.percentage,
                    "calculation_recorded"
                );
                self.history.append(record).err()
            }
            Err(e) => {
                debug!(input = %height_input, error = %e, "calculation_rejected");
                None
            }
        };

        Submission { outcome, persistence_error }
    }

    pub fn export(&self, format: ExportFormat) -> Option<Vec<u8>> {
        self.history.export_as(format)
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.history.clear()
    }

    pub fn calculator(&self) -> &VolumeCalculator {
        &self.calculator
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{BarrelProfile, FormulaMode};
    use crate::domain::types::HistoryState;
    use crate::io::storage::MemoryStorage;
    use crate::services::history::DEFAULT_HISTORY_KEY;

    fn session_with(storage: MemoryStorage) -> Session<MemoryStorage> {
        let calculator = VolumeCalculator::new(BarrelProfile::standard_208(), FormulaMode::Linear);
        Session::new(calculator, HistoryStore::open(storage, DEFAULT_HISTORY_KEY))
    }

    #[test]
    fn test_submit_records_success() {
        let mut session = session_with(MemoryStorage::new());
        let submission = session.submit("43.5");

        assert!(submission.is_recorded());
        assert!(submission.persistence_error.is_none());
        assert!(!submission.message().is_error);
        assert_eq!(session.history().len(), 1);

        let record = &session.history().records()[0];
        assert_eq!(record.height, 43.5);
        assert_eq!(record.volume, 104.0);
        assert_eq!(record.percentage, 50.0);
    }

    #[test]
    fn test_rejections_do_not_touch_history() {
        let mut session = session_with(MemoryStorage::new());
        for input in ["-1", "abc", "87.1"] {
            let submission = session.submit(input);
            assert!(!submission.is_recorded(), "input={input}");
            assert!(submission.message().is_error);
        }
        assert_eq!(session.history().state(), HistoryState::Empty);
        assert!(session.history().storage().is_empty());
    }

    /// Writer that collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_rejection_is_silent_at_warn_level() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        let mut session = session_with(MemoryStorage::new());
        tracing::subscriber::with_default(subscriber, || {
            session.submit("abc");
            session.submit("-5");
        });

        assert!(logs.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_persistence_failure_is_reported() {
        let mut session = session_with(MemoryStorage::new().with_max_bytes(Some(8)));
        let submission = session.submit("10");

        assert!(submission.is_recorded());
        assert!(matches!(
            submission.persistence_error,
            Some(PersistenceError::QuotaExceeded { .. })
        ));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_export_and_clear() {
        let mut session = session_with(MemoryStorage::new());
        assert!(session.export(ExportFormat::Json).is_none());

        session.submit("20");
        session.submit("30");
        assert!(session.export(ExportFormat::Csv).is_some());

        session.clear().unwrap();
        session.clear().unwrap();
        assert_eq!(session.history().state(), HistoryState::Empty);
        assert!(session.export(ExportFormat::Csv).is_none());
    }
}
