//! Integration tests for persisted history across sessions

use barrel_calc::domain::{BarrelProfile, FormulaMode, HistoryState};
use barrel_calc::io::storage::{FileStorage, KeyValueStorage};
use barrel_calc::io::{write_export, ExportFormat};
use barrel_calc::services::history::DEFAULT_HISTORY_KEY;
use barrel_calc::services::{HistoryStore, Session, VolumeCalculator};
use chrono::{FixedOffset, NaiveDate};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn open_session(dir: &Path) -> Session<FileStorage> {
    let calculator = VolumeCalculator::new(BarrelProfile::standard_208(), FormulaMode::Linear);
    let history = HistoryStore::open(FileStorage::new(dir), DEFAULT_HISTORY_KEY)
        .with_display_offset(FixedOffset::east_opt(3 * 3600).unwrap());
    Session::new(calculator, history)
}

#[test]
fn test_history_survives_restart() {
    let dir = tempdir().unwrap();

    let before = {
        let mut session = open_session(dir.path());
        session.submit("10");
        session.submit("43.5");
        session.submit("87");
        session.history().records().to_vec()
    };

    let session = open_session(dir.path());
    assert_eq!(session.history().records(), before.as_slice());
    assert_eq!(session.history().records()[0].height, 87.0);
    assert_eq!(session.history().records()[2].height, 10.0);
}

#[test]
fn test_persisted_blob_layout() {
    let dir = tempdir().unwrap();
    let mut session = open_session(dir.path());
    session.submit("43.5");

    let blob = fs::read_to_string(dir.path().join("barrelCalculations.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let entry = &parsed.as_array().unwrap()[0];

    assert!(entry["id"].is_string());
    assert_eq!(entry["height"], 43.5);
    assert_eq!(entry["volume"], 104.0);
    assert_eq!(entry["percentage"], 50.0);
    assert!(entry["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_corrupted_file_starts_empty() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("barrelCalculations.json"), "garbage").unwrap();

    let mut session = open_session(dir.path());
    assert_eq!(session.history().state(), HistoryState::Empty);

    // Next append overwrites the corrupted blob
    session.submit("20");
    let reopened = open_session(dir.path());
    assert_eq!(reopened.history().len(), 1);
}

#[test]
fn test_rejected_input_writes_nothing() {
    let dir = tempdir().unwrap();
    let mut session = open_session(dir.path());

    session.submit("-1");
    session.submit("abc");
    session.submit("87.1");

    assert!(session.history().is_empty());
    assert!(!dir.path().join("barrelCalculations.json").exists());
}

#[test]
fn test_clear_removes_file() {
    let dir = tempdir().unwrap();
    let mut session = open_session(dir.path());
    session.submit("30");

    session.clear().unwrap();
    session.clear().unwrap();

    let storage = FileStorage::new(dir.path());
    assert!(storage.get_item(DEFAULT_HISTORY_KEY).unwrap().is_none());
    assert!(open_session(dir.path()).history().is_empty());
}

#[test]
fn test_export_to_files() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("exports");
    let mut session = open_session(&dir.path().join("data"));
    session.submit("43.5");

    let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    let csv = session.export(ExportFormat::Csv).unwrap();
    let csv_path = write_export(&out, ExportFormat::Csv, &csv, date).unwrap();
    let content = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_path.ends_with("barrel_calculations_2026-10-16.csv"));
    assert!(content.starts_with("Дата,Высота (см),Объём (л),Заполнение (%)\n"));
    assert!(content.lines().nth(1).unwrap().ends_with(",43.5,104,50"));

    let json = session.export(ExportFormat::Json).unwrap();
    let json_path = write_export(&out, ExportFormat::Json, &json, date).unwrap();
    assert!(json_path.ends_with("barrel_calculations_2026-10-16.json"));
    let parsed: serde_json::Value = serde_json::from_slice(&fs::read(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}
