//! History export - CSV and JSON serialization plus file delivery
//!
//! Serialization is pure (records in, bytes out). `write_export` is the
//! delivery side and writes `barrel_calculations_<YYYY-MM-DD>.<ext>`.

use crate::domain::types::CalculationRecord;
use chrono::{FixedOffset, NaiveDate};
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CSV_HEADER: [&str; 4] = ["Дата", "Высота (см)", "Объём (л)", "Заполнение (%)"];

/// Display format for dates in CSV rows and the history listing
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

const FILENAME_PREFIX: &str = "barrel_calculations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Local date/time string used for display and CSV
pub fn display_timestamp(record: &CalculationRecord, offset: &FixedOffset) -> String {
    record.timestamp.with_timezone(offset).format(DISPLAY_DATE_FORMAT).to_string()
}

/// CSV with a fixed header row; fields are quoted only when needed (RFC 4180)
pub fn to_csv(records: &[CalculationRecord], offset: &FixedOffset) -> csv::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            display_timestamp(record, offset),
            record.height.to_string(),
            record.volume.to_string(),
            record.percentage.to_string(),
        ])?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

pub fn to_json(records: &[CalculationRecord]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(records)
}

pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!("{}_{}.{}", FILENAME_PREFIX, date.format("%Y-%m-%d"), format.extension())
}

/// Write export bytes into `dir`, creating it if needed. Returns the file path.
pub fn write_export(
    dir: impl AsRef<Path>,
    format: ExportFormat,
    bytes: &[u8],
    date: NaiveDate,
) -> std::io::Result<PathBuf> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(export_filename(format, date));
    fs::write(&path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), format = %format.extension(), "export_written");
    Ok(path)
}
