//! Renders calculation outcomes as user-facing message lines

use crate::domain::profile::BarrelProfile;
use crate::domain::types::{CalculationRecord, CalculationResult};
use crate::io::export::display_timestamp;
use crate::services::calculator::ValidationError;
use chrono::FixedOffset;

pub const INVALID_INPUT_MESSAGE: &str = "Пожалуйста, введите корректное значение высоты";

/// Result message shown under the input field
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMessage {
    pub lines: Vec<String>,
    pub is_error: bool,
}

impl ResultMessage {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn present(outcome: &Result<CalculationResult, ValidationError>) -> ResultMessage {
    match outcome {
        Ok(result) => ResultMessage {
            lines: vec![
                format!("При высоте {} см", result.height_cm),
                format!("Объём жидкости: {} литров", result.volume_liters),
                format!("Заполнение: {}%", result.percentage),
            ],
            is_error: false,
        },
        Err(ValidationError::ExceedsCapacity { height_cm, max_height_cm, max_volume_liters }) => {
            ResultMessage {
                lines: vec![
                    format!("Высота {} см превышает максимальную ({} см)", height_cm, max_height_cm),
                    format!("Максимальный объём: {} литров", max_volume_liters),
                ],
                is_error: true,
            }
        }
        Err(ValidationError::NotANumber { .. } | ValidationError::Negative { .. }) => {
            ResultMessage { lines: vec![INVALID_INPUT_MESSAGE.to_string()], is_error: true }
        }
    }
}

/// Footer line describing the configured barrel
pub fn profile_summary(profile: &BarrelProfile) -> String {
    format!(
        "{}: {} литров, высота {} см, диаметр {} см",
        profile.name,
        profile.capacity_liters,
        profile.max_height_cm,
        profile.diameter_cm()
    )
}

/// One history line: date, height, volume, percentage
pub fn history_line(record: &CalculationRecord, offset: &FixedOffset) -> String {
    format!(
        "{}  {} см  {} л  {}%",
        display_timestamp(record, offset),
        record.height,
        record.volume,
        record.percentage
    )
}
