//! Volume calculator - converts a measured liquid height into volume and fill
//!
//! Two formulas are supported, selected by `FormulaMode`:
//! - Linear: volume = height / max_height * capacity (2 decimals)
//! - Cylindrical: volume = π * r² * height / 1000 (1 decimal)
//!
//! Percentage is always height / max_height * 100 (2 decimals).
//! All rounding is half-up.

use crate::domain::profile::{BarrelProfile, FormulaMode};
use crate::domain::types::CalculationResult;
use thiserror::Error;
use tracing::debug;

/// Rejected height input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("height is not a number: {input:?}")]
    NotANumber { input: String },

    #[error("height must not be negative: {height_cm}")]
    Negative { height_cm: f64 },

    /// Carries the nominal capacity so callers can still render a
    /// "maximum exceeded" result
    #[error("height {height_cm} cm exceeds maximum {max_height_cm} cm")]
    ExceedsCapacity { height_cm: f64, max_height_cm: f64, max_volume_liters: f64 },
}

/// Round half-up to `decimals` places
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

/// Parse a textual height. Accepts a comma decimal separator.
pub fn parse_height(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let normalized = trimmed.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(h) if h.is_finite() => Ok(h),
        _ => Err(ValidationError::NotANumber { input: trimmed.to_string() }),
    }
}

#[derive(Debug, Clone)]
pub struct VolumeCalculator {
    profile: BarrelProfile,
    mode: FormulaMode,
}

impl VolumeCalculator {
    pub fn new(profile: BarrelProfile, mode: FormulaMode) -> Self {
        Self { profile, mode }
    }

    pub fn profile(&self) -> &BarrelProfile {
        &self.profile
    }

    pub fn mode(&self) -> FormulaMode {
        self.mode
    }

    /// Validate and compute from textual input
    pub fn calculate(&self, height_input: &str) -> Result<CalculationResult, ValidationError> {
        let height_cm = parse_height(height_input)?;
        self.calculate_height(height_cm)
    }

    /// Validate and compute from an already parsed height
    pub fn calculate_height(&self, height_cm: f64) -> Result<CalculationResult, ValidationError> {
        if height_cm.is_nan() {
            return Err(ValidationError::NotANumber { input: height_cm.to_string() });
        }
        if height_cm < 0.0 {
            return Err(ValidationError::Negative { height_cm });
        }
        // -0.0 passes the sign check; store and display it as 0
        let height_cm = height_cm + 0.0;
        if height_cm > self.profile.max_height_cm {
            return Err(ValidationError::ExceedsCapacity {
                height_cm,
                max_height_cm: self.profile.max_height_cm,
                max_volume_liters: self.profile.capacity_liters,
            });
        }

        let ratio = self.profile.fill_ratio(height_cm);
        let volume_liters = match self.mode {
            FormulaMode::Linear => round_half_up(ratio * self.profile.capacity_liters, 2),
            FormulaMode::Cylindrical => round_half_up(self.profile.cylinder_liters(height_cm), 1),
        };
        let percentage = round_half_up(ratio * 100.0, 2);

        debug!(
            height_cm = %height_cm,
            volume_liters = %volume_liters,
            percentage = %percentage,
            mode = %self.mode.as_str(),
            "volume_calculated"
        );

        Ok(CalculationResult { height_cm, volume_liters, percentage })
    }
}
