//! Barrel geometry and formula selection

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Which formula converts height into volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormulaMode {
    /// Fill ratio of the nominal capacity
    #[default]
    Linear,
    /// Volume of a cylinder of the profile radius
    Cylindrical,
}

impl FormulaMode {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaMode::Linear => "linear",
            FormulaMode::Cylindrical => "cylindrical",
        }
    }
}

/// Physical dimensions of a barrel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrelProfile {
    pub name: String,
    pub radius_cm: f64,
    /// Usable inner height; measurements above it are rejected
    pub max_height_cm: f64,
    /// Nominal capacity (liters)
    pub capacity_liters: f64,
}

impl Default for BarrelProfile {
    fn default() -> Self {
        Self::standard_208()
    }
}

impl BarrelProfile {
    /// Standard 208 l drum, 87 cm usable height, 57 cm diameter
    pub fn standard_208() -> Self {
        Self {
            name: "Стандартная бочка".to_string(),
            radius_cm: 28.5,
            max_height_cm: 87.0,
            capacity_liters: 208.0,
        }
    }

    pub fn diameter_cm(&self) -> f64 {
        self.radius_cm * 2.0
    }

    /// Fraction of the usable height, unclamped
    #[inline]
    pub fn fill_ratio(&self, height_cm: f64) -> f64 {
        height_cm / self.max_height_cm
    }

    /// Unrounded cylinder volume in liters (cm³ / 1000)
    #[inline]
    pub fn cylinder_liters(&self, height_cm: f64) -> f64 {
        PI * self.radius_cm.powi(2) * height_cm / 1000.0
    }

    /// Returns the name of the first field that is not finite and positive
    pub fn invalid_field(&self) -> Option<&'static str> {
        [
            ("radius_cm", self.radius_cm),
            ("max_height_cm", self.max_height_cm),
            ("capacity_liters", self.capacity_liters),
        ]
        .into_iter()
        .find(|(_, v)| !(v.is_finite() && *v > 0.0))
        .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_profile() {
        let profile = BarrelProfile::standard_208();
        assert_eq!(profile.diameter_cm(), 57.0);
        assert_eq!(profile.max_height_cm, 87.0);
        assert_eq!(profile.capacity_liters, 208.0);
        assert!(profile.invalid_field().is_none());
    }

    #[test]
    fn test_fill_ratio() {
        let profile = BarrelProfile::standard_208();
        assert_eq!(profile.fill_ratio(43.5), 0.5);
        assert_eq!(profile.fill_ratio(0.0), 0.0);
    }

    #[test]
    fn test_cylinder_liters() {
        let profile = BarrelProfile::standard_208();
        let liters = profile.cylinder_liters(50.0);
        assert!((liters - 127.588).abs() < 0.001);
    }

    #[test]
    fn test_invalid_field() {
        let mut profile = BarrelProfile::standard_208();
        profile.max_height_cm = 0.0;
        assert_eq!(profile.invalid_field(), Some("max_height_cm"));

        profile.max_height_cm = 87.0;
        profile.radius_cm = f64::NAN;
        assert_eq!(profile.invalid_field(), Some("radius_cm"));
    }

    #[test]
    fn test_formula_mode_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: FormulaMode,
        }
        let w: Wrapper = toml::from_str("mode = \"cylindrical\"").unwrap();
        assert_eq!(w.mode, FormulaMode::Cylindrical);
        assert_eq!(FormulaMode::default().as_str(), "linear");
    }

    #[test]
    fn test_formula_mode_cli_names() {
        assert_eq!(FormulaMode::from_str("cylindrical", true), Ok(FormulaMode::Cylindrical));
        assert_eq!(FormulaMode::from_str("Linear", true), Ok(FormulaMode::Linear));
        assert!(FormulaMode::from_str("conical", true).is_err());
    }
}
