use foundation::math::MAX_GREAT_CIRCLE_KM;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ScoringError;

/// Ramp endpoints and fixed colours.
///
/// `max_distance_km` saturates the distance ramp. It defaults to 20000,
/// just under half the circumference of the modeled sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub max_distance_km: f64,
    pub solved_color: Color,
    pub border_color: Color,
    pub near_color: Color,
    pub far_color: Color,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_distance_km: 20_000.0,
            solved_color: Color::rgb(0x21, 0x99, 0x00),
            border_color: Color::rgb(0xf0, 0x4e, 0x2e),
            near_color: Color::rgb(13, 75, 145),
            far_color: Color::rgb(173, 216, 230),
        }
    }
}

impl ScoringConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ScoringError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ScoringError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        let max = self.max_distance_km;
        if !(max.is_finite() && max > 0.0 && max <= 2.0 * MAX_GREAT_CIRCLE_KM) {
            return Err(ScoringError::InvalidConfig(format!(
                "max_distance_km must be positive and at most one circumference, got {max}"
            )));
        }
        Ok(())
    }
}
