use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Json(String),
    InvalidScaleExtent { min: f64, max: f64 },
    InvalidMaxTilt(f64),
    InvalidRadiusFraction(f64),
    NegativeDuration { field: &'static str, value: f64 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "invalid globe config: {msg}"),
            ConfigError::InvalidScaleExtent { min, max } => {
                write!(f, "scale extent [{min}, {max}] must be positive with min <= max")
            }
            ConfigError::InvalidMaxTilt(v) => write!(f, "max tilt {v} must be within [0, 90]"),
            ConfigError::InvalidRadiusFraction(v) => {
                write!(f, "radius fraction {v} must be in (0, 1]")
            }
            ConfigError::NegativeDuration { field, value } => {
                write!(f, "{field} must be non-negative, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tunables for the interactive globe.
///
/// Scale bounds are ratios of the base radius, so they survive viewport
/// resizes. Wheel zoom follows the browser convention `k *= 2^(-deltaY * s)`
/// where `s` is `wheel_zoom_sensitivity` times the delta-mode multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub scale_extent: [f64; 2],
    pub max_tilt_deg: f64,
    /// Fraction of the half viewport covered by the globe at zoom 1.
    pub radius_fraction: f64,
    pub hover_cooldown_ms: f64,
    pub rotate_duration_ms: f64,
    pub zoom_duration_ms: f64,
    pub wheel_zoom_sensitivity: f64,
    pub line_wheel_multiplier: f64,
    pub page_wheel_multiplier: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            scale_extent: [0.5, 8.0],
            max_tilt_deg: 80.0,
            radius_fraction: 0.9,
            hover_cooldown_ms: 50.0,
            rotate_duration_ms: 750.0,
            zoom_duration_ms: 250.0,
            wheel_zoom_sensitivity: 0.002,
            line_wheel_multiplier: 25.0,
            page_wheel_multiplier: 500.0,
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let [min, max] = self.scale_extent;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidScaleExtent { min, max });
        }
        if !(0.0..=90.0).contains(&self.max_tilt_deg) {
            return Err(ConfigError::InvalidMaxTilt(self.max_tilt_deg));
        }
        if !(self.radius_fraction > 0.0 && self.radius_fraction <= 1.0) {
            return Err(ConfigError::InvalidRadiusFraction(self.radius_fraction));
        }
        for (field, value) in [
            ("hover_cooldown_ms", self.hover_cooldown_ms),
            ("rotate_duration_ms", self.rotate_duration_ms),
            ("zoom_duration_ms", self.zoom_duration_ms),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::NegativeDuration { field, value });
            }
        }
        Ok(())
    }
}
