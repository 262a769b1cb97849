//! User settings and preferences
//!
//! Held in memory for the session. Native hosts may load them from a JSON
//! file; every field has a default so partial documents are fine.

use serde::{Deserialize, Serialize};

use crate::consts::SPEED_DEFAULT;
use crate::error::ConfigError;
use crate::sim::{CameraSmoothing, FaceTable};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation speed multiplier (clamped on use)
    pub speed: f32,
    /// Camera follow smoothing
    pub camera_smoothing: CameraSmoothing,
    /// Launch RNG seed; `None` draws a fresh one per session
    pub seed: Option<u64>,
    /// Custom face layout, validated on load; `None` uses the standard die
    pub faces: Option<FaceTable>,
    /// Physical and roll constants
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: SPEED_DEFAULT,
            camera_smoothing: CameraSmoothing::default(),
            seed: None,
            faces: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        match self.camera_smoothing {
            CameraSmoothing::PerFrame { blend } if !(0.0..=1.0).contains(&blend) => Err(
                ConfigError::invalid("camera_smoothing.blend", format!("must be in [0, 1], got {blend}")),
            ),
            CameraSmoothing::TimeCompensated { rate } if !(rate.is_finite() && rate > 0.0) => Err(
                ConfigError::invalid("camera_smoothing.rate", format!("must be positive, got {rate}")),
            ),
            _ => Ok(()),
        }
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
