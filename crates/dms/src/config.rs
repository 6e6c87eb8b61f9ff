//! DMS configuration

use std::path::Path;

use ::config::{Config, Environment, File};
use feature_engine::LandmarkScheme;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::DmsError;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "DMS";

/// Activity classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Smoothed EAR below this counts as eyes closed
    pub ear_sleep_threshold: f64,

    /// Consecutive closed-eye frames before Inactive
    pub ear_frames_sleep: u32,

    /// Smoothed mouth ratio above this counts as mouth open
    pub mouth_open_threshold: f64,

    /// Consecutive open-mouth frames before Inactive
    pub mouth_frames_yawn: u32,

    /// Moving average window (frames)
    pub smoothing_window: usize,

    /// Frames Inactive is held after its trigger clears
    pub cooldown_frames: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ear_sleep_threshold: 0.22,
            ear_frames_sleep: 15,
            mouth_open_threshold: 0.35,
            mouth_frames_yawn: 15,
            smoothing_window: 5,
            cooldown_frames: 30,
        }
    }
}

impl ClassifierConfig {
    /// Create strict config (reacts sooner, holds longer)
    pub fn strict() -> Self {
        Self {
            ear_sleep_threshold: 0.25,
            ear_frames_sleep: 10,
            mouth_frames_yawn: 10,
            cooldown_frames: 45,
            ..Default::default()
        }
    }

    /// Create lenient config (needs longer evidence)
    pub fn lenient() -> Self {
        Self {
            ear_sleep_threshold: 0.18,
            ear_frames_sleep: 25,
            mouth_open_threshold: 0.45,
            mouth_frames_yawn: 25,
            cooldown_frames: 15,
            ..Default::default()
        }
    }

    /// Check values are usable
    pub fn validate(&self) -> Result<(), DmsError> {
        if self.smoothing_window == 0 {
            return Err(DmsError::Config("smoothing_window must be at least 1".into()));
        }
        if self.ear_frames_sleep == 0 {
            return Err(DmsError::Config("ear_frames_sleep must be at least 1".into()));
        }
        if self.mouth_frames_yawn == 0 {
            return Err(DmsError::Config("mouth_frames_yawn must be at least 1".into()));
        }
        for (name, value) in [
            ("ear_sleep_threshold", self.ear_sleep_threshold),
            ("mouth_open_threshold", self.mouth_open_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DmsError::Config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-session configuration: classifier tuning plus the landmark numbering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub classifier: ClassifierConfig,
    pub landmarks: LandmarkScheme,
}

impl SessionConfig {
    /// Load defaults, then an optional file, then `DMS__`-prefixed environment overrides
    /// (e.g. `DMS__CLASSIFIER__COOLDOWN_FRAMES=45`).
    pub fn load(path: Option<&Path>) -> Result<Self, DmsError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading session config from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        let loaded: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), DmsError> {
        self.classifier.validate()
    }
}
