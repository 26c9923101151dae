use crate::AspectErrors;
use attitude::AttitudeConfig;
use celestial::prelude::SkyView;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Decimal places pixel coordinates are rounded to.
pub const DEFAULT_PIXEL_PLACES: u32 = 3;
/// More decimal places than an f64 pixel coordinate can carry.
pub const MAX_PIXEL_PLACES: u32 = 15;

/// Settings of one aspect correction run. Every field has a default so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectConfig {
    pub attitude: AttitudeConfig,
    pub view: SkyView,
    pub places: u32,
    /// also emit spacecraft frame components SCX, SCY
    pub spacecraft: bool,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            attitude: AttitudeConfig::default(),
            view: SkyView::default(),
            places: DEFAULT_PIXEL_PLACES,
            spacecraft: false,
        }
    }
}

impl AspectConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, AspectErrors> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AspectErrors> {
        Self::from_ron_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), AspectErrors> {
        let AttitudeConfig { gap_tolerance, window_slack } = self.attitude;
        if !(gap_tolerance.is_finite() && gap_tolerance >= 0.0) {
            return Err(AspectErrors::InvalidConfig(format!(
                "gap_tolerance must be non-negative, got {gap_tolerance}"
            )));
        }
        if !(window_slack.is_finite() && window_slack >= 0.0) {
            return Err(AspectErrors::InvalidConfig(format!(
                "window_slack must be non-negative, got {window_slack}"
            )));
        }
        if self.places > MAX_PIXEL_PLACES {
            return Err(AspectErrors::InvalidConfig(format!(
                "places must be at most {MAX_PIXEL_PLACES}, got {}",
                self.places
            )));
        }
        self.view.validate()?;
        Ok(())
    }
}
