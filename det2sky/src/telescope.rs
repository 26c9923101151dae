use crate::AspectErrors;
use celestial::prelude::{LinearPixelMap, SkyView};
use nalgebra::Vector3;
use rotations::prelude::{VectorErrors, normalize_vector};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Calibration constants of one telescope/detector unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelescopeDefinition {
    #[serde(alias = "DETXFLIP")]
    pub x_flip: i8,
    #[serde(alias = "DETYFLIP")]
    pub y_flip: i8,
    /// mm
    #[serde(alias = "FOCALLEN")]
    pub focal_length: f64,
    #[serde(alias = "DET_XSCL")]
    pub det_scale_x: f64,
    #[serde(alias = "DET_YSCL")]
    pub det_scale_y: f64,
    /// degrees per sky pixel
    #[serde(alias = "SKY_XSCL")]
    pub sky_scale_x: f64,
    #[serde(alias = "SKY_YSCL")]
    pub sky_scale_y: f64,
}

impl TelescopeDefinition {
    pub fn from_ron_str(s: &str) -> Result<Self, AspectErrors> {
        let telescope: Self = ron::from_str(s)?;
        telescope.validate()?;
        Ok(telescope)
    }

    pub fn from_file(path: &Path) -> Result<Self, AspectErrors> {
        Self::from_ron_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), AspectErrors> {
        for (name, flip) in [("x_flip", self.x_flip), ("y_flip", self.y_flip)] {
            if flip != 1 && flip != -1 {
                return Err(AspectErrors::InvalidTelescope(format!(
                    "{name} must be 1 or -1, got {flip}"
                )));
            }
        }
        let positive = [
            ("focal_length", self.focal_length),
            ("det_scale_x", self.det_scale_x),
            ("det_scale_y", self.det_scale_y),
            ("sky_scale_x", self.sky_scale_x),
            ("sky_scale_y", self.sky_scale_y),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(AspectErrors::InvalidTelescope(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Unit vector from the focal point to the event in the detector frame.
    ///
    /// # Arguments
    ///
    /// * `abs_x` - Absolute detector x position, mm.
    /// * `abs_y` - Absolute detector y position, mm.
    pub fn detector_direction(&self, abs_x: f64, abs_y: f64) -> Result<Vector3<f64>, VectorErrors> {
        normalize_vector(&Vector3::new(-abs_x, -abs_y, self.focal_length))
    }

    /// Constant plate scale pixel map for `view` using the sky scales.
    pub fn pixel_map(&self, view: &SkyView) -> Result<LinearPixelMap, AspectErrors> {
        Ok(LinearPixelMap::new(view, self.sky_scale_x, self.sky_scale_y)?)
    }
}
