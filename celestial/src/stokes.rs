use crate::{CelestialErrors, radec::RaDec};
use nalgebra::Vector3;
use rotations::prelude::{RotationTrait, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// Linear polarization Stokes parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stokes {
    pub q: f64,
    pub u: f64,
}

impl Stokes {
    pub fn new(q: f64, u: f64) -> Self {
        Self { q, u }
    }

    /// Re-expresses detector frame Stokes parameters relative to celestial north, given the
    /// position angle `pa` (radians) of the detector reference axis.
    pub fn to_sky(&self, pa: f64) -> Stokes {
        let (sin_2pa, cos_2pa) = (2.0 * pa).sin_cos();
        Stokes {
            q: -(self.q * cos_2pa + self.u * sin_2pa),
            u: self.u * cos_2pa - self.q * sin_2pa,
        }
    }

    /// Rotates detector frame Stokes parameters into the sky frame.
    ///
    /// The detector +y axis is carried to the sky by `q_dj` and the position angle of that
    /// direction is measured from `target`.
    ///
    /// # Arguments
    ///
    /// * `target` - Origin of the position angle.
    /// * `q_dj` - Detector to inertial rotation for the event.
    pub fn rotate_to_sky(
        &self,
        target: &RaDec,
        q_dj: &UnitQuaternion,
    ) -> Result<Stokes, CelestialErrors> {
        let reference = RaDec::try_from(&q_dj.rotate(&Vector3::y()))?;
        Ok(self.to_sky(target.position_angle(&reference)))
    }
}
