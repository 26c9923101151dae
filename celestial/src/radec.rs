use crate::CelestialErrors;
use nalgebra::Vector3;
use rotations::prelude::normalize_vector;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// A direction on the celestial sphere.
/// `ra` is in [0, 2pi) and `dec` in [-pi/2, pi/2], both radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaDec {
    pub ra: f64,
    pub dec: f64,
}

impl RaDec {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Creates a new `RaDec` from angles given in degrees.
    pub fn from_degrees(ra: f64, dec: f64) -> Self {
        Self::new(ra.to_radians(), dec.to_radians())
    }

    /// Returns `(ra, dec)` in degrees.
    pub fn to_degrees(&self) -> (f64, f64) {
        (self.ra.to_degrees(), self.dec.to_degrees())
    }

    /// Unit vector pointing along the direction in the inertial frame.
    pub fn to_unit_vector(&self) -> Vector3<f64> {
        let (sin_ra, cos_ra) = self.ra.sin_cos();
        let (sin_dec, cos_dec) = self.dec.sin_cos();
        Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
    }

    /// Great-circle position angle of `other` as seen from `self`, measured from north
    /// through east.
    ///
    /// # Arguments
    ///
    /// * `other` - The direction the angle points to.
    ///
    /// # Returns
    ///
    /// The position angle in radians, in [0, 2pi).
    pub fn position_angle(&self, other: &RaDec) -> f64 {
        let delta_ra = other.ra - self.ra;
        let cos_dec2 = other.dec.cos();
        let x = other.dec.sin() * self.dec.cos() - cos_dec2 * self.dec.sin() * delta_ra.cos();
        let y = delta_ra.sin() * cos_dec2;
        wrap_two_pi(y.atan2(x))
    }
}

impl TryFrom<&Vector3<f64>> for RaDec {
    type Error = CelestialErrors;

    /// Converts an inertial vector to right ascension and declination.
    /// The vector does not need to be normalized.
    fn try_from(v: &Vector3<f64>) -> Result<Self, CelestialErrors> {
        let u = normalize_vector(v)?;
        let ra = wrap_two_pi(u[1].atan2(u[0]));
        let dec = u[2].clamp(-1.0, 1.0).asin();
        Ok(Self { ra, dec })
    }
}

fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}
