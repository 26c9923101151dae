use super::*;
use nalgebra::Vector3;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::ops::Mul;
use thiserror::Error;

/// Raw quaternion as read from an attitude table, scalar last.
/// Nothing guarantees unit magnitude; convert to `UnitQuaternion` before rotating.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

#[derive(Debug, Clone, Error, Copy, PartialEq)]
pub enum QuaternionErrors {
    #[error("got zero magnitude quaternion")]
    ZeroMagnitude,
    #[error("got non-finite quaternion component")]
    NonFinite,
}

impl Quaternion {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Vector part `(x, y, z)`.
    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Conjugate. Equal to the inverse only for unit quaternions.
    pub fn inv(&self) -> Quaternion {
        Quaternion::new(-self.x, -self.y, -self.z, self.w)
    }

    pub fn mag(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Scales to unit magnitude.
    ///
    /// # Errors
    ///
    /// `NonFinite` if any component is NaN or infinite, `ZeroMagnitude` if the magnitude is
    /// below `f64::EPSILON`.
    pub fn normalize(&self) -> Result<Self, QuaternionErrors> {
        let mag = self.mag();
        if !mag.is_finite() {
            return Err(QuaternionErrors::NonFinite);
        }
        if mag < f64::EPSILON {
            return Err(QuaternionErrors::ZeroMagnitude);
        }
        let inv_mag = 1.0 / mag;
        Ok(Quaternion::new(
            self.x * inv_mag,
            self.y * inv_mag,
            self.z * inv_mag,
            self.w * inv_mag,
        ))
    }
}

/// A rotation, stored as a quaternion of unit magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitQuaternion(pub Quaternion);

impl UnitQuaternion {
    pub const IDENTITY: Self = Self(Quaternion::IDENTITY);

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Result<Self, QuaternionErrors> {
        Self::try_from(&Quaternion::new(x, y, z, w))
    }

    /// Uniformly distributed random rotation (Shoemake's subgroup algorithm).
    pub fn rand() -> Self {
        let mut rng = rng();
        let u1: f64 = rng.random();
        let (s2, c2) = (TAU * rng.random::<f64>()).sin_cos();
        let (s3, c3) = (TAU * rng.random::<f64>()).sin_cos();
        let a = (1.0 - u1).sqrt();
        let b = u1.sqrt();
        Self(Quaternion::new(a * s2, a * c2, b * s3, b * c3))
    }

    /// Rotation of `angle` radians about `axis`, right handed.
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Result<Self, QuaternionErrors> {
        let (s, c) = (0.5 * angle).sin_cos();
        UnitQuaternion::new(axis[0] * s, axis[1] * s, axis[2] * s, c)
    }
}

impl TryFrom<&Quaternion> for UnitQuaternion {
    type Error = QuaternionErrors;
    fn try_from(value: &Quaternion) -> Result<Self, QuaternionErrors> {
        Ok(Self(value.normalize()?))
    }
}

impl RotationTrait for UnitQuaternion {
    /// Active rotation `q v q*`, evaluated as
    /// `v + 2w (r × v) + 2 r × (r × v)` with `r` the vector part.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let r = self.0.vector();
        let t = 2.0 * r.cross(v);
        v + self.0.w * t + r.cross(&t)
    }

    fn inv(&self) -> Self {
        UnitQuaternion(self.0.inv())
    }

    fn identity() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;

    /// Composition in the "x" product convention: rotating by `a * b` applies `a`, then `b`.
    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self.vector(), rhs.vector());
        let v = self.w * b + rhs.w * a - a.cross(&b);
        Self::new(v[0], v[1], v[2], self.w * rhs.w - a.dot(&b))
    }
}

impl Mul<UnitQuaternion> for UnitQuaternion {
    type Output = Self;
    fn mul(self, rhs: UnitQuaternion) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl fmt::Debug for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quaternion [{:.6}, {:.6}, {:.6}; {:.6}]",
            self.x, self.y, self.z, self.w
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;
    const TOL: f64 = 1e-12;

    fn random_vector(rng: &mut impl Rng) -> Vector3<f64> {
        Vector3::new(
            rng.random_range(-10.0..10.0),
            rng.random_range(-10.0..10.0),
            rng.random_range(-10.0..10.0),
        )
    }

    #[test]
    fn test_quaternion_normalization() {
        let qn = UnitQuaternion::new(1.0, 2.0, 3.0, 4.0).unwrap();

        assert_abs_diff_eq!(qn.0.x, 0.18257418583505536, epsilon = TOL);
        assert_abs_diff_eq!(qn.0.y, 0.3651483716701107, epsilon = TOL);
        assert_abs_diff_eq!(qn.0.z, 0.5477225575051661, epsilon = TOL);
        assert_abs_diff_eq!(qn.0.w, 0.7302967433402214, epsilon = TOL);
    }

    #[test]
    fn test_degenerate_quaternion() {
        assert_eq!(
            UnitQuaternion::new(0.0, 0.0, 0.0, 0.0),
            Err(QuaternionErrors::ZeroMagnitude)
        );
        assert_eq!(
            UnitQuaternion::try_from(&Quaternion::new(f64::NAN, 0.0, 0.0, 1.0)),
            Err(QuaternionErrors::NonFinite)
        );
    }

    #[test]
    fn test_rotate_about_z() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::z(), PI / 2.0).unwrap();
        let v = q.rotate(&Vector3::x());

        assert_abs_diff_eq!(v[0], 0.0, epsilon = TOL);
        assert_abs_diff_eq!(v[1], 1.0, epsilon = TOL);
        assert_abs_diff_eq!(v[2], 0.0, epsilon = TOL);

        let v = UnitQuaternion::identity().rotate(&Vector3::x());
        assert_abs_diff_eq!(v[0], 1.0, epsilon = TOL);
    }

    #[test]
    fn test_composition_order() {
        let a = UnitQuaternion::from_axis_angle(&Vector3::z(), PI / 2.0).unwrap();
        let b = UnitQuaternion::from_axis_angle(&Vector3::x(), PI / 2.0).unwrap();

        // x -> y by a, then y -> z by b
        let v = (a * b).rotate(&Vector3::x());
        assert_abs_diff_eq!(v[0], 0.0, epsilon = TOL);
        assert_abs_diff_eq!(v[1], 0.0, epsilon = TOL);
        assert_abs_diff_eq!(v[2], 1.0, epsilon = TOL);
    }

    #[test]
    fn test_random_rotations_are_unit() {
        for _ in 0..1000 {
            assert_abs_diff_eq!(UnitQuaternion::rand().0.mag(), 1.0, epsilon = TOL);
        }
    }

    #[test]
    fn test_rotation_preserves_norm() {
        let mut rng = rng();
        for _ in 0..1000 {
            let q = UnitQuaternion::rand();
            let v = random_vector(&mut rng);
            assert_abs_diff_eq!(q.rotate(&v).norm(), v.norm(), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_rotate_inverse_round_trip() {
        let mut rng = rng();
        for _ in 0..1000 {
            let q = UnitQuaternion::rand();
            let v = random_vector(&mut rng);
            let back = q.inv().rotate(&q.rotate(&v));
            assert_abs_diff_eq!(back[0], v[0], epsilon = 1e-10);
            assert_abs_diff_eq!(back[1], v[1], epsilon = 1e-10);
            assert_abs_diff_eq!(back[2], v[2], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_inverse_composes_to_identity() {
        let q = UnitQuaternion::new(1.0, 2.0, 3.0, 4.0).unwrap();
        let inv = q.inv();
        assert_abs_diff_eq!(inv.0.w, q.0.w, epsilon = TOL);
        assert_abs_diff_eq!(inv.0.x, -q.0.x, epsilon = TOL);

        let identity = q * inv;
        assert_abs_diff_eq!(identity.0.w.abs(), 1.0, epsilon = TOL);
        assert_abs_diff_eq!(identity.0.vector().norm(), 0.0, epsilon = TOL);
    }
}
