use nalgebra::Vector3;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum VectorErrors {
    #[error("cannot normalize a zero length vector")]
    ZeroMagnitude,
    #[error("got non-finite vector component")]
    NonFinite,
}

/// Returns the unit vector along `v`.
///
/// # Errors
///
/// `VectorErrors::ZeroMagnitude` when `v` has no length, `VectorErrors::NonFinite` when any
/// component is NaN or infinite.
pub fn normalize_vector(v: &Vector3<f64>) -> Result<Vector3<f64>, VectorErrors> {
    let mag = v.norm();
    if !mag.is_finite() {
        return Err(VectorErrors::NonFinite);
    }
    if mag < f64::EPSILON {
        return Err(VectorErrors::ZeroMagnitude);
    }
    Ok(v / mag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    const TOL: f64 = 1e-12;

    #[test]
    fn test_normalize_vector() {
        let v = normalize_vector(&Vector3::new(3.0, 0.0, 4.0)).unwrap();
        assert_abs_diff_eq!(v[0], 0.6, epsilon = TOL);
        assert_abs_diff_eq!(v[2], 0.8, epsilon = TOL);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(
            normalize_vector(&Vector3::zeros()),
            Err(VectorErrors::ZeroMagnitude)
        );
        assert_eq!(
            normalize_vector(&Vector3::new(f64::INFINITY, 0.0, 0.0)),
            Err(VectorErrors::NonFinite)
        );
    }
}
