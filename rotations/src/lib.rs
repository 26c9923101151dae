//! Rotation algebra for attitude data: raw and unit quaternions, and vector normalization.

pub mod quaternion;
pub mod vector;

use nalgebra::Vector3;

pub mod prelude {
    pub use crate::quaternion::*;
    pub use crate::vector::*;
    pub use crate::RotationTrait;
}

/// A 3D rotation that can be applied to vectors, inverted and composed with the identity.
pub trait RotationTrait {
    /// Rotates `v` actively: the vector moves, the frame stays fixed.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector, with the same norm as `v`.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64>;

    fn inv(&self) -> Self;

    fn identity() -> Self;
}
