//! Sky-frame geometry for aspect correction: directions as right ascension/declination,
//! position angles, the gnomonic tangent plane and Stokes parameter rotation.

pub mod radec;
pub mod stokes;
pub mod tangent_plane;

use rotations::prelude::VectorErrors;
use thiserror::Error;

pub mod prelude {
    pub use crate::CelestialErrors;
    pub use crate::radec::*;
    pub use crate::stokes::*;
    pub use crate::tangent_plane::*;
}

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum CelestialErrors {
    #[error("VectorError: {0}")]
    VectorError(#[from] VectorErrors),
    #[error("sky view must be at least 2x2 pixels, got {0}x{1}")]
    InvalidSkyView(u32, u32),
    #[error("sky scale must be positive and finite, got {0}")]
    InvalidSkyScale(f64),
}
