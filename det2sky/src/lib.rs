//! Aspect correction of photon events: detector positions and Stokes parameters are carried
//! into sky tangent plane pixels and celestial-north referenced Stokes parameters using the
//! attitude history of the observatory.

pub mod config;
pub mod events;
pub mod io;
pub mod result;
pub mod telescope;
pub mod transform;

use attitude::AttitudeErrors;
use celestial::CelestialErrors;
use rotations::prelude::VectorErrors;
use std::path::PathBuf;
use thiserror::Error;

pub mod prelude {
    pub use crate::AspectErrors;
    pub use crate::config::*;
    pub use crate::events::*;
    pub use crate::io::*;
    pub use crate::result::*;
    pub use crate::telescope::*;
    pub use crate::transform::*;
}

#[derive(Debug, Error)]
pub enum AspectErrors {
    #[error("AttitudeError: {0}")]
    AttitudeError(#[from] AttitudeErrors),
    #[error("CelestialError: {0}")]
    CelestialError(#[from] CelestialErrors),
    #[error("VectorError: {0}")]
    VectorError(#[from] VectorErrors),
    #[error("required column '{0}' is missing from the event table")]
    MissingColumn(String),
    #[error("column '{name}' should hold {expected} values")]
    ColumnKind { name: String, expected: &'static str },
    #[error("column '{name}' has {found} rows, expected {expected}")]
    ColumnLength { name: String, expected: usize, found: usize },
    #[error("could not parse '{value}' in column '{column}' at row {row}")]
    ParseValue { column: String, row: usize, value: String },
    #[error("invalid telescope definition: {0}")]
    InvalidTelescope(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("output file '{0}' already exists")]
    OutputExists(PathBuf),
    #[error("RonError: {0}")]
    RonError(#[from] ron::error::SpannedError),
    #[error("CsvError: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),
}
