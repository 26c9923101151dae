//! Attitude history handling: splitting attitude samples into valid time intervals,
//! resolving event times to samples, and merging several attitude sources by recency.

pub mod merger;
pub mod resolver;
pub mod sample;
pub mod source;
pub mod vti;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod prelude {
    pub use crate::merger::*;
    pub use crate::resolver::*;
    pub use crate::sample::*;
    pub use crate::source::*;
    pub use crate::vti::*;
    pub use crate::{AttitudeConfig, AttitudeErrors};
}

/// Largest gap between consecutive samples of one valid time interval.
pub const DEFAULT_GAP_TOLERANCE: f64 = 0.2;
/// Distance outside an interval's first and last sample at which it still accepts a query.
pub const DEFAULT_WINDOW_SLACK: f64 = 0.1;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AttitudeErrors {
    #[error("no attitude sources were provided")]
    NoSources,
    #[error(
        "attitude sources disagree on the target: expected (ra, dec) = ({}, {}) deg, found ({}, {}) deg in '{source_name}'",
        expected.0, expected.1, found.0, found.1
    )]
    TargetMismatch {
        expected: (f64, f64),
        found: (f64, f64),
        source_name: String,
    },
    #[error("no usable samples between {start} and {stop}")]
    Unresolvable { start: f64, stop: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttitudeConfig {
    pub gap_tolerance: f64,
    pub window_slack: f64,
}

impl Default for AttitudeConfig {
    fn default() -> Self {
        Self {
            gap_tolerance: DEFAULT_GAP_TOLERANCE,
            window_slack: DEFAULT_WINDOW_SLACK,
        }
    }
}
