use crate::{AttitudeConfig, resolver::TimeResolver, sample::AttitudeSample, vti::segment_vtis};
use celestial::prelude::RaDec;
use chrono::NaiveDateTime;
use rotations::prelude::{RotationTrait, UnitQuaternion};
use tracing::{debug, warn};

/// The orientation found for one event time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeSolution {
    /// row of the attitude table the solution came from
    pub sample_index: usize,
    /// detector to inertial
    pub q_dj: UnitQuaternion,
    /// inertial to star tracker, absent when both star tracker channels are degenerate
    pub q_js: Option<UnitQuaternion>,
}

/// One attitude history with its valid time intervals resolved up front.
#[derive(Debug, Clone)]
pub struct AttitudeSource {
    pub name: String,
    pub recency: NaiveDateTime,
    target_degrees: (f64, f64),
    samples: Vec<AttitudeSample>,
    resolvers: Vec<TimeResolver>,
}

impl AttitudeSource {
    /// Creates a new `AttitudeSource`, segmenting the samples into valid time intervals.
    /// Intervals that cannot be resolved are dropped.
    ///
    /// # Arguments
    ///
    /// * `name` - Used in log messages and errors.
    /// * `recency` - Creation date of the source, newer sources take precedence.
    /// * `target_degrees` - Pointing target `(ra, dec)` in degrees.
    /// * `samples` - The attitude table, ordered by time.
    /// * `config` - Gap tolerance and window slack.
    pub fn new(
        name: impl Into<String>,
        recency: NaiveDateTime,
        target_degrees: (f64, f64),
        samples: Vec<AttitudeSample>,
        config: &AttitudeConfig,
    ) -> Self {
        let name = name.into();
        let resolvers = if samples.is_empty() {
            warn!(source = %name, "attitude source has no samples");
            Vec::new()
        } else {
            let times: Vec<f64> = samples.iter().map(|s| s.time).collect();
            segment_vtis(&times, config.gap_tolerance)
                .iter()
                .filter_map(|window| {
                    match TimeResolver::new(&times, window, config.window_slack) {
                        Ok(resolver) => Some(resolver),
                        Err(e) => {
                            warn!(source = %name, "dropping valid time interval: {e}");
                            None
                        }
                    }
                })
                .collect()
        };
        debug!(
            source = %name,
            samples = samples.len(),
            intervals = resolvers.len(),
            "attitude source segmented"
        );

        Self { name, recency, target_degrees, samples, resolvers }
    }

    /// Pointing target `(ra, dec)` in degrees, as given.
    pub fn target_degrees(&self) -> (f64, f64) {
        self.target_degrees
    }

    pub fn target(&self) -> RaDec {
        RaDec::from_degrees(self.target_degrees.0, self.target_degrees.1)
    }

    pub fn samples(&self) -> &[AttitudeSample] {
        &self.samples
    }

    pub fn resolvers(&self) -> &[TimeResolver] {
        &self.resolvers
    }

    /// Finds the orientation at time `t`.
    ///
    /// The first interval accepting `t` decides. If the detector quaternion of the resolved
    /// sample is degenerate the source has no solution for `t`; later intervals are not tried.
    /// The star tracker quaternion comes from tracker 1, falling back to tracker 2.
    pub fn lookup(&self, t: f64) -> Option<AttitudeSolution> {
        let sample_index = self.resolvers.iter().find(|r| r.accepts(t))?.resolve(t)?;
        let sample = &self.samples[sample_index];

        let q_dj = UnitQuaternion::try_from(&sample.q_dj).ok()?;
        let q_js = UnitQuaternion::try_from(&sample.q_sj_st1)
            .or_else(|_| UnitQuaternion::try_from(&sample.q_sj_st2))
            .ok()
            .map(|q| q.inv());

        Some(AttitudeSolution { sample_index, q_dj, q_js })
    }
}
