use crate::{
    AttitudeErrors,
    source::{AttitudeSolution, AttitudeSource},
};
use celestial::prelude::RaDec;
use tracing::debug;

/// The source that won an event and what it resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    /// position of the winning source in most-recent-first order
    pub source: usize,
    pub solution: AttitudeSolution,
}

/// Attitude sources ordered most recent first, all pointing at the same target.
#[derive(Debug, Clone)]
pub struct AttitudeSources {
    sources: Vec<AttitudeSource>,
    target: RaDec,
}

impl AttitudeSources {
    /// Orders the sources by descending recency and checks they share one target.
    ///
    /// # Errors
    ///
    /// `AttitudeErrors::NoSources` for an empty list, `AttitudeErrors::TargetMismatch` when any
    /// source's target differs from the most recent one.
    pub fn new(mut sources: Vec<AttitudeSource>) -> Result<Self, AttitudeErrors> {
        sources.sort_by(|a, b| b.recency.cmp(&a.recency));

        let first = sources.first().ok_or(AttitudeErrors::NoSources)?;
        let expected = first.target_degrees();
        let target = first.target();

        if let Some(other) = sources.iter().find(|s| s.target_degrees() != expected) {
            return Err(AttitudeErrors::TargetMismatch {
                expected,
                found: other.target_degrees(),
                source_name: other.name.clone(),
            });
        }

        Ok(Self { sources, target })
    }

    pub fn target(&self) -> RaDec {
        self.target
    }

    /// Iterates most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &AttitudeSource> {
        self.sources.iter()
    }

    /// Assigns each event time to the most recent source that resolves it.
    ///
    /// Sources are walked newest to oldest over the whole table; a slot filled by one source
    /// is never looked at again by an older one. `None` entries in `times` are events excluded
    /// from correction and stay unassigned.
    pub fn assign(&self, times: &[Option<f64>]) -> Vec<Option<Assignment>> {
        let mut assignments: Vec<Option<Assignment>> = vec![None; times.len()];

        for (source, s) in self.sources.iter().enumerate() {
            let mut filled = 0usize;
            for (slot, time) in assignments.iter_mut().zip(times) {
                if slot.is_some() {
                    continue;
                }
                let Some(t) = time else {
                    continue;
                };
                if let Some(solution) = s.lookup(*t) {
                    *slot = Some(Assignment { source, solution });
                    filled += 1;
                }
            }
            debug!(source = %s.name, recency = %s.recency, filled, "attitude source pass");
        }

        assignments
    }
}
