use crate::{AttitudeErrors, vti::TimeWindow};

/// Nearest-sample lookup over one valid time interval of an attitude table.
///
/// Indices refer to the whole table the resolver was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeResolver {
    pub start: f64,
    pub stop: f64,
    pub start_index: usize,
    pub stop_index: usize,
    slack: f64,
    // midpoints between consecutive sample times in [start_index, stop_index]
    bounds: Vec<f64>,
}

impl TimeResolver {
    /// Builds the lookup for `window` over the sample `times`.
    ///
    /// The interval is widened to the first sample at or after `window.start` and the last
    /// sample at or before `window.stop`.
    ///
    /// # Arguments
    ///
    /// * `times` - All sample times of the attitude table.
    /// * `window` - The valid time interval to cover.
    /// * `slack` - How far outside the interval a query is still clamped onto it.
    ///
    /// # Errors
    ///
    /// `AttitudeErrors::Unresolvable` when no samples fall in the window, or the samples in it
    /// are not finite and non-decreasing.
    pub fn new(times: &[f64], window: &TimeWindow, slack: f64) -> Result<Self, AttitudeErrors> {
        let unresolvable = AttitudeErrors::Unresolvable { start: window.start, stop: window.stop };

        let start_index = times
            .iter()
            .position(|&t| t >= window.start)
            .ok_or(unresolvable.clone())?;
        let stop_index = times
            .iter()
            .rposition(|&t| t <= window.stop)
            .ok_or(unresolvable.clone())?;
        if start_index > stop_index {
            return Err(unresolvable);
        }

        let span = &times[start_index..=stop_index];
        if span.iter().any(|t| !t.is_finite()) || span.windows(2).any(|w| w[1] < w[0]) {
            return Err(unresolvable);
        }

        let bounds = span.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();

        Ok(Self {
            start: times[start_index],
            stop: times[stop_index],
            start_index,
            stop_index,
            slack,
            bounds,
        })
    }

    /// True when `t` is within the slack of the interval.
    pub fn accepts(&self, t: f64) -> bool {
        self.start - self.slack <= t && t <= self.stop + self.slack
    }

    /// Resolves a query time to a sample index.
    ///
    /// Times before the first sample clamp to `start_index`, times after the last to
    /// `stop_index`. Inside, the nearest sample wins and a time exactly halfway between two
    /// samples goes to the earlier one.
    ///
    /// # Returns
    ///
    /// `None` when `t` is outside `[start - slack, stop + slack]`.
    pub fn resolve(&self, t: f64) -> Option<usize> {
        if !self.accepts(t) {
            return None;
        }
        if t < self.start {
            return Some(self.start_index);
        }
        if t > self.stop {
            return Some(self.stop_index);
        }
        Some(self.start_index + self.bounds.partition_point(|&b| b < t))
    }
}
