use serde::{Deserialize, Serialize};

/// A valid time interval: the first and last sample time of a run of attitude samples with
/// no gap larger than the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub stop: f64,
}

impl TimeWindow {
    pub fn new(start: f64, stop: f64) -> Self {
        Self { start, stop }
    }
}

/// Splits time-ordered sample times into valid time intervals.
///
/// A difference greater than `t_delt` between consecutive samples closes the current
/// interval and opens a new one at the later sample. A single sample gives the degenerate
/// interval `(t, t)`.
///
/// # Arguments
///
/// * `times` - Sample times in increasing order. Callers must not pass an empty slice.
/// * `t_delt` - Largest allowed gap inside one interval.
pub fn segment_vtis(times: &[f64], t_delt: f64) -> Vec<TimeWindow> {
    let mut vtis = Vec::new();
    let Some((&first, rest)) = times.split_first() else {
        return vtis;
    };

    let mut start = first;
    let mut stop = first;
    for &time in rest {
        if time - stop > t_delt {
            vtis.push(TimeWindow::new(start, stop));
            start = time;
        }
        stop = time;
    }
    vtis.push(TimeWindow::new(start, stop));
    vtis
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    #[test]
    fn test_single_sample() {
        assert_eq!(segment_vtis(&[4.0], 0.2), vec![TimeWindow::new(4.0, 4.0)]);
    }

    #[test]
    fn test_gap_splits_interval() {
        let vtis = segment_vtis(&[0.0, 1.0, 10.0], 0.2);
        assert_eq!(
            vtis,
            vec![
                TimeWindow::new(0.0, 0.0),
                TimeWindow::new(1.0, 1.0),
                TimeWindow::new(10.0, 10.0)
            ]
        );

        let vtis = segment_vtis(&[0.0, 0.1, 0.2, 0.3, 5.0, 5.1], 0.2);
        assert_eq!(vtis, vec![TimeWindow::new(0.0, 0.3), TimeWindow::new(5.0, 5.1)]);
    }

    #[test]
    fn test_gap_equal_to_tolerance_stays_together() {
        let vtis = segment_vtis(&[0.0, 0.25, 0.5], 0.25);
        assert_eq!(vtis, vec![TimeWindow::new(0.0, 0.5)]);
    }

    #[test]
    fn test_random_sequences_partition_samples() {
        let mut rng = SmallRng::seed_from_u64(7);
        let t_delt = 0.2;
        for _ in 0..200 {
            let n = rng.random_range(1..60);
            let mut t = rng.random_range(-100.0..100.0);
            let mut times = Vec::with_capacity(n);
            for _ in 0..n {
                times.push(t);
                t += if rng.random_bool(0.2) {
                    rng.random_range(0.21..5.0)
                } else {
                    rng.random_range(0.01..0.19)
                };
            }

            let vtis = segment_vtis(&times, t_delt);

            // every sample lands in exactly one interval
            for &time in &times {
                let hits = vtis
                    .iter()
                    .filter(|w| w.start <= time && time <= w.stop)
                    .count();
                assert_eq!(hits, 1);
            }

            // no gap larger than the tolerance inside an interval
            for w in &vtis {
                let inside: Vec<f64> = times
                    .iter()
                    .copied()
                    .filter(|&time| w.start <= time && time <= w.stop)
                    .collect();
                assert_eq!(inside.first(), Some(&w.start));
                assert_eq!(inside.last(), Some(&w.stop));
                assert!(inside.windows(2).all(|p| p[1] - p[0] <= t_delt));
            }

            // consecutive intervals are separated by more than the tolerance
            for pair in vtis.windows(2) {
                assert!(pair[1].start - pair[0].stop > t_delt);
            }
        }
    }
}
