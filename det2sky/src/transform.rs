use crate::{
    AspectErrors,
    config::AspectConfig,
    events::EventRecord,
    result::{EventSolution, TransformResult},
    telescope::TelescopeDefinition,
};
use attitude::prelude::{Assignment, AttitudeSources};
use celestial::prelude::{LinearPixelMap, PixelIndexMap, RaDec, Stokes, TangentPlaneProjector};
use rayon::prelude::*;
use rotations::prelude::RotationTrait;
use tracing::{debug, info};

/// Carries detector frame events onto the sky using a set of attitude sources.
#[derive(Debug, Clone)]
pub struct AspectCorrection {
    telescope: TelescopeDefinition,
    sources: AttitudeSources,
    config: AspectConfig,
    projector: TangentPlaneProjector,
}

impl AspectCorrection {
    /// Creates a new `AspectCorrection`.
    ///
    /// The attitude sources should have been built with `config.attitude`.
    ///
    /// # Errors
    ///
    /// Fails when the telescope definition or the configuration is invalid.
    pub fn new(
        telescope: TelescopeDefinition,
        sources: AttitudeSources,
        config: AspectConfig,
    ) -> Result<Self, AspectErrors> {
        telescope.validate()?;
        config.validate()?;
        let projector = TangentPlaneProjector::new(sources.target(), config.view, config.places);
        Ok(Self { telescope, sources, config, projector })
    }

    pub fn target(&self) -> RaDec {
        self.projector.target
    }

    /// The constant plate scale pixel map described by the telescope definition.
    pub fn pixel_map(&self) -> Result<LinearPixelMap, AspectErrors> {
        self.telescope.pixel_map(&self.config.view)
    }

    /// Aspect corrects every event.
    ///
    /// Excluded events and events no attitude source covers are left unfilled. Attitude
    /// sources are resolved newest first in a single pass, then the per-event geometry runs
    /// in parallel.
    ///
    /// # Arguments
    ///
    /// * `events` - The event table.
    /// * `pixel_map` - Converts tangent plane degrees to sky view pixels.
    pub fn run<P>(&self, events: &[EventRecord], pixel_map: &P) -> TransformResult
    where
        P: PixelIndexMap + Sync + ?Sized,
    {
        let times: Vec<Option<f64>> = events
            .iter()
            .map(|e| (!e.is_excluded()).then_some(e.time))
            .collect();
        let excluded = times.iter().filter(|t| t.is_none()).count();

        let assignments = self.sources.assign(&times);

        let solutions: Vec<(usize, EventSolution)> = events
            .par_iter()
            .zip(assignments.par_iter())
            .enumerate()
            .filter_map(|(index, (event, assignment))| {
                let assignment = assignment.as_ref()?;
                match self.solve(event, assignment, pixel_map) {
                    Ok(solution) => Some((index, solution)),
                    Err(e) => {
                        debug!(index, "event left unfilled: {e}");
                        None
                    }
                }
            })
            .collect();

        let mut result = TransformResult::new(events.len(), self.config.spacecraft);
        result.set_excluded(excluded);
        for (index, solution) in solutions {
            let written = result.fill(index, solution);
            debug_assert!(written, "event {index} solved twice");
        }

        let summary = result.summary();
        info!(
            filled = summary.filled,
            excluded = summary.excluded,
            total = summary.total,
            "aspect correction complete: {summary}"
        );
        result
    }

    /// Computes sky position, spacecraft components and sky Stokes parameters of one event
    /// with the attitude it was assigned.
    pub fn solve<P>(
        &self,
        event: &EventRecord,
        assignment: &Assignment,
        pixel_map: &P,
    ) -> Result<EventSolution, AspectErrors>
    where
        P: PixelIndexMap + ?Sized,
    {
        let solution = &assignment.solution;
        let direction = self.telescope.detector_direction(event.abs_x, event.abs_y)?;

        let sky = RaDec::try_from(&solution.q_dj.rotate(&direction))?;
        let (x, y) = self.projector.project(pixel_map, &sky);

        let spacecraft = if self.config.spacecraft {
            solution.q_js.map(|q_js| {
                let sc = q_js.rotate(&direction);
                (sc[0], sc[1])
            })
        } else {
            None
        };

        let stokes = Stokes::new(event.detq, event.detu)
            .rotate_to_sky(&self.target(), &solution.q_dj)?;

        Ok(EventSolution { x, y, stokes, spacecraft, source: assignment.source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::StatusFlags;
    use approx::assert_abs_diff_eq;
    use attitude::prelude::{AttitudeConfig, AttitudeSample, AttitudeSource};
    use chrono::NaiveDateTime;
    use nalgebra::Vector3;
    use rotations::prelude::{Quaternion, UnitQuaternion};
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-9;

    fn telescope() -> TelescopeDefinition {
        TelescopeDefinition {
            x_flip: 1,
            y_flip: 1,
            focal_length: 4000.0,
            det_scale_x: 0.05,
            det_scale_y: 0.05,
            sky_scale_x: 1e-3,
            sky_scale_y: 1e-3,
        }
    }

    fn date(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    // points the detector boresight (+z) at ra = 0, dec = 0
    fn boresight() -> Quaternion {
        UnitQuaternion::from_axis_angle(&Vector3::y(), FRAC_PI_2)
            .unwrap()
            .0
    }

    fn source(
        name: &str,
        recency: &str,
        times: &[f64],
        q_dj: Quaternion,
        config: &AttitudeConfig,
    ) -> AttitudeSource {
        let identity = Quaternion::IDENTITY;
        let samples = times
            .iter()
            .map(|&t| AttitudeSample::new(t, q_dj, identity, identity))
            .collect();
        AttitudeSource::new(name, date(recency), (0.0, 0.0), samples, config)
    }

    fn event(time: f64) -> EventRecord {
        EventRecord {
            time,
            abs_x: 0.0,
            abs_y: 0.0,
            status: StatusFlags(0),
            status2: StatusFlags(0),
            detq: 0.3,
            detu: 0.1,
        }
    }

    fn correction(sources: Vec<AttitudeSource>, config: AspectConfig) -> AspectCorrection {
        AspectCorrection::new(telescope(), AttitudeSources::new(sources).unwrap(), config).unwrap()
    }

    #[test]
    fn test_on_axis_event() {
        let config = AspectConfig::default();
        let c = correction(
            vec![source("a", "2022-01-01 00:00:00", &[0.0, 0.1], boresight(), &config.attitude)],
            config,
        );
        let result = c.run(&[event(0.05)], &c.pixel_map().unwrap());
        let s = result.get(0).unwrap();

        assert_abs_diff_eq!(s.x, 299.0, epsilon = TOL);
        assert_abs_diff_eq!(s.y, 299.0, epsilon = TOL);
        // detector +y stays on the equator at ra = 90 deg, position angle 90 deg
        assert_abs_diff_eq!(s.stokes.q, 0.3, epsilon = TOL);
        assert_abs_diff_eq!(s.stokes.u, -0.1, epsilon = TOL);
        assert!(s.spacecraft.is_none());
        assert!(result.scx().is_none());
    }

    #[test]
    fn test_gaps_leave_events_unfilled() {
        let config = AspectConfig::default();
        let times = [0.0, 1.0, 10.0];
        let s = source("a", "2022-01-01 00:00:00", &times, boresight(), &config.attitude);
        assert_eq!(s.resolvers().len(), 3);

        let c = correction(vec![s], config);
        let result = c.run(&[event(0.0), event(1.0), event(5.0)], &c.pixel_map().unwrap());

        assert!(result.get(0).is_some());
        assert!(result.get(1).is_some());
        assert!(result.get(2).is_none());
        assert!(result.x()[2].is_nan() && result.q()[2].is_nan());
        assert_eq!(result.summary().filled, 2);
    }

    #[test]
    fn test_wide_tolerance_intervals() {
        let mut config = AspectConfig::default();
        config.attitude = AttitudeConfig { gap_tolerance: 2.0, ..config.attitude };
        let times = [0.0, 1.0, 10.0];
        let s = source("a", "2022-01-01 00:00:00", &times, boresight(), &config.attitude);

        let windows: Vec<(f64, f64)> = s.resolvers().iter().map(|r| (r.start, r.stop)).collect();
        assert_eq!(windows, vec![(0.0, 1.0), (10.0, 10.0)]);

        let c = correction(vec![s], config);
        let result = c.run(&[event(0.0), event(1.0), event(5.0)], &c.pixel_map().unwrap());
        assert_eq!(result.summary().filled, 2);
        assert!(result.get(2).is_none());
    }

    #[test]
    fn test_status_masking() {
        let config = AspectConfig::default();
        let c = correction(
            vec![source("a", "2022-01-01 00:00:00", &[0.0, 0.1], boresight(), &config.attitude)],
            config,
        );
        let events = [
            EventRecord { status2: StatusFlags(1), ..event(0.0) },
            EventRecord { status2: StatusFlags(1 << 1), ..event(0.0) },
            EventRecord { status: StatusFlags(1 << 4), ..event(0.0) },
        ];
        let result = c.run(&events, &c.pixel_map().unwrap());

        assert!(result.get(0).is_none());
        assert!(result.get(1).is_some());
        assert!(result.get(2).is_none());
        assert_eq!(
            result.summary(),
            crate::result::FillSummary { filled: 1, excluded: 2, total: 3 }
        );
    }

    #[test]
    fn test_recent_source_wins() {
        let config = AspectConfig::default();
        // the older source points 0.1 deg further east
        let offset = UnitQuaternion::from_axis_angle(&Vector3::z(), 0.1f64.to_radians()).unwrap();
        let older_q = (UnitQuaternion(boresight()) * offset).0;

        let attitude = &config.attitude;
        let recent_times = [5.0, 5.1, 5.2];
        let older_times = [0.0, 0.1, 5.0, 5.1, 5.2, 9.0];
        let recent = source("recent", "2022-06-01 00:00:00", &recent_times, boresight(), attitude);
        let older = source("older", "2022-01-01 00:00:00", &older_times, older_q, attitude);
        let c = correction(vec![older, recent], config);

        let result = c.run(&[event(0.05), event(5.1), event(9.0)], &c.pixel_map().unwrap());

        let winners: Vec<usize> = (0..3).map(|i| result.get(i).unwrap().source).collect();
        assert_eq!(winners, vec![1, 0, 1]);

        assert_abs_diff_eq!(result.get(1).unwrap().x, 299.0, epsilon = TOL);
        // 0.1 deg east at 1e-3 deg per pixel, mirrored to the left
        assert_abs_diff_eq!(result.get(0).unwrap().x, 199.0, epsilon = 1e-3);
    }

    #[test]
    fn test_degenerate_recent_source_falls_back() {
        let config = AspectConfig::default();
        let zero = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        let recent = source("recent", "2022-06-01 00:00:00", &[0.0, 0.1], zero, &config.attitude);
        let attitude = &config.attitude;
        let older = source("older", "2022-01-01 00:00:00", &[0.0, 0.1], boresight(), attitude);
        let c = correction(vec![recent, older], config);

        let result = c.run(&[event(0.0)], &c.pixel_map().unwrap());
        assert_eq!(result.get(0).unwrap().source, 1);
    }

    #[test]
    fn test_spacecraft_output() {
        let config = AspectConfig { spacecraft: true, ..AspectConfig::default() };
        let c = correction(
            vec![source("a", "2022-01-01 00:00:00", &[0.0], boresight(), &config.attitude)],
            config,
        );
        let events = [EventRecord { abs_x: 1.0, ..event(0.0) }];
        let result = c.run(&events, &c.pixel_map().unwrap());

        // identity star tracker quaternion leaves the detector vector as is
        let scx = result.scx().unwrap();
        let scy = result.scy().unwrap();
        assert_abs_diff_eq!(scx[0], -1.0 / (1.0f64 + 4000.0 * 4000.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(scy[0], 0.0, epsilon = 1e-12);
    }
}
