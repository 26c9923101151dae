use celestial::prelude::Stokes;
use std::fmt;

/// Everything computed for one aspect corrected event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventSolution {
    /// sky view pixel coordinates
    pub x: f64,
    pub y: f64,
    /// Stokes parameters referenced to celestial north
    pub stokes: Stokes,
    /// spacecraft frame direction components, when requested and a star tracker
    /// quaternion was available
    pub spacecraft: Option<(f64, f64)>,
    /// most-recent-first position of the attitude source used
    pub source: usize,
}

/// Per-event output of a run. Each slot is written at most once; slots that were never
/// written come out as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    slots: Vec<Option<EventSolution>>,
    excluded: usize,
    spacecraft: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillSummary {
    pub filled: usize,
    pub excluded: usize,
    pub total: usize,
}

impl fmt::Display for FillSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} events filled ({} excluded by status)",
            self.filled, self.total, self.excluded
        )
    }
}

impl TransformResult {
    pub fn new(len: usize, spacecraft: bool) -> Self {
        Self { slots: vec![None; len], excluded: 0, spacecraft }
    }

    pub(crate) fn set_excluded(&mut self, excluded: usize) {
        self.excluded = excluded;
    }

    /// Writes the solution for event `index`.
    ///
    /// # Returns
    ///
    /// `false`, leaving the table untouched, if the slot is already filled or out of range.
    pub fn fill(&mut self, index: usize, solution: EventSolution) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(solution);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&EventSolution> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    pub fn summary(&self) -> FillSummary {
        FillSummary {
            filled: self.slots.iter().filter(|s| s.is_some()).count(),
            excluded: self.excluded,
            total: self.slots.len(),
        }
    }

    fn column(&self, value: impl Fn(&EventSolution) -> Option<f64>) -> Vec<f64> {
        self.slots
            .iter()
            .map(|s| s.as_ref().and_then(&value).unwrap_or(f64::NAN))
            .collect()
    }

    pub fn x(&self) -> Vec<f64> {
        self.column(|s| Some(s.x))
    }

    pub fn y(&self) -> Vec<f64> {
        self.column(|s| Some(s.y))
    }

    pub fn q(&self) -> Vec<f64> {
        self.column(|s| Some(s.stokes.q))
    }

    pub fn u(&self) -> Vec<f64> {
        self.column(|s| Some(s.stokes.u))
    }

    /// `None` unless spacecraft output was requested.
    pub fn scx(&self) -> Option<Vec<f64>> {
        self.spacecraft
            .then(|| self.column(|s| s.spacecraft.map(|sc| sc.0)))
    }

    /// `None` unless spacecraft output was requested.
    pub fn scy(&self) -> Option<Vec<f64>> {
        self.spacecraft
            .then(|| self.column(|s| s.spacecraft.map(|sc| sc.1)))
    }
}
