use rotations::prelude::Quaternion;
use serde::{Deserialize, Serialize};

/// One row of an attitude history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttitudeSample {
    pub time: f64,
    /// detector to inertial
    pub q_dj: Quaternion,
    /// star tracker 1 to inertial
    pub q_sj_st1: Quaternion,
    /// star tracker 2 to inertial
    pub q_sj_st2: Quaternion,
}

impl AttitudeSample {
    pub fn new(time: f64, q_dj: Quaternion, q_sj_st1: Quaternion, q_sj_st2: Quaternion) -> Self {
        Self { time, q_dj, q_sj_st1, q_sj_st2 }
    }
}
