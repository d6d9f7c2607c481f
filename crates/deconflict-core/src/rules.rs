//! Analysis parameters and their defaults.

use crate::error::{check_safety_buffer, check_temporal_window, check_time_step, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAFETY_BUFFER_M: f64 = 50.0;
pub const DEFAULT_TIME_STEP_S: f64 = 5.0;
pub const DEFAULT_TEMPORAL_WINDOW_STEPS: f64 = 20.0;

/// Configuration for one analysis run.
///
/// Passed explicitly by the caller; nothing here is process-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum acceptable 3D separation in meters
    pub safety_buffer_m: f64,
    /// Sampling resolution for trajectories and conflict scanning, seconds
    pub time_step_s: f64,
    /// How far apart in time (in multiples of `time_step_s`) two occupancies
    /// of the same neighborhood may be and still count as corridor reuse
    pub temporal_window_steps: f64,
    /// Whether corridor reuse (temporal) conflicts are reported at all
    pub detect_temporal: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            safety_buffer_m: DEFAULT_SAFETY_BUFFER_M,
            time_step_s: DEFAULT_TIME_STEP_S,
            temporal_window_steps: DEFAULT_TEMPORAL_WINDOW_STEPS,
            detect_temporal: true,
        }
    }
}

impl EngineConfig {
    pub fn with_safety_buffer(mut self, safety_buffer_m: f64) -> Self {
        self.safety_buffer_m = safety_buffer_m;
        self
    }

    pub fn with_time_step(mut self, time_step_s: f64) -> Self {
        self.time_step_s = time_step_s;
        self
    }

    pub fn with_temporal_window_steps(mut self, steps: f64) -> Self {
        self.temporal_window_steps = steps;
        self
    }

    /// Temporal reuse window in seconds.
    pub fn temporal_window_s(&self) -> f64 {
        self.temporal_window_steps * self.time_step_s
    }

    pub fn validate(&self) -> Result<()> {
        check_safety_buffer(self.safety_buffer_m)?;
        check_time_step(self.time_step_s)?;
        check_temporal_window(self.temporal_window_steps)
    }
}
