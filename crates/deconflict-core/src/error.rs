//! Validation errors and non-fatal input warnings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected input. Raised by trajectory computation and analysis entry points;
/// no partial trajectory or report is produced alongside one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("mission '{mission_id}' has no waypoints")]
    EmptyMission { mission_id: String },

    #[error("mission '{mission_id}' window is invalid: end_time {end_time} must be after start_time {start_time}")]
    InvalidWindow {
        mission_id: String,
        start_time: f64,
        end_time: f64,
    },

    #[error("mission '{mission_id}' waypoint {index} has a non-finite coordinate or time")]
    NonFiniteWaypoint { mission_id: String, index: usize },

    #[error("mission '{mission_id}' waypoint {index} has time {time} earlier than the previous waypoint ({previous})")]
    NonMonotonicTime {
        mission_id: String,
        index: usize,
        time: f64,
        previous: f64,
    },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("safety buffer must be positive and finite, got {0}")]
    InvalidSafetyBuffer(f64),

    #[error("temporal window must be a positive number of time steps, got {0}")]
    InvalidTemporalWindow(f64),

    #[error("smoothing factor must be within [0, 1], got {0}")]
    InvalidSmoothingFactor(f64),
}

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Degenerate but accepted input, handled by a documented fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegenerateInput {
    /// Only one waypoint: the aircraft holds that position for the whole window.
    SingleWaypoint,
    /// Waypoint `index` shares its time with waypoint `index - 1`; the position jumps.
    ZeroDurationSegment { index: usize },
    /// Mission window shorter than a minute.
    ShortWindow { duration_s: f64 },
    /// Mission window longer than an hour.
    LongWindow { duration_s: f64 },
}

pub(crate) fn check_time_step(time_step: f64) -> Result<()> {
    if time_step.is_finite() && time_step > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimeStep(time_step))
    }
}

pub(crate) fn check_safety_buffer(safety_buffer: f64) -> Result<()> {
    if safety_buffer.is_finite() && safety_buffer > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidSafetyBuffer(safety_buffer))
    }
}

pub(crate) fn check_temporal_window(steps: f64) -> Result<()> {
    if steps.is_finite() && steps > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidTemporalWindow(steps))
    }
}
