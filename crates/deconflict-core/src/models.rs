//! Core data models: missions in, sampled trajectories out.

use crate::error::{DegenerateInput, Result, ValidationError};
use serde::{Deserialize, Serialize};

/// A point in the local airspace frame, meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A timed 3D point of a planned route. `t` is seconds from mission start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(alias = "time")]
    pub t: f64,
}

impl Waypoint {
    pub const fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }
}

/// One flight's intended path: ordered waypoints plus an operating window.
///
/// Construction validates the waypoint ordering and the window, so every
/// `Mission` in hand is safe to feed to the trajectory calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MissionSpec")]
pub struct Mission {
    mission_id: String,
    waypoints: Vec<Waypoint>,
    start_time: f64,
    end_time: f64,
}

/// Unvalidated wire shape of a [`Mission`].
#[derive(Debug, Clone, Deserialize)]
struct MissionSpec {
    #[serde(alias = "flight_id", alias = "id")]
    mission_id: String,
    waypoints: Vec<Waypoint>,
    start_time: f64,
    end_time: f64,
}

impl TryFrom<MissionSpec> for Mission {
    type Error = ValidationError;

    fn try_from(spec: MissionSpec) -> Result<Self> {
        Mission::new(spec.mission_id, spec.waypoints, spec.start_time, spec.end_time)
    }
}

const SHORT_WINDOW_S: f64 = 60.0;
const LONG_WINDOW_S: f64 = 3600.0;

impl Mission {
    /// Build a mission, rejecting empty waypoint lists, non-finite values,
    /// decreasing waypoint times and windows with `end_time <= start_time`.
    pub fn new(
        mission_id: impl Into<String>,
        waypoints: Vec<Waypoint>,
        start_time: f64,
        end_time: f64,
    ) -> Result<Self> {
        let mission_id = mission_id.into();

        if waypoints.is_empty() {
            return Err(ValidationError::EmptyMission { mission_id });
        }
        if !start_time.is_finite() || !end_time.is_finite() || end_time <= start_time {
            return Err(ValidationError::InvalidWindow {
                mission_id,
                start_time,
                end_time,
            });
        }
        for (index, wp) in waypoints.iter().enumerate() {
            if !wp.position().is_finite() || !wp.t.is_finite() {
                return Err(ValidationError::NonFiniteWaypoint { mission_id, index });
            }
        }
        for (index, pair) in waypoints.windows(2).enumerate() {
            if pair[1].t < pair[0].t {
                return Err(ValidationError::NonMonotonicTime {
                    mission_id,
                    index: index + 1,
                    time: pair[1].t,
                    previous: pair[0].t,
                });
            }
        }

        Ok(Self {
            mission_id,
            waypoints,
            start_time,
            end_time,
        })
    }

    pub fn mission_id(&self) -> &str {
        &self.mission_id
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Degenerate-but-accepted traits of this mission.
    pub fn degenerate_inputs(&self) -> Vec<DegenerateInput> {
        let mut found = Vec::new();
        if self.waypoints.len() == 1 {
            found.push(DegenerateInput::SingleWaypoint);
        }
        for (index, pair) in self.waypoints.windows(2).enumerate() {
            if pair[1].t == pair[0].t {
                found.push(DegenerateInput::ZeroDurationSegment { index: index + 1 });
            }
        }
        let duration_s = self.duration();
        if duration_s < SHORT_WINDOW_S {
            found.push(DegenerateInput::ShortWindow { duration_s });
        } else if duration_s > LONG_WINDOW_S {
            found.push(DegenerateInput::LongWindow { duration_s });
        }
        found
    }
}

/// A sampled pose. `speed` (m/s) and `heading` (degrees, `atan2(dy, dx)`)
/// describe travel into this sample from the previous one; the first sample
/// of a trajectory has no incoming segment and carries zeros.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub speed: f64,
    pub heading: f64,
}

impl TrajectoryPoint {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }
}

/// The sampled flight path of one mission.
///
/// Timestamps are strictly increasing, start at the mission's `start_time`,
/// end exactly at its `end_time` and are spaced by `time_step` except for a
/// possibly shorter final interval. Only [`crate::TrajectoryCalculator`]
/// builds these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    flight_id: String,
    is_primary: bool,
    time_step: f64,
    points: Vec<TrajectoryPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<DegenerateInput>,
}

impl Trajectory {
    pub(crate) fn new(
        flight_id: String,
        is_primary: bool,
        time_step: f64,
        points: Vec<TrajectoryPoint>,
        warnings: Vec<DegenerateInput>,
    ) -> Self {
        debug_assert!(!points.is_empty());
        Self {
            flight_id,
            is_primary,
            time_step,
            points,
            warnings,
        }
    }

    pub fn flight_id(&self) -> &str {
        &self.flight_id
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn warnings(&self) -> &[DegenerateInput] {
        &self.warnings
    }

    pub fn start_time(&self) -> f64 {
        self.points.first().map(|p| p.t).unwrap_or(0.0)
    }

    pub fn end_time(&self) -> f64 {
        self.points.last().map(|p| p.t).unwrap_or(0.0)
    }

    /// Whether the aircraft is in the airspace at `t`.
    pub fn covers(&self, t: f64) -> bool {
        t >= self.start_time() && t <= self.end_time()
    }

    /// Position at `t`, linearly re-interpolated between samples.
    /// `None` outside the trajectory's window.
    pub fn position_at(&self, t: f64) -> Option<Position> {
        if !self.covers(t) {
            return None;
        }
        let after = self.points.partition_point(|p| p.t <= t);
        if after == 0 {
            return self.points.first().map(TrajectoryPoint::position);
        }
        let before = &self.points[after - 1];
        let Some(next) = self.points.get(after) else {
            return Some(before.position());
        };
        if t == before.t {
            return Some(before.position());
        }
        let ratio = ((t - before.t) / (next.t - before.t)).clamp(0.0, 1.0);
        Some(crate::spatial::lerp(before.position(), next.position(), ratio))
    }
}
