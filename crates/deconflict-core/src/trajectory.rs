//! Mission to sampled trajectory conversion.
//!
//! Waypoint times are rescaled onto the mission window, the route is treated
//! as piecewise-linear in time and then sampled on a fixed time grid.

use crate::error::{check_time_step, DegenerateInput, Result, ValidationError};
use crate::models::{Mission, Position, Trajectory, TrajectoryPoint, Waypoint};
use crate::spatial::{distance_3d, heading_deg, horizontal_distance, lerp, midpoint};

/// Fraction of a time step under which a regular sample is considered to
/// coincide with the window end.
const END_SNAP_FRACTION: f64 = 1e-9;

/// Horizontal displacement (meters) below which heading is carried forward.
const HEADING_MIN_DISPLACEMENT_M: f64 = 1e-9;

/// Stateless calculator turning [`Mission`]s into [`Trajectory`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrajectoryCalculator;

impl TrajectoryCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Sample `mission` every `time_step` seconds as an "other" flight.
    pub fn compute(&self, mission: &Mission, time_step: f64) -> Result<Trajectory> {
        self.compute_with_role(mission, time_step, false)
    }

    /// Sample `mission` every `time_step` seconds as the primary flight.
    pub fn compute_primary(&self, mission: &Mission, time_step: f64) -> Result<Trajectory> {
        self.compute_with_role(mission, time_step, true)
    }

    /// Ease sharp turns: each interior point moves `factor` of the way toward
    /// the midpoint of its original neighbours, endpoints and timestamps stay
    /// put, and speed and heading are recomputed. `factor` must lie in
    /// `[0, 1]`. The input trajectory is left untouched.
    pub fn smooth(&self, trajectory: &Trajectory, factor: f64) -> Result<Trajectory> {
        if !(0.0..=1.0).contains(&factor) {
            return Err(ValidationError::InvalidSmoothingFactor(factor));
        }

        let original = trajectory.points();
        let mut points: Vec<TrajectoryPoint> = Vec::with_capacity(original.len());
        for (i, point) in original.iter().enumerate() {
            let pos = match (i.checked_sub(1).and_then(|j| original.get(j)), original.get(i + 1)) {
                (Some(prev), Some(next)) => {
                    let target = midpoint(prev.position(), next.position());
                    lerp(point.position(), target, factor)
                }
                _ => point.position(),
            };
            let (speed, heading) = match points.last() {
                Some(prev) => incoming_motion(prev, point.t, pos),
                None => (point.speed, point.heading),
            };
            points.push(TrajectoryPoint {
                t: point.t,
                x: pos.x,
                y: pos.y,
                z: pos.z,
                speed,
                heading,
            });
        }

        tracing::debug!(
            flight_id = trajectory.flight_id(),
            factor,
            "smoothed trajectory"
        );

        Ok(Trajectory::new(
            trajectory.flight_id().to_string(),
            trajectory.is_primary(),
            trajectory.time_step(),
            points,
            trajectory.warnings().to_vec(),
        ))
    }

    fn compute_with_role(
        &self,
        mission: &Mission,
        time_step: f64,
        is_primary: bool,
    ) -> Result<Trajectory> {
        check_time_step(time_step)?;

        let (timed, evenly_spread) = normalize_waypoints(mission);
        for (index, pair) in timed.windows(2).enumerate() {
            if pair[1].t < pair[0].t {
                return Err(ValidationError::NonMonotonicTime {
                    mission_id: mission.mission_id().to_string(),
                    index: index + 1,
                    time: pair[1].t,
                    previous: pair[0].t,
                });
            }
        }

        let times = sample_times(mission.start_time(), mission.end_time(), time_step);
        let mut points: Vec<TrajectoryPoint> = Vec::with_capacity(times.len());
        for t in times {
            let pos = position_on_route(&timed, t);
            let (speed, heading) = match points.last() {
                Some(prev) => incoming_motion(prev, t, pos),
                None => (0.0, 0.0),
            };
            points.push(TrajectoryPoint {
                t,
                x: pos.x,
                y: pos.y,
                z: pos.z,
                speed,
                heading,
            });
        }

        let warnings: Vec<DegenerateInput> = mission
            .degenerate_inputs()
            .into_iter()
            .filter(|w| {
                !(evenly_spread && matches!(w, DegenerateInput::ZeroDurationSegment { .. }))
            })
            .collect();
        for warning in &warnings {
            tracing::warn!(
                mission_id = mission.mission_id(),
                ?warning,
                "degenerate mission input, applying fallback"
            );
        }

        tracing::debug!(
            mission_id = mission.mission_id(),
            points = points.len(),
            time_step,
            "computed trajectory"
        );

        Ok(Trajectory::new(
            mission.mission_id().to_string(),
            is_primary,
            time_step,
            points,
            warnings,
        ))
    }
}

/// Rescale waypoint times so the first lands on `start_time` and the last on
/// `end_time`, keeping relative spacing. When every waypoint shares one time
/// there is no spacing to keep; waypoints are then spread evenly over the
/// window and the second return value is `true`.
fn normalize_waypoints(mission: &Mission) -> (Vec<Waypoint>, bool) {
    let waypoints = mission.waypoints();
    let start = mission.start_time();
    let end = mission.end_time();
    let duration = end - start;

    let (Some(first), Some(last)) = (waypoints.first(), waypoints.last()) else {
        return (Vec::new(), false);
    };

    if waypoints.len() == 1 {
        return (vec![Waypoint { t: start, ..*first }], false);
    }

    let span = last.t - first.t;
    let last_index = waypoints.len() - 1;

    if span <= 0.0 {
        let spread = waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| Waypoint {
                t: if i == last_index {
                    end
                } else {
                    start + duration * i as f64 / last_index as f64
                },
                ..*wp
            })
            .collect();
        return (spread, true);
    }

    let scaled = waypoints
        .iter()
        .enumerate()
        .map(|(i, wp)| Waypoint {
            t: if i == last_index {
                end
            } else {
                start + (wp.t - first.t) / span * duration
            },
            ..*wp
        })
        .collect();
    (scaled, false)
}

/// Sample instants from `start` to `end` inclusive. Regular multiples of
/// `time_step` are used until the next one would reach `end`; `end` is then
/// appended exactly. Multiples that round onto the previous instant (a step
/// below the float resolution at `start`) are skipped.
pub(crate) fn sample_times(start: f64, end: f64, time_step: f64) -> Vec<f64> {
    let snap = time_step * END_SNAP_FRACTION;
    let mut times = vec![start];
    let mut k: u64 = 1;
    loop {
        let t = start + k as f64 * time_step;
        if t >= end - snap {
            break;
        }
        if times.last().is_some_and(|last| t > *last) {
            times.push(t);
        }
        k += 1;
    }
    times.push(end);
    times
}

/// Position on the piecewise-linear route at `t`. Before the first waypoint
/// the aircraft is at the first waypoint, after the last it holds the last.
/// Where several waypoints share a time, the latest of them applies from that
/// instant on.
fn position_on_route(timed: &[Waypoint], t: f64) -> Position {
    let after = timed.partition_point(|wp| wp.t <= t);
    if after == 0 {
        return timed.first().map(Waypoint::position).unwrap_or_default();
    }
    let a = &timed[after - 1];
    let Some(b) = timed.get(after) else {
        return a.position();
    };
    // b.t > t >= a.t, so the span is never zero here
    let ratio = (t - a.t) / (b.t - a.t);
    lerp(a.position(), b.position(), ratio)
}

fn incoming_motion(prev: &TrajectoryPoint, t: f64, pos: Position) -> (f64, f64) {
    let from = prev.position();
    let elapsed = t - prev.t;
    let speed = if elapsed > 0.0 {
        distance_3d(from, pos) / elapsed
    } else {
        prev.speed
    };
    let heading = if horizontal_distance(from, pos) > HEADING_MIN_DISPLACEMENT_M {
        heading_deg(from, pos)
    } else {
        prev.heading
    };
    (speed, heading)
}
