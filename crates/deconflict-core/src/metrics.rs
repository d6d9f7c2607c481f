//! Summary statistics of a sampled trajectory.

use crate::models::Trajectory;
use crate::spatial::distance_3d;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryMetrics {
    /// Path length along the samples, meters
    pub total_distance_m: f64,
    pub duration_s: f64,
    /// `total_distance_m / duration_s`, zero for a zero-length window
    pub average_speed_mps: f64,
    pub max_speed_mps: f64,
    pub min_altitude_m: f64,
    pub max_altitude_m: f64,
    pub average_altitude_m: f64,
    pub altitude_range_m: f64,
    pub total_points: usize,
}

impl TrajectoryMetrics {
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let points = trajectory.points();

        let total_distance_m: f64 = points
            .windows(2)
            .map(|w| distance_3d(w[0].position(), w[1].position()))
            .sum();
        let duration_s = trajectory.end_time() - trajectory.start_time();
        let average_speed_mps = if duration_s > 0.0 {
            total_distance_m / duration_s
        } else {
            0.0
        };
        let max_speed_mps = points.iter().map(|p| p.speed).fold(0.0, f64::max);

        let (min_altitude_m, max_altitude_m, sum_altitude) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(lo, hi, sum), p| (lo.min(p.z), hi.max(p.z), sum + p.z),
        );
        let count = points.len().max(1) as f64;

        Self {
            total_distance_m,
            duration_s,
            average_speed_mps,
            max_speed_mps,
            min_altitude_m,
            max_altitude_m,
            average_altitude_m: sum_altitude / count,
            altitude_range_m: max_altitude_m - min_altitude_m,
            total_points: points.len(),
        }
    }
}
