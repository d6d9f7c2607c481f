//! JSON documents written by the `deconflict` binary.

use chrono::{DateTime, Utc};
use deconflict_core::{
    BufferRecommendation, ConflictReport, ConflictZone, EngineConfig, MissionAnalysis, Trajectory,
    TrajectoryMetrics,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FlightMetrics {
    pub flight_id: String,
    pub is_primary: bool,
    #[serde(flatten)]
    pub metrics: TrajectoryMetrics,
}

impl FlightMetrics {
    pub fn of(trajectory: &Trajectory) -> Self {
        Self {
            flight_id: trajectory.flight_id().to_string(),
            is_primary: trajectory.is_primary(),
            metrics: TrajectoryMetrics::from_trajectory(trajectory),
        }
    }
}

/// Result of `deconflict analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    pub generated_at: DateTime<Utc>,
    pub parameters: EngineConfig,
    pub report: ConflictReport,
    pub zones: Vec<ConflictZone>,
    pub recommendations: Vec<BufferRecommendation>,
    pub metrics: Vec<FlightMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trajectories: Option<Vec<Trajectory>>,
}

impl AnalysisOutput {
    pub fn new(
        parameters: EngineConfig,
        analysis: MissionAnalysis,
        zone_expansion: f64,
        include_trajectories: bool,
    ) -> Self {
        let MissionAnalysis {
            primary,
            others,
            report,
        } = analysis;

        let metrics = std::iter::once(&primary)
            .chain(&others)
            .map(FlightMetrics::of)
            .collect();
        let trajectories = include_trajectories.then(|| {
            let mut all = Vec::with_capacity(others.len() + 1);
            all.push(primary);
            all.extend(others);
            all
        });

        Self {
            generated_at: Utc::now(),
            parameters,
            zones: report.zones(zone_expansion),
            recommendations: report.recommendations(),
            report,
            metrics,
            trajectories,
        }
    }
}

/// Result of `deconflict trajectory`.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryOutput {
    pub generated_at: DateTime<Utc>,
    pub metrics: TrajectoryMetrics,
    pub trajectory: Trajectory,
}

impl TrajectoryOutput {
    pub fn new(trajectory: Trajectory) -> Self {
        Self {
            generated_at: Utc::now(),
            metrics: TrajectoryMetrics::from_trajectory(&trajectory),
            trajectory,
        }
    }
}
