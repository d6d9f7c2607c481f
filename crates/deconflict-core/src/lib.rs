//! Strategic deconfliction core for UAV missions.
//!
//! Converts waypoint missions into time-sampled trajectories and checks a
//! primary trajectory against other traffic for spatial (simultaneous) and
//! temporal (corridor reuse) separation violations.

pub mod conflict;
pub mod error;
pub mod metrics;
pub mod models;
pub mod report;
pub mod rules;
pub mod severity;
pub mod spatial;
pub mod trajectory;

pub use conflict::{Conflict, ConflictType, DeconflictionEngine, MissionAnalysis};
pub use error::{DegenerateInput, Result, ValidationError};
pub use metrics::TrajectoryMetrics;
pub use models::{Mission, Position, Trajectory, TrajectoryPoint, Waypoint};
pub use report::{AnalysisSummary, BufferRecommendation, ConflictReport, ConflictZone};
pub use rules::EngineConfig;
pub use severity::{classify, ConflictSeverity};
pub use spatial::distance_3d;
pub use trajectory::TrajectoryCalculator;
