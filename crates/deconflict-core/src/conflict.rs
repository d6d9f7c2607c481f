//! Pairwise spatial and temporal conflict detection.
//!
//! The primary trajectory is compared against each other trajectory
//! independently. Spatial conflicts come from simultaneous proximity on a
//! shared time base; temporal conflicts come from the two aircraft using the
//! same neighborhood at different, closely spaced times.

use crate::error::{check_safety_buffer, check_temporal_window, check_time_step, Result};
use crate::models::{Mission, Position, Trajectory};
use crate::report::{AnalysisSummary, ConflictReport};
use crate::rules::EngineConfig;
use crate::severity::{classify, ConflictSeverity};
use crate::spatial::{distance_3d, midpoint};
use crate::trajectory::TrajectoryCalculator;
use serde::{Deserialize, Serialize};

/// Timestamps closer than this are the same comparison instant.
const TIME_MATCH_EPS_S: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConflictType {
    /// Closer than the buffer at the same instant
    Spatial,
    /// Same neighborhood used at different but nearby times
    Temporal,
}

/// A separation violation between the primary and one other flight.
///
/// For spatial conflicts `time` is the closest approach within a run of
/// violating instants; for temporal ones it is the earlier of the two
/// occupancy times. `location` is the midpoint of the two aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub time: f64,
    #[serde(flatten)]
    pub location: Position,
    pub distance: f64,
    pub severity: ConflictSeverity,
    /// `(buffer - distance) / buffer`: 0 at the buffer edge, 1 at contact
    pub severity_score: f64,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    /// Primary flight id first, then the other flight
    pub involved_ids: Vec<String>,
}

/// Trajectories computed for an analysis along with its report.
#[derive(Debug, Clone, Serialize)]
pub struct MissionAnalysis {
    pub primary: Trajectory,
    pub others: Vec<Trajectory>,
    pub report: ConflictReport,
}

/// Strategic deconfliction engine.
///
/// Holds only immutable configuration; every call is an independent, pure
/// computation over its inputs.
#[derive(Debug, Clone, Default)]
pub struct DeconflictionEngine {
    config: EngineConfig,
}

impl DeconflictionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyse `primary` against every trajectory in `others`.
    ///
    /// `time_step` is the scan resolution; the temporal reuse window is
    /// `temporal_window_steps` multiples of it. Fails on a non-positive
    /// `safety_buffer` or `time_step`, or an invalid configured window.
    pub fn analyze(
        &self,
        primary: &Trajectory,
        others: &[Trajectory],
        safety_buffer: f64,
        time_step: f64,
    ) -> Result<ConflictReport> {
        check_safety_buffer(safety_buffer)?;
        check_time_step(time_step)?;
        check_temporal_window(self.config.temporal_window_steps)?;

        let temporal_window = if self.config.detect_temporal {
            Some(self.config.temporal_window_steps * time_step)
        } else {
            None
        };

        let mut conflicts = Vec::new();
        let mut summary = AnalysisSummary {
            flights_analyzed: others.len(),
            ..AnalysisSummary::default()
        };

        for other in others {
            let scan = PairScan {
                primary,
                other,
                safety_buffer,
            };
            let outcome = scan.run(temporal_window);
            tracing::debug!(
                primary_id = primary.flight_id(),
                other_id = other.flight_id(),
                checks = outcome.checks,
                conflicts = outcome.conflicts.len(),
                "analysed pair"
            );
            summary.total_checks += outcome.checks;
            conflicts.extend(outcome.conflicts);
        }

        let report = ConflictReport::assemble(
            primary.flight_id(),
            safety_buffer,
            time_step,
            conflicts,
            summary,
        );
        if !report.is_safe() {
            tracing::info!(
                primary_id = report.primary_id(),
                conflicts = report.conflicts().len(),
                highest = ?report.highest_severity(),
                "conflicts detected"
            );
        }
        Ok(report)
    }

    /// Analyse using the buffer and time step from the engine configuration.
    pub fn check(&self, primary: &Trajectory, others: &[Trajectory]) -> Result<ConflictReport> {
        self.analyze(
            primary,
            others,
            self.config.safety_buffer_m,
            self.config.time_step_s,
        )
    }

    /// Compute all trajectories at the configured time step, then analyse.
    pub fn analyze_missions(&self, primary: &Mission, others: &[Mission]) -> Result<MissionAnalysis> {
        self.config.validate()?;
        let calculator = TrajectoryCalculator::new();
        let time_step = self.config.time_step_s;

        let primary = calculator.compute_primary(primary, time_step)?;
        let others = others
            .iter()
            .map(|mission| calculator.compute(mission, time_step))
            .collect::<Result<Vec<_>>>()?;
        let report = self.check(&primary, &others)?;

        Ok(MissionAnalysis {
            primary,
            others,
            report,
        })
    }
}

/// A distance violation at one comparison step.
#[derive(Debug, Clone, Copy)]
struct Violation {
    /// Position in the scan order; consecutive steps form one run
    step: usize,
    time: f64,
    location: Position,
    distance: f64,
    /// Primary and other positions behind this violation
    pair: (Position, Position),
}

#[derive(Debug, Default)]
struct PairOutcome {
    checks: usize,
    conflicts: Vec<Conflict>,
}

struct PairScan<'a> {
    primary: &'a Trajectory,
    other: &'a Trajectory,
    safety_buffer: f64,
}

impl PairScan<'_> {
    fn run(&self, temporal_window: Option<f64>) -> PairOutcome {
        let mut outcome = PairOutcome::default();

        let times = comparison_times(self.primary, self.other);
        let spatial = self.spatial_violations(&times, &mut outcome.checks);
        for v in collapse_runs(&spatial) {
            if let Some(conflict) = self.to_conflict(v, ConflictType::Spatial) {
                outcome.conflicts.push(conflict);
            }
        }

        if let Some(window) = temporal_window {
            let temporal = self.temporal_violations(window, &spatial, &mut outcome.checks);
            for v in collapse_runs(&temporal) {
                if let Some(conflict) = self.to_conflict(v, ConflictType::Temporal) {
                    outcome.conflicts.push(conflict);
                }
            }
        }

        outcome
    }

    /// Simultaneous proximity at every shared comparison instant.
    fn spatial_violations(&self, times: &[f64], checks: &mut usize) -> Vec<Violation> {
        let mut violations = Vec::new();
        for (step, &t) in times.iter().enumerate() {
            let (Some(a), Some(b)) = (self.primary.position_at(t), self.other.position_at(t))
            else {
                continue;
            };
            *checks += 1;
            let distance = distance_3d(a, b);
            if distance < self.safety_buffer {
                tracing::trace!(t, distance, other_id = self.other.flight_id(), "spatial violation");
                violations.push(Violation {
                    step,
                    time: t,
                    location: midpoint(a, b),
                    distance,
                    pair: (a, b),
                });
            }
        }
        violations
    }

    /// Corridor reuse: for each primary sample, the closest other sample
    /// within the buffer whose time differs by at most `window`. Pairs that
    /// are part of a simultaneous encounter are left to spatial detection.
    fn temporal_violations(
        &self,
        window: f64,
        spatial: &[Violation],
        checks: &mut usize,
    ) -> Vec<Violation> {
        let others = self.other.points();
        let mut violations = Vec::new();

        for (step, p) in self.primary.points().iter().enumerate() {
            let lo = others.partition_point(|q| q.t < p.t - window - TIME_MATCH_EPS_S);
            let mut best: Option<Violation> = None;

            for q in &others[lo..] {
                if q.t > p.t + window + TIME_MATCH_EPS_S {
                    break;
                }
                if (q.t - p.t).abs() <= TIME_MATCH_EPS_S {
                    continue;
                }
                *checks += 1;
                let distance = distance_3d(p.position(), q.position());
                if distance >= self.safety_buffer {
                    continue;
                }
                let (earlier, later) = if p.t < q.t { (p.t, q.t) } else { (q.t, p.t) };
                let location = midpoint(p.position(), q.position());
                if self.explained_by_spatial(spatial, earlier, later, location) {
                    continue;
                }
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(Violation {
                        step,
                        time: earlier,
                        location,
                        distance,
                        pair: (p.position(), q.position()),
                    });
                }
            }

            if let Some(v) = best {
                tracing::trace!(
                    t = v.time,
                    distance = v.distance,
                    other_id = self.other.flight_id(),
                    "temporal violation"
                );
                violations.push(v);
            }
        }
        violations
    }

    /// Whether a simultaneous violation within `[from, to]` had either
    /// aircraft inside the buffer around `spot`.
    fn explained_by_spatial(&self, spatial: &[Violation], from: f64, to: f64, spot: Position) -> bool {
        let lo = spatial.partition_point(|v| v.time < from);
        spatial[lo..]
            .iter()
            .take_while(|v| v.time <= to)
            .any(|v| {
                distance_3d(v.pair.0, spot) < self.safety_buffer
                    || distance_3d(v.pair.1, spot) < self.safety_buffer
            })
    }

    fn to_conflict(&self, v: Violation, conflict_type: ConflictType) -> Option<Conflict> {
        let severity = classify(v.distance, self.safety_buffer)?;
        Some(Conflict {
            time: v.time,
            location: v.location,
            distance: v.distance,
            severity,
            severity_score: ((self.safety_buffer - v.distance) / self.safety_buffer).max(0.0),
            conflict_type,
            involved_ids: vec![
                self.primary.flight_id().to_string(),
                self.other.flight_id().to_string(),
            ],
        })
    }
}

/// Comparison instants for a pair: both trajectories' sample times plus the
/// bounds of their common window, restricted to that window, sorted and
/// deduplicated. Empty when the windows do not overlap.
fn comparison_times(a: &Trajectory, b: &Trajectory) -> Vec<f64> {
    let start = a.start_time().max(b.start_time());
    let end = a.end_time().min(b.end_time());
    if start > end {
        return Vec::new();
    }

    let mut times: Vec<f64> = a
        .points()
        .iter()
        .chain(b.points())
        .map(|p| p.t)
        .filter(|t| *t >= start && *t <= end)
        .chain([start, end])
        .collect();
    times.sort_by(f64::total_cmp);
    times.dedup_by(|later, earlier| (*later - *earlier).abs() <= TIME_MATCH_EPS_S);
    times
}

/// Collapse each run of consecutive steps to its closest approach.
fn collapse_runs(violations: &[Violation]) -> Vec<Violation> {
    let mut collapsed: Vec<Violation> = Vec::new();
    let mut last_step: Option<usize> = None;

    for v in violations {
        let continues_run = last_step.is_some_and(|s| s + 1 == v.step);
        match collapsed.last_mut() {
            Some(best) if continues_run => {
                if v.distance < best.distance {
                    *best = *v;
                }
            }
            _ => collapsed.push(*v),
        }
        last_step = Some(v.step);
    }
    collapsed
}
