//! Conflict report assembly and derived views.

use crate::conflict::{Conflict, ConflictType};
use crate::models::Position;
use crate::severity::ConflictSeverity;
use serde::Serialize;
use std::cmp::Ordering;

/// Seconds either side of a conflict instant that its zone stays active.
const ZONE_HALF_WINDOW_S: f64 = 10.0;
/// Multiplier applied to the closest separation when suggesting a new buffer.
const BUFFER_INCREASE_FACTOR: f64 = 2.5;
/// More conflicts than this suggests separating the missions in time.
const DENSE_CONFLICT_COUNT: usize = 3;

/// Counters describing the work behind a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    /// Other flights compared against the primary
    pub flights_analyzed: usize,
    /// Distance evaluations performed across all pairs
    pub total_checks: usize,
    pub spatial_conflicts: usize,
    pub temporal_conflicts: usize,
}

/// Outcome of analysing one primary trajectory against other traffic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictReport {
    primary_id: String,
    safety_buffer: f64,
    time_step: f64,
    is_safe: bool,
    conflicts: Vec<Conflict>,
    summary: AnalysisSummary,
}

impl ConflictReport {
    /// Sort `conflicts` by time (ties by ascending distance) and derive
    /// `is_safe` and the per-type counts.
    pub(crate) fn assemble(
        primary_id: impl Into<String>,
        safety_buffer: f64,
        time_step: f64,
        mut conflicts: Vec<Conflict>,
        mut summary: AnalysisSummary,
    ) -> Self {
        conflicts.sort_by(compare_conflicts);
        summary.spatial_conflicts = conflicts
            .iter()
            .filter(|c| c.conflict_type == ConflictType::Spatial)
            .count();
        summary.temporal_conflicts = conflicts.len() - summary.spatial_conflicts;

        Self {
            primary_id: primary_id.into(),
            safety_buffer,
            time_step,
            is_safe: conflicts.is_empty(),
            conflicts,
            summary,
        }
    }

    pub fn primary_id(&self) -> &str {
        &self.primary_id
    }

    pub fn safety_buffer(&self) -> f64 {
        self.safety_buffer
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn is_safe(&self) -> bool {
        self.is_safe
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn summary(&self) -> &AnalysisSummary {
        &self.summary
    }

    /// Conflicts involving the given flight.
    pub fn conflicts_with<'a>(&'a self, flight_id: &'a str) -> impl Iterator<Item = &'a Conflict> + 'a {
        self.conflicts
            .iter()
            .filter(move |c| c.involved_ids.iter().any(|id| id == flight_id))
    }

    pub fn highest_severity(&self) -> Option<ConflictSeverity> {
        self.conflicts.iter().map(|c| c.severity).max()
    }

    /// Circular hazard zones around each conflict, `expansion` times the
    /// safety buffer in radius.
    pub fn zones(&self, expansion: f64) -> Vec<ConflictZone> {
        self.conflicts
            .iter()
            .map(|c| {
                let other_id = c
                    .involved_ids
                    .iter()
                    .find(|id| **id != self.primary_id)
                    .map(String::as_str)
                    .unwrap_or(self.primary_id.as_str());
                ConflictZone {
                    zone_id: format!("{}_{}", other_id, c.time),
                    center: c.location,
                    radius_m: self.safety_buffer * expansion,
                    severity: c.severity,
                    time_start: (c.time - ZONE_HALF_WINDOW_S).max(0.0),
                    time_end: c.time + ZONE_HALF_WINDOW_S,
                }
            })
            .collect()
    }

    /// Advice on the configured safety buffer given the conflicts found.
    pub fn recommendations(&self) -> Vec<BufferRecommendation> {
        if self.conflicts.is_empty() {
            return vec![BufferRecommendation::Maintain];
        }

        let mut advice = Vec::new();
        if self.highest_severity() == Some(ConflictSeverity::High) {
            let closest = self
                .conflicts
                .iter()
                .map(|c| c.distance)
                .fold(f64::INFINITY, f64::min);
            advice.push(BufferRecommendation::IncreaseBuffer {
                suggested_m: closest * BUFFER_INCREASE_FACTOR,
            });
        }
        if self.conflicts.len() > DENSE_CONFLICT_COUNT {
            advice.push(BufferRecommendation::TemporalSeparation {
                conflict_count: self.conflicts.len(),
            });
        }
        advice
    }
}

fn compare_conflicts(a: &Conflict, b: &Conflict) -> Ordering {
    a.time
        .total_cmp(&b.time)
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| a.involved_ids.cmp(&b.involved_ids))
        .then_with(|| a.conflict_type.cmp(&b.conflict_type))
}

/// A region to keep clear around a conflict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictZone {
    pub zone_id: String,
    pub center: Position,
    pub radius_m: f64,
    pub severity: ConflictSeverity,
    pub time_start: f64,
    pub time_end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BufferRecommendation {
    /// No conflicts; the buffer in use is adequate
    Maintain,
    /// High severity proximity; widen the buffer to at least `suggested_m`
    IncreaseBuffer { suggested_m: f64 },
    /// Many conflicts; consider shifting the mission in time or re-routing
    TemporalSeparation { conflict_count: usize },
}
