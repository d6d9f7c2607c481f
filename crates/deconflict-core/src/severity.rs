//! Severity classification of separation violations.
//!
//! The safety buffer is the 100% mark:
//!
//! | distance / buffer | severity |
//! |-------------------|----------|
//! | `< 0.50`          | High     |
//! | `[0.50, 0.80)`    | Medium   |
//! | `[0.80, 1.00)`    | Low      |
//! | `>= 1.00`         | none     |

use serde::{Deserialize, Serialize};

pub const HIGH_FRACTION: f64 = 0.5;
pub const MEDIUM_FRACTION: f64 = 0.8;

/// Severity levels for detected conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConflictSeverity {
    /// Inside the buffer but beyond 80% of it
    Low,
    /// Between 50% and 80% of the buffer
    Medium,
    /// Closer than half the buffer
    High,
}

/// Classify a separation of `distance` against `safety_buffer`.
/// Returns `None` when the separation is acceptable (`distance >= safety_buffer`).
pub fn classify(distance: f64, safety_buffer: f64) -> Option<ConflictSeverity> {
    if distance < safety_buffer * HIGH_FRACTION {
        Some(ConflictSeverity::High)
    } else if distance < safety_buffer * MEDIUM_FRACTION {
        Some(ConflictSeverity::Medium)
    } else if distance < safety_buffer {
        Some(ConflictSeverity::Low)
    } else {
        None
    }
}
