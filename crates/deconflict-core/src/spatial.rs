//! Spatial math in the local Cartesian airspace frame (meters).

use crate::models::Position;

/// 3D Euclidean distance between two positions.
pub fn distance_3d(a: Position, b: Position) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Distance in the x-y plane, ignoring altitude.
pub fn horizontal_distance(a: Position, b: Position) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Bearing of travel from `from` to `to` in degrees, `atan2(dy, dx)`:
/// 0 = +x, 90 = +y, range (-180, 180].
pub fn heading_deg(from: Position, to: Position) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// Linear interpolation; `ratio` 0 yields `a`, 1 yields `b`.
pub fn lerp(a: Position, b: Position, ratio: f64) -> Position {
    Position {
        x: a.x + (b.x - a.x) * ratio,
        y: a.y + (b.y - a.y) * ratio,
        z: a.z + (b.z - a.z) * ratio,
    }
}

pub fn midpoint(a: Position, b: Position) -> Position {
    lerp(a, b, 0.5)
}
