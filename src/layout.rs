//! Default placement of new nodes.
//!
//! Roots line up left to right; children fan out around their parent on a
//! circle whose radius grows with depth.

use crate::types::Position;

/// Position of the first root.
pub const ROOT_ORIGIN: Position = Position { x: 400.0, y: 200.0 };

/// Horizontal gap between consecutive roots.
pub const ROOT_SPACING: f64 = 250.0;

/// Child circle radius at level 0.
pub const BASE_RADIUS: f64 = 150.0;

/// Radius added per level.
pub const RADIUS_PER_LEVEL: f64 = 50.0;

/// The circle is divided into at least this many slots.
pub const MIN_ANGLE_SLOTS: usize = 6;

/// Position for a new root when `existing_roots` roots are already placed.
pub fn root_position(existing_roots: usize) -> Position {
    Position::new(
        ROOT_ORIGIN.x + existing_roots as f64 * ROOT_SPACING,
        ROOT_ORIGIN.y,
    )
}

/// Angle in degrees for the child that follows `existing_children` siblings.
///
/// The first six children sit 60 degrees apart. Later ones land at
/// `n * 360 / (n + 1)`, which grows strictly with `n` and stays below 360,
/// so no two siblings created in sequence share an angle.
pub fn child_angle(existing_children: usize) -> f64 {
    let slots = (existing_children + 1).max(MIN_ANGLE_SLOTS);
    existing_children as f64 * (360.0 / slots as f64)
}

/// Circle radius for a child placed at `level`.
pub fn child_radius(level: u32) -> f64 {
    BASE_RADIUS + f64::from(level) * RADIUS_PER_LEVEL
}

/// Position for a new child at `level` with `existing_children` siblings.
pub fn child_position(parent: Position, existing_children: usize, level: u32) -> Position {
    parent.offset_polar(child_angle(existing_children), child_radius(level))
}
