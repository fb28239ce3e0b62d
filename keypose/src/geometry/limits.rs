// Ingestion limits for annotation files read from disk or handed over by JS

// Skeletons per annotation file
pub const MAX_SKELETONS: usize = 10_000;

// Transition points on a single edge
pub const MAX_TRANSITIONS_PER_EDGE: usize = 1_000;

// Numeric bounds (image space, px)
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 =  10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }
