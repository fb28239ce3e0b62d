// Centralized tolerances for the projection helpers

pub const EPS_LEN: f64 = 1e-6;            // zero-length segment threshold
pub const EPS_POS: f64 = 1e-4;            // point coincidence threshold (px)

#[inline] pub fn clamp01(x: f64) -> f64 { x.max(0.0).min(1.0) }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }
