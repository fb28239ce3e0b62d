use super::tolerance::{clamp01, EPS_LEN};
use crate::model::Point;

/// Parameter `t` in `[0, 1]` of the clamped orthogonal projection of `p` onto `a -> b`,
/// and the squared distance from `p` to that projection.
pub fn seg_distance_sq(p: Point, a: Point, b: Point) -> (f64, f64) {
    let vx = b.x - a.x; let vy = b.y - a.y;
    let wx = p.x - a.x; let wy = p.y - a.y;
    let vv = vx*vx + vy*vy;
    let t = if vv > EPS_LEN * EPS_LEN { clamp01((wx*vx + wy*vy) / vv) } else { 0.0 };
    let projx = a.x + t * vx; let projy = a.y + t * vy;
    let dx = p.x - projx; let dy = p.y - projy;
    (dx*dx + dy*dy, t)
}

/// Projects `p` onto the segment `a -> b`, clamped to its endpoints.
/// A zero-length segment projects everything onto `a`.
pub fn position_on_line(p: Point, a: Point, b: Point) -> Point {
    let (_, t) = seg_distance_sq(p, a, b);
    Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}
