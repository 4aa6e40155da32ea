use super::intersect_2d::angle_to_arc_param;

/// Minimum distance from `(px, py)` to the segment `(ax, ay) → (bx, by)`.
#[must_use]
pub fn point_to_segment_dist(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-20 {
        return (px - ax).hypot(py - ay);
    }

    let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
    (px - (ax + t * dx)).hypot(py - (ay + t * dy))
}

/// Minimum distance from `(px, py)` to a circular arc.
///
/// Inside the arc's angular span this is the radial gap, otherwise the
/// distance to the nearer endpoint.
#[must_use]
pub fn point_to_arc_dist(
    px: f64,
    py: f64,
    cx: f64,
    cy: f64,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> f64 {
    let dx = px - cx;
    let dy = py - cy;
    if angle_to_arc_param(dy.atan2(dx), start_angle, sweep).is_some() {
        return (dx.hypot(dy) - radius).abs();
    }

    let end_angle = start_angle + sweep;
    let d0 = (px - (cx + radius * start_angle.cos())).hypot(py - (cy + radius * start_angle.sin()));
    let d1 = (px - (cx + radius * end_angle.cos())).hypot(py - (cy + radius * end_angle.sin()));
    d0.min(d1)
}
