use std::f64::consts::TAU;

use super::{Point3, Vector3, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point3,
    d1: &Vector3,
    p2: &Point3,
    d2: &Vector3,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(point, t, u)` with both parameters in `[0, 1]`. The point keeps
/// the Z of `a0`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point3,
    a1: &Point3,
    b0: &Point3,
    b1: &Point3,
) -> Option<(Point3, f64, f64)> {
    let da = Vector3::new(a1.x - a0.x, a1.y - a0.y, 0.0);
    let db = Vector3::new(b1.x - b0.x, b1.y - b0.y, 0.0);
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        let pt = Point3::new(a0.x + da.x * t, a0.y + da.y * t, a0.z);
        Some((pt, t, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Projection of `center` onto the supporting line of `p0 → p1`.
///
/// Returns `(t_closest, distance, half_chord_t)`: the line parameter of the
/// closest point, the line-to-center distance, and the half-chord of a circle
/// of `radius` expressed in line parameters (`None` when the line misses it).
#[must_use]
pub fn line_circle_params(
    p0: &Point3,
    p1: &Point3,
    center: &Point3,
    radius: f64,
) -> Option<(f64, f64, Option<f64>)> {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let len = dx.hypot(dy);
    if len < TOLERANCE {
        return None;
    }
    let t_closest = ((center.x - p0.x) * dx + (center.y - p0.y) * dy) / (len * len);
    let qx = p0.x + dx * t_closest;
    let qy = p0.y + dy * t_closest;
    let dist = (center.x - qx).hypot(center.y - qy);

    let half = if dist > radius + TOLERANCE {
        None
    } else {
        Some((radius * radius - dist * dist).max(0.0).sqrt() / len)
    };
    Some((t_closest, dist, half))
}

/// Intersection points of two full circles via their radical line.
///
/// `dRL = (d² + r1² − r2²) / 2d` is measured from the first center along the
/// center line; the points lie `±sqrt(r1² − dRL²)` off that line.
#[must_use]
pub fn circle_circle_points(
    c1x: f64,
    c1y: f64,
    r1: f64,
    c2x: f64,
    c2y: f64,
    r2: f64,
) -> Vec<(f64, f64)> {
    let dx = c2x - c1x;
    let dy = c2y - c1y;
    let dist_sq = dx * dx + dy * dy;
    let dist = dist_sq.sqrt();

    if dist < TOLERANCE || r1 < TOLERANCE || r2 < TOLERANCE {
        return Vec::new();
    }
    if dist > r1 + r2 + TOLERANCE || dist < (r1 - r2).abs() - TOLERANCE {
        return Vec::new();
    }

    let d_rl = (dist_sq + r1 * r1 - r2 * r2) / (2.0 * dist);
    let h = (r1 * r1 - d_rl * d_rl).max(0.0).sqrt();

    let mx = c1x + d_rl * dx / dist;
    let my = c1y + d_rl * dy / dist;
    let px = -dy / dist;
    let py = dx / dist;

    if h < TOLERANCE {
        vec![(mx, my)]
    } else {
        vec![(mx + h * px, my + h * py), (mx - h * px, my - h * py)]
    }
}

/// Intersection of a line segment with a circular arc in 2D.
///
/// Returns `((x, y), t_seg, t_arc)` with both parameters in `[0, 1]`.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn line_arc_intersect_2d(
    ax0: f64,
    ay0: f64,
    ax1: f64,
    ay1: f64,
    cx: f64,
    cy: f64,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> Vec<((f64, f64), f64, f64)> {
    let mut results = Vec::new();
    if radius < TOLERANCE || sweep.abs() < TOLERANCE {
        return results;
    }

    let dx = ax1 - ax0;
    let dy = ay1 - ay0;
    let a = dx * dx + dy * dy;
    if a < TOLERANCE * TOLERANCE {
        return results;
    }

    let fx = ax0 - cx;
    let fy = ay0 - cy;
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -TOLERANCE {
        return results;
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();

    let roots = if disc_sqrt < TOLERANCE * 100.0 {
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    };

    for t_seg in roots {
        if t_seg < -TOLERANCE || t_seg > 1.0 + TOLERANCE {
            continue;
        }
        let t_seg = t_seg.clamp(0.0, 1.0);
        let px = ax0 + t_seg * dx;
        let py = ay0 + t_seg * dy;
        let angle = (py - cy).atan2(px - cx);
        if let Some(t_arc) = angle_to_arc_param(angle, start_angle, sweep) {
            results.push(((px, py), t_seg, t_arc));
        }
    }

    results
}

/// Intersection of two circular arcs in 2D.
///
/// Returns `((x, y), t1, t2)` with both arc parameters in `[0, 1]`.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn arc_arc_intersect_2d(
    c1x: f64,
    c1y: f64,
    r1: f64,
    start1: f64,
    sweep1: f64,
    c2x: f64,
    c2y: f64,
    r2: f64,
    start2: f64,
    sweep2: f64,
) -> Vec<((f64, f64), f64, f64)> {
    circle_circle_points(c1x, c1y, r1, c2x, c2y, r2)
        .into_iter()
        .filter_map(|(ix, iy)| {
            let t1 = angle_to_arc_param((iy - c1y).atan2(ix - c1x), start1, sweep1)?;
            let t2 = angle_to_arc_param((iy - c2y).atan2(ix - c2x), start2, sweep2)?;
            Some(((ix, iy), t1, t2))
        })
        .collect()
}

/// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
///
/// Returns `None` if the angle is outside the arc's span.
#[must_use]
pub fn angle_to_arc_param(angle: f64, start_angle: f64, sweep: f64) -> Option<f64> {
    if sweep.abs() < TOLERANCE {
        return None;
    }
    let eps = TOLERANCE * 100.0;
    let mut delta = (angle - start_angle).rem_euclid(TAU);
    if sweep < 0.0 {
        delta -= TAU;
    }
    // Both ends of the span meet at a full turn.
    if delta.abs() > TAU - eps {
        delta = 0.0;
    }

    let t = delta / sweep;
    (t >= -eps && t <= 1.0 + eps).then(|| t.clamp(0.0, 1.0))
}
