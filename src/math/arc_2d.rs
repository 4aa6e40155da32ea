/// Planar arc math shared by segments and the bulge polyline.
///
/// Bulge convention: `bulge = tan(sweep / 4)`.
/// - `bulge = 0`: straight line
/// - `bulge > 0`: counter-clockwise arc
/// - `bulge < 0`: clockwise arc
/// - `|bulge| = 1`: semicircle
use std::f64::consts::TAU;

use super::TOLERANCE;

/// Converts a bulge-defined arc to `(cx, cy, radius, start_angle, sweep)`.
///
/// Zero-length chords yield a zero radius and sweep.
#[must_use]
pub fn arc_from_bulge(x0: f64, y0: f64, x1: f64, y1: f64, bulge: f64) -> (f64, f64, f64, f64, f64) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let chord = dx.hypot(dy);
    if chord < 1e-12 || bulge.abs() < 1e-12 {
        return (x0, y0, 0.0, 0.0, 0.0);
    }

    // Signed distance from the chord midpoint to the center, in half-chords.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let mx = (x0 + x1) * 0.5;
    let my = (y0 + y1) * 0.5;
    let nx = -dy / chord;
    let ny = dx / chord;

    let cx = mx + sagitta_ratio * (chord * 0.5) * nx;
    let cy = my + sagitta_ratio * (chord * 0.5) * ny;
    let radius = (chord * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = (y0 - cy).atan2(x0 - cx);

    (cx, cy, radius, start_angle, 4.0 * bulge.atan())
}

/// Bulge of an arc with the given signed sweep.
#[must_use]
pub fn bulge_from_sweep(sweep: f64) -> f64 {
    (sweep / 4.0).tan()
}

/// Signed sweep from `start_angle` to `end_angle` in the given rotation sense.
///
/// Equal angles are a full turn, matching a closed circle.
#[must_use]
pub fn sweep_between(start_angle: f64, end_angle: f64, ccw: bool) -> f64 {
    let mut sweep = (end_angle - start_angle).rem_euclid(TAU);
    if sweep < TOLERANCE * 1e3 || TAU - sweep < TOLERANCE * 1e3 {
        sweep = TAU;
    }
    if ccw {
        sweep
    } else if sweep >= TAU {
        -TAU
    } else {
        sweep - TAU
    }
}

/// Point on an arc at parameter `t` in `[0, 1]`.
#[must_use]
pub fn arc_point_at(
    cx: f64,
    cy: f64,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    t: f64,
) -> (f64, f64) {
    let angle = start_angle + sweep * t;
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}

/// Unit tangent on an arc at parameter `t`, pointing towards increasing `t`.
#[must_use]
pub fn arc_tangent_at(start_angle: f64, sweep: f64, t: f64) -> (f64, f64) {
    let angle = start_angle + sweep * t;
    let sign = if sweep >= 0.0 { 1.0 } else { -1.0 };
    (-sign * angle.sin(), sign * angle.cos())
}

/// Offsets a bulge arc to its left by `distance`.
///
/// Returns `(x0', y0', x1', y1', bulge')`, or `None` when the radius collapses.
#[must_use]
pub fn offset_arc_segment(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    bulge: f64,
    distance: f64,
) -> Option<(f64, f64, f64, f64, f64)> {
    let (cx, cy, radius, start_angle, sweep) = arc_from_bulge(x0, y0, x1, y1, bulge);
    if radius < 1e-12 {
        return None;
    }

    // Left of a counter-clockwise arc faces its center.
    let sign = if bulge > 0.0 { -1.0 } else { 1.0 };
    let new_radius = radius + sign * distance;
    if new_radius <= 1e-12 {
        return None;
    }

    let end_angle = start_angle + sweep;
    Some((
        cx + new_radius * start_angle.cos(),
        cy + new_radius * start_angle.sin(),
        cx + new_radius * end_angle.cos(),
        cy + new_radius * end_angle.sin(),
        bulge,
    ))
}
