use super::slice::PlineSlice;
use crate::geometry::pline::Pline;
use crate::math::arc_2d::{arc_from_bulge, arc_point_at};
use crate::math::distance_2d::{point_to_arc_dist, point_to_segment_dist};

/// Keeps the slices that stay clear of the source polyline.
///
/// A slice whose middle vertex comes closer than half the offset distance to
/// the source is a loop the offset folded back over, not a valid boundary.
#[must_use]
pub fn apply<'a>(slices: &'a [PlineSlice], source: &Pline, distance: f64) -> Vec<&'a PlineSlice> {
    let threshold = distance.abs() * 0.5;
    slices
        .iter()
        .filter(|s| {
            s.vertices.len() >= 2 && {
                let mid = &s.vertices[s.vertices.len() / 2];
                distance_to(mid.x, mid.y, source) >= threshold
            }
        })
        .collect()
}

/// True if no vertex or segment middle of `candidate` comes closer to the
/// source than the offset distance.
///
/// A ring offset past its own center ends up on the far side of the source
/// and fails this even when it keeps its winding.
#[must_use]
pub fn clears_source(candidate: &Pline, source: &Pline, distance: f64) -> bool {
    let threshold = distance.abs() - crate::math::EPSILON;
    let n = candidate.vertices.len();
    (0..candidate.segment_count()).all(|i| {
        let v0 = &candidate.vertices[i];
        let v1 = &candidate.vertices[(i + 1) % n];
        let (mx, my) = if v0.is_arc() {
            let (cx, cy, r, sa, sw) = arc_from_bulge(v0.x, v0.y, v1.x, v1.y, v0.bulge);
            arc_point_at(cx, cy, r, sa, sw, 0.5)
        } else {
            ((v0.x + v1.x) * 0.5, (v0.y + v1.y) * 0.5)
        };
        distance_to(v0.x, v0.y, source) >= threshold && distance_to(mx, my, source) >= threshold
    })
}

fn distance_to(px: f64, py: f64, pline: &Pline) -> f64 {
    let n = pline.vertices.len();
    (0..pline.segment_count())
        .map(|i| {
            let v0 = &pline.vertices[i];
            let v1 = &pline.vertices[(i + 1) % n];
            if v0.is_arc() {
                let (cx, cy, r, sa, sw) = arc_from_bulge(v0.x, v0.y, v1.x, v1.y, v0.bulge);
                point_to_arc_dist(px, py, cx, cy, r, sa, sw)
            } else {
                point_to_segment_dist(px, py, v0.x, v0.y, v1.x, v1.y)
            }
        })
        .fold(f64::MAX, f64::min)
}
