use super::self_intersect::Intersection;
use crate::geometry::pline::PlineVertex;
use crate::math::arc_2d::{arc_from_bulge, arc_point_at};

/// Stretch of the raw offset between two consecutive crossing points.
#[derive(Debug, Clone)]
pub struct PlineSlice {
    pub vertices: Vec<PlineVertex>,
}

/// A crossing position on the raw offset: segment index and parameter.
type Cut = (usize, f64);

/// Cuts the raw offset at every crossing and returns the pieces in travel
/// order. The last piece wraps around to the first cut.
#[must_use]
pub fn build(
    vertices: &[PlineVertex],
    n_segs: usize,
    intersections: &[Intersection],
) -> Vec<PlineSlice> {
    if intersections.is_empty() || vertices.is_empty() {
        return Vec::new();
    }

    let mut cuts: Vec<Cut> = intersections
        .iter()
        .flat_map(|ix| [(ix.seg_i, ix.t_i), (ix.seg_j, ix.t_j)])
        .collect();
    cuts.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    (0..cuts.len())
        .map(|k| slice_between(vertices, n_segs, cuts[k], cuts[(k + 1) % cuts.len()]))
        .filter(|verts| verts.len() >= 2)
        .map(|vertices| PlineSlice { vertices })
        .collect()
}

fn slice_between(vertices: &[PlineVertex], n_segs: usize, from: Cut, to: Cut) -> Vec<PlineVertex> {
    let (seg_start, t_start) = from;
    let (seg_end, t_end) = to;
    let start = point_on_segment(vertices, seg_start, t_start);
    let end = point_on_segment(vertices, seg_end, t_end);

    if seg_start == seg_end && t_start <= t_end {
        let bulge = sub_bulge(vertices[seg_start].bulge, t_start, t_end);
        return vec![PlineVertex::new(start.0, start.1, bulge), PlineVertex::line(end.0, end.1)];
    }

    let first_bulge = sub_bulge(vertices[seg_start].bulge, t_start, 1.0);
    let mut verts = vec![PlineVertex::new(start.0, start.1, first_bulge)];
    let mut seg = (seg_start + 1) % n_segs;
    while seg != seg_end {
        verts.push(vertices[seg]);
        seg = (seg + 1) % n_segs;
    }
    let last = &vertices[seg_end];
    verts.push(PlineVertex::new(last.x, last.y, sub_bulge(last.bulge, 0.0, t_end)));
    verts.push(PlineVertex::line(end.0, end.1));
    verts
}

fn point_on_segment(vertices: &[PlineVertex], seg: usize, t: f64) -> (f64, f64) {
    let v0 = &vertices[seg];
    let v1 = &vertices[(seg + 1) % vertices.len()];
    if v0.is_arc() {
        let (cx, cy, r, sa, sw) = arc_from_bulge(v0.x, v0.y, v1.x, v1.y, v0.bulge);
        arc_point_at(cx, cy, r, sa, sw, t)
    } else {
        (v0.x + t * (v1.x - v0.x), v0.y + t * (v1.y - v0.y))
    }
}

/// Bulge of the part of a segment between `t_start` and `t_end`.
fn sub_bulge(bulge: f64, t_start: f64, t_end: f64) -> f64 {
    if bulge.abs() < 1e-12 {
        return 0.0;
    }
    let sweep = 4.0 * bulge.atan() * (t_end - t_start);
    (sweep / 4.0).tan()
}
