use crate::geometry::pline::{Pline, PlineVertex};
use crate::math::arc_2d::arc_from_bulge;
use crate::math::intersect_2d::{
    arc_arc_intersect_2d, line_arc_intersect_2d, segment_segment_intersect_2d,
};
use crate::math::{Point3, TOLERANCE};

/// Crossing of two non-adjacent polyline segments.
#[derive(Debug, Clone)]
pub struct Intersection {
    pub seg_i: usize,
    /// Always greater than `seg_i`.
    pub seg_j: usize,
    pub t_i: f64,
    pub t_j: f64,
}

/// Finds the proper crossings between non-adjacent segments, sorted by
/// segment index then parameter.
///
/// Hits at a segment end on either side are vertex touches and skipped.
#[must_use]
pub fn find_all(pline: &Pline) -> Vec<Intersection> {
    let n = pline.vertices.len();
    let seg_count = pline.segment_count();
    if seg_count < 3 {
        return Vec::new();
    }

    let eps = TOLERANCE * 100.0;
    let interior = |t: f64| t > eps && t < 1.0 - eps;
    let mut results = Vec::new();

    for i in 0..seg_count {
        for j in (i + 2)..seg_count {
            if pline.closed && i == 0 && j == seg_count - 1 {
                continue;
            }
            let a = (&pline.vertices[i], &pline.vertices[(i + 1) % n]);
            let b = (&pline.vertices[j], &pline.vertices[(j + 1) % n]);
            for (t_i, t_j) in crossings(a, b) {
                if interior(t_i) && interior(t_j) {
                    results.push(Intersection { seg_i: i, seg_j: j, t_i, t_j });
                }
            }
        }
    }

    results.sort_by(|a, b| a.seg_i.cmp(&b.seg_i).then(a.t_i.total_cmp(&b.t_i)));
    results
}

/// Parameter pairs where segment `a` meets segment `b`.
fn crossings(a: (&PlineVertex, &PlineVertex), b: (&PlineVertex, &PlineVertex)) -> Vec<(f64, f64)> {
    let ((a0, a1), (b0, b1)) = (a, b);
    match (a0.is_arc(), b0.is_arc()) {
        (false, false) => segment_segment_intersect_2d(
            &Point3::new(a0.x, a0.y, 0.0),
            &Point3::new(a1.x, a1.y, 0.0),
            &Point3::new(b0.x, b0.y, 0.0),
            &Point3::new(b1.x, b1.y, 0.0),
        )
        .map(|(_, t, u)| vec![(t, u)])
        .unwrap_or_default(),
        (false, true) => {
            let (cx, cy, r, sa, sw) = arc_from_bulge(b0.x, b0.y, b1.x, b1.y, b0.bulge);
            line_arc_intersect_2d(a0.x, a0.y, a1.x, a1.y, cx, cy, r, sa, sw)
                .into_iter()
                .map(|(_, t_line, t_arc)| (t_line, t_arc))
                .collect()
        }
        (true, false) => {
            let (cx, cy, r, sa, sw) = arc_from_bulge(a0.x, a0.y, a1.x, a1.y, a0.bulge);
            line_arc_intersect_2d(b0.x, b0.y, b1.x, b1.y, cx, cy, r, sa, sw)
                .into_iter()
                .map(|(_, t_line, t_arc)| (t_arc, t_line))
                .collect()
        }
        (true, true) => {
            let (c1x, c1y, r1, s1, sw1) = arc_from_bulge(a0.x, a0.y, a1.x, a1.y, a0.bulge);
            let (c2x, c2y, r2, s2, sw2) = arc_from_bulge(b0.x, b0.y, b1.x, b1.y, b0.bulge);
            arc_arc_intersect_2d(c1x, c1y, r1, s1, sw1, c2x, c2y, r2, s2, sw2)
                .into_iter()
                .map(|(_, t, u)| (t, u))
                .collect()
        }
    }
}
