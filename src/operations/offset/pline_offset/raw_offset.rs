use tracing::debug;

use crate::geometry::pline::{Pline, PlineVertex};
use crate::math::arc_2d::{arc_from_bulge, arc_tangent_at, offset_arc_segment};
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::polygon_2d::left_normal;
use crate::math::{Point3, Vector3, TOLERANCE};

/// Maximum miter distance as a multiple of `|distance|`.
const MITER_LIMIT: f64 = 4.0;

/// Threshold for flat cap: `cos(angle) < this` → near-180° reversal.
const FLAT_CAP_COS: f64 = -0.98;

/// An offset segment with endpoints, bulge, and tangent directions.
struct OffsetSeg {
    start: (f64, f64),
    end: (f64, f64),
    bulge: f64,
    start_dir: (f64, f64),
    end_dir: (f64, f64),
    /// Source vertex the segment was offset from; reference for the miter limit.
    source: (f64, f64),
}

/// Builds the raw offset polyline by offsetting each segment and joining
/// neighbours at their corners.
///
/// Arcs whose radius collapses are dropped so their neighbours meet at a
/// sharp corner. Zero-length lines are skipped. Returns `None` when no
/// segment survives.
pub fn build(pline: &Pline, distance: f64) -> Option<Pline> {
    let n = pline.vertices.len();
    let seg_count = pline.segment_count();
    let mut offset_segs: Vec<OffsetSeg> = Vec::with_capacity(seg_count);

    for i in 0..seg_count {
        let v0 = &pline.vertices[i];
        let v1 = &pline.vertices[(i + 1) % n];
        if let Some(seg) = offset_one(v0, v1, distance) {
            offset_segs.push(seg);
        }
    }
    if offset_segs.is_empty() {
        return None;
    }
    if offset_segs.len() < seg_count {
        debug!(dropped = seg_count - offset_segs.len(), "collapsed segments skipped");
    }

    let count = offset_segs.len();
    let mut verts = Vec::with_capacity(count * 2);
    if pline.closed {
        for i in 0..count {
            let prev = if i == 0 { count - 1 } else { i - 1 };
            push_corner_and_seg_start(&mut verts, &offset_segs[prev], &offset_segs[i], distance);
        }
    } else {
        let first = &offset_segs[0];
        verts.push(PlineVertex::new(first.start.0, first.start.1, first.bulge));
        for i in 1..count {
            push_corner_and_seg_start(&mut verts, &offset_segs[i - 1], &offset_segs[i], distance);
        }
        let last = &offset_segs[count - 1];
        verts.push(PlineVertex::line(last.end.0, last.end.1));
    }

    Some(Pline {
        vertices: verts,
        closed: pline.closed,
    })
}

fn offset_one(v0: &PlineVertex, v1: &PlineVertex, distance: f64) -> Option<OffsetSeg> {
    if !v0.is_arc() {
        let dir = Vector3::new(v1.x - v0.x, v1.y - v0.y, 0.0).try_normalize(TOLERANCE)?;
        let normal = left_normal(dir);
        let d = (dir.x, dir.y);
        return Some(OffsetSeg {
            start: (v0.x + normal.x * distance, v0.y + normal.y * distance),
            end: (v1.x + normal.x * distance, v1.y + normal.y * distance),
            bulge: 0.0,
            start_dir: d,
            end_dir: d,
            source: (v0.x, v0.y),
        });
    }

    let (ox0, oy0, ox1, oy1, ob) = offset_arc_segment(v0.x, v0.y, v1.x, v1.y, v0.bulge, distance)?;
    let (_, _, _, sa, sw) = arc_from_bulge(ox0, oy0, ox1, oy1, ob);
    Some(OffsetSeg {
        start: (ox0, oy0),
        end: (ox1, oy1),
        bulge: ob,
        start_dir: arc_tangent_at(sa, sw, 0.0),
        end_dir: arc_tangent_at(sa, sw, 1.0),
        source: (v0.x, v0.y),
    })
}

/// Pushes corner vertex/vertices between two consecutive offset segments,
/// then sets the last pushed vertex's bulge to the next segment's bulge.
///
/// Near-antiparallel joins get a flat cap, over-long miters a bevel, and
/// everything else a single miter point.
fn push_corner_and_seg_start(
    verts: &mut Vec<PlineVertex>,
    seg_prev: &OffsetSeg,
    seg_next: &OffsetSeg,
    distance: f64,
) {
    let (orig_x, orig_y) = seg_next.source;
    let dir_prev = &seg_prev.end_dir;
    let dir_next = &seg_next.start_dir;
    let cos_angle = dir_prev.0 * dir_next.0 + dir_prev.1 * dir_next.1;

    if cos_angle < FLAT_CAP_COS {
        // Near-antiparallel: flat cap.
        verts.push(PlineVertex::line(seg_prev.end.0, seg_prev.end.1));
        verts.push(PlineVertex::new(
            seg_next.start.0,
            seg_next.start.1,
            seg_next.bulge,
        ));
        return;
    }

    // Try miter intersection using tangent directions at the join point.
    let p_prev = Point3::new(seg_prev.end.0, seg_prev.end.1, 0.0);
    let d_prev = Vector3::new(dir_prev.0, dir_prev.1, 0.0);
    let p_next = Point3::new(seg_next.start.0, seg_next.start.1, 0.0);
    let d_next = Vector3::new(dir_next.0, dir_next.1, 0.0);

    if let Some((t, _)) = line_line_intersect_2d(&p_prev, &d_prev, &p_next, &d_next) {
        let corner_x = p_prev.x + d_prev.x * t;
        let corner_y = p_prev.y + d_prev.y * t;

        let dx = corner_x - orig_x;
        let dy = corner_y - orig_y;
        let miter_dist_sq = dx * dx + dy * dy;
        let limit = MITER_LIMIT * distance.abs();

        if miter_dist_sq > limit * limit {
            // Miter too long: bevel.
            verts.push(PlineVertex::line(seg_prev.end.0, seg_prev.end.1));
            verts.push(PlineVertex::new(
                seg_next.start.0,
                seg_next.start.1,
                seg_next.bulge,
            ));
        } else {
            verts.push(PlineVertex::new(corner_x, corner_y, seg_next.bulge));
        }
    } else {
        // Parallel: use offset of the original corner point.
        let fallback_normal = left_normal(
            Vector3::new(d_prev.x, d_prev.y, 0.0)
                .try_normalize(TOLERANCE)
                .unwrap_or(Vector3::new(1.0, 0.0, 0.0)),
        );
        verts.push(PlineVertex::new(
            orig_x + fallback_normal.x * distance,
            orig_y + fallback_normal.y * distance,
            seg_next.bulge,
        ));
    }
}
