use super::{split_at_params, CutRegion, Piece, SegmentClass};
use crate::error::{OperationError, Result};
use crate::geometry::pline::FLATTEN_TOLERANCE;
use crate::geometry::{Contour, Segment};
use crate::math::intersect_2d::{
    arc_arc_intersect_2d, line_arc_intersect_2d, segment_segment_intersect_2d,
};
use crate::math::polygon_2d::point_in_polygon_2d;
use crate::math::{Point3, TOLERANCE};

/// Planar region enclosed by a closed contour; the material a cut may
/// remove at one level.
#[derive(Debug, Clone)]
pub struct SectionRegion {
    boundary: Contour,
    outline: Vec<Point3>,
}

impl SectionRegion {
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` when `boundary` is not closed.
    pub fn new(boundary: Contour) -> Result<Self> {
        if !boundary.is_closed() {
            return Err(
                OperationError::InvalidInput("section boundary must be closed".to_owned()).into(),
            );
        }
        let outline = boundary.to_pline().to_points(FLATTEN_TOLERANCE);
        Ok(Self { boundary, outline })
    }

    /// Returns the closed contour bounding the section.
    #[must_use]
    pub fn boundary(&self) -> &Contour {
        &self.boundary
    }

    /// Sorted parameters on `seg` where it meets the boundary.
    fn crossings(&self, seg: &Segment) -> Vec<f64> {
        let mut ts: Vec<f64> = self
            .boundary
            .segments()
            .iter()
            .flat_map(|b| params_on(seg, b))
            .filter(|t| *t > TOLERANCE && *t < 1.0 - TOLERANCE)
            .collect();
        ts.sort_by(f64::total_cmp);
        ts.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE * 100.0);
        ts
    }
}

/// Parameters on `a` of its intersections with `b`.
fn params_on(a: &Segment, b: &Segment) -> Vec<f64> {
    match (a, b) {
        (Segment::Line(la), Segment::Line(lb)) => {
            segment_segment_intersect_2d(&la.start(), &la.end(), &lb.start(), &lb.end())
                .map(|(_, t, _)| vec![t])
                .unwrap_or_default()
        }
        (Segment::Line(l), Segment::Arc(arc)) => {
            let (s, e, c) = (l.start(), l.end(), arc.center());
            line_arc_intersect_2d(
                s.x,
                s.y,
                e.x,
                e.y,
                c.x,
                c.y,
                arc.radius(),
                arc.start_angle(),
                arc.sweep(),
            )
            .into_iter()
            .map(|(_, t, _)| t)
                .collect()
        }
        (Segment::Arc(arc), Segment::Line(l)) => {
            let (s, e, c) = (l.start(), l.end(), arc.center());
            line_arc_intersect_2d(
                s.x,
                s.y,
                e.x,
                e.y,
                c.x,
                c.y,
                arc.radius(),
                arc.start_angle(),
                arc.sweep(),
            )
            .into_iter()
            .map(|(_, _, t)| t)
                .collect()
        }
        (Segment::Arc(a1), Segment::Arc(a2)) => {
            let (c1, c2) = (a1.center(), a2.center());
            arc_arc_intersect_2d(
                c1.x,
                c1.y,
                a1.radius(),
                a1.start_angle(),
                a1.sweep(),
                c2.x,
                c2.y,
                a2.radius(),
                a2.start_angle(),
                a2.sweep(),
            )
            .into_iter()
            .map(|(_, t, _)| t)
            .collect()
        }
    }
}

impl CutRegion for SectionRegion {
    fn classify(&self, seg: &Segment) -> SegmentClass {
        if !self.crossings(seg).is_empty() {
            SegmentClass::Ambiguous
        } else if self.contains(&seg.midpoint()) {
            SegmentClass::Inside
        } else {
            SegmentClass::Outside
        }
    }

    fn trim(&self, seg: &Segment) -> Result<Vec<Piece>> {
        let cuts = self.crossings(seg);
        if cuts.is_empty() {
            return Err(
                OperationError::ClipAmbiguous(format!("{seg} does not cross the section")).into(),
            );
        }
        Ok(split_at_params(seg, &cuts)
            .into_iter()
            .map(|part| {
                let inside = self.contains(&part.midpoint());
                Piece::new(part, inside)
            })
            .collect())
    }

    /// Crossing-number test in the XY plane.
    fn contains(&self, p: &Point3) -> bool {
        point_in_polygon_2d(p, &self.outline)
    }
}
