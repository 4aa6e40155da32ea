use tracing::{debug, trace};

use super::stock::{RegionCode, StockSilhouette};
use super::{split_at_params, CutRegion, Piece, SegmentClass};
use crate::error::{OperationError, Result};
use crate::geometry::{Arc, Line, Segment};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::intersect_2d::{angle_to_arc_param, circle_circle_points, line_circle_params};
use crate::math::{Point3, TOLERANCE};

/// Closed-form trimming of segments against the stock silhouette.
///
/// Keeps what lies over the stock: lines against a circle use the
/// closest-point half-chord, arcs against a circle the radical line, and
/// lines against a rectangle Cohen–Sutherland clipping. Arcs against a
/// rectangle are accepted or rejected whole.
#[derive(Debug, Clone)]
pub struct StockClipper {
    silhouette: StockSilhouette,
}

impl StockClipper {
    /// Creates a clipper for `silhouette`.
    #[must_use]
    pub fn new(silhouette: StockSilhouette) -> Self {
        Self { silhouette }
    }

    /// Returns the stock outline.
    #[must_use]
    pub fn silhouette(&self) -> &StockSilhouette {
        &self.silhouette
    }

    fn line_against_circle(line: &Line, center: &Point3, radius: f64) -> SegmentClass {
        let (s, e) = (line.start(), line.end());
        let closest = point_to_segment_dist(center.x, center.y, s.x, s.y, e.x, e.y);
        if closest >= radius {
            return SegmentClass::Outside;
        }
        let inside = |p: &Point3| (p.x - center.x).hypot(p.y - center.y) <= radius;
        if inside(&s) && inside(&e) {
            SegmentClass::Inside
        } else {
            SegmentClass::Ambiguous
        }
    }

    fn arc_against_circle(arc: &Arc, center: &Point3, radius: f64) -> SegmentClass {
        let c = arc.center();
        let r = arc.radius();
        let d = (c.x - center.x).hypot(c.y - center.y);
        if d < TOLERANCE {
            return if r > radius { SegmentClass::Outside } else { SegmentClass::Inside };
        }
        if d >= radius + r || r >= d + radius {
            SegmentClass::Outside
        } else if d + r <= radius {
            SegmentClass::Inside
        } else {
            SegmentClass::Ambiguous
        }
    }

    fn against_rect(seg: &Segment, min: &Point3, max: &Point3) -> SegmentClass {
        let rect = StockSilhouette::BoundingRect { min: *min, max: *max };
        let codes: Vec<RegionCode> = match seg {
            Segment::Line(l) => vec![rect.region(&l.start(), 0.0), rect.region(&l.end(), 0.0)],
            Segment::Arc(a) => [a.start(), a.midpoint(), a.end()]
                .iter()
                .map(|p| rect.region(p, 0.0))
                .collect(),
        };
        if codes.iter().all(|c| c.is_inside()) {
            SegmentClass::Inside
        } else if codes.windows(2).all(|w| w[0].shares_side(w[1])) && shared_side(&codes) {
            SegmentClass::Outside
        } else {
            SegmentClass::Ambiguous
        }
    }

    /// Cuts a line where it crosses the circle `center`/`radius`.
    fn cut_line_circle(line: &Line, center: &Point3, radius: f64) -> Result<Vec<Piece>> {
        let seg = Segment::Line(*line);
        let Some((t_closest, _, Some(half))) =
            line_circle_params(&line.start(), &line.end(), center, radius)
        else {
            return Err(ambiguous(&seg));
        };
        let (enter, leave) = (t_closest - half, t_closest + half);
        let cuts: Vec<f64> = [enter, leave].into_iter().filter(|t| *t > 0.0 && *t < 1.0).collect();
        if cuts.is_empty() {
            return Err(ambiguous(&seg));
        }
        trace!(enter, leave, "line crosses round stock");
        Ok(split_at_params(&seg, &cuts)
            .into_iter()
            .map(|part| {
                let mid = part.midpoint();
                let inside = (mid.x - center.x).hypot(mid.y - center.y) <= radius;
                Piece::new(part, inside)
            })
            .collect())
    }

    /// Cuts an arc at the radical-line points of its circle and the stock circle.
    fn cut_arc_circle(arc: &Arc, center: &Point3, radius: f64) -> Result<Vec<Piece>> {
        let seg = Segment::Arc(*arc);
        let c = arc.center();
        let mut cuts: Vec<f64> =
            circle_circle_points(center.x, center.y, radius, c.x, c.y, arc.radius())
                .into_iter()
                .filter_map(|(x, y)| {
                    let angle = (y - c.y).atan2(x - c.x);
                    angle_to_arc_param(angle, arc.start_angle(), arc.sweep())
                })
                .filter(|t| *t > 0.0 && *t < 1.0)
                .collect();
        cuts.sort_by(f64::total_cmp);
        cuts.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);
        if cuts.is_empty() {
            return Err(ambiguous(&seg));
        }
        trace!(cuts = cuts.len(), "arc crosses round stock");
        Ok(split_at_params(&seg, &cuts)
            .into_iter()
            .map(|part| {
                let mid = part.midpoint();
                let inside = (mid.x - center.x).hypot(mid.y - center.y) <= radius;
                Piece::new(part, inside)
            })
            .collect())
    }

    /// Cohen–Sutherland clipping of a line to the rectangle.
    fn cut_line_rect(line: &Line, min: &Point3, max: &Point3) -> Vec<Piece> {
        let rect = StockSilhouette::BoundingRect { min: *min, max: *max };
        let (mut p0, mut p1) = (line.start(), line.end());
        let (dx, dy) = (p1.x - p0.x, p1.y - p0.y);
        let mut c0 = rect.region(&p0, 0.0);
        let mut c1 = rect.region(&p1, 0.0);

        let accepted = loop {
            if c0.is_inside() && c1.is_inside() {
                break true;
            }
            if c0.shares_side(c1) {
                break false;
            }
            let out = if c0.is_inside() { c1 } else { c0 };
            let (x, y) = if out.has(RegionCode::TOP) {
                (p0.x + dx * (max.y - p0.y) / dy, max.y)
            } else if out.has(RegionCode::BOTTOM) {
                (p0.x + dx * (min.y - p0.y) / dy, min.y)
            } else if out.has(RegionCode::RIGHT) {
                (max.x, p0.y + dy * (max.x - p0.x) / dx)
            } else {
                (min.x, p0.y + dy * (min.x - p0.x) / dx)
            };
            if out == c0 && !c0.is_inside() {
                p0 = Point3::new(x, y, p0.z);
                c0 = rect.region(&p0, TOLERANCE);
            } else {
                p1 = Point3::new(x, y, p1.z);
                c1 = rect.region(&p1, TOLERANCE);
            }
        };

        if !accepted {
            return vec![Piece::new(Segment::Line(*line), false)];
        }
        let mut pieces = Vec::with_capacity(3);
        for (a, b, inside) in [(line.start(), p0, false), (p0, p1, true), (p1, line.end(), false)] {
            let part = Segment::line(a, b);
            if !part.is_degenerate() {
                pieces.push(Piece::new(part, inside));
            }
        }
        pieces
    }
}

fn shared_side(codes: &[RegionCode]) -> bool {
    [RegionCode::LEFT, RegionCode::RIGHT, RegionCode::BOTTOM, RegionCode::TOP]
        .iter()
        .any(|side| codes.iter().all(|c| c.has(*side)))
}

fn ambiguous(seg: &Segment) -> crate::error::MillpathError {
    OperationError::ClipAmbiguous(format!("no trim point within {seg}")).into()
}

impl CutRegion for StockClipper {
    fn classify(&self, seg: &Segment) -> SegmentClass {
        match (&self.silhouette, seg) {
            (StockSilhouette::Circle { center, radius }, Segment::Line(l)) => {
                Self::line_against_circle(l, center, *radius)
            }
            (StockSilhouette::Circle { center, radius }, Segment::Arc(a)) => {
                Self::arc_against_circle(a, center, *radius)
            }
            (StockSilhouette::BoundingRect { min, max }, _) => Self::against_rect(seg, min, max),
        }
    }

    fn trim(&self, seg: &Segment) -> Result<Vec<Piece>> {
        match (&self.silhouette, seg) {
            (StockSilhouette::Circle { center, radius }, Segment::Line(l)) => {
                Self::cut_line_circle(l, center, *radius)
            }
            (StockSilhouette::Circle { center, radius }, Segment::Arc(a)) => {
                Self::cut_arc_circle(a, center, *radius)
            }
            (StockSilhouette::BoundingRect { min, max }, Segment::Line(l)) => {
                Ok(Self::cut_line_rect(l, min, max))
            }
            (StockSilhouette::BoundingRect { .. }, Segment::Arc(_)) => {
                debug!(segment = %seg, "arc kept whole against rectangular stock");
                Ok(vec![Piece::new(seg.clone(), true)])
            }
        }
    }

    fn contains(&self, p: &Point3) -> bool {
        self.silhouette.contains(p)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::Contour;
    use crate::math::{same_point, Vector3};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn round(radius: f64) -> StockClipper {
        StockClipper::new(StockSilhouette::Circle {
            center: Point3::origin(),
            radius,
        })
    }

    fn rect() -> StockClipper {
        StockClipper::new(StockSilhouette::BoundingRect {
            min: p(-10.0, -5.0),
            max: p(10.0, 5.0),
        })
    }

    #[test]
    fn line_through_round_stock_is_trimmed_to_chord() {
        let kept = round(10.0).inside_parts(&Segment::line(p(-20.0, 0.0), p(20.0, 0.0)));
        assert_eq!(kept.len(), 1);
        assert!(same_point(&kept[0].start(), &p(-10.0, 0.0)));
        assert!(same_point(&kept[0].end(), &p(10.0, 0.0)));
    }

    #[test]
    fn line_leaving_round_stock_keeps_inner_part() {
        let kept = round(10.0).inside_parts(&Segment::line(p(0.0, 0.0), p(0.0, 20.0)));
        assert_eq!(kept.len(), 1);
        assert!(same_point(&kept[0].end(), &p(0.0, 10.0)));
    }

    #[test]
    fn line_classification_against_circle() {
        let c = round(10.0);
        let above = Segment::line(p(-20.0, 12.0), p(20.0, 12.0));
        assert_eq!(c.classify(&above), SegmentClass::Outside);
        let short = Segment::line(p(-2.0, 1.0), p(3.0, 1.0));
        assert_eq!(c.classify(&short), SegmentClass::Inside);
        let through = Segment::line(p(-20.0, 0.0), p(20.0, 0.0));
        assert_eq!(c.classify(&through), SegmentClass::Ambiguous);
    }

    #[test]
    fn arc_endpoint_lands_on_stock_circle() {
        let arc = Arc::from_sweep(Point3::new(5.0, 0.0, 0.0), 8.0, -FRAC_PI_2, PI).unwrap();
        let seg = Segment::Arc(arc);
        let c = round(10.0);
        assert_eq!(c.classify(&seg), SegmentClass::Ambiguous);

        let pieces = c.trim(&seg).unwrap();
        assert_eq!(pieces.len(), 3);
        assert!(pieces[0].inside && !pieces[1].inside && pieces[2].inside);
        for cut in [pieces[0].segment.end(), pieces[2].segment.start()] {
            assert_relative_eq!(cut.x.hypot(cut.y), 10.0, epsilon = 1e-3);
            assert_relative_eq!(cut.x, 6.1, epsilon = 1e-9);
        }
    }

    #[test]
    fn concentric_arcs_are_all_or_nothing() {
        let c = round(10.0);
        let inner = Segment::Arc(Arc::from_sweep(Point3::origin(), 5.0, 0.0, 1.0).unwrap());
        let outer = Segment::Arc(Arc::from_sweep(Point3::origin(), 15.0, 0.0, 1.0).unwrap());
        assert_eq!(c.classify(&inner), SegmentClass::Inside);
        assert_eq!(c.classify(&outer), SegmentClass::Outside);
    }

    #[test]
    fn arc_span_missing_the_crossing_is_kept_whole() {
        // The circles cross near x = 6.1, but this arc stays on the far side.
        let arc = Arc::new(
            Point3::new(5.0, 0.0, 0.0),
            Vector3::z(),
            Point3::new(5.0, 8.0, 0.0),
            Point3::new(5.0, -8.0, 0.0),
        )
        .unwrap();
        let seg = Segment::Arc(arc);
        let c = round(10.0);
        assert!(c.trim(&seg).is_err());
        assert_eq!(c.pieces(&seg), vec![Piece::new(seg, true)]);
    }

    #[test]
    fn arc_outside_crossing_circle_is_dropped() {
        // Its circle crosses the stock near x = 6.1, but the span from -30
        // to 30 degrees stays beyond it.
        let arc = Arc::from_sweep(Point3::new(5.0, 0.0, 0.0), 8.0, -PI / 6.0, PI / 3.0).unwrap();
        let seg = Segment::Arc(arc);
        let c = round(10.0);
        assert_eq!(c.classify(&seg), SegmentClass::Ambiguous);
        assert!(c.trim(&seg).is_err());
        assert!(c.inside_parts(&seg).is_empty());
        assert_eq!(c.pieces(&seg), vec![Piece::new(seg, false)]);
    }

    #[test]
    fn cohen_sutherland_trims_both_ends() {
        let pieces = rect().pieces(&Segment::line(p(-20.0, 0.0), p(20.0, 0.0)));
        let inside: Vec<&Piece> = pieces.iter().filter(|p| p.inside).collect();
        assert_eq!(pieces.len(), 3);
        assert_eq!(inside.len(), 1);
        assert!(same_point(&inside[0].segment.start(), &p(-10.0, 0.0)));
        assert!(same_point(&inside[0].segment.end(), &p(10.0, 0.0)));
    }

    #[test]
    fn cohen_sutherland_diagonal_through_corner_region() {
        let kept = rect().inside_parts(&Segment::line(p(-15.0, -10.0), p(15.0, 10.0)));
        assert_eq!(kept.len(), 1);
        assert!(same_point(&kept[0].start(), &p(-7.5, -5.0)));
        assert!(same_point(&kept[0].end(), &p(7.5, 5.0)));
    }

    #[test]
    fn lines_past_one_side_are_rejected() {
        let c = rect();
        assert_eq!(c.classify(&Segment::line(p(-20.0, 8.0), p(20.0, 9.0))), SegmentClass::Outside);
        // Crosses the corner region without entering the rectangle.
        assert!(c.inside_parts(&Segment::line(p(-12.0, 2.0), p(-8.0, 9.0))).is_empty());
    }

    #[test]
    fn arcs_against_rect_are_whole() {
        let c = rect();
        let crossing =
            Segment::Arc(Arc::from_sweep(Point3::new(8.0, 0.0, 0.0), 4.0, -FRAC_PI_2, PI).unwrap());
        assert_eq!(c.classify(&crossing), SegmentClass::Ambiguous);
        assert_eq!(c.inside_parts(&crossing), vec![crossing]);
        let far =
            Segment::Arc(Arc::from_sweep(Point3::new(30.0, 0.0, 0.0), 2.0, 0.0, 1.0).unwrap());
        assert_eq!(c.classify(&far), SegmentClass::Outside);
    }

    #[test]
    fn clipping_an_open_contour_splits_fragments() {
        let mut c = Contour::new(Point3::origin());
        c.add(Segment::line(p(-8.0, 0.0), p(-8.0, 20.0))).unwrap();
        c.add(Segment::line(p(-8.0, 20.0), p(8.0, 20.0))).unwrap();
        c.add(Segment::line(p(8.0, 20.0), p(8.0, 0.0))).unwrap();
        let fragments = round(10.0).clip(&c).unwrap();
        assert_eq!(fragments.len(), 2);
        assert!(same_point(&fragments[0].start().unwrap(), &p(-8.0, 0.0)));
        assert_relative_eq!(fragments[1].end().unwrap().y, 0.0);
    }
}
