use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::boundary::{edges_to_segments, BoundaryEdge};
use super::pline::{Pline, PlineVertex, FLATTEN_TOLERANCE};
use super::segment::{Arc, Segment};
use super::text::{format_point, parse_field, parse_point};
use crate::error::{GeometryError, MillpathError, Result};
use crate::math::arc_2d::{arc_from_bulge, bulge_from_sweep};
use crate::math::direction::angle_around;
use crate::math::polygon_2d::centroid_2d;
use crate::math::{same_point, Point3};

/// An ordered chain of segments forming one machinable path.
///
/// Consecutive segments share their joint point. `center` is the reference
/// for angular ordering; `order` is the offset ring index (0 = outermost).
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    segments: Vec<Segment>,
    center: Point3,
    order: i32,
}

impl Contour {
    /// Creates an empty contour around `center`.
    #[must_use]
    pub fn new(center: Point3) -> Self {
        Self::with_order(center, 0)
    }

    /// Creates an empty contour around `center` tagged with ring `order`.
    #[must_use]
    pub fn with_order(center: Point3, order: i32) -> Self {
        Self {
            segments: Vec::new(),
            center,
            order,
        }
    }

    /// Builds a contour from a pre-ordered wire of boundary edges.
    ///
    /// # Errors
    ///
    /// Fails with `GeometryError::Unsupported` for curve types other than
    /// lines and arcs, and with `GeometryError::Mismatch` when the edges do
    /// not form a connected chain.
    pub fn set_contour<I>(&mut self, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = BoundaryEdge>,
    {
        for seg in edges_to_segments(edges)? {
            self.add(seg)?;
        }
        Ok(())
    }

    /// Returns the reference center for angles.
    #[must_use]
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Returns the offset ring index.
    #[must_use]
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Tags the contour with offset ring `order`.
    pub fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    /// Returns the segments in travel order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the contour has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the start of the first segment.
    #[must_use]
    pub fn start(&self) -> Option<Point3> {
        self.segments.first().map(Segment::start)
    }

    /// Returns the end of the last segment.
    #[must_use]
    pub fn end(&self) -> Option<Point3> {
        self.segments.last().map(Segment::end)
    }

    /// Returns true if the end meets the start.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.start(), self.end()) {
            (Some(s), Some(e)) => same_point(&s, &e),
            _ => false,
        }
    }

    /// Returns true if either endpoint of `seg` meets an open end.
    #[must_use]
    pub fn touches(&self, seg: &Segment) -> bool {
        let (Some(s), Some(e)) = (self.start(), self.end()) else {
            return true;
        };
        [seg.start(), seg.end()]
            .iter()
            .any(|p| same_point(p, &s) || same_point(p, &e))
    }

    /// Adds a segment at whichever open end it meets, inverting it if needed.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Mismatch` when neither endpoint meets the
    /// contour's start or end.
    pub fn add(&mut self, mut seg: Segment) -> Result<()> {
        let (Some(start), Some(end)) = (self.start(), self.end()) else {
            self.segments.push(seg);
            return Ok(());
        };

        if same_point(&seg.end(), &end) || same_point(&seg.start(), &start) {
            seg.invert();
        }
        if same_point(&seg.start(), &end) {
            self.segments.push(seg);
        } else if same_point(&seg.end(), &start) {
            self.segments.insert(0, seg);
        } else {
            return Err(GeometryError::Mismatch(format!(
                "segment {} does not touch contour ends {} / {}",
                seg,
                format_point(&start),
                format_point(&end)
            ))
            .into());
        }
        Ok(())
    }

    /// Absorbs `other` at the end it meets.
    ///
    /// On failure `other` is handed back and `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the rejected contour when no open ends meet or when its
    /// segments do not form one chain.
    pub fn try_merge(&mut self, other: Contour) -> std::result::Result<(), Contour> {
        let (Some(os), Some(oe)) = (other.start(), other.end()) else {
            return Ok(());
        };
        let (Some(s), Some(e)) = (self.start(), self.end()) else {
            self.segments = other.segments;
            return Ok(());
        };
        if self.is_closed() || other.is_closed() {
            return Err(other);
        }

        let forward = same_point(&os, &s) || same_point(&os, &e);
        let backward = same_point(&oe, &s) || same_point(&oe, &e);
        if !forward && !backward {
            return Err(other);
        }

        // Feed segments starting with the one touching this contour.
        let mut merged = self.clone();
        let ordered: Vec<&Segment> = if forward {
            other.segments.iter().collect()
        } else {
            other.segments.iter().rev().collect()
        };
        for seg in ordered {
            if let Err(e) = merged.add(seg.clone()) {
                debug!(error = %e, "merged contour was not a connected chain");
                return Err(other);
            }
        }
        *self = merged;
        Ok(())
    }

    /// Absorbs `other`, destroying it.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Mismatch` when no open ends meet.
    pub fn add_contour(&mut self, other: Contour) -> Result<()> {
        self.try_merge(other).map_err(|rejected| {
            MillpathError::from(GeometryError::Mismatch(format!(
                "contour with {} segments does not touch this contour",
                rejected.len()
            )))
        })
    }

    /// Reverses the travel direction.
    pub fn invert(&mut self) -> &mut Self {
        self.segments.reverse();
        for seg in &mut self.segments {
            seg.invert();
        }
        self
    }

    /// Moves every segment to height `z`.
    pub fn set_z(&mut self, z: f64) {
        for seg in &mut self.segments {
            seg.set_z(z);
        }
    }

    /// Angle of the start point around the center, in `[0, 2π)`.
    #[must_use]
    pub fn a0(&self) -> f64 {
        self.start().map_or(0.0, |p| angle_around(&self.center, &p))
    }

    /// Angle of the end point around the center, in `[0, 2π)`.
    #[must_use]
    pub fn a1(&self) -> f64 {
        self.end().map_or(0.0, |p| angle_around(&self.center, &p))
    }

    /// Returns the planar distance of the start from the center.
    #[must_use]
    pub fn distance_to_start(&self) -> f64 {
        self.start().map_or(0.0, |p| (p.x - self.center.x).hypot(p.y - self.center.y))
    }

    /// Returns the planar distance of the end from the center.
    #[must_use]
    pub fn distance_to_end(&self) -> f64 {
        self.end().map_or(0.0, |p| (p.x - self.center.x).hypot(p.y - self.center.y))
    }

    /// Prepares the contour for cutting at height `z`.
    ///
    /// Enforces the winding requested by `cw`, drops zero-length pieces,
    /// merges collinear lines and splits a lone segment in two.
    pub fn simplify(&mut self, z: f64, cw: bool) -> &[Segment] {
        self.set_z(z);
        if self.segments.iter().any(|s| !s.is_degenerate()) {
            self.segments.retain(|s| !s.is_degenerate());
        }

        let wrong_winding = if self.is_closed() {
            let area = self.signed_area();
            (cw && area > 0.0) || (!cw && area < 0.0)
        } else {
            (cw && self.a0() < self.a1()) || (!cw && self.a0() > self.a1())
        };
        if wrong_winding {
            self.invert();
        }

        self.merge_collinear();
        if self.segments.len() == 1 {
            let tail = self.segments[0].split();
            self.segments.push(tail);
        }
        &self.segments
    }

    fn merge_collinear(&mut self) {
        let mut i = 0;
        while i + 1 < self.segments.len() {
            if let (Segment::Line(a), Segment::Line(b)) =
                (&self.segments[i], &self.segments[i + 1])
            {
                if a.is_continued_by(b) {
                    let end = b.end();
                    if let Segment::Line(a) = &mut self.segments[i] {
                        a.set_end(end);
                    }
                    self.segments.remove(i + 1);
                    continue;
                }
            }
            i += 1;
        }

        // The seam of a closed ring may split one straight side.
        let n = self.segments.len();
        if n > 2 && self.is_closed() {
            if let (Segment::Line(last), Segment::Line(first)) =
                (&self.segments[n - 1], &self.segments[0])
            {
                if last.is_continued_by(first) {
                    let end = first.end();
                    if let Segment::Line(last) = &mut self.segments[n - 1] {
                        last.set_end(end);
                    }
                    self.segments.remove(0);
                }
            }
        }
    }

    /// Lengthens the leading end; arcs receive a tangent lead-in line.
    pub fn extend_start(&mut self, length: f64) {
        match self.segments.first_mut() {
            Some(Segment::Line(l)) => l.extend_start(length),
            Some(Segment::Arc(a)) => {
                let lead = a.start_tangent(length);
                self.segments.insert(0, Segment::Line(lead));
            }
            None => {}
        }
    }

    /// Lengthens the trailing end; arcs receive a tangent lead-out line.
    pub fn extend_end(&mut self, length: f64) {
        match self.segments.last_mut() {
            Some(Segment::Line(l)) => l.extend_end(length),
            Some(Segment::Arc(a)) => {
                let lead = a.end_tangent(length);
                self.segments.push(Segment::Line(lead));
            }
            None => {}
        }
    }

    /// Extends both ends of an open contour by `length`.
    ///
    /// Closed contours are left untouched.
    pub fn extend_by(&mut self, length: f64) -> &mut Self {
        if !self.is_closed() {
            self.extend_start(length);
            self.extend_end(length);
        }
        self
    }

    /// Rotates a closed contour to start at the segment start nearest `p`.
    ///
    /// Returns the resulting start point.
    pub fn change_start_to_close(&mut self, p: &Point3) -> Option<Point3> {
        if self.is_closed() {
            let nearest = self
                .segments
                .iter()
                .enumerate()
                .map(|(i, s)| (i, (s.start() - p).norm()))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i);
            if let Some(i) = nearest {
                self.segments.rotate_left(i);
            }
        }
        self.start()
    }

    /// Flattened bulge representation; full circles are emitted as two halves.
    #[must_use]
    pub fn to_pline(&self) -> Pline {
        let mut vertices = Vec::with_capacity(self.segments.len() + 1);
        for seg in &self.segments {
            match seg {
                Segment::Line(l) => vertices.push(PlineVertex::line(l.start().x, l.start().y)),
                Segment::Arc(a) if a.is_full_circle() => {
                    let (head, tail) = a.split_at(0.5);
                    for half in [head, tail] {
                        let s = half.start();
                        vertices.push(PlineVertex::new(s.x, s.y, bulge_from_sweep(half.sweep())));
                    }
                }
                Segment::Arc(a) => {
                    let s = a.start();
                    vertices.push(PlineVertex::new(s.x, s.y, bulge_from_sweep(a.sweep())));
                }
            }
        }
        let closed = self.is_closed();
        if !closed {
            if let Some(e) = self.end() {
                vertices.push(PlineVertex::line(e.x, e.y));
            }
        }
        Pline { vertices, closed }
    }

    /// Rebuilds a contour at height `z` from its bulge representation.
    #[must_use]
    pub fn from_pline(pline: &Pline, z: f64, center: Point3) -> Self {
        let mut contour = Self::new(center);
        let n = pline.vertices.len();
        for i in 0..pline.segment_count() {
            let v0 = &pline.vertices[i];
            let v1 = &pline.vertices[(i + 1) % n];
            let p0 = Point3::new(v0.x, v0.y, z);
            let p1 = Point3::new(v1.x, v1.y, z);
            let seg = if v0.is_arc() {
                let (cx, cy, radius, start_angle, sweep) =
                    arc_from_bulge(v0.x, v0.y, v1.x, v1.y, v0.bulge);
                match Arc::from_sweep(Point3::new(cx, cy, z), radius, start_angle, sweep) {
                    Ok(arc) => Segment::Arc(arc),
                    Err(_) => Segment::line(p0, p1),
                }
            } else {
                Segment::line(p0, p1)
            };
            if !seg.is_degenerate() {
                contour.segments.push(seg);
            }
        }
        contour
    }

    /// Signed enclosed area, positive for counter-clockwise travel.
    ///
    /// Open contours are closed by the chord from end to start.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let mut pline = self.to_pline();
        pline.closed = true;
        pline.signed_area()
    }

    /// Returns the absolute enclosed area.
    #[must_use]
    pub fn enclosed_area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid of the flattened contour.
    #[must_use]
    pub fn centroid(&self) -> Option<Point3> {
        let mut pline = self.to_pline();
        pline.closed = true;
        let z = self.start().map_or(0.0, |p| p.z);
        centroid_2d(&pline.to_points(FLATTEN_TOLERANCE)).map(|c| Point3::new(c.x, c.y, z))
    }
}

/// Ordering of sibling contours: by ring index, then by start angle.
#[must_use]
pub fn compare_contours(a: &Contour, b: &Contour) -> Ordering {
    a.order().cmp(&b.order()).then_with(|| a.a0().total_cmp(&b.a0()))
}

impl fmt::Display for Contour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C;{};{}", format_point(&self.center), self.order)?;
        for seg in &self.segments {
            write!(f, "|{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for Contour {
    type Err = MillpathError;

    fn from_str(s: &str) -> Result<Self> {
        let mut records = s.trim().split('|');
        let header: Vec<&str> = records.next().unwrap_or_default().split(';').collect();
        let ["C", center, order] = header.as_slice() else {
            return Err(GeometryError::Parse(format!("bad contour header in '{s}'")).into());
        };
        let mut contour = Self::with_order(parse_point(center)?, parse_field(order)?);
        for record in records {
            contour.add(record.parse()?)?;
        }
        Ok(contour)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::math::Vector3;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
        let mut c = Contour::new(p((x0 + x1) / 2.0, (y0 + y1) / 2.0));
        for (a, b) in [
            (p(x0, y0), p(x1, y0)),
            (p(x1, y0), p(x1, y1)),
            (p(x1, y1), p(x0, y1)),
            (p(x0, y1), p(x0, y0)),
        ] {
            c.add(Segment::line(a, b)).unwrap();
        }
        c
    }

    fn assert_chained(c: &Contour) {
        for pair in c.segments().windows(2) {
            assert!(same_point(&pair[0].end(), &pair[1].start()));
        }
    }

    #[test]
    fn add_appends_prepends_and_inverts() {
        let mut c = Contour::new(Point3::origin());
        c.add(Segment::line(p(1.0, 0.0), p(2.0, 0.0))).unwrap();
        c.add(Segment::line(p(3.0, 0.0), p(2.0, 0.0))).unwrap();
        c.add(Segment::line(p(1.0, 0.0), p(0.0, 0.0))).unwrap();
        assert_eq!(c.len(), 3);
        assert_chained(&c);
        assert_relative_eq!(c.start().unwrap().x, 0.0);
        assert_relative_eq!(c.end().unwrap().x, 3.0);
    }

    #[test]
    fn set_contour_appends_ordered_wire() {
        let edge = |a: Point3, b: Point3| BoundaryEdge::Line { start: a, end: b };
        let mut c = Contour::new(Point3::origin());
        c.set_contour([
            edge(p(0.0, 0.0), p(2.0, 0.0)),
            edge(p(2.0, 0.0), p(2.0, 2.0)),
            edge(p(2.0, 2.0), p(0.0, 0.0)),
        ])
        .unwrap();
        assert_eq!(c.len(), 3);
        assert!(c.is_closed());

        let err = Contour::new(Point3::origin())
            .set_contour([BoundaryEdge::Other("ellipse".into())])
            .unwrap_err();
        assert!(matches!(err, MillpathError::Geometry(GeometryError::Unsupported(_))));
    }

    #[test]
    fn add_rejects_unconnected_segment() {
        let mut c = Contour::new(Point3::origin());
        c.add(Segment::line(p(0.0, 0.0), p(1.0, 0.0))).unwrap();
        let err = c.add(Segment::line(p(5.0, 5.0), p(6.0, 5.0))).unwrap_err();
        assert!(matches!(err, MillpathError::Geometry(GeometryError::Mismatch(_))));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn merge_consumes_other_from_matching_end() {
        let mut a = Contour::new(Point3::origin());
        a.add(Segment::line(p(0.0, 0.0), p(1.0, 0.0))).unwrap();
        let mut b = Contour::new(Point3::origin());
        b.add(Segment::line(p(3.0, 0.0), p(2.0, 0.0))).unwrap();
        b.add(Segment::line(p(2.0, 0.0), p(1.0, 0.0))).unwrap();
        a.add_contour(b).unwrap();
        assert_eq!(a.len(), 3);
        assert_chained(&a);
        assert_relative_eq!(a.end().unwrap().x, 3.0);

        let mut far = Contour::new(Point3::origin());
        far.add(Segment::line(p(9.0, 9.0), p(8.0, 9.0))).unwrap();
        let back = a.try_merge(far).unwrap_err();
        assert_eq!(back.len(), 1);
    }

    #[test]
    fn broken_chain_is_not_merged() {
        let mut a = Contour::new(Point3::origin());
        a.add(Segment::line(p(0.0, 0.0), p(1.0, 0.0))).unwrap();
        let before = a.clone();
        let broken = Contour {
            segments: vec![
                Segment::line(p(1.0, 0.0), p(2.0, 0.0)),
                Segment::line(p(5.0, 5.0), p(6.0, 5.0)),
            ],
            center: Point3::origin(),
            order: 0,
        };
        let err = a.add_contour(broken).unwrap_err();
        assert!(matches!(err, MillpathError::Geometry(GeometryError::Mismatch(_))));
        assert_eq!(a, before);
    }

    #[test]
    fn angles_around_center() {
        let mut c = Contour::new(Point3::origin());
        c.add(Segment::line(p(1.0, 0.0), p(0.0, 1.0))).unwrap();
        assert_relative_eq!(c.a0(), 0.0);
        assert_relative_eq!(c.a1(), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(c.distance_to_start(), 1.0);
        assert_relative_eq!(c.distance_to_end(), 1.0);
    }

    #[test]
    fn simplify_merges_seams_and_sets_winding() {
        let mut c = Contour::new(p(5.0, 5.0));
        for (a, b) in [
            (p(0.0, 0.0), p(5.0, 0.0)),
            (p(5.0, 0.0), p(10.0, 0.0)),
            (p(10.0, 0.0), p(10.0, 10.0)),
            (p(10.0, 10.0), p(0.0, 10.0)),
            (p(0.0, 10.0), p(0.0, 0.0)),
        ] {
            c.add(Segment::line(a, b)).unwrap();
        }
        assert!(c.signed_area() > 0.0);
        c.simplify(-4.0, true);
        assert_eq!(c.len(), 4);
        assert!(c.signed_area() < 0.0);
        assert!(c.is_closed());
        assert_chained(&c);
        assert!(c.segments().iter().all(|s| (s.start().z + 4.0).abs() < 1e-12));
    }

    #[test]
    fn simplify_splits_lone_segment() {
        let mut c = Contour::new(Point3::new(0.0, -5.0, 0.0));
        c.add(Segment::line(p(-3.0, 0.0), p(3.0, 0.0))).unwrap();
        c.simplify(0.0, false);
        assert_eq!(c.len(), 2);
        assert_chained(&c);
    }

    #[test]
    fn open_winding_follows_angles() {
        let mut c = Contour::new(Point3::origin());
        c.add(Segment::line(p(1.0, 0.1), p(0.0, 1.0))).unwrap();
        c.simplify(0.0, true);
        assert!(c.a0() > c.a1());
    }

    #[test]
    fn extend_by_adds_tangent_to_arc_ends() {
        let arc = Arc::new(Point3::origin(), Vector3::z(), p(5.0, 0.0), p(0.0, 5.0)).unwrap();
        let mut c = Contour::new(Point3::origin());
        c.add(Segment::Arc(arc)).unwrap();
        c.add(Segment::line(p(0.0, 5.0), p(-5.0, 5.0))).unwrap();
        c.extend_by(2.0);
        assert_eq!(c.len(), 3);
        assert_chained(&c);
        assert_relative_eq!(c.start().unwrap().y, -2.0, epsilon = 1e-9);
        assert_relative_eq!(c.end().unwrap().x, -7.0, epsilon = 1e-9);

        let mut closed = rect(0.0, 0.0, 4.0, 4.0);
        closed.extend_by(2.0);
        assert_relative_eq!(closed.start().unwrap().x, 0.0);
    }

    #[test]
    fn change_start_picks_nearest_corner() {
        let mut c = rect(0.0, 0.0, 10.0, 10.0);
        let start = c.change_start_to_close(&p(9.0, 11.0)).unwrap();
        assert!(same_point(&start, &p(10.0, 10.0)));
        assert!(c.is_closed());
        assert_chained(&c);
    }

    #[test]
    fn pline_form_round_trips_arcs() {
        let mut c = Contour::new(Point3::origin());
        c.add(Segment::line(p(0.0, 0.0), p(4.0, 0.0))).unwrap();
        c.add(Segment::Arc(Arc::new(p(4.0, 2.0), Vector3::z(), p(4.0, 0.0), p(4.0, 4.0)).unwrap()))
            .unwrap();
        c.add(Segment::line(p(4.0, 4.0), p(0.0, 4.0))).unwrap();
        c.add(Segment::line(p(0.0, 4.0), p(0.0, 0.0))).unwrap();
        let pline = c.to_pline();
        assert!(pline.closed);
        assert_eq!(pline.vertices.len(), 4);
        assert_relative_eq!(pline.vertices[1].bulge, 1.0, epsilon = 1e-9);

        let back = Contour::from_pline(&pline, -2.0, Point3::origin());
        assert_eq!(back.len(), 4);
        assert!(back.is_closed());
        assert!(matches!(back.segments()[1], Segment::Arc(_)));
        assert_relative_eq!(back.enclosed_area(), 16.0 + 2.0 * PI, epsilon = 0.05);
    }

    #[test]
    fn pline_micro_arc_is_dropped() {
        let sweep: f64 = 1.5e-4;
        let pline = Pline {
            vertices: vec![
                PlineVertex::line(0.0, 0.0),
                PlineVertex::new(5.0, 0.0, (sweep / 4.0).tan()),
                PlineVertex::line(5.000_75, 0.0),
                PlineVertex::line(10.000_75, 5.0),
            ],
            closed: false,
        };
        let c = Contour::from_pline(&pline, 0.0, Point3::origin());
        let lengths: Vec<f64> = c.segments().iter().map(Segment::length).collect();
        assert_eq!(lengths.len(), 2, "{lengths:?}");
        assert_relative_eq!(lengths[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!(lengths[1], 50.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn text_form_round_trips() {
        let c = rect(-1.0, -2.0, 3.0, 4.0);
        let text = c.to_string();
        assert!(text.starts_with("C;1.0000/1.0000/0.0000;0|L;"), "{text}");
        let back: Contour = text.parse().unwrap();
        assert_eq!(back.len(), 4);
        assert!(back.is_closed());
        assert!("C;1/2|L;0/0/0;1/0/0".parse::<Contour>().is_err());
    }

    #[test]
    fn sibling_order_uses_ring_then_angle() {
        let mut a = Contour::new(Point3::origin());
        a.add(Segment::line(p(0.0, 1.0), p(-1.0, 0.0))).unwrap();
        let mut b = Contour::new(Point3::origin());
        b.add(Segment::line(p(1.0, 0.0), p(0.0, 1.0))).unwrap();
        assert_eq!(compare_contours(&a, &b), Ordering::Greater);
        b.set_order(1);
        assert_eq!(compare_contours(&a, &b), Ordering::Less);
    }

    proptest! {
        #[test]
        fn invert_twice_restores_contour(
            steps in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 2..12)
        ) {
            let mut c = Contour::new(Point3::origin());
            let mut last = p(0.0, 0.0);
            for (dx, dy) in steps {
                let next = p(last.x + dx, last.y + dy);
                if (next - last).norm() < 0.01 {
                    continue;
                }
                c.add(Segment::line(last, next)).unwrap();
                last = next;
            }
            let original = c.clone();
            c.invert().invert();
            prop_assert_eq!(c.len(), original.len());
            for (a, b) in c.segments().iter().zip(original.segments()) {
                prop_assert!(same_point(&a.start(), &b.start()));
                prop_assert!(same_point(&a.end(), &b.end()));
            }
        }

        #[test]
        fn assembled_contours_stay_chained(
            steps in prop::collection::vec((1.0f64..20.0, 0.0f64..6.28), 1..10)
        ) {
            let mut segs = Vec::new();
            let mut last = p(0.0, 0.0);
            for (len, angle) in steps {
                let next = p(last.x + len * angle.cos(), last.y + len * angle.sin());
                segs.push(Segment::line(last, next));
                last = next;
            }
            // Feed from the middle outwards so both ends grow.
            let mid = segs.len() / 2;
            let mut order: Vec<Segment> = segs[mid..].to_vec();
            order.extend(segs[..mid].iter().rev().map(|s| {
                let mut s = s.clone();
                s.invert();
                s
            }));
            let mut c = Contour::new(Point3::origin());
            for seg in order {
                c.add(seg).unwrap();
            }
            for pair in c.segments().windows(2) {
                prop_assert!(same_point(&pair[0].end(), &pair[1].start()));
            }
            prop_assert!(same_point(&c.start().unwrap(), &c.segments()[0].start()));
            prop_assert!(same_point(&c.end().unwrap(), &c.segments()[c.len() - 1].end()));
        }
    }
}
