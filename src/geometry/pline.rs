use crate::math::arc_2d::{arc_from_bulge, arc_point_at};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point3;

/// Chord deviation used when a polyline is flattened for area tests.
pub const FLATTEN_TOLERANCE: f64 = 0.01;

/// Bulge-encoded polyline vertex.
///
/// `bulge = tan(sweep / 4)` describes the segment to the next vertex:
/// zero is a line, positive a counter-clockwise arc, negative a clockwise arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlineVertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl PlineVertex {
    /// Creates a vertex followed by a segment of the given bulge.
    #[must_use]
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    /// Vertex followed by a straight segment.
    #[must_use]
    pub fn line(x: f64, y: f64) -> Self {
        Self { x, y, bulge: 0.0 }
    }

    /// Returns true if the following segment is an arc.
    #[must_use]
    pub fn is_arc(&self) -> bool {
        self.bulge.abs() >= 1e-12
    }
}

/// Planar polyline of lines and arcs; the flattened form of a contour.
///
/// A closed polyline connects its last vertex back to the first.
#[derive(Debug, Clone)]
pub struct Pline {
    pub vertices: Vec<PlineVertex>,
    pub closed: bool,
}

impl Pline {
    /// Line-only polyline through `points`.
    #[cfg(test)]
    #[must_use]
    pub fn from_points(points: &[Point3], closed: bool) -> Self {
        let vertices = points.iter().map(|p| PlineVertex::line(p.x, p.y)).collect();
        Self { vertices, closed }
    }

    /// Returns the number of segments, counting the closing one.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.vertices.len();
        if n < 2 {
            0
        } else if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Points along the polyline with arcs flattened to within `tolerance`.
    #[must_use]
    pub fn to_points(&self, tolerance: f64) -> Vec<Point3> {
        let n = self.vertices.len();
        if n == 0 {
            return Vec::new();
        }

        let mut points = Vec::with_capacity(n * 2);
        points.push(Point3::new(self.vertices[0].x, self.vertices[0].y, 0.0));
        for i in 0..self.segment_count() {
            let v0 = &self.vertices[i];
            let v1 = &self.vertices[(i + 1) % n];
            if v0.is_arc() {
                let (cx, cy, radius, start_angle, sweep) =
                    arc_from_bulge(v0.x, v0.y, v1.x, v1.y, v0.bulge);
                let steps = arc_subdivision_count(radius, sweep.abs(), tolerance);
                for j in 1..steps {
                    let t = f64::from(j) / f64::from(steps);
                    let (px, py) = arc_point_at(cx, cy, radius, start_angle, sweep, t);
                    points.push(Point3::new(px, py, 0.0));
                }
            }
            points.push(Point3::new(v1.x, v1.y, 0.0));
        }
        if self.closed && points.len() > 1 {
            points.pop();
        }
        points
    }

    /// Signed enclosed area, positive for counter-clockwise polylines.
    ///
    /// Open polylines are closed by their chord.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.to_points(FLATTEN_TOLERANCE))
    }
}

/// Number of chords needed to keep an arc within `tolerance`.
fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // Sagitta: tolerance = r * (1 - cos(θ / 2)).
    let max_angle = if tolerance >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}
