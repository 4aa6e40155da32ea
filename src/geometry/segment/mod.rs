mod arc;
mod line;

use std::fmt;
use std::str::FromStr;

pub use arc::Arc;
pub use line::Line;

use crate::error::{GeometryError, MillpathError, Result};
use crate::geometry::text::{format_point, parse_field, parse_point};
use crate::math::{Point3, Vector3};

/// One machinable piece of a contour.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Line(Line),
    Arc(Arc),
}

impl Segment {
    /// Shorthand for a line segment.
    #[must_use]
    pub fn line(start: Point3, end: Point3) -> Self {
        Self::Line(Line::new(start, end))
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> Point3 {
        match self {
            Self::Line(l) => l.start(),
            Self::Arc(a) => a.start(),
        }
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> Point3 {
        match self {
            Self::Line(l) => l.end(),
            Self::Arc(a) => a.end(),
        }
    }

    /// Returns the length along the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line(l) => l.length(),
            Self::Arc(a) => a.length(),
        }
    }

    /// Returns true if the segment is shorter than the point tolerance.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length() < crate::math::EPSILON
    }

    /// Returns the point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        match self {
            Self::Line(l) => l.point_at(t),
            Self::Arc(a) => a.point_at(t),
        }
    }

    /// Returns the point halfway along the segment.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        self.point_at(0.5)
    }

    /// Unit travel direction at the start point.
    #[must_use]
    pub fn start_direction(&self) -> Vector3 {
        match self {
            Self::Line(l) => l.direction(),
            Self::Arc(a) => a.tangent_at(0.0),
        }
    }

    /// Unit travel direction at the end point.
    #[must_use]
    pub fn end_direction(&self) -> Vector3 {
        match self {
            Self::Line(l) => l.direction(),
            Self::Arc(a) => a.tangent_at(1.0),
        }
    }

    /// Reverses the travel direction in place.
    pub fn invert(&mut self) {
        match self {
            Self::Line(l) => l.invert(),
            Self::Arc(a) => a.invert(),
        }
    }

    /// Lengthens the segment before its start by `length`.
    pub fn extend_start(&mut self, length: f64) {
        match self {
            Self::Line(l) => l.extend_start(length),
            Self::Arc(a) => a.extend_start(length),
        }
    }

    /// Lengthens the segment past its end by `length`.
    pub fn extend_end(&mut self, length: f64) {
        match self {
            Self::Line(l) => l.extend_end(length),
            Self::Arc(a) => a.extend_end(length),
        }
    }

    /// Moves the segment to height `z`.
    pub fn set_z(&mut self, z: f64) {
        match self {
            Self::Line(l) => l.set_z(z),
            Self::Arc(a) => a.set_z(z),
        }
    }

    /// Splits at parameter `t` into two segments in travel order.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        match self {
            Self::Line(l) => {
                let (a, b) = l.split_at(t);
                (Self::Line(a), Self::Line(b))
            }
            Self::Arc(a) => {
                let (h, t) = a.split_at(t);
                (Self::Arc(h), Self::Arc(t))
            }
        }
    }

    /// Shrinks `self` to its first half and returns the trailing half.
    pub fn split(&mut self) -> Self {
        let (head, tail) = self.split_at(0.5);
        *self = head;
        tail
    }
}

impl From<Line> for Segment {
    fn from(l: Line) -> Self {
        Self::Line(l)
    }
}

impl From<Arc> for Segment {
    fn from(a: Arc) -> Self {
        Self::Arc(a)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(l) => write!(f, "L;{};{}", format_point(&l.start()), format_point(&l.end())),
            Self::Arc(a) => write!(
                f,
                "A;{};{};{};{};{:.4}",
                format_point(&a.start()),
                format_point(&a.end()),
                format_point(&a.center()),
                format_point(&Point3::from(a.axis())),
                a.radius()
            ),
        }
    }
}

impl FromStr for Segment {
    type Err = MillpathError;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split(';').collect();
        match fields.as_slice() {
            ["L", p0, p1] => Ok(Self::line(parse_point(p0)?, parse_point(p1)?)),
            ["A", p0, p1, c, axis, r] => {
                let axis = parse_point(axis)?.coords;
                let arc = Arc::new(parse_point(c)?, axis, parse_point(p0)?, parse_point(p1)?)?;
                let radius: f64 = parse_field(r)?;
                if (arc.radius() - radius).abs() > crate::math::EPSILON {
                    return Err(
                        GeometryError::Parse(format!("radius {radius} does not fit '{s}'")).into(),
                    );
                }
                Ok(Self::Arc(arc))
            }
            _ => Err(GeometryError::Parse(format!("unknown segment record '{s}'")).into()),
        }
    }
}
