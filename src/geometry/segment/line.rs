use crate::math::{Point3, Vector3, EPSILON, TOLERANCE};

/// A straight cut between two points.
///
/// Extending and trimming re-derive the endpoints along
/// `normalize(end - start)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    start: Point3,
    end: Point3,
}

impl Line {
    /// Creates a line from `start` to `end`.
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> Point3 {
        self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> Point3 {
        self.end
    }

    /// Unit direction from start to end, or zero for a degenerate line.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        (self.end - self.start)
            .try_normalize(TOLERANCE)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Returns the distance between the endpoints.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Returns true if the endpoints coincide.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length() < EPSILON
    }

    /// Returns the point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.start + (self.end - self.start) * t
    }

    /// Returns the point halfway along the line.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        self.point_at(0.5)
    }

    /// Swaps the endpoints.
    pub fn invert(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }

    /// Moves the start point backwards by `length`.
    pub fn extend_start(&mut self, length: f64) {
        let dir = self.direction();
        self.start -= dir * length;
    }

    /// Moves the end point forwards by `length`.
    pub fn extend_end(&mut self, length: f64) {
        let dir = self.direction();
        self.end += dir * length;
    }

    /// Moves the end point to `p`.
    pub fn set_end(&mut self, p: Point3) {
        self.end = p;
    }

    /// Moves both endpoints to height `z`.
    pub fn set_z(&mut self, z: f64) {
        self.start.z = z;
        self.end.z = z;
    }

    /// Splits at parameter `t`, returning both parts in travel order.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let p = self.point_at(t);
        (Self::new(self.start, p), Self::new(p, self.end))
    }

    /// Returns true if `other` continues this line in the same direction.
    ///
    /// Both lines must share a joint and the far end of `other` must lie on
    /// the supporting line ahead of it.
    #[must_use]
    pub fn is_continued_by(&self, other: &Self) -> bool {
        if (self.end - other.start).norm() >= EPSILON {
            return false;
        }
        let dir = self.direction();
        let ahead = other.end - self.start;
        let along = ahead.dot(&dir);
        if along <= self.length() {
            return false;
        }
        (ahead - dir * along).norm() < EPSILON
    }
}
