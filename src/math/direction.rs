use std::f64::consts::TAU;

use super::{Point3, Vector3, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Quadrant around a center, numbered counter-clockwise.
///
/// Points on a dividing line belong to the quadrant on the positive side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl Quadrant {
    /// Classifies `p` relative to `center` in the XY plane.
    #[must_use]
    pub fn of(p: &Point3, center: &Point3) -> Self {
        match (p.x >= center.x, p.y >= center.y) {
            (true, true) => Self::UpperRight,
            (false, true) => Self::UpperLeft,
            (false, false) => Self::LowerLeft,
            (true, false) => Self::LowerRight,
        }
    }

    /// Counter-clockwise position in `0..4`.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::UpperRight => 0,
            Self::UpperLeft => 1,
            Self::LowerLeft => 2,
            Self::LowerRight => 3,
        }
    }

    /// Quadrant at counter-clockwise position `index`, modulo four.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Self::UpperRight,
            1 => Self::UpperLeft,
            2 => Self::LowerLeft,
            _ => Self::LowerRight,
        }
    }

    /// Signs `(sx, sy)` of the quadrant's corner relative to the center.
    #[must_use]
    pub fn signs(self) -> (f64, f64) {
        match self {
            Self::UpperRight => (1.0, 1.0),
            Self::UpperLeft => (-1.0, 1.0),
            Self::LowerLeft => (-1.0, -1.0),
            Self::LowerRight => (1.0, -1.0),
        }
    }
}

/// A unit direction vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction(Vector3);

impl Direction {
    /// Normalizes `v` into a direction.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if `v` has no length.
    pub fn new(v: Vector3) -> Result<Self> {
        let len = v.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self(v / len))
    }

    /// Direction from `a` towards `b`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if the points coincide.
    pub fn between(a: &Point3, b: &Point3) -> Result<Self> {
        Self::new(b - a)
    }

    /// Returns the unit vector.
    #[must_use]
    pub fn as_vector(&self) -> &Vector3 {
        &self.0
    }

    /// Axis carrying the largest absolute component.
    #[must_use]
    pub fn dominant_axis(&self) -> Axis {
        let (x, y, z) = (self.0.x.abs(), self.0.y.abs(), self.0.z.abs());
        if x >= y && x >= z {
            Axis::X
        } else if y >= z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// The signed unit vector along [`Self::dominant_axis`].
    #[must_use]
    pub fn snapped(&self) -> Self {
        let v = match self.dominant_axis() {
            Axis::X => Vector3::new(self.0.x.signum(), 0.0, 0.0),
            Axis::Y => Vector3::new(0.0, self.0.y.signum(), 0.0),
            Axis::Z => Vector3::new(0.0, 0.0, self.0.z.signum()),
        };
        Self(v)
    }

    /// Quadrant bucket of the planar projection.
    #[must_use]
    pub fn quadrant(&self) -> Quadrant {
        Quadrant::of(&Point3::new(self.0.x, self.0.y, 0.0), &Point3::origin())
    }
}

/// Maps an angle into `[0, 2π)`.
#[must_use]
pub fn unwrap_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if TAU - a < TOLERANCE {
        0.0
    } else {
        a
    }
}

/// Angle of `p` around `center` in the XY plane, unwrapped into `[0, 2π)`.
#[must_use]
pub fn angle_around(center: &Point3, p: &Point3) -> f64 {
    unwrap_angle((p.y - center.y).atan2(p.x - center.x))
}
