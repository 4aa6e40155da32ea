use std::f64::consts::TAU;

use super::Line;
use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{arc_tangent_at, sweep_between};
use crate::math::{Point3, Vector3, EPSILON, TOLERANCE};

/// A circular arc in a plane parallel to XY.
///
/// The rotation sense follows the sign of `axis.z`: positive is
/// counter-clockwise. Whether the arc closes on itself is stored, not
/// inferred from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    center: Point3,
    axis: Vector3,
    radius: f64,
    start: Point3,
    end: Point3,
    full: bool,
}

impl Arc {
    /// Creates an arc around `center` from `start` to `end`.
    ///
    /// Coincident endpoints describe a full circle, as edge and text
    /// records do.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` for a zero axis and
    /// `GeometryError::Degenerate` when the radius vanishes or the endpoints
    /// are not equidistant from the center.
    pub fn new(center: Point3, axis: Vector3, start: Point3, end: Point3) -> Result<Self> {
        let axis = axis.try_normalize(TOLERANCE).ok_or(GeometryError::ZeroVector)?;
        let radius = (start.x - center.x).hypot(start.y - center.y);
        if radius < EPSILON {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        let end_radius = (end.x - center.x).hypot(end.y - center.y);
        if (end_radius - radius).abs() > EPSILON {
            return Err(GeometryError::Degenerate(format!(
                "arc endpoints at radius {radius} and {end_radius}"
            ))
            .into());
        }
        Ok(Self {
            center,
            axis,
            radius,
            start,
            end,
            full: (start - end).norm() < EPSILON,
        })
    }

    /// Creates an arc from its polar description at height `z`.
    ///
    /// The sign of `sweep` selects the rotation sense; a sweep of a whole
    /// turn gives a full circle.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a vanishing radius or sweep.
    pub fn from_sweep(center: Point3, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        if radius < EPSILON || sweep.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("arc without extent".into()).into());
        }
        let at = |a: f64| {
            Point3::new(center.x + radius * a.cos(), center.y + radius * a.sin(), center.z)
        };
        let axis = Vector3::new(0.0, 0.0, sweep.signum());
        Ok(Self {
            center,
            axis,
            radius,
            start: at(start_angle),
            end: at(start_angle + sweep),
            full: sweep.abs() >= TAU - TOLERANCE,
        })
    }

    /// Returns the center of the circle.
    #[must_use]
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Returns the unit rotation axis.
    #[must_use]
    pub fn axis(&self) -> Vector3 {
        self.axis
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
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

    /// Returns true for counter-clockwise travel seen from +Z.
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.axis.z > 0.0
    }

    /// Returns true if the arc is a whole circle.
    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        self.full
    }

    /// Returns the angle of the start point around the center.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        (self.start.y - self.center.y).atan2(self.start.x - self.center.x)
    }

    /// Returns the angle of the end point around the center.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        (self.end.y - self.center.y).atan2(self.end.x - self.center.x)
    }

    /// Signed angular extent, positive when counter-clockwise.
    ///
    /// An arc that is not a full circle but whose endpoints coincide has
    /// no extent.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        if self.full {
            return if self.is_ccw() { TAU } else { -TAU };
        }
        let sweep = sweep_between(self.start_angle(), self.end_angle(), self.is_ccw());
        if sweep.abs() >= TAU {
            0.0
        } else {
            sweep
        }
    }

    /// Returns the length along the circle.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep().abs()
    }

    /// Returns the point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        let angle = self.start_angle() + self.sweep() * t;
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.start.z + (self.end.z - self.start.z) * t,
        )
    }

    /// Returns the point halfway along the arc.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        self.point_at(0.5)
    }

    /// Unit travel direction at parameter `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector3 {
        let (x, y) = arc_tangent_at(self.start_angle(), self.sweep(), t);
        Vector3::new(x, y, 0.0)
    }

    /// Line of `length` ending at the arc start, tangent to it.
    #[must_use]
    pub fn start_tangent(&self, length: f64) -> Line {
        let dir = self.tangent_at(0.0);
        Line::new(self.start - dir * length, self.start)
    }

    /// Line of `length` leaving the arc end, tangent to it.
    #[must_use]
    pub fn end_tangent(&self, length: f64) -> Line {
        let dir = self.tangent_at(1.0);
        Line::new(self.end, self.end + dir * length)
    }

    /// Reverses the travel direction.
    pub fn invert(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.axis = -self.axis;
    }

    /// Grows the arc backwards along its circle by an arc length of `length`.
    pub fn extend_start(&mut self, length: f64) {
        let delta = self.capped_growth(length);
        let angle = self.start_angle() - self.sweep().signum() * delta;
        self.start = self.on_circle(angle, self.start.z);
    }

    /// Grows the arc forwards along its circle by an arc length of `length`.
    pub fn extend_end(&mut self, length: f64) {
        let delta = self.capped_growth(length);
        let angle = self.end_angle() + self.sweep().signum() * delta;
        self.end = self.on_circle(angle, self.end.z);
    }

    /// Moves the arc to height `z`.
    pub fn set_z(&mut self, z: f64) {
        self.center.z = z;
        self.start.z = z;
        self.end.z = z;
    }

    /// Splits at parameter `t`, returning both parts in travel order.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let p = self.point_at(t);
        let head = Self {
            end: p,
            full: false,
            ..*self
        };
        let tail = Self {
            start: p,
            full: false,
            ..*self
        };
        (head, tail)
    }

    /// Angle growth for `length`, leaving a gap so the arc never closes.
    fn capped_growth(&self, length: f64) -> f64 {
        let room = (TAU - self.sweep().abs() - EPSILON / self.radius).max(0.0);
        (length / self.radius).min(room)
    }

    fn on_circle(&self, angle: f64, z: f64) -> Point3 {
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            z,
        )
    }
}
