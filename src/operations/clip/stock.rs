use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::math::Point3;

/// Cohen–Sutherland region code of a point against a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct RegionCode(u8);

impl RegionCode {
    pub const INSIDE: Self = Self(0);
    pub const LEFT: Self = Self(1);
    pub const RIGHT: Self = Self(2);
    pub const BOTTOM: Self = Self(4);
    pub const TOP: Self = Self(8);

    /// Returns true if no side bit is set.
    #[must_use]
    pub fn is_inside(self) -> bool {
        self.0 == 0
    }

    /// True if every side bit of `side` is set.
    #[must_use]
    pub fn has(self, side: Self) -> bool {
        side.0 != 0 && self.0 & side.0 == side.0
    }

    /// True if both codes lie past at least one common side.
    #[must_use]
    pub fn shares_side(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for RegionCode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Outline of the raw workpiece seen along the tool axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StockSilhouette {
    Circle { center: Point3, radius: f64 },
    BoundingRect { min: Point3, max: Point3 },
}

impl StockSilhouette {
    /// Returns the center of the outline.
    #[must_use]
    pub fn center(&self) -> Point3 {
        match self {
            Self::Circle { center, .. } => *center,
            Self::BoundingRect { min, max } => Point3::new(
                (min.x + max.x) * 0.5,
                (min.y + max.y) * 0.5,
                (min.z + max.z) * 0.5,
            ),
        }
    }

    /// Axis-aligned extent; a circle yields its circumscribed square.
    #[must_use]
    pub fn bounds(&self) -> (Point3, Point3) {
        match self {
            Self::Circle { center, radius } => (
                Point3::new(center.x - radius, center.y - radius, center.z),
                Point3::new(center.x + radius, center.y + radius, center.z),
            ),
            Self::BoundingRect { min, max } => (*min, *max),
        }
    }

    /// Region code of `p` against [`bounds`](Self::bounds) grown by `margin`.
    #[must_use]
    pub fn region(&self, p: &Point3, margin: f64) -> RegionCode {
        let (min, max) = self.bounds();
        let mut code = RegionCode::INSIDE;
        if p.x < min.x - margin {
            code = code | RegionCode::LEFT;
        } else if p.x > max.x + margin {
            code = code | RegionCode::RIGHT;
        }
        if p.y < min.y - margin {
            code = code | RegionCode::BOTTOM;
        } else if p.y > max.y + margin {
            code = code | RegionCode::TOP;
        }
        code
    }

    /// True if `p` lies within the outline in the XY plane, boundary included.
    #[must_use]
    pub fn contains(&self, p: &Point3) -> bool {
        match self {
            Self::Circle { center, radius } => {
                (p.x - center.x).hypot(p.y - center.y) <= radius + crate::math::TOLERANCE
            }
            Self::BoundingRect { .. } => self.region(p, crate::math::TOLERANCE).is_inside(),
        }
    }
}

/// Raw workpiece: its silhouette plus the height range it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub silhouette: StockSilhouette,
    pub top_z: f64,
    pub bottom_z: f64,
}

impl Stock {
    /// Box stock spanning `min` to `max`.
    #[must_use]
    pub fn block(min: Point3, max: Point3) -> Self {
        Self {
            silhouette: StockSilhouette::BoundingRect {
                min: Point3::new(min.x, min.y, 0.0),
                max: Point3::new(max.x, max.y, 0.0),
            },
            top_z: max.z,
            bottom_z: min.z,
        }
    }

    /// Bar stock standing on the XY plane.
    #[must_use]
    pub fn round(center: Point3, radius: f64, bottom_z: f64, top_z: f64) -> Self {
        Self {
            silhouette: StockSilhouette::Circle {
                center: Point3::new(center.x, center.y, 0.0),
                radius,
            },
            top_z,
            bottom_z,
        }
    }

    /// Returns the stock height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.top_z - self.bottom_z
    }

    /// Point above the stock center at `clearance` over the top face.
    #[must_use]
    pub fn above_center(&self, clearance: f64) -> Point3 {
        let c = self.silhouette.center();
        Point3::new(c.x, c.y, self.top_z + clearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_codes_combine_sides() {
        let s = StockSilhouette::BoundingRect {
            min: Point3::new(-5.0, -5.0, 0.0),
            max: Point3::new(5.0, 5.0, 0.0),
        };
        assert!(s.region(&Point3::origin(), 0.0).is_inside());
        let corner = s.region(&Point3::new(-6.0, 7.0, 0.0), 0.0);
        assert!(corner.has(RegionCode::LEFT) && corner.has(RegionCode::TOP));
        assert!(!corner.has(RegionCode::RIGHT));
        let left = s.region(&Point3::new(-6.0, 0.0, 0.0), 0.0);
        assert!(left.shares_side(corner));
        assert!(s.region(&Point3::new(-6.0, 0.0, 0.0), 2.0).is_inside());
    }

    #[test]
    fn circle_contains_by_radius() {
        let s = StockSilhouette::Circle {
            center: Point3::new(1.0, 1.0, 0.0),
            radius: 2.0,
        };
        assert!(s.contains(&Point3::new(3.0, 1.0, 7.0)));
        assert!(!s.contains(&Point3::new(2.5, 2.5, 0.0)));
        // Corner of the circumscribed square is still inside the bounds.
        assert!(s.region(&Point3::new(2.5, 2.5, 0.0), 0.0).is_inside());
    }

    #[test]
    fn block_stock_takes_heights_from_corners() {
        let stock = Stock::block(Point3::new(-50.0, -30.0, -20.0), Point3::new(50.0, 30.0, 0.0));
        assert!((stock.height() - 20.0).abs() < 1e-12);
        let above = stock.above_center(5.0);
        assert!(above.x.abs() < 1e-12 && (above.z - 5.0).abs() < 1e-12);
    }
}
