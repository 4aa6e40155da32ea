//! Safe transitions between two cutting moves.

use tracing::{debug, trace};

use super::clip::{Stock, StockSilhouette};
use crate::math::direction::{Direction, Quadrant};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::{same_point, same_point_2d, Point3, Vector3, TOLERANCE};
use crate::params::MachiningParams;
use crate::workstep::Workstep;

/// Side of a rectangular stock outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Bottom,
    Top,
}

impl Side {
    const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Bottom, Self::Top];

    /// How far `p` lies past this side; negative inside the rectangle.
    fn outward(self, p: &Point3, min: &Point3, max: &Point3) -> f64 {
        match self {
            Self::Left => min.x - p.x,
            Self::Right => p.x - max.x,
            Self::Bottom => min.y - p.y,
            Self::Top => p.y - max.y,
        }
    }

    /// Foot of `p` on this side of the rectangle grown by `clearance`.
    fn project(self, p: &Point3, min: &Point3, max: &Point3, clearance: f64) -> Point3 {
        let x = p.x.clamp(min.x - clearance, max.x + clearance);
        let y = p.y.clamp(min.y - clearance, max.y + clearance);
        match self {
            Self::Left => Point3::new(min.x - clearance, y, p.z),
            Self::Right => Point3::new(max.x + clearance, y, p.z),
            Self::Bottom => Point3::new(x, min.y - clearance, p.z),
            Self::Top => Point3::new(x, max.y + clearance, p.z),
        }
    }
}

/// Plans the non-cutting moves from the end of one cut to the start of
/// the next.
///
/// The tool leaves the stock with a short cut to a waypoint just outside
/// the stock outline, travels around the outline, and comes back in next
/// to the target. `clearance` is the gap kept to the outline.
#[derive(Debug, Clone, Copy)]
pub struct InterMove<'a> {
    stock: &'a Stock,
    clearance: f64,
    safe_z: f64,
}

impl<'a> InterMove<'a> {
    /// Clearance grows with `pass` so consecutive transitions use
    /// different corridors.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(stock: &'a Stock, params: &MachiningParams, pass: usize) -> Self {
        let clearance =
            params.tool.radius() + params.safety_margin + pass as f64 * params.corridor_step;
        Self {
            stock,
            clearance,
            safe_z: stock.top_z + params.safe_z,
        }
    }

    /// Returns the gap kept to the stock outline.
    #[must_use]
    pub fn clearance(&self) -> f64 {
        self.clearance
    }

    /// Worksteps leading from `from` to `to`, in order.
    #[must_use]
    pub fn execute(&self, from: &Point3, to: &Point3) -> Vec<Workstep> {
        if same_point(from, to) {
            return Vec::new();
        }
        if to.z > from.z + TOLERANCE {
            trace!("lift then traverse");
            let lifted = Point3::new(from.x, from.y, to.z);
            return vec![
                Workstep::Traverse { from: *from, to: lifted },
                Workstep::Traverse { from: lifted, to: *to },
            ];
        }

        let entry = self.entry_point(to);
        let height = from.z;
        let mut steps = Vec::new();
        let mut at = *from;

        if from.z > self.stock.top_z + TOLERANCE {
            trace!("approach from above the stock");
        } else {
            let exit = self.exit_point(from, to);
            if !same_point(from, &exit) {
                steps.push(Workstep::StraightMove { from: *from, to: exit });
                at = exit;
            }
            if let Some(corners) = self.route(&exit, &entry) {
                for corner in corners {
                    let next = Point3::new(corner.x, corner.y, height);
                    steps.push(Workstep::Traverse { from: at, to: next });
                    at = next;
                }
            } else {
                debug!(clearance = self.clearance, "no clear corridor, retracting");
                let up = Point3::new(at.x, at.y, self.safe_z.max(height));
                steps.push(Workstep::Traverse { from: at, to: up });
                at = up;
            }
        }

        let over_entry = Point3::new(entry.x, entry.y, at.z);
        if !same_point(&at, &over_entry) {
            steps.push(Workstep::Traverse { from: at, to: over_entry });
        }
        let down = Point3::new(entry.x, entry.y, to.z);
        if !same_point(&over_entry, &down) {
            steps.push(Workstep::Traverse {
                from: over_entry,
                to: down,
            });
        }
        if !same_point(&down, to) {
            steps.push(Workstep::StraightMove { from: down, to: *to });
        }
        steps
    }

    /// True if `p` keeps at least the clearance from the stock outline.
    fn is_clear(&self, p: &Point3) -> bool {
        match self.stock.silhouette {
            StockSilhouette::Circle { center, radius } => {
                (p.x - center.x).hypot(p.y - center.y) >= radius + self.clearance - TOLERANCE
            }
            StockSilhouette::BoundingRect { .. } => !self
                .stock
                .silhouette
                .region(p, self.clearance - TOLERANCE)
                .is_inside(),
        }
    }

    /// Where the tool leaves the stock from `p`: the nearest side of a
    /// rectangle, ties going to the side facing `toward`, or radially out
    /// of a circle.
    fn exit_point(&self, p: &Point3, toward: &Point3) -> Point3 {
        if self.is_clear(p) {
            return *p;
        }
        match self.stock.silhouette {
            StockSilhouette::Circle { center, radius } => {
                let flat = Point3::new(center.x, center.y, p.z);
                // From the very center, leave along the main axis toward the target.
                let dir = Direction::between(&flat, p)
                    .or_else(|_| {
                        let toward = Point3::new(toward.x, toward.y, p.z);
                        Direction::between(&flat, &toward).map(|d| d.snapped())
                    })
                    .map_or_else(|_| Vector3::x(), |d| *d.as_vector());
                flat + dir * (radius + self.clearance)
            }
            StockSilhouette::BoundingRect { min, max } => {
                let mut best = Side::Left;
                let mut best_key = (f64::NEG_INFINITY, f64::NEG_INFINITY);
                for side in Side::ALL {
                    let own = side.outward(p, &min, &max);
                    let key = (own, side.outward(toward, &min, &max));
                    let better = own > best_key.0 + crate::math::EPSILON
                        || ((own - best_key.0).abs() <= crate::math::EPSILON && key.1 > best_key.1);
                    if better {
                        best = side;
                        best_key = key;
                    }
                }
                best.project(p, &min, &max, self.clearance)
            }
        }
    }

    /// Where the tool enters the stock on its way to `p`.
    fn entry_point(&self, p: &Point3) -> Point3 {
        self.exit_point(p, p)
    }

    /// Corners of the outline grown by the clearance, by quadrant index.
    fn corners(&self) -> [Point3; 4] {
        let (min, max) = self.stock.silhouette.bounds();
        let c = self.stock.silhouette.center();
        let hx = (max.x - min.x) * 0.5 + self.clearance;
        let hy = (max.y - min.y) * 0.5 + self.clearance;
        [0, 1, 2, 3].map(|i| {
            let (sx, sy) = Quadrant::from_index(i).signs();
            Point3::new(c.x + sx * hx, c.y + sy * hy, 0.0)
        })
    }

    /// True if the straight leg `a → b` does not cross the stock outline.
    fn leg_is_clear(&self, a: &Point3, b: &Point3) -> bool {
        let silhouette = &self.stock.silhouette;
        match silhouette {
            StockSilhouette::Circle { center, radius } => {
                point_to_segment_dist(center.x, center.y, a.x, a.y, b.x, b.y) >= *radius
            }
            StockSilhouette::BoundingRect { .. } => {
                silhouette.region(a, 0.0).shares_side(silhouette.region(b, 0.0))
            }
        }
    }

    /// Shortest chain of corners from `exit` to `entry` whose legs all stay
    /// clear, walking around the outline in either direction.
    ///
    /// Around round stock a walk runs from the corner of the exit's quadrant
    /// to the corner of the entry's quadrant.
    fn route(&self, exit: &Point3, entry: &Point3) -> Option<Vec<Point3>> {
        let corners = self.corners();
        let quadrants = match self.stock.silhouette {
            StockSilhouette::Circle { center, .. } => Some((
                Quadrant::of(exit, &center).index(),
                Quadrant::of(entry, &center).index(),
            )),
            StockSilhouette::BoundingRect { .. } => None,
        };
        let mut best: Option<(f64, Vec<Point3>)> = None;
        for path in corner_walks() {
            if let (Some((q0, q1)), Some(first), Some(last)) =
                (quadrants, path.first(), path.last())
            {
                if *first != q0 || *last != q1 {
                    continue;
                }
            }
            let mut points = Vec::with_capacity(path.len() + 2);
            points.push(*exit);
            points.extend(path.iter().map(|&i| corners[i]));
            points.push(*entry);

            let clear = points
                .windows(2)
                .all(|w| same_point_2d(&w[0], &w[1]) || self.leg_is_clear(&w[0], &w[1]));
            if !clear {
                continue;
            }
            let length: f64 =
                points.windows(2).map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y)).sum();
            if best.as_ref().is_none_or(|(l, _)| length < *l - TOLERANCE) {
                best = Some((length, path.iter().map(|&i| corners[i]).collect()));
            }
        }
        best.map(|(_, corners)| corners)
    }
}

/// Every walk over up to three consecutive corners, in both directions,
/// plus the empty walk.
fn corner_walks() -> Vec<Vec<usize>> {
    let mut walks = vec![Vec::new()];
    for start in 0..4 {
        for step in [1, 3] {
            for len in 1..=3 {
                walks.push((0..len).map(|k| (start + k * step) % 4).collect());
            }
        }
    }
    walks
}
