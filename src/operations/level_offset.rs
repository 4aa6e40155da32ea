//! Offset rings of one boundary at one cutting level.

use tracing::{debug, warn};

use super::clip::CutRegion;
use super::offset::ContourOffset;
use crate::error::Result;
use crate::geometry::Contour;
use crate::params::MachiningParams;

/// Fragments of every offset step at one level, outermost step first.
pub type OffsetSets = Vec<Vec<Contour>>;

/// Grows offset rings from a boundary and trims them to a cut region.
///
/// An interior boundary (a pocket wall) is offset inward and trimmed to the
/// section it encloses. A border boundary (the outline of a part standing in
/// the stock) is offset outward and trimmed to the stock silhouette.
pub struct PathBuilder<'a> {
    base: Contour,
    region: &'a dyn CutRegion,
    params: &'a MachiningParams,
    border: bool,
}

impl<'a> PathBuilder<'a> {
    /// Prepares an interior boundary. Closed boundaries are turned
    /// counter-clockwise so positive offsets shrink them.
    #[must_use]
    pub fn new(base: &Contour, region: &'a dyn CutRegion, params: &'a MachiningParams) -> Self {
        let mut base = base.clone();
        if base.is_closed() && base.signed_area() < 0.0 {
            base.invert();
        }
        Self {
            base,
            region,
            params,
            border: false,
        }
    }

    /// Treats the boundary as the outline of material to keep.
    #[must_use]
    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Returns true if rings grow outward.
    #[must_use]
    pub fn is_border(&self) -> bool {
        self.border
    }

    /// Signed offset distance of ring `i`.
    #[allow(clippy::cast_precision_loss)]
    fn distance(&self, i: usize) -> f64 {
        let d = self.params.first_offset() + i as f64 * self.params.cut_width;
        if self.border {
            -d
        } else {
            d
        }
    }

    /// Computes the ring fragments at height `z`.
    ///
    /// The loop stops when the offset is exhausted, when nothing of a ring
    /// survives the trim, or after `max_rings` steps. Open fragments are
    /// lengthened by the tool radius at both ends.
    ///
    /// # Errors
    ///
    /// Propagates offset failures other than exhaustion and contour
    /// construction errors from the trim.
    pub fn execute(&self, z: f64) -> Result<OffsetSets> {
        let cw = self.params.direction.ring_is_cw(self.border);
        let mut sets = OffsetSets::new();

        for i in 0..self.params.max_rings {
            let distance = self.distance(i);
            let rings = match ContourOffset::new(&self.base, distance).execute() {
                Ok(rings) => rings,
                Err(e) if e.is_offset_exhausted() => {
                    debug!(z, ring = i, distance, "offset exhausted");
                    break;
                }
                Err(e) => return Err(e),
            };

            let mut fragments = Vec::new();
            for ring in &rings {
                fragments.extend(self.region.clip(ring)?);
            }
            if fragments.is_empty() {
                debug!(z, ring = i, distance, "ring left the cut region");
                break;
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let order = i as i32;
            for fragment in &mut fragments {
                fragment.set_order(order);
                fragment.simplify(z, cw);
                fragment.extend_by(self.params.tool.radius());
            }
            fragments.sort_by(|a, b| a.a0().total_cmp(&b.a0()));
            debug!(z, ring = i, distance, fragments = fragments.len(), "offset ring");
            sets.push(fragments);
        }

        if sets.is_empty() {
            warn!(z, first_offset = self.params.first_offset(), "level has no fragments");
        }
        Ok(sets)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Segment;
    use crate::math::Point3;
    use crate::operations::clip::{SectionRegion, Stock, StockClipper};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
        let mut c = Contour::new(p((x0 + x1) / 2.0, (y0 + y1) / 2.0));
        let pts = [p(x0, y0), p(x1, y0), p(x1, y1), p(x0, y1), p(x0, y0)];
        for w in pts.windows(2) {
            c.add(Segment::line(w[0], w[1])).unwrap();
        }
        c
    }

    fn params() -> MachiningParams {
        let mut params = MachiningParams {
            cut_width: 5.0,
            cut_depth: 5.0,
            final_depth: -10.0,
            ..MachiningParams::default()
        };
        params.tool.diameter = 6.0;
        params
    }

    #[test]
    fn pocket_rings_shrink_until_exhausted() {
        let base = rect(-30.0, -20.0, 30.0, 20.0);
        let region = SectionRegion::new(base.clone()).unwrap();
        let params = params();
        let sets = PathBuilder::new(&base, &region, &params).execute(-5.0).unwrap();

        assert_eq!(sets.len(), 4);
        let areas: Vec<f64> = sets.iter().map(|set| set[0].enclosed_area()).collect();
        assert!(areas.windows(2).all(|w| w[0] > w[1]), "{areas:?}");
        for (i, set) in sets.iter().enumerate() {
            assert_eq!(set.len(), 1);
            let ring = &set[0];
            assert!(ring.is_closed());
            assert_eq!(usize::try_from(ring.order()).unwrap(), i);
            assert!((ring.start().unwrap().z + 5.0).abs() < 1e-9);
            // Climb milling in a pocket runs counter-clockwise.
            assert!(ring.signed_area() > 0.0);
        }
    }

    #[test]
    fn clockwise_boundary_gives_same_rings() {
        let mut base = rect(-30.0, -20.0, 30.0, 20.0);
        base.invert();
        let region = SectionRegion::new(base.clone()).unwrap();
        let params = params();
        let sets = PathBuilder::new(&base, &region, &params).execute(0.0).unwrap();
        assert_eq!(sets.len(), 4);
    }

    #[test]
    fn oversized_tool_leaves_level_empty() {
        let base = rect(-4.0, -4.0, 4.0, 4.0);
        let region = SectionRegion::new(base.clone()).unwrap();
        let mut params = params();
        params.tool.diameter = 10.0;
        let sets = PathBuilder::new(&base, &region, &params).execute(-1.0).unwrap();
        assert!(sets.is_empty());
    }

    #[test]
    fn ring_limit_bounds_the_loop() {
        let base = rect(-30.0, -20.0, 30.0, 20.0);
        let region = SectionRegion::new(base.clone()).unwrap();
        let params = MachiningParams {
            max_rings: 2,
            ..params()
        };
        let sets = PathBuilder::new(&base, &region, &params).execute(0.0).unwrap();
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn border_rings_grow_until_they_leave_the_stock() {
        // A 40x20 boss in 100x60 stock: outward rings get trimmed by the
        // stock until one lies wholly outside it.
        let base = rect(-20.0, -10.0, 20.0, 10.0);
        let stock = Stock::block(Point3::new(-50.0, -30.0, -20.0), Point3::new(50.0, 30.0, 0.0));
        let clipper = StockClipper::new(stock.silhouette);
        let params = params();
        let builder = PathBuilder::new(&base, &clipper, &params).border(true);
        let sets = builder.execute(-5.0).unwrap();

        assert!(sets.len() > 2);
        assert!(sets.len() < params.max_rings);
        // The first ring fits in the stock and stays closed.
        assert!(sets[0][0].is_closed());
        // Later rings are cut open by the stock's long sides.
        let last = sets.last().unwrap();
        assert!(last.iter().all(|f| !f.is_closed()));
        for fragment in sets.iter().flatten() {
            for seg in fragment.segments() {
                let m = seg.midpoint();
                assert!(m.x.abs() <= 50.0 + params.tool.radius() + 1e-6);
                assert!(m.y.abs() <= 30.0 + params.tool.radius() + 1e-6);
            }
        }
    }
}
