//! Trimming of offset rings against the region they may cut in.

mod clipper;
mod section;
mod stock;

use tracing::{debug, warn};

pub use clipper::StockClipper;
pub use section::SectionRegion;
pub use stock::{RegionCode, Stock, StockSilhouette};

use crate::error::Result;
use crate::geometry::{Contour, Segment};
use crate::math::{same_point, Point3, EPSILON};

/// Rough position of a whole segment relative to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentClass {
    Outside,
    Inside,
    /// The segment may cross the region's border; an exact trim decides.
    Ambiguous,
}

/// Part of a trimmed segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub segment: Segment,
    pub inside: bool,
}

impl Piece {
    /// Creates a piece on the given side.
    #[must_use]
    pub fn new(segment: Segment, inside: bool) -> Self {
        Self { segment, inside }
    }
}

/// A planar region offset rings are trimmed to.
pub trait CutRegion {
    /// Rough classification without computing trim points.
    fn classify(&self, seg: &Segment) -> SegmentClass;

    /// Splits an ambiguous segment at the region border.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::ClipAmbiguous` when no trim point lies
    /// within the segment.
    fn trim(&self, seg: &Segment) -> Result<Vec<Piece>>;

    /// Whether `p` lies in the region, looking only at X and Y.
    fn contains(&self, p: &Point3) -> bool;

    /// Classifies and trims one segment.
    ///
    /// An ambiguous segment without trim point stays whole, on the side
    /// its midpoint lies on.
    fn pieces(&self, seg: &Segment) -> Vec<Piece> {
        match self.classify(seg) {
            SegmentClass::Outside => vec![Piece::new(seg.clone(), false)],
            SegmentClass::Inside => vec![Piece::new(seg.clone(), true)],
            SegmentClass::Ambiguous => self.trim(seg).unwrap_or_else(|e| {
                let inside = self.contains(&seg.midpoint());
                warn!(error = %e, segment = %seg, inside, "keeping segment whole");
                vec![Piece::new(seg.clone(), inside)]
            }),
        }
    }

    /// The parts of `seg` inside the region.
    fn inside_parts(&self, seg: &Segment) -> Vec<Segment> {
        self.pieces(seg)
            .into_iter()
            .filter(|p| p.inside)
            .map(|p| p.segment)
            .collect()
    }

    /// Trims a contour to the region, one contour per connected stretch.
    ///
    /// A new fragment starts wherever the contour leaves the region. For a
    /// closed contour the stretch crossing its seam is joined back together.
    ///
    /// # Errors
    ///
    /// Propagates contour construction errors.
    fn clip(&self, contour: &Contour) -> Result<Vec<Contour>> {
        let mut chain = FragmentChain::new(contour);
        for seg in contour.segments() {
            for piece in self.pieces(seg) {
                if piece.inside {
                    chain.push(piece.segment)?;
                } else {
                    chain.interrupt();
                }
            }
        }
        Ok(chain.finish(contour.is_closed()))
    }
}

/// Collects inside pieces into connected fragments.
struct FragmentChain {
    template: Contour,
    current: Contour,
    done: Vec<Contour>,
}

impl FragmentChain {
    fn new(source: &Contour) -> Self {
        let template = Contour::with_order(source.center(), source.order());
        Self {
            current: template.clone(),
            template,
            done: Vec::new(),
        }
    }

    fn push(&mut self, seg: Segment) -> Result<()> {
        let continues = self.current.end().is_some_and(|e| same_point(&e, &seg.start()));
        if !self.current.is_empty() && !continues {
            debug!(segment = %seg, "piece does not continue fragment");
            self.interrupt();
        }
        self.current.add(seg)
    }

    fn interrupt(&mut self) {
        if !self.current.is_empty() {
            let fragment = std::mem::replace(&mut self.current, self.template.clone());
            self.done.push(fragment);
        }
    }

    fn finish(mut self, wraps: bool) -> Vec<Contour> {
        self.interrupt();
        let mut fragments = self.done;
        if wraps && fragments.len() > 1 {
            let seam_joins = match (fragments.last().and_then(Contour::end), fragments[0].start()) {
                (Some(e), Some(s)) => same_point(&e, &s),
                _ => false,
            };
            if seam_joins {
                let first = fragments.remove(0);
                if let Some(mut last) = fragments.pop() {
                    match last.try_merge(first) {
                        Ok(()) => fragments.insert(0, last),
                        Err(first) => {
                            fragments.insert(0, first);
                            fragments.push(last);
                        }
                    }
                }
            }
        }
        fragments
    }
}

/// Splits `seg` at the sorted parameters `ts`, skipping cuts at its ends.
pub(crate) fn split_at_params(seg: &Segment, ts: &[f64]) -> Vec<Segment> {
    let min_step = EPSILON / seg.length().max(EPSILON);
    let mut parts = Vec::with_capacity(ts.len() + 1);
    let mut rest = seg.clone();
    let mut done = 0.0;
    for &t in ts {
        if t - done < min_step || 1.0 - t < min_step {
            continue;
        }
        let (head, tail) = rest.split_at((t - done) / (1.0 - done));
        parts.push(head);
        rest = tail;
        done = t;
    }
    parts.push(rest);
    parts
}
