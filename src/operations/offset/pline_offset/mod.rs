mod filter;
mod raw_offset;
mod self_intersect;
mod slice;
mod stitch;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::pline::Pline;

/// Offsets a polyline of lines and arcs using the slice-and-filter algorithm.
///
/// Closed polylines: positive distance shrinks a counter-clockwise ring.
/// Open polylines: positive distance offsets to the left of travel.
/// Results carry no end caps.
#[derive(Debug)]
pub struct PlineOffset2D {
    pline: Pline,
    distance: f64,
}

impl PlineOffset2D {
    /// Creates an offset of `pline` by `distance`.
    #[must_use]
    pub fn new(pline: Pline, distance: f64) -> Self {
        Self { pline, distance }
    }

    /// Executes the offset, returning one or more result polylines.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for fewer than 2 vertices and
    /// `OperationError::OffsetExhausted` when nothing of the offset survives:
    /// every arc collapsed, every slice was too close to the source, or a
    /// closed ring turned inside out or moved past the opposite side.
    pub fn execute(&self) -> Result<Vec<Pline>> {
        if self.pline.vertices.len() < 2 {
            return Err(OperationError::InvalidInput(
                "at least 2 vertices required for pline offset".to_owned(),
            )
            .into());
        }
        if self.distance.abs() < crate::math::TOLERANCE {
            return Ok(vec![self.pline.clone()]);
        }

        let raw = raw_offset::build(&self.pline, self.distance)
            .ok_or(OperationError::OffsetExhausted(self.distance))?;

        let intersections = self_intersect::find_all(&raw);
        let candidates = if intersections.is_empty() {
            vec![raw]
        } else {
            let slices = slice::build(&raw.vertices, raw.segment_count(), &intersections);
            let valid = filter::apply(&slices, &self.pline, self.distance);
            stitch::connect(&valid, self.pline.closed)
        };

        let source_area = self.pline.signed_area();
        let result: Vec<Pline> = candidates
            .into_iter()
            .filter(|p| !self.pline.closed || keeps_orientation(source_area, p.signed_area()))
            .filter(|p| filter::clears_source(p, &self.pline, self.distance))
            .collect();

        debug!(
            distance = self.distance,
            intersections = intersections.len(),
            pieces = result.len(),
            "pline offset"
        );
        if result.is_empty() {
            return Err(OperationError::OffsetExhausted(self.distance).into());
        }
        Ok(result)
    }
}

/// A surviving ring winds the same way as its source and is not empty.
fn keeps_orientation(source_area: f64, area: f64) -> bool {
    area.abs() > crate::math::EPSILON * crate::math::EPSILON
        && source_area.signum() == area.signum()
}
