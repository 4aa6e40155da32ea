pub mod pline_offset;

use tracing::trace;

use crate::error::Result;
use crate::geometry::Contour;

pub use pline_offset::PlineOffset2D;

/// Offsets a contour in its plane.
///
/// For a closed counter-clockwise contour a positive distance shrinks it;
/// open contours move to the left of travel. Each result keeps the source's
/// height, center and ring order.
#[derive(Debug)]
pub struct ContourOffset<'a> {
    contour: &'a Contour,
    distance: f64,
}

impl<'a> ContourOffset<'a> {
    /// Creates an offset of `contour` by `distance`.
    #[must_use]
    pub fn new(contour: &'a Contour, distance: f64) -> Self {
        Self { contour, distance }
    }

    /// # Errors
    ///
    /// Returns `OperationError::OffsetExhausted` when the offset leaves no
    /// curve behind and `OperationError::InvalidInput` for an empty contour.
    pub fn execute(&self) -> Result<Vec<Contour>> {
        let z = self.contour.start().map_or(0.0, |p| p.z);
        let plines = PlineOffset2D::new(self.contour.to_pline(), self.distance).execute()?;
        let contours: Vec<Contour> = plines
            .iter()
            .map(|p| {
                let mut c = Contour::from_pline(p, z, self.contour.center());
                c.set_order(self.contour.order());
                c
            })
            .filter(|c| !c.is_empty())
            .collect();
        trace!(distance = self.distance, pieces = contours.len(), "contour offset");
        Ok(contours)
    }
}
