use tracing::warn;

use super::contour::Contour;
use super::segment::{Arc, Segment};
use crate::error::{GeometryError, MillpathError, Result};
use crate::math::{Point3, Vector3};

/// Edge primitive handed over by the CAD collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryEdge {
    Line {
        start: Point3,
        end: Point3,
    },
    Arc {
        center: Point3,
        axis: Vector3,
        start: Point3,
        end: Point3,
    },
    /// Any other curve type, named by its kind.
    Other(String),
}

impl TryFrom<BoundaryEdge> for Segment {
    type Error = MillpathError;

    fn try_from(edge: BoundaryEdge) -> Result<Self> {
        match edge {
            BoundaryEdge::Line { start, end } => Ok(Self::line(start, end)),
            BoundaryEdge::Arc {
                center,
                axis,
                start,
                end,
            } => Ok(Self::Arc(Arc::new(center, axis, start, end)?)),
            BoundaryEdge::Other(kind) => Err(GeometryError::Unsupported(kind).into()),
        }
    }
}

/// Converts edges to segments, splitting full circles into halves.
///
/// # Errors
///
/// Fails with `GeometryError::Unsupported` for edges other than lines and
/// arcs, or with the arc construction error for malformed arcs.
pub fn edges_to_segments<I>(edges: I) -> Result<Vec<Segment>>
where
    I: IntoIterator<Item = BoundaryEdge>,
{
    let mut segments = Vec::new();
    for edge in edges {
        match Segment::try_from(edge)? {
            Segment::Arc(arc) if arc.is_full_circle() => {
                let (head, tail) = arc.split_at(0.5);
                segments.push(Segment::Arc(head));
                segments.push(Segment::Arc(tail));
            }
            seg if seg.is_degenerate() => {}
            seg => segments.push(seg),
        }
    }
    Ok(segments)
}

/// Assembles an unordered bag of edges into oriented contours.
///
/// Segments are added to the contour under construction until none of the
/// remaining ones touches it; then a new contour is started.
///
/// # Errors
///
/// Fails with `GeometryError::Unsupported` when an edge is neither a line
/// nor an arc.
pub fn assemble<I>(edges: I, center: Point3) -> Result<Vec<Contour>>
where
    I: IntoIterator<Item = BoundaryEdge>,
{
    let mut pending = edges_to_segments(edges)?;
    let mut contours: Vec<Contour> = Vec::new();

    while !pending.is_empty() {
        let mut contour = Contour::new(center);
        contour.add(pending.remove(0))?;

        loop {
            let mut progressed = false;
            let mut i = 0;
            while i < pending.len() {
                if contour.is_closed() {
                    break;
                }
                if contour.touches(&pending[i]) {
                    contour.add(pending.remove(i))?;
                    progressed = true;
                } else {
                    i += 1;
                }
            }
            if !progressed || contour.is_closed() {
                break;
            }
        }
        if !pending.is_empty() {
            warn!(
                segments = contour.len(),
                remaining = pending.len(),
                "boundary split into another contour"
            );
        }
        contours.push(contour);
    }

    Ok(contours)
}
