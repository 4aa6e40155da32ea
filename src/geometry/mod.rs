pub mod boundary;
pub mod contour;
pub mod pline;
pub mod pocket;
pub mod segment;
pub mod text;

pub use boundary::{assemble, BoundaryEdge};
pub use contour::{compare_contours, Contour};
pub use pline::{Pline, PlineVertex};
pub use pocket::Pocket;
pub use segment::{Arc, Line, Segment};
