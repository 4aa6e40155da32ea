pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod params;
pub mod workstep;

pub use error::{MillpathError, Result};
pub use operations::{Boundary, Stock, ToolpathGenerator, ToolpathResult};
pub use params::MachiningParams;
pub use workstep::{PostProcessor, Workstep};
