pub mod clip;
mod generate;
mod inter_move;
mod level_offset;
pub mod offset;
mod pocket_split;

pub use clip::{CutRegion, SectionRegion, Stock, StockClipper, StockSilhouette};
pub use generate::{Boundary, LevelPaths, ToolpathGenerator, ToolpathResult};
pub use inter_move::InterMove;
pub use level_offset::{OffsetSets, PathBuilder};
pub use offset::{ContourOffset, PlineOffset2D};
pub use pocket_split::PocketSplit;
