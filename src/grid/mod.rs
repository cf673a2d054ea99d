//! Spatial grid: cell math, occupancy and the visible cage.

mod coords;
mod index;
pub mod visualizer;

pub use coords::{CellCoord, GridConfig};
pub use index::GridIndex;
pub use visualizer::GridVisualizer;
