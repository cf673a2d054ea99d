//! Ghost previews shown while placing.

pub mod components;
mod pool;

pub use components::{GhostMaterials, PreviewGhost, PreviewGhostPart};
pub use pool::{init_preview_pool, PreviewPool};
