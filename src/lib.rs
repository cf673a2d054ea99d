//! gridstamp: grab an object, see where it lands on a 3D grid, and stamp
//! copies along a dragged path.
//!
//! Most apps only need [`stack::EditorStackPlugin`] with a loaded
//! [`config::EditorConfig`]. Producers push [`session::PlacementCommand`]s
//! into [`session::PlacementInput`]; level loaders restore objects through
//! [`prefab::spawn_placed`].

pub mod config;
pub mod grid;
pub mod prefab;
pub mod preview;
pub mod session;
pub mod stack;
