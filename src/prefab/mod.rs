//! Placeable prefabs: data definitions, the runtime library and spawn helpers.

pub mod components;
pub mod library;
pub mod plugin;
pub mod registry;

pub use components::{Placeable, Placed, PrefabId, RendererParts};
pub use library::{spawn_placeable, spawn_placed, Prefab, PrefabLibrary, PrefabPart};
pub use plugin::{PrefabPlugin, PrefabSettings};
