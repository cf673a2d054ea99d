// src/stack.rs
use bevy::prelude::*;

use crate::config::EditorConfig;
use crate::grid::visualizer::draw_grid_cage;
use crate::grid::GridIndex;
use crate::prefab::{PrefabPlugin, PrefabSettings};
use crate::session::PlacementPlugin;

/// Grid + prefabs + placement session, built from one loaded config.
/// The grid instance is created here and handed to the app; nothing else creates one.
#[derive(Default)]
pub struct EditorStackPlugin {
    pub config: EditorConfig,
}

impl EditorStackPlugin {
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }
}

impl Plugin for EditorStackPlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;
        app.insert_resource(GridIndex::new(config.grid))
           .insert_resource(config.placement.clone())
           .insert_resource(config.visualizer)
           .insert_resource(PrefabSettings { registry_path: config.prefabs_path.clone() })
           .add_plugins(PrefabPlugin)        // registry asset + library
           .add_plugins(PlacementPlugin)     // session chain + preview pool
           .add_systems(Update, draw_grid_cage);
    }
}
