use bevy::prelude::*;

mod setup;
mod input;
mod actions;
mod ui;

use gridstamp::config::EditorConfig;
use gridstamp::session::PlacementSet;
use gridstamp::stack::EditorStackPlugin;

// the bits main wires up
use actions::ActionState;
use input::{camera_controller, input_mapping_system, move_hand_system, placement_input_system};
use ui::{log_haptic_pulses, spawn_status_hud, update_status_hud};

const CONFIG_PATH: &str = "assets/config/editor.ron";

fn main() {
    let mut app = App::new();
    // core engine plugins first, so config loading is logged
    app.add_plugins(DefaultPlugins);

    let config = EditorConfig::load_or_default(CONFIG_PATH);
    app.insert_resource(config.demo.clone())
        // grid + prefabs + placement session
        .add_plugins(EditorStackPlugin::new(config))
        .init_resource::<ActionState>()
        // camera, light, hands
        .add_systems(Startup, (setup::setup, spawn_status_hud))
        .add_systems(Update, setup::spawn_demo_level)
        // keyboard -> hands + session input, before the session tick
        .add_systems(
            Update,
            (input_mapping_system, move_hand_system, placement_input_system)
                .chain()
                .before(PlacementSet),
        )
        .add_systems(Update, camera_controller)
        .add_systems(Update, (update_status_hud, log_haptic_pulses).after(PlacementSet))
        .run();
}
