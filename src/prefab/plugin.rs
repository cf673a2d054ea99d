//! Prefab plugin wiring (glue).
//! - Registry asset/loader
//! - Load the configured registry at startup
//! - Build the `PrefabLibrary` once the registry is ready

use bevy::prelude::*;

use super::library::PrefabLibrary;
use super::registry::{PrefabRegistry, PrefabRegistryAssetPlugin};

/// Where the prefab manifest lives.
#[derive(Resource, Clone)]
pub struct PrefabSettings {
    pub registry_path: String,
}
impl Default for PrefabSettings {
    fn default() -> Self {
        Self { registry_path: "prefabs/blocks.prefabs.ron".to_string() }
    }
}

/// Handle to the loaded PrefabRegistry asset.
#[derive(Resource, Default)]
pub struct PrefabRegistryHandle(pub Handle<PrefabRegistry>);

pub struct PrefabPlugin;
impl Plugin for PrefabPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PrefabRegistryAssetPlugin)
            .init_resource::<PrefabSettings>()
            .init_resource::<PrefabRegistryHandle>()
            .add_systems(Startup, load_registry)
            .add_systems(Update, build_library_when_ready);
    }
}

/// Startup: request loading the registry manifest, store handle.
fn load_registry(
    mut handle_res: ResMut<PrefabRegistryHandle>,
    settings: Res<PrefabSettings>,
    assets: Res<AssetServer>,
) {
    if handle_res.0.is_strong() { return; }
    handle_res.0 = assets.load(settings.registry_path.as_str());
    info!("Prefabs: loading registry from '{}'", settings.registry_path);
}

/// Update: build the library once, the first frame the registry is available.
fn build_library_when_ready(
    mut commands: Commands,
    handle_res: Res<PrefabRegistryHandle>,
    registries: Res<Assets<PrefabRegistry>>,
    assets: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut built: Local<bool>,
) {
    if *built { return; }
    let Some(registry) = registries.get(&handle_res.0) else { return; };

    let library = PrefabLibrary::build(registry, &mut meshes, &mut materials, &assets);
    info!("Prefabs: library ready with {} prefab(s)", library.len());
    commands.insert_resource(library);
    *built = true;
}
